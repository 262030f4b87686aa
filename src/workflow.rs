//! The import run: login, upload, detect, validate, confirm, commit.
//!
//! Steps run strictly in order and the first failure ends the run. The
//! uploaded file is left on the server when a later step fails.

use crate::api::{
    CommitRequest, CommitResponse, DetectRequest, ImportApi, LoginRequest, ValidateRequest,
};
use crate::config::Settings;
use crate::error::ImportError;
use crate::mapping::{CommitConfig, ImportType, SKIP_ROWS};
use crate::ui::{self, Operator};
use std::path::Path;
use tracing::info;

/// Runs a full import of `file` as `import_type` and returns the job the
/// server created.
pub fn run_import<A, O>(
    api: &mut A,
    operator: &mut O,
    settings: &Settings,
    file: &Path,
    import_type: ImportType,
) -> Result<CommitResponse, ImportError>
where
    A: ImportApi,
    O: Operator,
{
    if !file.is_file() {
        return Err(ImportError::FileNotFound(file.to_path_buf()));
    }

    let pb = ui::spinner("Logging in...");
    let login = api.login(&LoginRequest {
        email: settings.email.clone(),
        password: settings.password.clone(),
    });
    pb.finish_and_clear();
    api.set_token(&login?.access_token);
    println!("Token obtained");

    let pb = ui::spinner(format!("Uploading {}...", file.display()));
    let uploaded = api.upload(file);
    pb.finish_and_clear();
    let uploaded = uploaded?;
    ui::print_lines(&ui::upload_lines(&uploaded));
    let file_path = uploaded.file_path;

    let pb = ui::spinner("Detecting format...");
    let detected = api.detect(&DetectRequest {
        file_path: file_path.clone(),
        skip_rows: SKIP_ROWS,
    });
    pb.finish_and_clear();
    let detected = detected?;
    ui::print_lines(&ui::detection_lines(&detected));
    let config = detected.import_config();

    let pb = ui::spinner(format!("Validating {}...", import_type));
    let validation = api.validate(&ValidateRequest {
        file_path: file_path.clone(),
        file_type: import_type,
        column_mapping: import_type.column_mapping(),
        config: config.clone(),
    });
    pb.finish_and_clear();
    let validation = validation?;
    ui::print_lines(&ui::validation_lines(&validation));
    if !validation.is_valid {
        return Err(ImportError::Rejected { error_rows: validation.error_rows });
    }

    operator.confirm_commit()?;

    let pb = ui::spinner("Committing...");
    let job = api.commit(&CommitRequest {
        file_path,
        file_type: import_type,
        column_mapping: import_type.column_mapping(),
        config: CommitConfig::new(config, import_type),
    });
    pb.finish_and_clear();
    let job = job?;
    info!(job_id = %job.job_id, import_log_id = %job.import_log_id, "import job created");
    ui::print_lines(&ui::job_lines(&job));
    Ok(job)
}
