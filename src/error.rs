use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The remote call an error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Login,
    Upload,
    Detect,
    Validate,
    Commit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Login => "login",
            Step::Upload => "upload",
            Step::Detect => "format detection",
            Step::Validate => "validation",
            Step::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Everything that can stop an import run. None of these are retried.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a status other than the expected one.
    #[error("{step} failed: {status} - {body}")]
    Remote { step: Step, status: u16, body: String },

    /// The request never got a usable answer (connection, decoding).
    #[error("{step} request failed: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("validation failed with {error_rows} error row(s); fix them before importing")]
    Rejected { error_rows: u64 },

    #[error("confirmation prompt failed: {0}")]
    Prompt(#[source] std::io::Error),
}

impl ImportError {
    /// The step that failed, for remote errors.
    pub fn step(&self) -> Option<Step> {
        match self {
            ImportError::Remote { step, .. } | ImportError::Transport { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_shows_status_and_body() {
        let err = ImportError::Remote {
            step: Step::Login,
            status: 401,
            body: r#"{"message":"Unauthorized"}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"login failed: 401 - {"message":"Unauthorized"}"#
        );
        assert_eq!(err.step(), Some(Step::Login));
    }

    #[test]
    fn client_setup_error_blames_no_step() {
        let source = reqwest::blocking::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = ImportError::HttpClient(source);
        assert_eq!(err.step(), None);
        assert!(err.to_string().starts_with("failed to build HTTP client"));
        assert!(!err.to_string().contains("login"));
    }

    #[test]
    fn rejection_has_no_step() {
        let err = ImportError::Rejected { error_rows: 3 };
        assert_eq!(err.step(), None);
        assert!(err.to_string().contains("3 error row(s)"));
    }
}
