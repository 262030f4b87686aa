// API client module: a small blocking HTTP client for the inventory
// service's import endpoints. One request is in flight at a time and
// every call either returns the decoded success body or an ImportError
// carrying the status and raw body the server sent back.

use crate::error::{ImportError, Step};
use crate::mapping::{ColumnMapping, CommitConfig, ImportConfig, ImportType};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Login request payload.
#[derive(Serialize, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Where the server stored the uploaded file. `size` is only sent by
/// newer API versions.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub file_path: String,
    pub skip_rows: u32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub total_rows: u64,
}

impl DetectResponse {
    pub fn import_config(&self) -> ImportConfig {
        ImportConfig::from_detected(self.encoding.as_deref(), self.delimiter.as_deref())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub file_path: String,
    pub file_type: ImportType,
    pub column_mapping: ColumnMapping,
    pub config: ImportConfig,
}

/// One row-level problem reported by the dry run.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: u64,
    #[serde(default)]
    pub field: String,
    pub message: String,
    #[serde(default)]
    pub severity: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub is_valid: bool,
    #[serde(default)]
    pub valid_rows: u64,
    #[serde(default)]
    pub error_rows: u64,
    #[serde(default)]
    pub warning_rows: u64,
    #[serde(default)]
    pub errors: Vec<RowError>,
    #[serde(default)]
    pub stats: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub file_path: String,
    pub file_type: ImportType,
    pub column_mapping: ColumnMapping,
    pub config: CommitConfig,
}

/// The asynchronous job the server created for a commit.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommitResponse {
    pub job_id: String,
    pub import_log_id: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// The remote operations an import run is made of. `ApiClient` talks
/// HTTP; tests swap in a recording fake.
pub trait ImportApi {
    fn login(&mut self, request: &LoginRequest) -> Result<LoginResponse, ImportError>;
    /// Attach the bearer token to every following request.
    fn set_token(&mut self, token: &str);
    fn upload(&mut self, file: &Path) -> Result<UploadResponse, ImportError>;
    fn detect(&mut self, request: &DetectRequest) -> Result<DetectResponse, ImportError>;
    fn validate(&mut self, request: &ValidateRequest) -> Result<ValidateResponse, ImportError>;
    fn commit(&mut self, request: &CommitRequest) -> Result<CommitResponse, ImportError>;
}

/// Blocking client holding the reqwest client, the API base URL and the
/// session token once logged in.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ImportError> {
        let client = Client::builder()
            .build()
            .map_err(ImportError::HttpClient)?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorization header map; empty until a token is set.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {}", t)) {
                Ok(mut val) => {
                    val.set_sensitive(true);
                    headers.insert(AUTHORIZATION, val);
                }
                Err(_) => warn!("token contains characters not allowed in a header, sending without it"),
            }
        }
        headers
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%url, "POST");
        self.client.post(url).headers(self.auth_headers())
    }

    fn post_json<B, T>(&self, step: Step, path: &str, body: &B, accepted: &[StatusCode]) -> Result<T, ImportError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let res = self
            .post(path)
            .json(body)
            .send()
            .map_err(|source| ImportError::Transport { step, source })?;
        read_response(step, res, accepted)
    }
}

/// Decode the body if the status is one the step accepts, otherwise turn
/// status and raw body into a Remote error.
fn read_response<T: DeserializeOwned>(step: Step, res: Response, accepted: &[StatusCode]) -> Result<T, ImportError> {
    let status = res.status();
    info!(%step, status = status.as_u16(), "response");
    if !accepted.contains(&status) {
        let body = res.text().unwrap_or_default();
        return Err(ImportError::Remote { step, status: status.as_u16(), body });
    }
    res.json().map_err(|source| ImportError::Transport { step, source })
}

impl ImportApi for ApiClient {
    fn login(&mut self, request: &LoginRequest) -> Result<LoginResponse, ImportError> {
        self.post_json(Step::Login, "/auth/login", request, &[StatusCode::OK, StatusCode::CREATED])
    }

    fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    /// Streams the file as multipart field `file`. The handle is dropped
    /// once the request has been sent.
    fn upload(&mut self, file_path: &Path) -> Result<UploadResponse, ImportError> {
        let file = File::open(file_path).map_err(|source| ImportError::File {
            path: file_path.to_path_buf(),
            source,
        })?;
        let file_name = file_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("import.csv")
            .to_string();

        let part = multipart::Part::reader(file)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|source| ImportError::Transport { step: Step::Upload, source })?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .post("/import/upload")
            .multipart(form)
            .send()
            .map_err(|source| ImportError::Transport { step: Step::Upload, source })?;
        read_response(Step::Upload, res, &[StatusCode::CREATED])
    }

    fn detect(&mut self, request: &DetectRequest) -> Result<DetectResponse, ImportError> {
        self.post_json(Step::Detect, "/import/detect", request, &[StatusCode::CREATED])
    }

    fn validate(&mut self, request: &ValidateRequest) -> Result<ValidateResponse, ImportError> {
        self.post_json(Step::Validate, "/import/validate", request, &[StatusCode::CREATED])
    }

    fn commit(&mut self, request: &CommitRequest) -> Result<CommitResponse, ImportError> {
        self.post_json(Step::Commit, "/import/commit", request, &[StatusCode::CREATED])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = ApiClient::new("http://localhost:3001/api/v1/").unwrap();
        assert_eq!(api.url("/import/detect"), "http://localhost:3001/api/v1/import/detect");
    }

    #[test]
    fn auth_header_only_after_token() {
        let mut api = ApiClient::new("http://localhost:3001").unwrap();
        assert!(api.auth_headers().is_empty());
        api.set_token("abc.def");
        assert!(api.has_token());
        assert_eq!(api.auth_headers()[AUTHORIZATION], "Bearer abc.def");
    }

    #[test]
    fn login_request_debug_hides_password() {
        let req = LoginRequest { email: "a@b.c".into(), password: "hunter2".into() };
        assert!(!format!("{:?}", req).contains("hunter2"));
    }

    #[test]
    fn detect_response_tolerates_missing_fields() {
        let resp: DetectResponse = serde_json::from_value(json!({
            "headers": ["Item", "Entradas", "Saídas", "Quantidade em estoque"],
            "totalRows": 118,
        }))
        .unwrap();
        assert_eq!(resp.total_rows, 118);
        assert_eq!(resp.import_config(), ImportConfig::default());
    }

    #[test]
    fn extra_server_fields_are_ignored() {
        let upload: UploadResponse = serde_json::from_value(json!({
            "filePath": "uploads/temp/estoque.csv",
            "filename": "estoque.csv",
            "size": 2048,
        }))
        .unwrap();
        assert_eq!(upload.file_path, "uploads/temp/estoque.csv");

        let detected: DetectResponse = serde_json::from_value(json!({
            "encoding": "latin1",
            "delimiter": ";",
            "headers": ["Item"],
            "totalRows": 3,
            "sample": [{"Item": "Mouse USB"}],
        }))
        .unwrap();
        assert_eq!(detected.headers, vec!["Item".to_string()]);
    }

    #[test]
    fn validate_response_decodes_errors() {
        let resp: ValidateResponse = serde_json::from_value(json!({
            "isValid": false,
            "validRows": 10,
            "errorRows": 1,
            "warningRows": 0,
            "errors": [{"row": 5, "field": "name", "message": "required", "severity": "error"}],
            "stats": {"newAssets": 110},
        }))
        .unwrap();
        assert!(!resp.is_valid);
        assert_eq!(resp.errors[0].row, 5);
        assert_eq!(resp.errors[0].severity.as_deref(), Some("error"));
    }

    #[test]
    fn validate_request_wire_shape() {
        let req = ValidateRequest {
            file_path: "uploads/temp/x.csv".into(),
            file_type: ImportType::Balance,
            column_mapping: ImportType::Balance.column_mapping(),
            config: ImportConfig::default(),
        };
        let value = serde_json::to_value(req).unwrap();
        assert_eq!(value["fileType"], "balance");
        assert_eq!(value["filePath"], "uploads/temp/x.csv");
        assert_eq!(value["config"], json!({"encoding": "latin1", "delimiter": ";", "skipRows": 2}));
        assert_eq!(value["columnMapping"]["Item"], "name");
    }
}
