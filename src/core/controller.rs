use std::sync::Arc;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::error;
use crate::catalog::domain::CatalogService;
use crate::core::command::CommandError;
use crate::core::domain::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub(crate) config: Arc<Configuration>,
    pub(crate) catalog_service: Arc<dyn CatalogService>,
}

impl AppState {
    pub fn new(config: Configuration, catalog_service: Arc<dyn CatalogService>) -> AppState {
        AppState {
            config: Arc::new(config),
            catalog_service,
        }
    }
}

// store and runtime details stay in the logs
const INTERNAL_ERROR_MESSAGE: &str = "internal error while processing the request";

pub(crate) type ServerError = (StatusCode, Json<Value>);

pub(crate) fn error_body(status: StatusCode, message: &str) -> ServerError {
    (status, Json(json!({
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or("Unknown"),
        "message": message,
    })))
}

pub(crate) fn json_to_server_error(err: serde_json::Error) -> ServerError {
    error_body(StatusCode::BAD_REQUEST, format!("{}", err).as_str())
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Database { message, reason_code, retryable } => {
                error!(message = message.as_str(), ?reason_code, retryable, "store failure");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            // duplicate identifiers are reported as a bad request rather than a conflict
            CommandError::DuplicateKey { message } => {
                error_body(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::NotFound { message } => {
                error_body(StatusCode::NOT_FOUND, message.as_str())
            }
            CommandError::Runtime { message, reason_code, retryable } => {
                error!(message = message.as_str(), ?reason_code, retryable, "runtime failure");
                error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            CommandError::Serialization { message } => {
                error_body(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::Validation { message, .. } => {
                error_body(StatusCode::BAD_REQUEST, message.as_str())
            }
            CommandError::InvalidFields { errors } => {
                (StatusCode::BAD_REQUEST, Json(json!(errors)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use axum::http::StatusCode;
    use crate::core::command::CommandError;
    use crate::core::controller::{ServerError, INTERNAL_ERROR_MESSAGE};

    #[tokio::test]
    async fn test_should_map_command_errors_to_status() {
        let cases = vec![
            (CommandError::NotFound { message: "test".to_string() }, StatusCode::NOT_FOUND),
            (CommandError::DuplicateKey { message: "test".to_string() }, StatusCode::BAD_REQUEST),
            (CommandError::Validation { message: "test".to_string(), reason_code: None }, StatusCode::BAD_REQUEST),
            (CommandError::Serialization { message: "test".to_string() }, StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            let (actual, body) = ServerError::from(err);
            assert_eq!(status, actual);
            assert_eq!("test", body.0["message"]);
            assert_eq!(status.as_u16(), body.0["status"]);
        }
    }

    #[tokio::test]
    async fn test_should_hide_internal_failures() {
        let cases = vec![
            CommandError::Runtime { message: "sqlite connection poisoned".to_string(), reason_code: None, retryable: false },
            CommandError::Database {
                message: "sqlite error disk I/O error".to_string(),
                reason_code: Some("SystemIoFailure".to_string()),
                retryable: false,
            },
        ];
        for err in cases {
            let (status, body) = ServerError::from(err);
            assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, status);
            assert_eq!(500, body.0["status"]);
            assert_eq!(INTERNAL_ERROR_MESSAGE, body.0["message"]);
            assert!(!body.0.to_string().contains("sqlite"));
        }
    }

    #[tokio::test]
    async fn test_should_return_field_errors_as_body() {
        let errors = BTreeMap::from([
            ("isbn".to_string(), "must not be blank".to_string()),
            ("title".to_string(), "must not be blank".to_string()),
        ]);
        let (status, body) = ServerError::from(CommandError::InvalidFields { errors });
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("must not be blank", body.0["isbn"]);
        assert_eq!("must not be blank", body.0["title"]);
        assert!(body.0.get("message").is_none());
    }
}
