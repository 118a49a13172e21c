use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("内部服务错误: {0}")]
    Internal(String),

    #[error("资源不存在: {0}")]
    NotFound(String),

    #[error("请求无效: {0}")]
    BadRequest(String),

    #[error("配置无效: {0}")]
    InvalidConfig(String),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO错误: {0}")]
    IO(#[from] std::io::Error),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Internal(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Internal(err.to_string())
    }
}

// 从Error转换为axum::http::StatusCode，用于HTTP响应
impl From<&Error> for StatusCode {
    fn from(error: &Error) -> Self {
        match error {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        let message = match &self {
            Error::NotFound(_) | Error::BadRequest(_) => self.to_string(),
            Error::Database(err) => {
                tracing::error!("数据库错误: {}", err);
                "服务器内部错误".to_string()
            }
            _ => {
                tracing::error!("{}", self);
                "服务器内部错误".to_string()
            }
        };

        let json = Json(json!({
            "error": status.as_u16(),
            "message": message,
        }));

        (status, json).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_status() {
        let not_found = Error::NotFound("user 42".to_string());
        assert_eq!(StatusCode::from(&not_found), StatusCode::NOT_FOUND);
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let bad = Error::BadRequest("name is empty".to_string());
        assert_eq!(bad.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_are_internal() {
        let err = Error::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
