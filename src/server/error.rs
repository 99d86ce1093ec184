use rouille::Response;
use serde_json::json;

use crate::api_client::ApiError;
use crate::catalog::SourceError;
use crate::foundation::utils::InputError;

#[derive(Debug)]
pub enum ApiResponseError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<InputError> for ApiResponseError {
    fn from(err: InputError) -> Self {
        ApiResponseError::BadRequest(err.to_string())
    }
}

impl From<SourceError> for ApiResponseError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Unavailable(_) => {
                ApiResponseError::Internal("catalog source unavailable".into())
            }
            SourceError::Protocol(msg) => ApiResponseError::Upstream(msg),
        }
    }
}

impl From<ApiError> for ApiResponseError {
    fn from(err: ApiError) -> Self {
        ApiResponseError::Upstream(err.to_string())
    }
}

impl ApiResponseError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiResponseError::BadRequest(_) => 400,
            ApiResponseError::Upstream(_) => 502,
            ApiResponseError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match self {
            ApiResponseError::BadRequest(msg)
            | ApiResponseError::Upstream(msg)
            | ApiResponseError::Internal(msg) => msg,
        };
        Response::json(&json!({ "detail": detail })).with_status_code(status)
    }
}
