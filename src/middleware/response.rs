use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::auth::TOKEN_HEADER;
use crate::error::ApiError;

/// Successful JSON response, optionally carrying a freshly issued token header
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: StatusCode,
    pub token: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::OK,
            token: None,
        }
    }

    /// Attach `x-auth-token` to the response
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                return ApiError::internal(format!("Failed to serialize response data: {}", e)).into_response();
            }
        };

        let mut response = (self.status_code, Json(body)).into_response();

        if let Some(token) = self.token {
            match HeaderValue::from_str(&token) {
                Ok(value) => {
                    response
                        .headers_mut()
                        .insert(HeaderName::from_static(TOKEN_HEADER), value);
                }
                Err(e) => return ApiError::internal(format!("Token is not a valid header value: {}", e)).into_response(),
            }
        }

        response
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
