//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`]
//! and the wire encodings used by the HTTP gateway and the gRPC server.

use super::app_error::AppError;
use super::kind::ErrorKind;

/// `details` の `@type` に使う RefreshInfo の型 URL
pub const REFRESH_INFO_TYPE_URL: &str = "type.googleapis.com/blog.v1.RefreshInfo";

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::Internal,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::invalid_argument("invalid integer format").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::invalid_argument("malformed JSON body").with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("record not found").with_source(err),
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                let app_err = match db_err.code().as_deref() {
                    Some("23505") => AppError::already_exists("record already exists"),
                    Some("23503") => {
                        AppError::invalid_argument("referenced record does not exist")
                    }
                    Some("23514") => AppError::invalid_argument("check constraint violation"),
                    _ => AppError::internal("database error"),
                };
                app_err.with_source(err)
            }
            _ => AppError::internal("database error").with_source(err),
        }
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        self.log();

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let details = if self.is_refreshable() {
            vec![serde_json::json!({
                "@type": REFRESH_INFO_TYPE_URL,
                "refreshable": true,
            })]
        } else {
            Vec::new()
        };

        let body = serde_json::json!({
            "code": self.kind().grpc_code(),
            "message": self.message(),
            "details": details,
        });

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Tonic conversions (feature-gated)
// ============================================================================

#[cfg(feature = "tonic")]
mod rpc {
    /// `google.rpc.Status` と同じワイヤー形式
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RpcStatus {
        #[prost(int32, tag = "1")]
        pub code: i32,
        #[prost(string, tag = "2")]
        pub message: String,
        #[prost(message, repeated, tag = "3")]
        pub details: Vec<prost_types::Any>,
    }

    /// `blog.v1.RefreshInfo`
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct RefreshInfo {
        #[prost(bool, tag = "1")]
        pub refreshable: bool,
    }
}

#[cfg(feature = "tonic")]
impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        use prost::Message;
        use tonic::Code;

        err.log();

        let code = match err.kind() {
            ErrorKind::InvalidArgument => Code::InvalidArgument,
            ErrorKind::Unauthenticated => Code::Unauthenticated,
            ErrorKind::PermissionDenied => Code::PermissionDenied,
            ErrorKind::NotFound => Code::NotFound,
            ErrorKind::AlreadyExists => Code::AlreadyExists,
            ErrorKind::Internal => Code::Internal,
            ErrorKind::Unimplemented => Code::Unimplemented,
        };

        if !err.is_refreshable() {
            return tonic::Status::new(code, err.message());
        }

        let info = rpc::RefreshInfo { refreshable: true };
        let status = rpc::RpcStatus {
            code: err.kind().grpc_code(),
            message: err.message().to_string(),
            details: vec![prost_types::Any {
                type_url: REFRESH_INFO_TYPE_URL.to_string(),
                value: info.encode_to_vec(),
            }],
        };

        tonic::Status::with_details(code, err.message(), status.encode_to_vec().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let app_err: AppError = io_err.into();
        assert_eq!(app_err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_parse_int_error_conversion() {
        let parse_err: Result<i32, _> = "abc".parse();
        let app_err: AppError = parse_err.unwrap_err().into();
        assert_eq!(app_err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::InvalidArgument);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_row_not_found_conversion() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);
    }

    #[cfg(feature = "tonic")]
    #[test]
    fn test_tonic_status_carries_refresh_info() {
        use prost::Message;

        let status: tonic::Status = AppError::unauthenticated("token has expired")
            .refreshable()
            .into();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
        assert_eq!(status.message(), "token has expired");

        let decoded = rpc::RpcStatus::decode(status.details()).unwrap();
        assert_eq!(decoded.details.len(), 1);
        assert_eq!(decoded.details[0].type_url, REFRESH_INFO_TYPE_URL);
        let info = rpc::RefreshInfo::decode(decoded.details[0].value.as_slice()).unwrap();
        assert!(info.refreshable);
    }

    #[cfg(feature = "tonic")]
    #[test]
    fn test_tonic_status_plain() {
        let status: tonic::Status = AppError::already_exists("name taken").into();
        assert_eq!(status.code(), tonic::Code::AlreadyExists);
        assert!(status.details().is_empty());
    }

    #[cfg(feature = "axum")]
    fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let bytes = tokio_test::block_on(axum::body::to_bytes(resp.into_body(), usize::MAX))
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_axum_status_mapping() {
        use axum::response::IntoResponse;

        let resp = AppError::already_exists("name taken").into_response();
        assert_eq!(resp.status().as_u16(), 403);
        let body = json_body(resp);
        assert_eq!(body["code"], 6);
        assert_eq!(body["message"], "name taken");
        assert_eq!(body["details"], serde_json::json!([]));

        let resp = AppError::unauthenticated("token has expired")
            .refreshable()
            .into_response();
        assert_eq!(resp.status().as_u16(), 401);
        let body = json_body(resp);
        assert_eq!(body["code"], 16);
        assert_eq!(body["message"], "token has expired");
        assert_eq!(
            body["details"],
            serde_json::json!([{
                "@type": REFRESH_INFO_TYPE_URL,
                "refreshable": true,
            }])
        );
    }
}
