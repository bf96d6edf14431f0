//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by the HTTP gateway and the gRPC
//! server. Every kind maps to exactly one HTTP status and one gRPC code.

use serde::Serialize;

/// エラー種別の列挙体
///
/// ゲートウェイ (HTTP) と gRPC の両方で同じ分類を使います。
/// `AlreadyExists` は HTTP では 403 に対応します（一意制約違反）。
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.status_code(), 404);
/// assert_eq!(kind.grpc_code(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 400 - Validator failed, malformed id, missing field
    InvalidArgument,
    /// 401 - Missing/invalid/expired access token
    Unauthenticated,
    /// 403 - Role below the required rank
    PermissionDenied,
    /// 404 - User/session/post absent
    NotFound,
    /// 403 - Unique constraint violation
    AlreadyExists,
    /// 500 - Store failure or unexpected state
    Internal,
    /// 501 - Method unknown to the guard
    Unimplemented,
}

impl ErrorKind {
    /// HTTP ステータスコードを取得
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            ErrorKind::InvalidArgument => 400,
            ErrorKind::Unauthenticated => 401,
            ErrorKind::PermissionDenied => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::AlreadyExists => 403,
            ErrorKind::Internal => 500,
            ErrorKind::Unimplemented => 501,
        }
    }

    /// gRPC ステータスコード（数値）を取得
    ///
    /// Values follow `google.rpc.Code`. The HTTP gateway reports this number
    /// in the `code` field of its error body.
    #[inline]
    pub const fn grpc_code(&self) -> i32 {
        match self {
            ErrorKind::InvalidArgument => 3,
            ErrorKind::NotFound => 5,
            ErrorKind::AlreadyExists => 6,
            ErrorKind::PermissionDenied => 7,
            ErrorKind::Unimplemented => 12,
            ErrorKind::Internal => 13,
            ErrorKind::Unauthenticated => 16,
        }
    }

    /// ユーザー向けの文字列表現を取得
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "Invalid Argument",
            ErrorKind::Unauthenticated => "Unauthenticated",
            ErrorKind::PermissionDenied => "Permission Denied",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::AlreadyExists => "Already Exists",
            ErrorKind::Internal => "Internal",
            ErrorKind::Unimplemented => "Unimplemented",
        }
    }

    /// サーバー側のエラーかどうかを判定
    ///
    /// 5xx系のエラーは `true` を返します。
    /// これらのエラーはログに記録すべきです。
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// クライアント側のエラーかどうかを判定
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        let code = self.status_code();
        code >= 400 && code < 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::InvalidArgument.status_code(), 400);
        assert_eq!(ErrorKind::Unauthenticated.status_code(), 401);
        assert_eq!(ErrorKind::PermissionDenied.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::AlreadyExists.status_code(), 403);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
        assert_eq!(ErrorKind::Unimplemented.status_code(), 501);
    }

    #[test]
    fn test_grpc_codes() {
        assert_eq!(ErrorKind::InvalidArgument.grpc_code(), 3);
        assert_eq!(ErrorKind::Unauthenticated.grpc_code(), 16);
        assert_eq!(ErrorKind::PermissionDenied.grpc_code(), 7);
        assert_eq!(ErrorKind::AlreadyExists.grpc_code(), 6);
        assert_eq!(ErrorKind::Internal.grpc_code(), 13);
    }

    #[test]
    fn test_is_server_error() {
        assert!(!ErrorKind::InvalidArgument.is_server_error());
        assert!(!ErrorKind::NotFound.is_server_error());
        assert!(ErrorKind::Internal.is_server_error());
        assert!(ErrorKind::Unimplemented.is_server_error());
    }

    #[test]
    fn test_is_client_error() {
        assert!(ErrorKind::InvalidArgument.is_client_error());
        assert!(ErrorKind::AlreadyExists.is_client_error());
        assert!(!ErrorKind::Internal.is_client_error());
    }
}
