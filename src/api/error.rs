use crate::application::booking::{BookingApplicationError, ErrorKind};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、エンジン呼び出し前の入力検証エラーを
/// HTTPレスポンスへマッピングする。
#[derive(Debug)]
pub enum ApiError {
    Application(BookingApplicationError),
    BadRequest(String),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

/// アプリケーションエラーに対応するエラーコード
fn error_code(err: &BookingApplicationError) -> &'static str {
    match err {
        BookingApplicationError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
        BookingApplicationError::UserNotFound(_) => "USER_NOT_FOUND",
        BookingApplicationError::ItemNotFound(_) => "ITEM_NOT_FOUND",
        BookingApplicationError::OwnerCannotBookOwnItem { .. } => "OWNER_CANNOT_BOOK_OWN_ITEM",
        BookingApplicationError::NotItemOwner { .. } => "NOT_ITEM_OWNER",
        BookingApplicationError::NotAuthorized { .. } => "NOT_AUTHORIZED",
        BookingApplicationError::ItemNotAvailable(_) => "ITEM_NOT_AVAILABLE",
        BookingApplicationError::InvalidBookingPeriod { .. } => "INVALID_BOOKING_PERIOD",
        BookingApplicationError::AlreadyApproved(_) => "ALREADY_APPROVED",
        BookingApplicationError::UnknownState(_) => "UNKNOWN_STATE",
        BookingApplicationError::InvalidPagination { .. } => "INVALID_PAGINATION",
        BookingApplicationError::ConcurrentModification(_) => "CONCURRENT_MODIFICATION",
        BookingApplicationError::BookingStoreError(_) => "BOOKING_STORE_ERROR",
        BookingApplicationError::UserDirectoryError(_) => "USER_DIRECTORY_ERROR",
        BookingApplicationError::ItemCatalogError(_) => "ITEM_CATALOG_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Application(err) => {
                let code = error_code(&err);
                match err.kind() {
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, code, err.to_string()),
                    ErrorKind::InvalidOperation | ErrorKind::InvalidArgument => {
                        (StatusCode::BAD_REQUEST, code, err.to_string())
                    }
                    ErrorKind::Conflict => (StatusCode::CONFLICT, code, err.to_string()),
                    // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                    ErrorKind::Internal => {
                        tracing::error!(error = ?err, "{}", err);
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            code,
                            "An unexpected error occurred".to_string(),
                        )
                    }
                }
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
