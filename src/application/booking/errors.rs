use crate::domain::{BookingId, ItemId, UserId};
use crate::ports::BookingStoreError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// エラー種別
///
/// 境界層はこの種別のみを見てプロトコル上の応答に変換する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参照先が存在しない、または操作・閲覧の権限がない
    NotFound,
    /// ビジネスルール違反
    InvalidOperation,
    /// 入力値の形式不正
    InvalidArgument,
    /// 並行更新による競合
    Conflict,
    /// 外部依存の障害
    Internal,
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// 予約が見つからない
    #[error("Booking with id = {0} not found")]
    BookingNotFound(BookingId),

    /// ユーザーが見つからない
    #[error("User with id = {0} not found")]
    UserNotFound(UserId),

    /// アイテムが見つからない
    #[error("Item with id = {0} not found")]
    ItemNotFound(ItemId),

    /// 所有者が自分のアイテムを予約しようとした
    #[error("User with id {user_id} is owner of item {item_id}")]
    OwnerCannotBookOwnItem { item_id: ItemId, user_id: UserId },

    /// 所有者以外が承認・却下しようとした
    #[error("User with id {user_id} is not owner and cannot confirm booking {booking_id}")]
    NotItemOwner {
        booking_id: BookingId,
        user_id: UserId,
    },

    /// 予約者・所有者以外が閲覧しようとした
    #[error("Requester with id {user_id} is neither owner of item nor booker of {booking_id}")]
    NotAuthorized {
        booking_id: BookingId,
        user_id: UserId,
    },

    /// アイテムが貸出不可
    #[error("Item {0} is not available")]
    ItemNotAvailable(ItemId),

    /// 予約期間が不正
    #[error("Booking since {start:?} till {end:?} is not available")]
    InvalidBookingPeriod {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },

    /// 既に承認済み
    #[error("Booking with id {0} was already approved")]
    AlreadyApproved(BookingId),

    /// 不明な状態トークン
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// ページ指定が不正
    #[error("Wrong pagination data: from={from}, size={size}")]
    InvalidPagination { from: i64, size: i64 },

    /// 並行更新により保存できなかった
    #[error("Booking with id {0} was modified concurrently")]
    ConcurrentModification(BookingId),

    /// BookingStoreのエラー
    #[error("Booking store error")]
    BookingStoreError(#[source] BookingStoreError),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemCatalogのエラー
    #[error("Item catalog error")]
    ItemCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BookingNotFound(_)
            | Self::UserNotFound(_)
            | Self::ItemNotFound(_)
            | Self::OwnerCannotBookOwnItem { .. }
            | Self::NotItemOwner { .. }
            | Self::NotAuthorized { .. } => ErrorKind::NotFound,

            Self::ItemNotAvailable(_)
            | Self::InvalidBookingPeriod { .. }
            | Self::AlreadyApproved(_)
            | Self::UnknownState(_) => ErrorKind::InvalidOperation,

            Self::InvalidPagination { .. } => ErrorKind::InvalidArgument,

            Self::ConcurrentModification(_) => ErrorKind::Conflict,

            Self::BookingStoreError(_) | Self::UserDirectoryError(_) | Self::ItemCatalogError(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<BookingStoreError> for BookingApplicationError {
    fn from(err: BookingStoreError) -> Self {
        match err {
            BookingStoreError::VersionConflict { id, .. } => Self::ConcurrentModification(id),
            BookingStoreError::NotFound(id) => Self::BookingNotFound(id),
            other => Self::BookingStoreError(other),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
