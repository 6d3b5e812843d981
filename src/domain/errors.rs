use chrono::{DateTime, Utc};

/// 予約申請のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBookingError {
    /// 所有者が自分のアイテムを予約しようとした
    OwnerCannotBookOwnItem,
    /// 予約期間が不正（未指定、start >= end、過去の開始時刻）
    InvalidPeriod {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

/// 承認・却下のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideBookingError {
    /// 既に承認済み
    AlreadyApproved,
}
