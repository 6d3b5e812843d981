use chrono::{DateTime, Utc};

use super::booking::{Booking, BookingStatus};

/// 一覧取得用の状態トークン
///
/// クエリ時の分類子であり、永続化されるステータスとは別物。
/// 大文字の完全一致でのみパースする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

/// 不明な状態トークン
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown state: {0}")]
pub struct UnknownState(pub String);

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
        }
    }

    /// 1回の操作で取得した`now`に対して述語を確定させる
    pub fn at(self, now: DateTime<Utc>) -> BookingFilter {
        match self {
            BookingState::All => BookingFilter::All,
            BookingState::Current => BookingFilter::Current(now),
            BookingState::Past => BookingFilter::Past(now),
            BookingState::Future => BookingFilter::Future(now),
            BookingState::Waiting => BookingFilter::Status(BookingStatus::Waiting),
            BookingState::Rejected => BookingFilter::Status(BookingStatus::Rejected),
        }
    }
}

impl std::str::FromStr for BookingState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(BookingState::All),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

/// 基準時刻が確定した検索条件
///
/// インメモリ実装は`matches`で評価し、PostgreSQL実装は同じ条件をSQLに変換する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    /// 条件なし
    All,
    /// start <= now < end
    Current(DateTime<Utc>),
    /// end < now
    Past(DateTime<Utc>),
    /// start > now
    Future(DateTime<Utc>),
    /// ステータス一致
    Status(BookingStatus),
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        match *self {
            BookingFilter::All => true,
            BookingFilter::Current(now) => booking.start <= now && now < booking.end,
            BookingFilter::Past(now) => booking.end < now,
            BookingFilter::Future(now) => booking.start > now,
            BookingFilter::Status(status) => booking.status == status,
        }
    }
}
