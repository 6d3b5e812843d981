use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, UserId};

/// コマンド：アイテムの予約を申請する
///
/// start・endは未指定の可能性があり、検証はドメイン層で行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub item_id: ItemId,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub requester_id: UserId,
}

/// コマンド：予約を承認または却下する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub booking_id: BookingId,
    pub decider_id: UserId,
    pub approve: bool,
}
