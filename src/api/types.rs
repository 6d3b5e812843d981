use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::booking::{BookingDetails, ItemBookingSummary};
use crate::domain::{Booking, ItemId, UserId, commands::CreateBooking};
use crate::ports::{Item, User};

/// 予約作成リクエスト
///
/// `start`・`end`の欠落はエンジン側で期間不正として扱う。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl CreateBookingRequest {
    /// リクエストをコマンドに変換
    pub fn to_command(&self, requester_id: UserId) -> CreateBooking {
        CreateBooking {
            item_id: ItemId::from_uuid(self.item_id),
            start: self.start,
            end: self.end,
            requester_id,
        }
    }
}

/// 承認・却下のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct DecideQuery {
    pub approved: bool,
}

fn default_state() -> String {
    "ALL".to_string()
}

fn default_size() -> i64 {
    10
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub from: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

impl ListBookingsQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.from < 0 {
            return Err(format!("from must not be negative, got {}", self.from));
        }
        if self.size <= 0 {
            return Err(format!("size must be positive, got {}", self.size));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.value(),
            name: item.name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookerSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for BookerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.value(),
            name: user.name.clone(),
        }
    }
}

/// 予約レスポンス（単一取得と一覧の両方）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub item: ItemSummary,
    pub booker: BookerSummary,
}

impl From<BookingDetails> for BookingResponse {
    fn from(details: BookingDetails) -> Self {
        Self {
            id: details.booking.id.value(),
            start: details.booking.start,
            end: details.booking.end,
            status: details.booking.status.as_str().to_string(),
            item: ItemSummary::from(&details.item),
            booker: BookerSummary::from(&details.booker),
        }
    }
}

/// アイテムサマリー内の予約（予約者IDのみ）
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortBookingResponse {
    pub id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<Booking> for ShortBookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.start,
            end: booking.end,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBookingSummaryResponse {
    pub item_id: Uuid,
    pub last_booking: Option<ShortBookingResponse>,
    pub next_booking: Option<ShortBookingResponse>,
}

impl From<ItemBookingSummary> for ItemBookingSummaryResponse {
    fn from(summary: ItemBookingSummary) -> Self {
        Self {
            item_id: summary.item_id.value(),
            last_booking: summary.last_booking.map(ShortBookingResponse::from),
            next_booking: summary.next_booking.map(ShortBookingResponse::from),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
