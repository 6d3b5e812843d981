use crate::domain::{Booking, BookingStatus, ItemId, UserId};
use chrono::{DateTime, Utc};

use super::booking_service::{ServiceDependencies, ensure_user_exists, find_item};
use super::errors::{BookingApplicationError, Result};

/// アイテムの直近・次回の承認済み予約
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBookingSummary {
    pub item_id: ItemId,
    pub last_booking: Option<Booking>,
    pub next_booking: Option<Booking>,
}

/// 純粋関数：承認済み予約から直近・次回の予約を選ぶ
///
/// - 直近：開始済み（進行中または終了済み）のうち、開始が最も遅いもの
/// - 次回：未開始のうち、開始が最も早いもの
///
/// 開始時刻が同じ場合はどちらも先に現れた予約を選ぶ。
pub fn summarize(item_id: ItemId, approved: &[Booking], now: DateTime<Utc>) -> ItemBookingSummary {
    let last_booking = approved
        .iter()
        .filter(|b| b.start < now)
        .rev()
        .max_by_key(|b| b.start)
        .cloned();

    let next_booking = approved
        .iter()
        .filter(|b| b.start > now)
        .min_by_key(|b| b.start)
        .cloned();

    ItemBookingSummary {
        item_id,
        last_booking,
        next_booking,
    }
}

/// アイテムの予約サマリーを取得する
///
/// 予約情報を見られるのはアイテムの所有者のみ。
/// 所有者以外には両方`None`のサマリーを返す。
pub async fn item_booking_summary(
    deps: &ServiceDependencies,
    item_id: ItemId,
    requester_id: UserId,
) -> Result<ItemBookingSummary> {
    let now = deps.clock.now();

    let item = find_item(deps, item_id).await?;
    ensure_user_exists(deps, requester_id).await?;

    if item.owner_id != requester_id {
        return Ok(ItemBookingSummary {
            item_id,
            last_booking: None,
            next_booking: None,
        });
    }

    let approved = deps
        .booking_store
        .find_by_item(item_id, Some(BookingStatus::Approved))
        .await?;

    Ok(summarize(item_id, &approved, now))
}

/// 予約者がアイテムの予約を終了済みか
///
/// コメント投稿の可否判定に使われる。
pub async fn has_completed_booking(
    deps: &ServiceDependencies,
    booker_id: UserId,
    item_id: ItemId,
) -> Result<bool> {
    let now = deps.clock.now();

    ensure_user_exists(deps, booker_id).await?;
    find_item(deps, item_id).await?;

    deps.booking_store
        .exists_finished(booker_id, item_id, now)
        .await
        .map_err(BookingApplicationError::from)
}
