use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, ItemId, NewBooking, PageRequest, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// BookingStoreのエラー
#[derive(Debug, Error)]
pub enum BookingStoreError {
    /// 更新対象の予約が存在しない
    #[error("Booking {0} not found")]
    NotFound(BookingId),

    /// 保存済みのバージョンと一致しない（並行更新）
    #[error("Booking {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: BookingId, expected: i32 },

    /// 永続化層のエラー
    #[error("Booking store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, BookingStoreError>;

/// 予約ストアポート
///
/// 予約レコードを排他的に所有する。エンジンはキャッシュを持たず、
/// すべての読み取りはこのポートを経由する。
///
/// 一覧系の検索はすべて start の降順、同値は挿入順で返す。
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 新しい予約を保存する
    ///
    /// IDを採番し、バージョン0で保存した予約を返す。
    async fn insert(&self, booking: NewBooking) -> Result<Booking>;

    /// 既存の予約を更新する
    ///
    /// 可変フィールド（status, updated_at）のみを置き換え、不変フィールドは保持する。
    /// 保存済みのバージョンが`booking.version`と異なる場合は`VersionConflict`を返す。
    /// 成功時はバージョンを1つ進めた予約を返す。
    async fn save(&self, booking: Booking) -> Result<Booking>;

    /// IDで予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// 予約者の予約を検索する
    async fn find_by_booker(
        &self,
        booker_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>>;

    /// アイテム所有者宛ての予約を検索する
    async fn find_by_owner(
        &self,
        owner_id: UserId,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Vec<Booking>>;

    /// アイテムの予約を検索する（ステータス指定は任意）
    async fn find_by_item(
        &self,
        item_id: ItemId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>>;

    /// 予約者が`before`より前に終了したアイテムの予約を持っているか
    async fn exists_finished(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        before: DateTime<Utc>,
    ) -> Result<bool>;
}
