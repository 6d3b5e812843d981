use crate::domain::value_objects::{ItemId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// アイテムのスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
}

/// アイテムカタログポート
///
/// 予約コンテキストとカタログコンテキストの境界を維持する。
/// 予約コンテキストは貸出可否と所有者のみを必要とする。
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// アイテムを取得する
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>>;
}
