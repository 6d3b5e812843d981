use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_catalog::{Item, ItemCatalog as ItemCatalogTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// ItemCatalogのモック実装
///
/// アイテムを登録することで状態を持ったテストをサポート。
pub struct ItemCatalog {
    items: Mutex<HashMap<ItemId, Item>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用にアイテムを登録し、IDを返す
    pub fn add_item(&self, name: &str, owner_id: UserId, available: bool) -> ItemId {
        let id = ItemId::new();
        self.insert(Item {
            id,
            name: name.to_string(),
            description: format!("{} for rent", name),
            available,
            owner_id,
        });
        id
    }

    /// 登録済みアイテムの貸出可否を切り替える
    pub fn set_available(&self, item_id: ItemId, available: bool) {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(item) = items.get_mut(&item_id) {
            item.available = available;
        }
    }

    pub fn insert(&self, item: Item) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(item.id, item);
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemCatalogTrait for ItemCatalog {
    async fn get(&self, item_id: ItemId) -> Result<Option<Item>> {
        let items = self.items.lock().map_err(|e| e.to_string())?;
        Ok(items.get(&item_id).cloned())
    }
}
