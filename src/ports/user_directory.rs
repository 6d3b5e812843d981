use crate::domain::value_objects::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーのスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// ユーザーディレクトリポート
///
/// 予約コンテキストとユーザー管理コンテキストの境界を維持する。
/// ユーザーのCRUDは外部の責務で、ここでは参照のみを行う。
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーが存在するか確認する
    async fn exists(&self, user_id: UserId) -> Result<bool>;

    /// ユーザーを取得する
    ///
    /// 予約レスポンスに予約者情報を含めるために使用される。
    async fn get(&self, user_id: UserId) -> Result<Option<User>>;
}
