use chrono::{DateTime, Utc};

/// 時刻ポート
///
/// 各操作は開始時に一度だけ`now`を取得し、すべての比較で使い回す。
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
