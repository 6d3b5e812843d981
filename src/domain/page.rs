/// ページ指定
///
/// `from`は件数単位のオフセット。ページ番号は`from / size`で求めるため、
/// `from`が`size`の倍数でない場合は切り捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: u32,
}

/// 不正なページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Wrong pagination data: from={from}, size={size}")]
pub struct InvalidPagination {
    pub from: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(index: u32, size: u32) -> Self {
        Self {
            index,
            size: size.max(1),
        }
    }

    /// オフセット指定からページを導出する
    pub fn from_offset(from: i64, size: i64) -> Result<Self, InvalidPagination> {
        let invalid = InvalidPagination { from, size };
        if from < 0 || size <= 0 {
            return Err(invalid);
        }

        let size = u32::try_from(size).map_err(|_| invalid)?;
        let index = if from > 0 { from / i64::from(size) } else { 0 };
        // 範囲外のページは空になるだけなので上限で丸める
        let index = u32::try_from(index).unwrap_or(u32::MAX);

        Ok(Self { index, size })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 先頭からスキップする件数
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size)
    }
}
