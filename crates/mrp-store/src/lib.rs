//! # MRP Store
//!
//! 文件庫抽象：集合路徑、讀寫操作與即時訂閱
//!
//! 所有寫入都是單筆記錄原子性的，不提供跨記錄交易。

pub mod collection;
pub mod memory;
pub mod subscription;

pub use collection::{CollectionPath, FieldFilter};
pub use memory::MemoryStore;
pub use subscription::Subscription;

use mrp_core::{Document, MrpError};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// 文件庫錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("找不到文件: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("欄位 `{field}` 不是數值: {reason}")]
    NotNumeric { field: String, reason: String },

    #[error("無效的集合路徑: {0}")]
    InvalidPath(String),

    #[error("訂閱已關閉")]
    Closed,

    #[error("文件庫鎖定失敗")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for MrpError {
    fn from(err: StoreError) -> Self {
        MrpError::Store(err.to_string())
    }
}

/// 寫入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// 整筆覆蓋
    Replace,

    /// 只覆蓋提供的欄位
    Merge,
}

/// 文件庫
pub trait DocumentStore: Send + Sync {
    /// 讀取集合中所有（符合條件的）文件
    fn fetch_all(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>>;

    /// 讀取單筆文件
    fn get(&self, collection: &CollectionPath, id: &str) -> Result<Option<Document>>;

    /// 訂閱集合；每次變更都推送完整的記錄集
    fn subscribe(&self, collection: &CollectionPath) -> Result<Subscription>;

    /// 新增文件，回傳產生的文件ID
    fn add(&self, collection: &CollectionPath, fields: Map<String, Value>) -> Result<String>;

    /// 以指定ID寫入文件（不存在時建立）
    fn set(
        &self,
        collection: &CollectionPath,
        id: &str,
        fields: Map<String, Value>,
        mode: WriteMode,
    ) -> Result<()>;

    /// 原子性地增減數值欄位，回傳新值
    ///
    /// 文件必須存在；欄位不存在時視為 0。
    fn increment(
        &self,
        collection: &CollectionPath,
        id: &str,
        field: &str,
        by: Decimal,
    ) -> Result<Decimal>;

    /// 刪除文件，回傳是否確實刪除
    fn delete(&self, collection: &CollectionPath, id: &str) -> Result<bool>;
}
