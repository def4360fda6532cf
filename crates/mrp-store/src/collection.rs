//! 集合路徑與查詢條件

use std::fmt;

use mrp_core::document::collections;
use mrp_core::{Document, Session};
use serde_json::Value;

use crate::{Result, StoreError};

/// 集合路徑（例如 `boms` 或 `users/{uid}/stocks`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// 解析路徑；路徑段不可為空，且段數必須為奇數（指向集合而非文件）
    pub fn new(path: String) -> Result<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|s| s.trim().is_empty()) || segments.len() % 2 == 0 {
            return Err(StoreError::InvalidPath(path));
        }
        Ok(Self(path))
    }

    fn user_scoped(session: &Session, name: &str) -> Self {
        Self(format!("{}/{}/{}", collections::USERS, session.uid, name))
    }

    /// 使用者的庫存
    pub fn stocks(session: &Session) -> Self {
        Self::user_scoped(session, collections::STOCKS)
    }

    /// 使用者的庫存異動
    pub fn movements(session: &Session) -> Self {
        Self::user_scoped(session, collections::MOVEMENTS)
    }

    /// 使用者的供應商
    pub fn suppliers(session: &Session) -> Self {
        Self::user_scoped(session, collections::SUPPLIERS)
    }

    pub fn boms() -> Self {
        Self(collections::BOMS.to_string())
    }

    pub fn manufacturing_orders() -> Self {
        Self(collections::MANUFACTURING_ORDERS.to_string())
    }

    pub fn reorders() -> Self {
        Self(collections::REORDERS.to_string())
    }

    pub fn users() -> Self {
        Self(collections::USERS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最後一段（集合名稱）
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 欄位相等條件
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

impl FieldFilter {
    pub fn eq(field: String, value: Value) -> Self {
        Self { field, value }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.value)
    }
}
