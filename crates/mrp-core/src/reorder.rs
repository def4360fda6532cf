//! 補貨採購單模型

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// 採購單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderStatus {
    /// 待收貨
    Pending,
    /// 已收貨
    Completed,
}

impl ReorderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderStatus::Pending => "pending",
            ReorderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReorderStatus {
    type Err = MrpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ReorderStatus::Pending),
            "completed" => Ok(ReorderStatus::Completed),
            other => Err(MrpError::InvalidStatus(other.to_string())),
        }
    }
}

/// 補貨採購單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reorder {
    /// 文件ID
    pub doc_id: Option<String>,

    /// 建立者（管理員 uid）
    pub owner_uid: String,

    /// 供應商名稱
    pub supplier_name: String,

    /// 物料名稱
    pub name: String,

    /// 物料ID
    pub material_id: Option<String>,

    /// 採購數量
    pub requested_qty: Decimal,

    /// 狀態
    pub status: ReorderStatus,

    /// 建立時間
    pub created_at: Option<DateTime<Utc>>,
}

impl Reorder {
    /// 創建新的採購單（狀態為 Pending）
    pub fn new(
        owner_uid: String,
        supplier_name: String,
        name: String,
        requested_qty: Decimal,
    ) -> Self {
        Self {
            doc_id: None,
            owner_uid,
            supplier_name,
            name,
            material_id: None,
            requested_qty,
            status: ReorderStatus::Pending,
            created_at: None,
        }
    }

    /// 建構器模式：設置文件ID
    pub fn with_doc_id(mut self, doc_id: String) -> Self {
        self.doc_id = Some(doc_id);
        self
    }

    /// 建構器模式：設置物料ID
    pub fn with_material_id(mut self, material_id: String) -> Self {
        self.material_id = Some(material_id);
        self
    }

    /// 建構器模式：設置建立時間
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReorderStatus::Pending
    }

    /// 標記為已收貨（只能從 Pending 轉換）
    pub fn complete(&mut self) -> Result<()> {
        if !self.is_pending() {
            return Err(MrpError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: ReorderStatus::Completed.to_string(),
            });
        }
        self.status = ReorderStatus::Completed;
        Ok(())
    }
}
