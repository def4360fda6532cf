//! 生產工單模型

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// 工單狀態（只能向前推進）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// 已計劃（尚未開工）
    Planned,
    /// 生產中
    #[serde(rename = "In Progress")]
    InProgress,
    /// 已完工
    Done,
}

impl OrderStatus {
    /// 文件庫中的字串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Planned => "Planned",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Done => "Done",
        }
    }

    /// 檢查是否可以轉換到下一個狀態
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next > *self
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = MrpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Planned" | "To Do" => Ok(OrderStatus::Planned),
            "In Progress" | "InProgress" => Ok(OrderStatus::InProgress),
            "Done" => Ok(OrderStatus::Done),
            other => Err(MrpError::InvalidStatus(other.to_string())),
        }
    }
}

/// 生產工單：計劃生產 N 個成品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionOrder {
    /// 文件ID
    pub doc_id: Option<String>,

    /// 成品ID
    pub product_id: String,

    /// 成品名稱
    pub product_name: Option<String>,

    /// 生產數量
    pub quantity: Decimal,

    /// 交期
    pub deadline: Option<NaiveDate>,

    /// 狀態
    pub status: OrderStatus,

    /// 建立時間
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductionOrder {
    /// 創建新的工單（狀態為 Planned）
    pub fn new(product_id: String, quantity: Decimal) -> Self {
        Self {
            doc_id: None,
            product_id,
            product_name: None,
            quantity,
            deadline: None,
            status: OrderStatus::Planned,
            created_at: None,
        }
    }

    /// 建構器模式：設置文件ID
    pub fn with_doc_id(mut self, doc_id: String) -> Self {
        self.doc_id = Some(doc_id);
        self
    }

    /// 建構器模式：設置成品名稱
    pub fn with_product_name(mut self, product_name: String) -> Self {
        self.product_name = Some(product_name);
        self
    }

    /// 建構器模式：設置交期
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// 建構器模式：設置狀態
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// 建構器模式：設置建立時間
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// 檢查是否為已計劃工單
    pub fn is_planned(&self) -> bool {
        self.status == OrderStatus::Planned
    }

    /// 推進工單狀態（不可倒退）
    pub fn advance(&mut self, next: OrderStatus) -> Result<()> {
        if !self.status.can_advance_to(next) {
            return Err(MrpError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// 顯示用名稱（無名稱時使用成品ID）
    pub fn display_name(&self) -> &str {
        self.product_name.as_deref().unwrap_or(&self.product_id)
    }
}
