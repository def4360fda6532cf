//! 庫存異動模型

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// 原料入庫
pub const INTAKE_REASON: &str = "Raw Material Intake";

/// 採購收貨
pub const RECEIPT_REASON: &str = "Purchase Order Receipt";

/// 生產領料
pub const CONSUMPTION_REASON: &str = "Production Consumption";

/// 異動方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = MrpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IN" => Ok(MovementKind::In),
            "OUT" => Ok(MovementKind::Out),
            other => Err(MrpError::InvalidStatus(other.to_string())),
        }
    }
}

/// 庫存異動記錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    /// 物料ID
    pub material_id: String,

    /// 物料名稱
    pub name: String,

    /// 方向
    pub kind: MovementKind,

    /// 數量（正數）
    pub quantity: Decimal,

    /// 原因
    pub reason: String,

    /// 時間
    pub timestamp: Option<DateTime<Utc>>,

    /// 操作人員（email）
    pub user: Option<String>,
}

impl StockMovement {
    /// 入庫記錄
    pub fn inbound(material_id: String, name: String, quantity: Decimal, reason: &str) -> Self {
        Self::new(material_id, name, MovementKind::In, quantity, reason)
    }

    /// 出庫記錄
    pub fn outbound(material_id: String, name: String, quantity: Decimal, reason: &str) -> Self {
        Self::new(material_id, name, MovementKind::Out, quantity, reason)
    }

    fn new(
        material_id: String,
        name: String,
        kind: MovementKind,
        quantity: Decimal,
        reason: &str,
    ) -> Self {
        Self {
            material_id,
            name,
            kind,
            quantity,
            reason: reason.to_string(),
            timestamp: None,
            user: None,
        }
    }

    /// 建構器模式：設置時間
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// 建構器模式：設置操作人員
    pub fn with_user(mut self, user: String) -> Self {
        self.user = Some(user);
        self
    }

    /// 帶方向的數量（入庫為正，出庫為負）
    pub fn signed_quantity(&self) -> Decimal {
        match self.kind {
            MovementKind::In => self.quantity,
            MovementKind::Out => -self.quantity,
        }
    }
}
