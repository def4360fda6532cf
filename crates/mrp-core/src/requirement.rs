//! 物料需求行模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 需求行狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementStatus {
    /// 現有庫存不足
    Shortage,
    /// 現有庫存足夠
    Available,
}

/// 物料需求行（計算結果，不儲存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementLine {
    /// 物料ID
    pub material_id: String,

    /// 物料名稱
    pub material_name: Option<String>,

    /// 總需求
    pub gross_demand: Decimal,

    /// 現有庫存
    pub on_hand: Decimal,

    /// 淨缺料 = max(0, 總需求 - 現有庫存)
    pub net_shortfall: Decimal,

    /// 狀態
    pub status: RequirementStatus,
}

impl RequirementLine {
    /// 由總需求與現有庫存推導需求行
    pub fn new(material_id: String, gross_demand: Decimal, on_hand: Decimal) -> Self {
        let net_shortfall = gross_demand.saturating_sub(on_hand).max(Decimal::ZERO);
        let status = if on_hand < gross_demand {
            RequirementStatus::Shortage
        } else {
            RequirementStatus::Available
        };

        Self {
            material_id,
            material_name: None,
            gross_demand,
            on_hand,
            net_shortfall,
            status,
        }
    }

    /// 建構器模式：設置物料名稱
    pub fn with_material_name(mut self, name: String) -> Self {
        self.material_name = Some(name);
        self
    }

    /// 檢查是否缺料
    pub fn is_shortage(&self) -> bool {
        self.status == RequirementStatus::Shortage
    }
}
