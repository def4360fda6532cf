//! # MRP Calculation Engine
//!
//! 物料需求彙總、庫存警示與估值計算

pub mod alerts;
pub mod movement;
pub mod requirement;
pub mod summary;
pub mod valuation;

// Re-export 主要類型
pub use alerts::{AlertLevel, ShortageNotice, StockAlerts};
pub use movement::{MovementFilter, MovementTotals};
pub use requirement::RequirementAggregator;
pub use summary::InventorySummary;
pub use valuation::{RecipeCost, Valuation};

use mrp_core::{ProductionOrder, RequirementLine};
use rust_decimal::Decimal;
use serde::Serialize;

/// 物料需求彙總結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementReport {
    /// 需求行（依物料ID排序）
    pub lines: Vec<RequirementLine>,

    /// 因缺少 BOM 而未計入需求的已計劃工單
    pub orders_without_recipe: Vec<SkippedOrder>,
}

impl RequirementReport {
    /// 創建空的彙總結果
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            orders_without_recipe: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 查詢某物料的需求行
    pub fn line(&self, material_id: &str) -> Option<&RequirementLine> {
        self.lines.iter().find(|l| l.material_id == material_id)
    }

    /// 缺料行
    pub fn shortages(&self) -> impl Iterator<Item = &RequirementLine> {
        self.lines.iter().filter(|l| l.is_shortage())
    }

    pub fn shortage_count(&self) -> usize {
        self.shortages().count()
    }

    /// 總淨缺料
    pub fn total_shortfall(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |acc, l| acc.saturating_add(l.net_shortfall))
    }
}

/// 未計入需求的工單
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedOrder {
    pub order_id: Option<String>,
    pub product_id: String,
    pub quantity: Decimal,
}

impl From<&ProductionOrder> for SkippedOrder {
    fn from(order: &ProductionOrder) -> Self {
        Self {
            order_id: order.doc_id.clone(),
            product_id: order.product_id.clone(),
            quantity: order.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::{BomLine, BomRecipe};

    #[test]
    fn test_total_shortfall_saturates() {
        let recipe = BomRecipe::new(
            "Crate".to_string(),
            vec![
                BomLine::new("Plank".to_string(), Decimal::MAX),
                BomLine::new("Nail".to_string(), Decimal::MAX),
            ],
        );
        let order = ProductionOrder::new("Crate".to_string(), Decimal::ONE);

        let report = RequirementAggregator::aggregate(&[], &[recipe], &[order]);
        assert_eq!(report.lines.len(), 2);
        assert_eq!(report.total_shortfall(), Decimal::MAX);
    }

    #[test]
    fn test_empty_report() {
        let report = RequirementReport::empty();
        assert!(report.is_empty());
        assert_eq!(report.total_shortfall(), Decimal::ZERO);
        assert_eq!(report.shortage_count(), 0);
    }
}
