//! 庫存儀表板摘要

use std::collections::BTreeMap;

use mrp_core::{MaterialStock, PlanningConfig, StockMovement};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{MovementTotals, StockAlerts, Valuation};

/// 儀表板前 N 名的一項
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopItem {
    pub material_id: String,
    pub name: String,
    pub quantity: Decimal,
}

/// 庫存儀表板摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub stock_in: Decimal,
    pub stock_out: Decimal,
    pub categories: BTreeMap<String, Decimal>,
    pub top_items: Vec<TopItem>,
}

impl InventorySummary {
    pub fn build(
        stocks: &[MaterialStock],
        movements: &[StockMovement],
        config: &PlanningConfig,
    ) -> Self {
        let totals = MovementTotals::from_movements(movements);

        Self {
            total_value: Valuation::inventory_value(stocks),
            low_stock_count: StockAlerts::low_stock(stocks, config).len(),
            stock_in: totals.stock_in,
            stock_out: totals.stock_out,
            categories: Valuation::category_totals(stocks),
            top_items: Valuation::top_items_by_quantity(stocks, config.top_items_limit)
                .into_iter()
                .map(|s| TopItem {
                    material_id: s.material_id.clone(),
                    name: s.name.clone(),
                    quantity: s.quantity,
                })
                .collect(),
        }
    }
}
