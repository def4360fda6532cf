//! 庫存估值與 BOM 成本彙總

use std::collections::{BTreeMap, HashMap};

use mrp_core::{BomRecipe, MaterialStock};
use rust_decimal::Decimal;
use serde::Serialize;

/// BOM 單位成本
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCost {
    pub product_id: String,

    /// 每單位成品的物料成本
    pub unit_cost: Decimal,

    /// 找不到庫存記錄（無單價）的物料
    pub unpriced_materials: Vec<String>,
}

impl RecipeCost {
    /// 生產 N 個成品的物料成本
    pub fn cost_for(&self, quantity: Decimal) -> Decimal {
        self.unit_cost.saturating_mul(quantity)
    }

    pub fn is_fully_priced(&self) -> bool {
        self.unpriced_materials.is_empty()
    }
}

/// 估值計算器
pub struct Valuation;

impl Valuation {
    /// 庫存總價值 = Σ 數量 × 單位成本
    pub fn inventory_value(stocks: &[MaterialStock]) -> Decimal {
        stocks
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.stock_value()))
    }

    /// 成品市場價值 = Σ 數量 × 售價
    pub fn market_value(stocks: &[MaterialStock]) -> Decimal {
        stocks
            .iter()
            .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.market_value()))
    }

    /// BOM 成本彙總
    pub fn recipe_cost(recipe: &BomRecipe, stocks: &[MaterialStock]) -> RecipeCost {
        let prices: HashMap<&str, Decimal> = stocks
            .iter()
            .rev()
            .map(|s| (s.material_id.as_str(), s.unit_cost))
            .collect();

        let mut unit_cost = Decimal::ZERO;
        let mut unpriced_materials = Vec::new();

        for line in &recipe.lines {
            match prices.get(line.material_id.as_str()) {
                Some(price) => {
                    unit_cost = unit_cost.saturating_add(line.quantity_per_unit.saturating_mul(*price));
                }
                None => {
                    if !unpriced_materials.contains(&line.material_id) {
                        unpriced_materials.push(line.material_id.clone());
                    }
                }
            }
        }

        RecipeCost {
            product_id: recipe.product_id.clone(),
            unit_cost,
            unpriced_materials,
        }
    }

    /// 各分類的庫存數量
    pub fn category_totals(stocks: &[MaterialStock]) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for stock in stocks {
            let entry = totals
                .entry(stock.category_or_default().to_string())
                .or_insert(Decimal::ZERO);
            *entry = entry.saturating_add(stock.quantity);
        }
        totals
    }

    /// 數量最多的前 N 項（數量相同時依物料ID排序）
    pub fn top_items_by_quantity(stocks: &[MaterialStock], limit: usize) -> Vec<&MaterialStock> {
        let mut sorted: Vec<&MaterialStock> = stocks.iter().collect();
        sorted.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.material_id.cmp(&b.material_id))
        });
        sorted.truncate(limit);
        sorted
    }
}
