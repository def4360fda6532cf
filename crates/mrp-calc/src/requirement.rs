//! 物料需求彙總
//!
//! 總需求 = Σ（已計劃工單的 BOM 用量 × 工單數量），
//! 淨缺料 = max(0, 總需求 - 現有庫存)。

use std::collections::{BTreeMap, HashMap};

use mrp_core::{BomRecipe, MaterialStock, ProductionOrder, RequirementLine};
use rust_decimal::Decimal;

use crate::{RequirementReport, SkippedOrder};

/// 物料需求彙總器（無狀態純函數）
pub struct RequirementAggregator;

impl RequirementAggregator {
    /// 彙總物料需求
    ///
    /// 此計算不會失敗：找不到 BOM 的工單不貢獻需求（列於
    /// `orders_without_recipe`），找不到庫存的物料視為現有庫存 0。
    pub fn aggregate(
        stocks: &[MaterialStock],
        boms: &[BomRecipe],
        orders: &[ProductionOrder],
    ) -> RequirementReport {
        tracing::info!(
            "開始物料需求彙總：庫存 {} 筆，BOM {} 筆，工單 {} 筆",
            stocks.len(),
            boms.len(),
            orders.len()
        );

        let recipes = Self::index_recipes(boms);
        let stock_map = Self::index_stocks(stocks);

        // Step 1 + 2 + 3: 已計劃工單 × BOM 用量
        let mut gross: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut line_names: HashMap<&str, &str> = HashMap::new();
        let mut report = RequirementReport::empty();

        for order in orders.iter().filter(|o| o.is_planned()) {
            let Some(recipe) = recipes.get(order.product_id.as_str()) else {
                tracing::warn!(
                    "工單 {:?} 的成品 {} 沒有 BOM，不計入需求",
                    order.doc_id,
                    order.product_id
                );
                report.orders_without_recipe.push(SkippedOrder::from(order));
                continue;
            };

            for line in &recipe.lines {
                let demand = line.quantity_per_unit.saturating_mul(order.quantity);
                let entry = gross
                    .entry(line.material_id.as_str())
                    .or_insert(Decimal::ZERO);
                *entry = entry.saturating_add(demand);

                if let Some(name) = line.name.as_deref() {
                    line_names.entry(line.material_id.as_str()).or_insert(name);
                }

                tracing::debug!(
                    "BOM 展開: {} → {} (數量: {})",
                    order.product_id,
                    line.material_id,
                    demand
                );
            }
        }

        // Step 4 + 5: 對照現有庫存
        report.lines = gross
            .into_iter()
            .filter(|(_, demand)| *demand > Decimal::ZERO)
            .map(|(material_id, demand)| {
                let stock = stock_map.get(material_id);
                let on_hand = stock.map(|s| s.quantity).unwrap_or(Decimal::ZERO);
                let name = stock
                    .map(|s| s.name.as_str())
                    .or_else(|| line_names.get(material_id).copied());

                let line = RequirementLine::new(material_id.to_string(), demand, on_hand);
                match name {
                    Some(name) => line.with_material_name(name.to_string()),
                    None => line,
                }
            })
            .collect();

        tracing::info!(
            "物料需求彙總完成：需求行 {} 筆，缺料 {} 筆，無 BOM 工單 {} 筆",
            report.lines.len(),
            report.shortage_count(),
            report.orders_without_recipe.len()
        );

        report
    }

    /// 成品 → BOM（同一成品多份 BOM 時取第一份）
    fn index_recipes(boms: &[BomRecipe]) -> HashMap<&str, &BomRecipe> {
        let mut recipes = HashMap::with_capacity(boms.len());
        for recipe in boms {
            recipes.entry(recipe.product_id.as_str()).or_insert(recipe);
        }
        recipes
    }

    /// 物料 → 庫存
    fn index_stocks(stocks: &[MaterialStock]) -> HashMap<&str, &MaterialStock> {
        let mut map = HashMap::with_capacity(stocks.len());
        for stock in stocks {
            map.entry(stock.material_id.as_str()).or_insert(stock);
        }
        map
    }
}
