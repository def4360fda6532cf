//! 庫存警示（與需求彙總無關的獨立計算）

use mrp_core::{MaterialStock, PlanningConfig};
use serde::Serialize;

/// 警示等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AlertLevel {
    Healthy,
    /// 數量 < 低庫存門檻
    Low,
    /// 數量 <= 嚴重缺料門檻
    Critical,
}

/// 庫存警示計算器
pub struct StockAlerts;

impl StockAlerts {
    /// 判斷單一物料的警示等級
    pub fn classify(stock: &MaterialStock, config: &PlanningConfig) -> AlertLevel {
        if stock.quantity <= config.critical_stock_threshold {
            AlertLevel::Critical
        } else if stock.quantity < config.low_stock_threshold {
            AlertLevel::Low
        } else {
            AlertLevel::Healthy
        }
    }

    /// 低庫存物料（包含嚴重缺料）
    pub fn low_stock<'a>(
        stocks: &'a [MaterialStock],
        config: &PlanningConfig,
    ) -> Vec<&'a MaterialStock> {
        stocks
            .iter()
            .filter(|s| s.quantity < config.low_stock_threshold)
            .collect()
    }

    /// 嚴重缺料物料
    pub fn critical<'a>(
        stocks: &'a [MaterialStock],
        config: &PlanningConfig,
    ) -> Vec<&'a MaterialStock> {
        stocks
            .iter()
            .filter(|s| s.quantity <= config.critical_stock_threshold)
            .collect()
    }
}

/// 給供應商的缺料通知內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortageNotice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl ShortageNotice {
    pub fn for_stock(stock: &MaterialStock, config: &PlanningConfig) -> Self {
        Self {
            recipient: config.supplier_email.clone(),
            subject: format!("Urgent: Material Shortage for {}", stock.name),
            body: format!(
                "Hello Vendor, we are low on {}. Current stock: {}. Please send {} units.",
                stock.name, stock.quantity, config.default_reorder_qty
            ),
        }
    }
}
