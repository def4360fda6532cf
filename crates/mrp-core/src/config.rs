//! 計劃參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// 庫存警示與補貨參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// 低庫存門檻（數量 < 門檻即警示）
    pub low_stock_threshold: Decimal,

    /// 嚴重缺料門檻（數量 <= 門檻）
    pub critical_stock_threshold: Decimal,

    /// 預設補貨數量
    pub default_reorder_qty: Decimal,

    /// 儀表板顯示的庫存前 N 名
    pub top_items_limit: usize,

    /// 缺料通知的供應商信箱
    pub supplier_email: String,
}

impl PlanningConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            low_stock_threshold: Decimal::from(100),
            critical_stock_threshold: Decimal::from(10),
            default_reorder_qty: Decimal::from(100),
            top_items_limit: 5,
            supplier_email: "supplier@example.com".to_string(),
        }
    }

    /// 從 JSON 載入（未提供的欄位使用預設值）
    ///
    /// ```
    /// # use mrp_core::PlanningConfig;
    /// # use rust_decimal::Decimal;
    /// let config = PlanningConfig::from_json_str(r#"{ "low_stock_threshold": 50 }"#).unwrap();
    /// assert_eq!(config.low_stock_threshold, Decimal::from(50));
    /// assert_eq!(config.top_items_limit, 5);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MrpError::Config(format!("無法解析配置: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置低庫存門檻
    pub fn with_low_stock_threshold(mut self, threshold: Decimal) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// 建構器模式：設置嚴重缺料門檻
    pub fn with_critical_stock_threshold(mut self, threshold: Decimal) -> Self {
        self.critical_stock_threshold = threshold;
        self
    }

    /// 建構器模式：設置預設補貨數量
    pub fn with_default_reorder_qty(mut self, qty: Decimal) -> Self {
        self.default_reorder_qty = qty;
        self
    }

    /// 建構器模式：設置前 N 名
    pub fn with_top_items_limit(mut self, limit: usize) -> Self {
        self.top_items_limit = limit;
        self
    }

    /// 建構器模式：設置供應商信箱
    pub fn with_supplier_email(mut self, email: String) -> Self {
        self.supplier_email = email;
        self
    }

    /// 檢查參數一致性
    pub fn validate(&self) -> Result<()> {
        if self.critical_stock_threshold > self.low_stock_threshold {
            return Err(MrpError::Config(format!(
                "嚴重缺料門檻 {} 不可高於低庫存門檻 {}",
                self.critical_stock_threshold, self.low_stock_threshold
            )));
        }
        if self.default_reorder_qty <= Decimal::ZERO {
            return Err(MrpError::Config(format!(
                "預設補貨數量必須大於 0：{}",
                self.default_reorder_qty
            )));
        }
        if self.top_items_limit == 0 {
            return Err(MrpError::Config("前 N 名數量必須大於 0".to_string()));
        }
        Ok(())
    }
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self::new()
    }
}
