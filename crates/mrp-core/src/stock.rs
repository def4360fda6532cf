//! 物料庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 未設定分類時顯示的名稱
pub const DEFAULT_CATEGORY: &str = "General";

/// 物料現有庫存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStock {
    /// 文件ID（文件庫中的記錄）
    pub doc_id: Option<String>,

    /// 物料ID（料號）
    pub material_id: String,

    /// 物料名稱
    pub name: String,

    /// 現有數量（不可為負）
    pub quantity: Decimal,

    /// 單位成本
    pub unit_cost: Decimal,

    /// 分類
    pub category: Option<String>,

    /// 售價（成品適用）
    pub selling_price: Option<Decimal>,
}

impl MaterialStock {
    /// 創建新的庫存記錄
    pub fn new(material_id: String, name: String, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            doc_id: None,
            material_id,
            name,
            quantity,
            unit_cost,
            category: None,
            selling_price: None,
        }
    }

    /// 建構器模式：設置文件ID
    pub fn with_doc_id(mut self, doc_id: String) -> Self {
        self.doc_id = Some(doc_id);
        self
    }

    /// 建構器模式：設置分類
    pub fn with_category(mut self, category: String) -> Self {
        self.category = Some(category);
        self
    }

    /// 建構器模式：設置售價
    pub fn with_selling_price(mut self, price: Decimal) -> Self {
        self.selling_price = Some(price);
        self
    }

    /// 分類（未設定時為 "General"）
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    /// 庫存價值 = 數量 × 單位成本
    pub fn stock_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.unit_cost)
    }

    /// 市場價值 = 數量 × 售價（無售價視為 0）
    pub fn market_value(&self) -> Decimal {
        self.quantity
            .saturating_mul(self.selling_price.unwrap_or(Decimal::ZERO))
    }

    /// 檢查現有庫存是否足以扣除指定數量
    pub fn can_consume(&self, quantity: Decimal) -> bool {
        quantity <= self.quantity
    }
}
