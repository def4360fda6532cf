//! BOM 配方模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MrpError, Result};

/// BOM 行（單位用量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    /// 物料ID
    pub material_id: String,

    /// 物料名稱（顯示用）
    pub name: Option<String>,

    /// 每單位成品用量
    pub quantity_per_unit: Decimal,
}

impl BomLine {
    pub fn new(material_id: String, quantity_per_unit: Decimal) -> Self {
        Self {
            material_id,
            name: None,
            quantity_per_unit,
        }
    }

    /// 建構器模式：設置物料名稱
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

/// BOM 配方：生產一個成品所需的固定物料清單
///
/// 配方儲存後不可修改（沒有版本控制），每個成品只有一份配方。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomRecipe {
    /// 文件ID
    pub doc_id: Option<String>,

    /// 成品ID
    pub product_id: String,

    /// 成品名稱
    pub product_name: Option<String>,

    /// 物料清單
    pub lines: Vec<BomLine>,

    /// 建立者
    pub created_by: Option<String>,
}

impl BomRecipe {
    /// 創建新的配方
    pub fn new(product_id: String, lines: Vec<BomLine>) -> Self {
        Self {
            doc_id: None,
            product_id,
            product_name: None,
            lines,
            created_by: None,
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

    /// 建構器模式：設置建立者
    pub fn with_created_by(mut self, created_by: String) -> Self {
        self.created_by = Some(created_by);
        self
    }

    /// 某物料的單位用量（同一物料多行時加總）
    pub fn quantity_for(&self, material_id: &str) -> Decimal {
        self.lines
            .iter()
            .filter(|line| line.material_id == material_id)
            .map(|line| line.quantity_per_unit)
            .sum()
    }

    /// 驗證配方是否可以儲存
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(MrpError::Validation("BOM 必須指定成品".to_string()));
        }

        if self.lines.is_empty() {
            return Err(MrpError::Validation(format!(
                "成品 {} 的 BOM 至少需要一項物料",
                self.product_id
            )));
        }

        for (index, line) in self.lines.iter().enumerate() {
            if line.material_id.trim().is_empty() {
                return Err(MrpError::Validation(format!(
                    "BOM 第 {} 行未選擇物料",
                    index + 1
                )));
            }
            if line.quantity_per_unit <= Decimal::ZERO {
                return Err(MrpError::Validation(format!(
                    "BOM 第 {} 行用量必須大於 0：{}",
                    index + 1,
                    line.quantity_per_unit
                )));
            }
        }

        Ok(())
    }
}
