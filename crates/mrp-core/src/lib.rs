//! # MRP Core
//!
//! 核心資料模型、文件轉換邊界與類型定義

pub mod bom;
pub mod codec;
pub mod config;
pub mod document;
pub mod movement;
pub mod order;
pub mod reorder;
pub mod requirement;
pub mod session;
pub mod stock;

// Re-export 主要類型
pub use bom::{BomLine, BomRecipe};
pub use config::PlanningConfig;
pub use document::{
    decode_all, DecodedSet, Document, DocumentError, FieldReader, FromDocument, ToDocument,
};
pub use movement::{MovementKind, StockMovement};
pub use order::{OrderStatus, ProductionOrder};
pub use reorder::{Reorder, ReorderStatus};
pub use requirement::{RequirementLine, RequirementStatus};
pub use session::{Role, Session};
pub use stock::MaterialStock;

use rust_decimal::Decimal;

/// MRP 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum MrpError {
    #[error("文件解析錯誤: {0}")]
    Document(#[from] DocumentError),

    #[error("驗證失敗: {0}")]
    Validation(String),

    #[error("找不到物料庫存: {0}")]
    StockNotFound(String),

    #[error("庫存不足：物料 {material_id} 需要 {requested}, 現有 {on_hand}")]
    InsufficientStock {
        material_id: String,
        requested: Decimal,
        on_hand: Decimal,
    },

    #[error("找不到 BOM: {0}")]
    RecipeNotFound(String),

    #[error("成品 {0} 已有 BOM，BOM 建立後不可修改")]
    RecipeExists(String),

    #[error("找不到生產工單: {0}")]
    OrderNotFound(String),

    #[error("找不到採購單: {0}")]
    ReorderNotFound(String),

    #[error("無效的狀態: {0}")]
    InvalidStatus(String),

    #[error("無效的狀態轉換: {from} → {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("文件庫錯誤: {0}")]
    Store(String),

    #[error("配置錯誤: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MrpError>;
