//! # MRP Service
//!
//! 庫存、生產與採購作業，以及登入身分解析
//!
//! 所有作業都透過 [`mrp_store::DocumentStore`] 讀寫，寫入為單筆記錄原子性。

pub mod inventory;
pub mod manufacturing;
pub mod procurement;
pub mod repository;
pub mod session;

// Re-export 主要類型
pub use inventory::{IntakeItem, InventoryService, StockUpdate};
pub use manufacturing::ManufacturingService;
pub use procurement::{ProcurementService, ReorderLine};
pub use repository::Repository;
pub use session::SessionResolver;
