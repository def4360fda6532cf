//! # MRP Console
//!
//! 物料需求規劃主控台：庫存、BOM、生產工單與補貨採購，
//! 以及依已計劃工單即時彙總的物料需求。
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mrp_console::{MrpConsole, MemoryStore};
//!
//! # async fn run() -> mrp_console::model::Result<()> {
//! let console = MrpConsole::new(Arc::new(MemoryStore::new()));
//! let session = console.sessions().resolve("u-1", None)?;
//!
//! let mut feed = console.live_requirements(&session)?;
//! if let Some(report) = feed.next_report().await {
//!     for line in report.shortages() {
//!         println!("{} 缺 {}", line.material_id, line.net_shortfall);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub use mrp_cache as cache;
pub use mrp_calc as calc;
pub use mrp_core as model;
pub use mrp_service as service;
pub use mrp_store as store;

pub use mrp_cache::LiveRequirementFeed;
pub use mrp_calc::{RequirementAggregator, RequirementReport};
pub use mrp_service::{
    InventoryService, ManufacturingService, ProcurementService, Repository, SessionResolver,
};
pub use mrp_store::{DocumentStore, MemoryStore};

/// 主控台：共用同一個文件庫的所有作業
pub struct MrpConsole {
    store: Arc<dyn DocumentStore>,
    inventory: InventoryService,
    manufacturing: ManufacturingService,
    procurement: ProcurementService,
    sessions: SessionResolver,
}

impl MrpConsole {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::clone(&store)),
            manufacturing: ManufacturingService::new(Arc::clone(&store)),
            procurement: ProcurementService::new(Arc::clone(&store)),
            sessions: SessionResolver::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn inventory(&self) -> &InventoryService {
        &self.inventory
    }

    pub fn manufacturing(&self) -> &ManufacturingService {
        &self.manufacturing
    }

    pub fn procurement(&self) -> &ProcurementService {
        &self.procurement
    }

    pub fn sessions(&self) -> &SessionResolver {
        &self.sessions
    }

    /// 型別化讀取（報表、儀表板）
    pub fn repository(&self) -> &Repository {
        self.inventory.repository()
    }

    /// 啟動即時物料需求彙總（必須在 tokio runtime 內呼叫）
    pub fn live_requirements(&self, session: &model::Session) -> model::Result<LiveRequirementFeed> {
        Ok(LiveRequirementFeed::spawn(self.store.as_ref(), session)?)
    }
}
