//! 型別化的文件庫讀取

use std::sync::Arc;

use mrp_calc::{InventorySummary, RequirementAggregator, RequirementReport, ShortageNotice, StockAlerts};
use mrp_core::{
    decode_all, BomRecipe, FromDocument, MaterialStock, PlanningConfig, ProductionOrder, Reorder,
    Result, Session, StockMovement,
};
use mrp_store::{CollectionPath, DocumentStore, FieldFilter};
use serde_json::Value;
use tracing::{debug, warn};

/// 型別化讀取
///
/// 所有文件在這裡轉換成實體；無效文件記錄警告後略過。
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    fn load<T: FromDocument>(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<T>> {
        let docs = self.store.fetch_all(collection, filter)?;
        let decoded = decode_all::<T>(&docs);
        for err in &decoded.rejected {
            warn!("略過無效記錄: {}", err);
        }
        debug!("載入 {}: {} 筆", collection, decoded.items.len());
        Ok(decoded.items)
    }

    pub fn stocks(&self, session: &Session) -> Result<Vec<MaterialStock>> {
        self.load(&CollectionPath::stocks(session), None)
    }

    pub fn movements(&self, session: &Session) -> Result<Vec<StockMovement>> {
        self.load(&CollectionPath::movements(session), None)
    }

    pub fn boms(&self) -> Result<Vec<BomRecipe>> {
        self.load(&CollectionPath::boms(), None)
    }

    pub fn orders(&self) -> Result<Vec<ProductionOrder>> {
        self.load(&CollectionPath::manufacturing_orders(), None)
    }

    /// 登入者建立的採購單
    pub fn reorders(&self, session: &Session) -> Result<Vec<Reorder>> {
        let filter = FieldFilter::eq("adminUID".to_string(), Value::String(session.uid.clone()));
        self.load(&CollectionPath::reorders(), Some(&filter))
    }

    /// 依物料ID查詢庫存
    ///
    /// 解碼後再比對，數值型的 `itemid` 也能找到。
    pub fn find_stock(&self, session: &Session, material_id: &str) -> Result<Option<MaterialStock>> {
        let material_id = material_id.trim();
        Ok(self
            .stocks(session)?
            .into_iter()
            .find(|s| s.material_id == material_id))
    }

    /// 依物料名稱查詢庫存（不分大小寫）
    pub fn find_stock_by_name(&self, session: &Session, name: &str) -> Result<Option<MaterialStock>> {
        let name = name.trim().to_lowercase();
        Ok(self
            .stocks(session)?
            .into_iter()
            .find(|s| s.name.trim().to_lowercase() == name))
    }

    /// 成品的 BOM（同一成品有多份時取第一份）
    pub fn recipe_for(&self, product_id: &str) -> Result<Option<BomRecipe>> {
        let filter = FieldFilter::eq("productId".to_string(), Value::String(product_id.to_string()));
        Ok(self
            .load::<BomRecipe>(&CollectionPath::boms(), Some(&filter))?
            .into_iter()
            .next())
    }

    /// 一次性的物料需求彙總
    pub fn requirement_report(&self, session: &Session) -> Result<RequirementReport> {
        let stocks = self.stocks(session)?;
        let boms = self.boms()?;
        let orders = self.orders()?;
        Ok(RequirementAggregator::aggregate(&stocks, &boms, &orders))
    }

    /// 庫存儀表板摘要
    pub fn inventory_summary(
        &self,
        session: &Session,
        config: &PlanningConfig,
    ) -> Result<InventorySummary> {
        let stocks = self.stocks(session)?;
        let movements = self.movements(session)?;
        Ok(InventorySummary::build(&stocks, &movements, config))
    }

    /// 缺料物料的供應商通知
    pub fn shortage_notices(
        &self,
        session: &Session,
        config: &PlanningConfig,
    ) -> Result<Vec<ShortageNotice>> {
        let stocks = self.stocks(session)?;
        Ok(StockAlerts::critical(&stocks, config)
            .into_iter()
            .map(|stock| ShortageNotice::for_stock(stock, config))
            .collect())
    }
}
