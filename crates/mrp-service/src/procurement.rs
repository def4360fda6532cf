//! 補貨採購作業

use std::sync::Arc;

use chrono::Utc;
use mrp_calc::StockAlerts;
use mrp_core::movement::RECEIPT_REASON;
use mrp_core::{
    FromDocument, MaterialStock, MrpError, PlanningConfig, Reorder, ReorderStatus, Result,
    Session, StockMovement, ToDocument,
};
use mrp_store::{CollectionPath, DocumentStore, WriteMode};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::repository::Repository;

/// 採購單的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderLine {
    pub name: String,
    pub material_id: Option<String>,
    pub quantity: Decimal,
}

impl ReorderLine {
    pub fn new(name: String, quantity: Decimal) -> Self {
        Self {
            name,
            material_id: None,
            quantity,
        }
    }

    /// 建構器模式：設置物料ID
    pub fn with_material_id(mut self, material_id: String) -> Self {
        self.material_id = Some(material_id);
        self
    }
}

/// 補貨採購作業
pub struct ProcurementService {
    repo: Repository,
}

impl ProcurementService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// 低庫存物料的建議採購行（數量為預設補貨量）
    pub fn suggested_lines(&self, session: &Session, config: &PlanningConfig) -> Result<Vec<ReorderLine>> {
        let stocks = self.repo.stocks(session)?;
        Ok(StockAlerts::low_stock(&stocks, config)
            .into_iter()
            .map(|stock| {
                ReorderLine::new(stock.name.clone(), config.default_reorder_qty)
                    .with_material_id(stock.material_id.clone())
            })
            .collect())
    }

    /// 向供應商下採購單，每行建立一張 Pending 採購單，回傳文件ID
    ///
    /// 數量不大於 0 的行會被略過。
    pub fn place_reorders(
        &self,
        session: &Session,
        supplier_name: &str,
        lines: &[ReorderLine],
    ) -> Result<Vec<String>> {
        let supplier_name = supplier_name.trim();
        if supplier_name.is_empty() {
            return Err(MrpError::Validation("必須選擇供應商".to_string()));
        }

        let lines: Vec<&ReorderLine> = lines
            .iter()
            .filter(|line| line.quantity > Decimal::ZERO)
            .collect();
        if lines.is_empty() {
            return Err(MrpError::Validation("採購單至少需要一項數量大於 0 的物料".to_string()));
        }

        let path = CollectionPath::reorders();
        let mut ids = Vec::with_capacity(lines.len());
        for line in lines {
            let mut reorder = Reorder::new(
                session.uid.clone(),
                supplier_name.to_string(),
                line.name.clone(),
                line.quantity,
            )
            .with_created_at(Utc::now());
            if let Some(material_id) = &line.material_id {
                reorder = reorder.with_material_id(material_id.clone());
            }
            ids.push(self.repo.store().add(&path, reorder.to_fields())?);
        }

        info!("向 {} 下採購單: {} 項", supplier_name, ids.len());
        Ok(ids)
    }

    /// 採購收貨：採購單轉為 Completed，並將數量入庫
    ///
    /// 依物料ID（無則依名稱）尋找庫存記錄；找不到時建立新的庫存記錄。
    pub fn receive_reorder(&self, session: &Session, reorder_id: &str) -> Result<Reorder> {
        let mut reorder = self.require_reorder(session, reorder_id)?;
        reorder.complete()?;

        let mut status = Map::new();
        status.insert(
            "status".to_string(),
            Value::String(ReorderStatus::Completed.as_str().to_string()),
        );
        self.repo
            .store()
            .set(&CollectionPath::reorders(), reorder_id, status, WriteMode::Merge)?;

        let existing = match &reorder.material_id {
            Some(material_id) => self.repo.find_stock(session, material_id)?,
            None => None,
        };
        let existing = match existing {
            Some(stock) => Some(stock),
            None => self.repo.find_stock_by_name(session, &reorder.name)?,
        };

        let stocks = CollectionPath::stocks(session);
        let material_id = match existing {
            Some(MaterialStock {
                doc_id: Some(doc_id),
                material_id,
                ..
            }) => {
                self.repo
                    .store()
                    .increment(&stocks, &doc_id, "quantity", reorder.requested_qty)?;
                material_id
            }
            _ => {
                let material_id = reorder
                    .material_id
                    .clone()
                    .unwrap_or_else(|| reorder.name.clone());
                debug!("收貨物料 {} 尚無庫存記錄，建立新記錄", material_id);
                let stock = MaterialStock::new(
                    material_id.clone(),
                    reorder.name.clone(),
                    reorder.requested_qty,
                    Decimal::ZERO,
                );
                self.repo.store().add(&stocks, stock.to_fields())?;
                material_id
            }
        };

        let movement = StockMovement::inbound(
            material_id,
            reorder.name.clone(),
            reorder.requested_qty,
            RECEIPT_REASON,
        )
        .with_timestamp(Utc::now())
        .with_user(session.actor().to_string());
        self.repo
            .store()
            .add(&CollectionPath::movements(session), movement.to_fields())?;

        info!(
            "採購單 {} 收貨: {} × {}",
            reorder_id, reorder.name, reorder.requested_qty
        );
        Ok(reorder)
    }

    /// 刪除採購單
    pub fn delete_reorder(&self, session: &Session, reorder_id: &str) -> Result<()> {
        self.require_reorder(session, reorder_id)?;
        self.repo
            .store()
            .delete(&CollectionPath::reorders(), reorder_id)?;
        info!("刪除採購單 {}", reorder_id);
        Ok(())
    }

    /// 讀取登入者的採購單（不屬於登入者時視為不存在）
    fn require_reorder(&self, session: &Session, reorder_id: &str) -> Result<Reorder> {
        let doc = self
            .repo
            .store()
            .get(&CollectionPath::reorders(), reorder_id)?
            .ok_or_else(|| MrpError::ReorderNotFound(reorder_id.to_string()))?;

        let reorder = Reorder::from_document(&doc)?;
        if reorder.owner_uid != session.uid {
            return Err(MrpError::ReorderNotFound(reorder_id.to_string()));
        }
        Ok(reorder)
    }
}
