//! 需求彙總的輸入快照
//!
//! 每個記錄集都是整批替換（最後寫入者勝）；三個記錄集都載入過之前
//! 不產生任何彙總結果。

use std::sync::Arc;

use mrp_calc::{RequirementAggregator, RequirementReport};
use mrp_core::{decode_all, BomRecipe, Document, FromDocument, MaterialStock, ProductionOrder};
use tracing::{debug, warn};

use crate::dirty_tracking::{DirtyTracker, InputSet};

/// 輸入快照
#[derive(Debug, Default)]
pub struct InputSnapshot {
    stocks: Option<Vec<MaterialStock>>,
    boms: Option<Vec<BomRecipe>>,
    orders: Option<Vec<ProductionOrder>>,
    tracker: DirtyTracker,
    cached: Option<Arc<RequirementReport>>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以文件庫推送的記錄集替換對應的輸入，回傳被拒絕的文件數
    pub fn replace(&mut self, set: InputSet, docs: &[Document]) -> usize {
        match set {
            InputSet::Stocks => self.replace_stocks(docs),
            InputSet::Boms => self.replace_boms(docs),
            InputSet::Orders => self.replace_orders(docs),
        }
    }

    pub fn replace_stocks(&mut self, docs: &[Document]) -> usize {
        let (items, rejected) = decode(InputSet::Stocks, docs);
        self.stocks = Some(items);
        self.tracker.mark_dirty(InputSet::Stocks);
        rejected
    }

    pub fn replace_boms(&mut self, docs: &[Document]) -> usize {
        let (items, rejected) = decode(InputSet::Boms, docs);
        self.boms = Some(items);
        self.tracker.mark_dirty(InputSet::Boms);
        rejected
    }

    pub fn replace_orders(&mut self, docs: &[Document]) -> usize {
        let (items, rejected) = decode(InputSet::Orders, docs);
        self.orders = Some(items);
        self.tracker.mark_dirty(InputSet::Orders);
        rejected
    }

    pub fn is_loaded(&self, set: InputSet) -> bool {
        match set {
            InputSet::Stocks => self.stocks.is_some(),
            InputSet::Boms => self.boms.is_some(),
            InputSet::Orders => self.orders.is_some(),
        }
    }

    /// 三個記錄集是否都已載入
    pub fn is_complete(&self) -> bool {
        InputSet::ALL.iter().all(|set| self.is_loaded(*set))
    }

    /// 尚未載入的記錄集
    pub fn missing_sets(&self) -> Vec<InputSet> {
        InputSet::ALL
            .into_iter()
            .filter(|set| !self.is_loaded(*set))
            .collect()
    }

    /// 取得目前的彙總結果；輸入有變更時才重新計算，輸入不完整時回傳 None
    pub fn report(&mut self) -> Option<Arc<RequirementReport>> {
        let (Some(stocks), Some(boms), Some(orders)) = (&self.stocks, &self.boms, &self.orders)
        else {
            debug!("輸入不完整，缺少 {:?}", self.missing_sets());
            return None;
        };

        if self.tracker.any_dirty() || self.cached.is_none() {
            debug!("重新彙總，變更的記錄集: {:?}", self.tracker.dirty_sets());
            let report = RequirementAggregator::aggregate(stocks, boms, orders);
            self.cached = Some(Arc::new(report));
            self.tracker.clear();
        }

        self.cached.clone()
    }
}

fn decode<T: FromDocument>(set: InputSet, docs: &[Document]) -> (Vec<T>, usize) {
    let decoded = decode_all::<T>(docs);
    for err in &decoded.rejected {
        warn!("{} 記錄被拒絕: {}", set, err);
    }
    let rejected = decoded.rejected.len();
    (decoded.items, rejected)
}
