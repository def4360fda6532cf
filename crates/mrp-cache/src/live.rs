//! 即時物料需求彙總
//!
//! 訂閱庫存、BOM 與生產工單三個集合，任一集合變更時整批替換快照、
//! 重新彙總並推送最新結果。

use std::sync::Arc;

use mrp_calc::RequirementReport;
use mrp_core::{Document, Session};
use mrp_store::{CollectionPath, DocumentStore, Subscription};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dirty_tracking::InputSet;
use crate::snapshot::InputSnapshot;

/// 即時需求彙總
///
/// 結果以 `watch` 通道推送；`None` 表示輸入尚未完整載入。
/// 丟棄此物件會停止背景任務。
pub struct LiveRequirementFeed {
    receiver: watch::Receiver<Option<Arc<RequirementReport>>>,
    task: JoinHandle<()>,
}

impl LiveRequirementFeed {
    /// 訂閱三個集合並啟動背景彙總任務（必須在 tokio runtime 內呼叫）
    pub fn spawn(store: &dyn DocumentStore, session: &Session) -> mrp_store::Result<Self> {
        let stocks = store.subscribe(&CollectionPath::stocks(session))?;
        let boms = store.subscribe(&CollectionPath::boms())?;
        let orders = store.subscribe(&CollectionPath::manufacturing_orders())?;

        let (sender, receiver) = watch::channel(None);
        info!("啟動即時需求彙總: uid={}", session.uid);

        let task = tokio::spawn(run(stocks, boms, orders, sender));

        Ok(Self { receiver, task })
    }

    /// 目前最新的彙總結果
    pub fn latest(&self) -> Option<Arc<RequirementReport>> {
        self.receiver.borrow().clone()
    }

    /// 等待下一份彙總結果；背景任務結束時回傳 None
    pub async fn next_report(&mut self) -> Option<Arc<RequirementReport>> {
        loop {
            self.receiver.changed().await.ok()?;
            if let Some(report) = self.receiver.borrow_and_update().clone() {
                return Some(report);
            }
        }
    }

    /// 額外的結果接收端（例如提供給畫面）
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<RequirementReport>>> {
        self.receiver.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for LiveRequirementFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut stocks: Subscription,
    mut boms: Subscription,
    mut orders: Subscription,
    sender: watch::Sender<Option<Arc<RequirementReport>>>,
) {
    let mut snapshot = InputSnapshot::new();
    snapshot.replace(InputSet::Stocks, &stocks.latest());
    snapshot.replace(InputSet::Boms, &boms.latest());
    snapshot.replace(InputSet::Orders, &orders.latest());
    publish(&mut snapshot, &sender);

    loop {
        let (set, docs): (InputSet, mrp_store::Result<Arc<Vec<Document>>>) = tokio::select! {
            docs = stocks.changed() => (InputSet::Stocks, docs),
            docs = boms.changed() => (InputSet::Boms, docs),
            docs = orders.changed() => (InputSet::Orders, docs),
        };

        let Ok(docs) = docs else {
            info!("{} 訂閱已關閉，停止即時需求彙總", set);
            break;
        };

        debug!("{} 更新: {} 筆記錄", set, docs.len());
        snapshot.replace(set, &docs);

        if sender.is_closed() {
            break;
        }
        publish(&mut snapshot, &sender);
    }
}

fn publish(
    snapshot: &mut InputSnapshot,
    sender: &watch::Sender<Option<Arc<RequirementReport>>>,
) {
    if let Some(report) = snapshot.report() {
        debug!(
            "推送需求彙總: {} 項物料, {} 項缺料",
            report.lines.len(),
            report.shortage_count()
        );
        sender.send_replace(Some(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mrp_core::Role;
    use mrp_store::{MemoryStore, WriteMode};
    use rust_decimal::Decimal;
    use serde_json::{json, Map, Value};
    use tokio::time::timeout;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("預期 JSON 物件"),
        }
    }

    /// 等待直到結果符合條件
    async fn wait_for(
        feed: &mut LiveRequirementFeed,
        predicate: impl Fn(&RequirementReport) -> bool,
    ) -> Arc<RequirementReport> {
        if let Some(report) = feed.latest().filter(|r| predicate(r.as_ref())) {
            return report;
        }
        timeout(Duration::from_secs(2), async {
            loop {
                let report = feed.next_report().await.expect("背景任務已結束");
                if predicate(report.as_ref()) {
                    return report;
                }
            }
        })
        .await
        .expect("等待彙總結果逾時")
    }

    #[tokio::test]
    async fn test_feed_recomputes_on_every_change() {
        let store = MemoryStore::new();
        let session = Session::new("u-1".to_string(), Role::Admin);
        let stocks = CollectionPath::stocks(&session);

        store
            .set(
                &stocks,
                "wood",
                fields(json!({"itemid": "Wood", "quantity": 30, "actualPrice": 12})),
                WriteMode::Replace,
            )
            .unwrap();
        store
            .add(
                &CollectionPath::boms(),
                fields(json!({
                    "productId": "Chair",
                    "ingredients": [{"materialId": "Wood", "quantity": 4}]
                })),
            )
            .unwrap();

        let mut feed = LiveRequirementFeed::spawn(&store, &session).unwrap();

        // 尚無工單：沒有任何需求行
        let report = wait_for(&mut feed, |r| r.is_empty()).await;
        assert_eq!(report.shortage_count(), 0);

        store
            .add(
                &CollectionPath::manufacturing_orders(),
                fields(json!({"productId": "Chair", "quantity": 10, "status": "Planned"})),
            )
            .unwrap();
        let report = wait_for(&mut feed, |r| !r.is_empty()).await;
        assert_eq!(report.line("Wood").unwrap().net_shortfall, Decimal::from(10));

        store
            .increment(&stocks, "wood", "quantity", Decimal::from(10))
            .unwrap();
        let report = wait_for(&mut feed, |r| r.shortage_count() == 0 && !r.is_empty()).await;
        assert_eq!(report.line("Wood").unwrap().on_hand, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_other_tenants_stock_is_ignored() {
        let store = MemoryStore::new();
        let session = Session::new("u-1".to_string(), Role::Admin);
        let other = Session::new("u-2".to_string(), Role::Admin);

        store
            .add(
                &CollectionPath::stocks(&other),
                fields(json!({"itemid": "Wood", "quantity": 1000})),
            )
            .unwrap();
        store
            .add(
                &CollectionPath::boms(),
                fields(json!({
                    "productId": "Chair",
                    "ingredients": [{"materialId": "Wood", "quantity": 4}]
                })),
            )
            .unwrap();
        store
            .add(
                &CollectionPath::manufacturing_orders(),
                fields(json!({"productId": "Chair", "quantity": 10})),
            )
            .unwrap();

        let mut feed = LiveRequirementFeed::spawn(&store, &session).unwrap();
        let report = wait_for(&mut feed, |r| !r.is_empty()).await;

        let wood = report.line("Wood").unwrap();
        assert_eq!(wood.on_hand, Decimal::ZERO);
        assert_eq!(wood.net_shortfall, Decimal::from(40));
    }

    #[tokio::test]
    async fn test_drop_stops_task() {
        let store = MemoryStore::new();
        let session = Session::new("u-1".to_string(), Role::Admin);

        let feed = LiveRequirementFeed::spawn(&store, &session).unwrap();
        let mut receiver = feed.subscribe();
        drop(feed);

        // 任務中止後發送端被丟棄，接收端會收到關閉通知
        let closed = timeout(Duration::from_secs(2), async {
            while receiver.changed().await.is_ok() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
