//! 集合訂閱

use std::sync::Arc;

use mrp_core::Document;
use tokio::sync::watch;

use crate::{CollectionPath, Result, StoreError};

/// 集合訂閱：每次變更都可取得完整的記錄集
#[derive(Debug, Clone)]
pub struct Subscription {
    collection: CollectionPath,
    receiver: watch::Receiver<Arc<Vec<Document>>>,
}

impl Subscription {
    pub fn new(collection: CollectionPath, receiver: watch::Receiver<Arc<Vec<Document>>>) -> Self {
        Self {
            collection,
            receiver,
        }
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// 目前的記錄集（不標記為已讀）
    pub fn current(&self) -> Arc<Vec<Document>> {
        self.receiver.borrow().clone()
    }

    /// 目前的記錄集，並標記為已讀
    pub fn latest(&mut self) -> Arc<Vec<Document>> {
        self.receiver.borrow_and_update().clone()
    }

    /// 是否有尚未讀取的變更
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// 等待下一次變更；文件庫關閉時回傳 [`StoreError::Closed`]
    pub async fn changed(&mut self) -> Result<Arc<Vec<Document>>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::Closed)?;
        Ok(self.latest())
    }
}
