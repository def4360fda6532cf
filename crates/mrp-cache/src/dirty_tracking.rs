//! 髒標記追蹤

use std::collections::BTreeSet;
use std::fmt;

/// 需求彙總的輸入記錄集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputSet {
    /// 物料庫存
    Stocks,

    /// BOM 配方
    Boms,

    /// 生產工單
    Orders,
}

impl InputSet {
    pub const ALL: [InputSet; 3] = [InputSet::Stocks, InputSet::Boms, InputSet::Orders];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputSet::Stocks => "stocks",
            InputSet::Boms => "boms",
            InputSet::Orders => "orders",
        }
    }
}

impl fmt::Display for InputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 髒標記追蹤器
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    dirty_sets: BTreeSet<InputSet>,
}

impl DirtyTracker {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 標記記錄集為髒
    pub fn mark_dirty(&mut self, set: InputSet) {
        self.dirty_sets.insert(set);
    }

    /// 檢查記錄集是否為髒
    pub fn is_dirty(&self, set: InputSet) -> bool {
        self.dirty_sets.contains(&set)
    }

    pub fn any_dirty(&self) -> bool {
        !self.dirty_sets.is_empty()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_sets.clear();
    }

    /// 獲取所有髒記錄集
    pub fn dirty_sets(&self) -> Vec<InputSet> {
        self.dirty_sets.iter().copied().collect()
    }
}
