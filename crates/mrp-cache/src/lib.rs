//! # MRP Cache
//!
//! 輸入快照、增量重算與即時需求彙總

pub mod dirty_tracking;
pub mod live;
pub mod snapshot;

// Re-export 主要類型
pub use dirty_tracking::{DirtyTracker, InputSet};
pub use live::LiveRequirementFeed;
pub use snapshot::InputSnapshot;
