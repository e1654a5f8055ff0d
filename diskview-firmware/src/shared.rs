//! State shared between tasks

use diskview_core::{LifecycleCell, LoadMeter};

/// Device lifecycle, advanced by the watcher
pub static LIFECYCLE: LifecycleCell = LifecycleCell::new();

/// Busy time reported by both application tasks
pub static LOAD: LoadMeter = LoadMeter::new();
