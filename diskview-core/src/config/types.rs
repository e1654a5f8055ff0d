//! Configuration type definitions
//!
//! These types represent the application configuration. Every field has
//! a default matching the stock board setup, so a missing section or key
//! in `diskview.toml` falls back cleanly.

use heapless::String;

/// Maximum volume identifier length
pub const MAX_VOLUME_LEN: usize = 8;

/// Maximum file path length (8.3 names plus directories)
pub const MAX_PATH_LEN: usize = 32;

/// What the watcher does when mount, open or read fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailurePolicy {
    /// Light "serviced" and redraw the buffer whatever the outcome
    #[default]
    Silent,
    /// Gate "serviced" and the redraw on success, light "fault" otherwise
    Visible,
}

impl FailurePolicy {
    /// Parse from a config value
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "silent" => Some(FailurePolicy::Silent),
            "visible" => Some(FailurePolicy::Visible),
            _ => None,
        }
    }
}

/// Storage watcher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageConfig {
    /// Logical volume to mount
    pub volume: String<MAX_VOLUME_LEN>,
    /// File to read from the volume root
    pub file: String<MAX_PATH_LEN>,
    /// Failure policy
    pub policy: FailurePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let mut volume = String::new();
        let _ = volume.push_str("0:/");
        let mut file = String::new();
        let _ = file.push_str("m.txt");
        Self {
            volume,
            file,
            policy: FailurePolicy::Silent,
        }
    }
}

/// Task periods and budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Storage watcher loop delay in milliseconds
    pub watcher_period_ms: u32,
    /// Display/input loop delay in milliseconds
    pub display_period_ms: u32,
    /// Longest tolerated exclusive section in milliseconds
    pub section_budget_ms: u32,
    /// Load meter averaging window in milliseconds
    pub load_window_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            watcher_period_ms: 5,
            display_period_ms: 25,
            section_budget_ms: 100,
            load_window_ms: 1000,
        }
    }
}

/// Status line placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusConfig {
    /// Left edge in pixels; "CPU : 100%" needs 100 px to its right
    pub x: u16,
    /// Top edge in pixels
    pub y: u16,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self { x: 120, y: 300 }
    }
}

/// Touch digitizer calibration
///
/// Raw readings between `*_min` and `*_max` map linearly onto the
/// screen. `swap_xy` exchanges the raw axes before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    pub x_min: u16,
    pub x_max: u16,
    pub y_min: u16,
    pub y_max: u16,
    pub swap_xy: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            x_min: 0,
            x_max: 239,
            y_min: 0,
            y_max: 319,
            swap_xy: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub timing: TimingConfig,
    pub status: StatusConfig,
    pub touch: TouchConfig,
}
