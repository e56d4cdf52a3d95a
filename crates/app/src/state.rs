//! Shared UI state for ZoneShot

use capture_gdi::Rect;
use chrono::{DateTime, Local};
use overlay::SelectionOutcome;
use std::path::PathBuf;
use std::sync::Arc;

/// Callback type for button actions
pub type ActionCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback type for the hotkey combo box
pub type IndexCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// Events marshaled onto the UI thread.
///
/// Background threads (overlay, hotkey forwarder) only send these; all
/// state mutation happens when the egui update loop drains them.
pub enum AppEvent {
    /// The selection overlay finished
    SelectionDone(SelectionOutcome),
    /// The hotkey fired
    CaptureRequested,
}

/// UI state shared between the egui app and the action callbacks
pub struct UiState {
    /// Capture region, unset until the first successful drag
    pub region: Option<Rect>,
    pub save_folder: PathBuf,
    pub hotkey_index: usize,
    pub status_text: String,
    /// True while the main window is hidden behind the selection overlay
    pub window_hidden: bool,
    pub main_hwnd: isize,
    pub on_select_region: Option<ActionCallback>,
    pub on_browse_folder: Option<ActionCallback>,
    pub on_hotkey_changed: Option<IndexCallback>,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            region: None,
            save_folder: default_save_folder(),
            hotkey_index: 0,
            status_text: "就绪".to_string(),
            window_hidden: false,
            main_hwnd: 0,
            on_select_region: None,
            on_browse_folder: None,
            on_hotkey_changed: None,
        }
    }

    /// Region readout for the settings window
    pub fn region_label(&self) -> String {
        match self.region {
            Some(r) => format!("已设置: X={}, Y={}, 宽={}, 高={}", r.x, r.y, r.width, r.height),
            None => "尚未设置区域（点击上方按钮后在屏幕上拖动选取）".to_string(),
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Default save location: the user's Pictures folder
pub fn default_save_folder() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Output filename with one-second resolution.
///
/// Two captures within the same second produce the same name and the
/// later write wins.
pub fn screenshot_filename(timestamp: DateTime<Local>) -> String {
    timestamp.format("screenshot_%Y%m%d_%H%M%S.png").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Timelike;

    #[test]
    fn filename_format() {
        let ts = Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 7).unwrap();
        assert_eq!(screenshot_filename(ts), "screenshot_20240305_143007.png");
    }

    #[test]
    fn filenames_distinct_across_seconds() {
        let a = Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 7).unwrap();
        let b = Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 8).unwrap();
        assert_ne!(screenshot_filename(a), screenshot_filename(b));
    }

    #[test]
    fn same_second_collides() {
        // Sub-second precision is deliberately dropped
        let a = Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 7).unwrap();
        let b = a.with_nanosecond(999_000_000).unwrap();
        assert_eq!(screenshot_filename(a), screenshot_filename(b));
    }

    #[test]
    fn region_label_tracks_state() {
        let mut state = UiState::new();
        assert!(state.region_label().contains("尚未设置"));

        state.region = Some(Rect::new(100, 100, 200, 150));
        let label = state.region_label();
        assert!(label.contains("X=100"));
        assert!(label.contains("宽=200"));
        assert!(label.contains("高=150"));
    }

    #[test]
    fn fresh_state_has_no_region() {
        let state = UiState::new();
        assert!(state.region.is_none());
        assert_eq!(state.hotkey_index, 0);
        assert!(!state.window_hidden);
    }
}
