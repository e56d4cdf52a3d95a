//! Global hotkey listener for ZoneShot
//!
//! Observes key-down events system-wide on a background thread and raises
//! a capture event whenever the currently selected trigger key fires.

pub mod listener;

pub use listener::HotkeyListener;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    VIRTUAL_KEY, VK_F10, VK_F11, VK_F12, VK_F8, VK_F9,
};

#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Listener already running")]
    AlreadyRunning,

    #[error("Listener thread exited during startup")]
    StartAborted,
}

pub type HotkeyResult<T> = Result<T, HotkeyError>;

/// Candidate trigger keys shown in the settings combo box
pub const HOTKEY_KEYS: [(VIRTUAL_KEY, &str); 5] = [
    (VK_F8, "F8"),
    (VK_F9, "F9"),
    (VK_F10, "F10"),
    (VK_F11, "F11"),
    (VK_F12, "F12"),
];

/// Raised once per matching key-down event
#[derive(Debug, Clone, Copy)]
pub struct CaptureEvent;

/// Check a raw virtual-key code against a table index.
///
/// Out-of-range indexes never match; the hook swallows them rather than
/// erroring.
pub fn key_matches(index: usize, vk_code: u32) -> bool {
    HOTKEY_KEYS
        .get(index)
        .map(|(key, _)| key.0 as u32 == vk_code)
        .unwrap_or(false)
}

/// Shared trigger-key selection.
///
/// The UI thread writes it through the combo box; the hook callback reads
/// it on every key event, so a change takes effect on the next key press
/// with no listener restart.
#[derive(Debug, Clone)]
pub struct HotkeySelection {
    index: Arc<AtomicUsize>,
}

impl HotkeySelection {
    pub fn new(index: usize) -> Self {
        let selection = Self {
            index: Arc::new(AtomicUsize::new(0)),
        };
        selection.set(index);
        selection
    }

    /// Replace the selected key, clamped to the table bounds
    pub fn set(&self, index: usize) {
        self.index
            .store(index.min(HOTKEY_KEYS.len() - 1), Ordering::Relaxed);
    }

    pub fn get(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// Display label of the selected key
    pub fn label(&self) -> &'static str {
        HOTKEY_KEYS[self.get()].1
    }

    pub(crate) fn matches(&self, vk_code: u32) -> bool {
        key_matches(self.get(), vk_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lists_five_function_keys() {
        assert_eq!(HOTKEY_KEYS.len(), 5);
        assert_eq!(HOTKEY_KEYS[0].1, "F8");
        assert_eq!(HOTKEY_KEYS[4].1, "F12");
    }

    #[test]
    fn selection_clamps_out_of_range() {
        let selection = HotkeySelection::new(99);
        assert_eq!(selection.get(), HOTKEY_KEYS.len() - 1);

        selection.set(2);
        assert_eq!(selection.get(), 2);
        assert_eq!(selection.label(), "F10");
    }

    #[test]
    fn selection_change_is_visible_through_clones() {
        // The UI writes through one handle while the hook reads another
        let ui_handle = HotkeySelection::new(0);
        let hook_handle = ui_handle.clone();

        assert!(hook_handle.matches(VK_F8.0 as u32));

        ui_handle.set(4);
        assert!(hook_handle.matches(VK_F12.0 as u32));
        assert!(!hook_handle.matches(VK_F8.0 as u32));
    }

    #[test]
    fn out_of_range_index_never_matches() {
        assert!(!key_matches(HOTKEY_KEYS.len(), VK_F8.0 as u32));
        assert!(!key_matches(usize::MAX, VK_F8.0 as u32));
    }

    #[test]
    fn unknown_key_never_matches() {
        assert!(key_matches(1, VK_F9.0 as u32));
        assert!(!key_matches(1, 0x41)); // 'A'
        assert!(!key_matches(1, 0));
    }
}
