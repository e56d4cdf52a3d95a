//! Grab-and-save on a hotkey press

use crate::state::{screenshot_filename, UiState};
use capture_gdi::{capture_region, CaptureResult, Rect};
use chrono::Local;
use std::path::Path;

/// Handle a capture request on the UI thread.
///
/// Without a region this is a silent no-op. Save failures are reported
/// through a dialog when the window is visible and never propagate.
pub fn perform_capture(state: &mut UiState) {
    let Some(region) = state.region else {
        log::debug!("capture requested with no region set");
        return;
    };

    let path = state.save_folder.join(screenshot_filename(Local::now()));

    match capture_and_save(&region, &path) {
        Ok(()) => {
            log::info!("screenshot saved to {}", path.display());
            state.status_text = format!("已保存: {}", path.display());
            if !state.window_hidden {
                let _ = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Info)
                    .set_title("截图完成")
                    .set_description(format!("已保存至:\n{}", path.display()))
                    .show();
            }
        }
        Err(e) => {
            log::warn!("screenshot save failed: {e}");
            state.status_text = format!("保存失败: {e}");
            if !state.window_hidden {
                let _ = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title("保存失败")
                    .set_description(e.to_string())
                    .show();
            }
        }
    }
}

fn capture_and_save(region: &Rect, path: &Path) -> CaptureResult<()> {
    let img = capture_region(region)?;
    img.save_png(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_without_region_is_a_noop() {
        let mut state = UiState::new();
        state.status_text = "就绪".to_string();

        perform_capture(&mut state);

        assert_eq!(state.status_text, "就绪");
        assert!(state.region.is_none());
    }
}
