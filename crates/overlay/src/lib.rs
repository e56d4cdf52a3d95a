//! Overlay module for ZoneShot
//!
//! Provides the full-desktop translucent surface used to drag out a
//! capture region.

pub mod render;
pub mod selection;
pub mod window;

pub use selection::{calc_selection_rect, selection_from_drag, MIN_SELECTION_SIZE};
pub use window::OverlayWindow;

use capture_gdi::Rect;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Overlay closed without a result")]
    NoResult,
}

pub type OverlayResult<T> = Result<T, OverlayError>;

/// Selection outcome
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// User dragged out a region of at least the minimum size
    Region(Rect),
    /// Escape pressed, or the drag was too small to count
    Cancelled,
}
