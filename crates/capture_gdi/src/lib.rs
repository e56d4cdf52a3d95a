//! Screen pixel access for ZoneShot
//!
//! Provides virtual desktop geometry and GDI region capture.

pub mod gdi;
pub mod monitor;

pub use gdi::{capture_region, RegionImage};
pub use monitor::virtual_desktop_rect;

use thiserror::Error;
use windows::core::Error as WinError;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Windows API error: {0}")]
    Windows(#[from] WinError),

    #[error("Screen DC unavailable")]
    NoScreenDc,

    #[error("Empty capture region")]
    EmptyRegion,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Rectangle in physical pixels, absolute virtual desktop coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(100, 100, 200, 150);
        assert_eq!(r.right(), 300);
        assert_eq!(r.bottom(), 250);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(10, 10));
        assert!(r.contains(29, 29));
        assert!(!r.contains(30, 10));
        assert!(!r.contains(10, 30));
        assert!(!r.contains(9, 15));
    }

    #[test]
    fn rect_negative_origin() {
        // Monitors left of the primary give negative coordinates
        let r = Rect::new(-1920, -200, 1920, 1080);
        assert_eq!(r.right(), 0);
        assert_eq!(r.bottom(), 880);
        assert!(r.contains(-1, 0));
    }

    #[test]
    fn rect_empty() {
        assert!(Rect::new(5, 5, 0, 10).is_empty());
        assert!(Rect::new(5, 5, 10, 0).is_empty());
        assert!(!Rect::new(5, 5, 1, 1).is_empty());
    }
}
