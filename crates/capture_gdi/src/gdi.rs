//! Region capture using GDI

use crate::{CaptureError, CaptureResult, Rect};
use image::{ImageBuffer, RgbaImage};
use std::path::Path;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
    GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, SRCCOPY,
};

/// Pixels grabbed from a screen rectangle, 32-bit BGRA, top-down
pub struct RegionImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RegionImage {
    /// Convert BGRA data to an RGBA image
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut rgba_data = self.data.clone();

        for chunk in rgba_data.chunks_exact_mut(4) {
            chunk.swap(0, 2);
        }

        ImageBuffer::from_raw(self.width, self.height, rgba_data)
            .expect("buffer length matches dimensions")
    }

    /// Encode as PNG and write to `path`
    pub fn save_png(&self, path: &Path) -> CaptureResult<()> {
        let img = self.to_rgba_image();
        img.save(path)?;
        Ok(())
    }
}

/// Grab the pixel contents of an absolute screen rectangle.
///
/// `rect` is in virtual desktop coordinates; the result is a pixel-exact
/// `rect.width` x `rect.height` copy of the screen at call time.
pub fn capture_region(rect: &Rect) -> CaptureResult<RegionImage> {
    if rect.is_empty() {
        return Err(CaptureError::EmptyRegion);
    }

    log::debug!(
        "capturing {}x{} at ({}, {})",
        rect.width,
        rect.height,
        rect.x,
        rect.y
    );

    let width = rect.width as i32;
    let height = rect.height as i32;

    unsafe {
        let screen_dc = GetDC(None);
        if screen_dc.is_invalid() {
            return Err(CaptureError::NoScreenDc);
        }

        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let old_bitmap = SelectObject(mem_dc, bitmap);

        let blt_result = BitBlt(
            mem_dc,
            0,
            0,
            width,
            height,
            screen_dc,
            rect.x,
            rect.y,
            SRCCOPY,
        );

        if let Err(e) = blt_result {
            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);
            return Err(e.into());
        }

        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // Top-down DIB
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default()],
        };

        let buffer_size = (width * height * 4) as usize;
        let mut data = vec![0u8; buffer_size];

        GetDIBits(
            mem_dc,
            bitmap,
            0,
            height as u32,
            Some(data.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        );

        SelectObject(mem_dc, old_bitmap);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(None, screen_dc);

        Ok(RegionImage {
            data,
            width: rect.width,
            height: rect.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_bgra(width: u32, height: u32, b: u8, g: u8, r: u8) -> RegionImage {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[b, g, r, 255]);
        }
        RegionImage { data, width, height }
    }

    #[test]
    fn rgba_conversion_swaps_channels() {
        let img = solid_bgra(4, 2, 10, 20, 30).to_rgba_image();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(0, 0).0, [30, 20, 10, 255]);
        assert_eq!(img.get_pixel(3, 1).0, [30, 20, 10, 255]);
    }

    #[test]
    fn image_dimensions_match_region() {
        let img = solid_bgra(200, 150, 0, 0, 0).to_rgba_image();
        assert_eq!(img.dimensions(), (200, 150));
    }

    #[test]
    fn save_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        solid_bgra(12, 10, 1, 2, 3).save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (12, 10));
        assert_eq!(loaded.get_pixel(6, 5).0, [3, 2, 1, 255]);
    }

    #[test]
    fn save_png_missing_folder_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.png");
        let err = solid_bgra(4, 4, 0, 0, 0).save_png(&path);
        assert!(err.is_err());
    }
}
