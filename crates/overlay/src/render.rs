//! GDI rendering for the selection overlay

use capture_gdi::Rect;
use windows::core::w;
use windows::Win32::Foundation::{COLORREF, HWND, RECT, SIZE};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, CreateFontW, CreatePen, CreateSolidBrush, DeleteObject, EndPaint,
    FillRect, GetStockObject, GetTextExtentPoint32W, Rectangle, SelectObject, SetBkMode,
    SetTextColor, TextOutW, CLIP_DEFAULT_PRECIS, DEFAULT_CHARSET, DEFAULT_PITCH,
    DEFAULT_QUALITY, FF_SWISS, FW_BOLD, HDC, NULL_BRUSH, OUT_DEFAULT_PRECIS,
    PAINTSTRUCT, PS_DASH, PS_SOLID, TRANSPARENT,
};

const ACCENT_COLOR: COLORREF = COLORREF(0x00FFC800); // RGB(0, 200, 255)
const TEXT_COLOR: COLORREF = COLORREF(0x00FFFFFF);
const CAPTION_BG_COLOR: COLORREF = COLORREF(0x00202020);
const CAPTION_PADDING: i32 = 16;

const CAPTION: &str = "拖动选择截图区域，松开完成 | Esc 取消";

/// Overlay renderer
///
/// Draws on the translucent layered surface; the desktop shows through
/// the window alpha, so only the selection border and caption are painted.
pub struct OverlayRenderer {
    desktop: Rect,
    selection: Option<Rect>,
}

impl OverlayRenderer {
    pub fn new(desktop: Rect) -> Self {
        Self {
            desktop,
            selection: None,
        }
    }

    /// Set the selection rectangle (screen coordinates)
    pub fn set_selection(&mut self, rect: Option<Rect>) {
        self.selection = rect;
    }

    /// Convert screen coordinates to window-local coordinates
    fn screen_to_local(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.desktop.x, y - self.desktop.y)
    }

    /// Render to window
    pub fn render(&self, hwnd: HWND) {
        unsafe {
            let mut ps = PAINTSTRUCT::default();
            let hdc = BeginPaint(hwnd, &mut ps);

            if let Some(ref rect) = self.selection {
                self.draw_selection(hdc, rect);
            }

            self.draw_caption(hdc);

            let _ = EndPaint(hwnd, &ps);
        }
    }

    unsafe fn draw_selection(&self, hdc: HDC, rect: &Rect) {
        let (local_x, local_y) = self.screen_to_local(rect.x, rect.y);
        let right = local_x + rect.width as i32;
        let bottom = local_y + rect.height as i32;

        let brush = GetStockObject(NULL_BRUSH);
        let old_brush = SelectObject(hdc, brush);

        // Solid accent border
        let pen = CreatePen(PS_SOLID, 3, ACCENT_COLOR);
        let old_pen = SelectObject(hdc, pen);
        let _ = Rectangle(hdc, local_x, local_y, right, bottom);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(pen);

        // Dashed inner border, 2 px inset
        let inner_pen = CreatePen(PS_DASH, 1, TEXT_COLOR);
        let old_pen = SelectObject(hdc, inner_pen);
        let _ = Rectangle(hdc, local_x + 2, local_y + 2, right - 2, bottom - 2);
        SelectObject(hdc, old_pen);
        let _ = DeleteObject(inner_pen);

        SelectObject(hdc, old_brush);
    }

    unsafe fn draw_caption(&self, hdc: HDC) {
        let text_wide: Vec<u16> = CAPTION.encode_utf16().collect();

        let font = CreateFontW(
            24,
            0,
            0,
            0,
            FW_BOLD.0 as i32,
            0,
            0,
            0,
            DEFAULT_CHARSET.0 as u32,
            OUT_DEFAULT_PRECIS.0 as u32,
            CLIP_DEFAULT_PRECIS.0 as u32,
            DEFAULT_QUALITY.0 as u32,
            (DEFAULT_PITCH.0 | FF_SWISS.0) as u32,
            w!("Microsoft YaHei UI"),
        );
        let old_font = SelectObject(hdc, font);

        let mut text_size = SIZE::default();
        let _ = GetTextExtentPoint32W(hdc, &text_wide, &mut text_size);

        // Centered horizontally, one sixth of the way down the desktop
        let text_x = (self.desktop.width as i32 - text_size.cx) / 2;
        let text_y = self.desktop.height as i32 / 6;

        let bg_brush = CreateSolidBrush(CAPTION_BG_COLOR);
        let bg_rect = RECT {
            left: text_x - CAPTION_PADDING,
            top: text_y - CAPTION_PADDING / 2,
            right: text_x + text_size.cx + CAPTION_PADDING,
            bottom: text_y + text_size.cy + CAPTION_PADDING / 2,
        };
        FillRect(hdc, &bg_rect, bg_brush);
        let _ = DeleteObject(bg_brush);

        SetBkMode(hdc, TRANSPARENT);
        SetTextColor(hdc, TEXT_COLOR);
        let _ = TextOutW(hdc, text_x, text_y, &text_wide);

        SelectObject(hdc, old_font);
        let _ = DeleteObject(font);
    }
}
