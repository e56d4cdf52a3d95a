//! Overlay window implementation

use crate::{
    render::OverlayRenderer, selection::selection_from_drag, OverlayError, OverlayResult,
    SelectionOutcome,
};
use capture_gdi::{virtual_desktop_rect, Rect};
use std::cell::RefCell;
use std::sync::Once;
use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{CreateSolidBrush, InvalidateRect, UpdateWindow};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
    LoadCursorW, PostQuitMessage, RegisterClassExW, SetForegroundWindow,
    SetLayeredWindowAttributes, ShowWindow, TranslateMessage, CS_HREDRAW, CS_VREDRAW,
    IDC_CROSS, LWA_ALPHA, MSG, SW_SHOW, WM_CLOSE, WM_DESTROY, WM_KEYDOWN,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MOUSEMOVE, WM_PAINT, WNDCLASSEXW, WS_EX_LAYERED,
    WS_EX_TOPMOST, WS_POPUP,
};

thread_local! {
    static OVERLAY_STATE: RefCell<Option<Box<OverlayState>>> = RefCell::new(None);
}

struct OverlayState {
    renderer: OverlayRenderer,
    drag_start: Option<(i32, i32)>,
    drag_end: Option<(i32, i32)>,
    desktop: Rect,
    result: Option<SelectionOutcome>,
}

impl OverlayState {
    fn new(desktop: Rect) -> Self {
        Self {
            renderer: OverlayRenderer::new(desktop),
            drag_start: None,
            drag_end: None,
            desktop,
            result: None,
        }
    }
}

static REGISTER: Once = Once::new();

/// Whole-window alpha, roughly 55 % opaque
const OVERLAY_ALPHA: u8 = 140;

/// Full-desktop drag selection window.
///
/// `show` blocks on its own message loop, so callers run it off the UI
/// thread and get the outcome back when the user finishes or cancels.
pub struct OverlayWindow;

impl OverlayWindow {
    const CLASS_NAME: PCWSTR = w!("ZoneShotOverlay");

    fn register_class(hinstance: HINSTANCE) {
        REGISTER.call_once(|| unsafe {
            let wc = WNDCLASSEXW {
                cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(Self::wnd_proc),
                hInstance: hinstance,
                hCursor: LoadCursorW(None, IDC_CROSS).unwrap_or_default(),
                hbrBackground: CreateSolidBrush(COLORREF(0)),
                lpszClassName: Self::CLASS_NAME,
                ..Default::default()
            };

            RegisterClassExW(&wc);
        });
    }

    /// Create and show the overlay, blocking until a selection or cancel
    pub fn show() -> OverlayResult<SelectionOutcome> {
        let desktop = virtual_desktop_rect();
        log::debug!(
            "selection overlay over virtual desktop {}x{} at ({}, {})",
            desktop.width,
            desktop.height,
            desktop.x,
            desktop.y
        );

        unsafe {
            let hmodule = GetModuleHandleW(None)?;
            let hinstance = HINSTANCE(hmodule.0);

            Self::register_class(hinstance);

            OVERLAY_STATE.with(|s| {
                *s.borrow_mut() = Some(Box::new(OverlayState::new(desktop)));
            });

            let hwnd = CreateWindowExW(
                WS_EX_TOPMOST | WS_EX_LAYERED,
                Self::CLASS_NAME,
                w!("ZoneShot Selection"),
                WS_POPUP,
                desktop.x,
                desktop.y,
                desktop.width as i32,
                desktop.height as i32,
                None,
                None,
                hinstance,
                None,
            )?;

            SetLayeredWindowAttributes(hwnd, COLORREF(0), OVERLAY_ALPHA, LWA_ALPHA)?;

            let _ = ShowWindow(hwnd, SW_SHOW);
            let _ = SetForegroundWindow(hwnd);
            let _ = UpdateWindow(hwnd);

            // Message loop, ends once a result is recorded
            let mut msg = MSG::default();
            loop {
                let ret = GetMessageW(&mut msg, None, 0, 0);
                if !ret.as_bool() {
                    break;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);

                let has_result = OVERLAY_STATE.with(|s| {
                    s.borrow()
                        .as_ref()
                        .map(|state| state.result.is_some())
                        .unwrap_or(false)
                });
                if has_result {
                    break;
                }
            }

            let result = OVERLAY_STATE.with(|s| {
                s.borrow_mut()
                    .take()
                    .and_then(|state| state.result)
            });

            let _ = DestroyWindow(hwnd);

            result.ok_or(OverlayError::NoResult)
        }
    }

    unsafe extern "system" fn wnd_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_PAINT => {
                OVERLAY_STATE.with(|s| {
                    if let Some(ref state) = *s.borrow() {
                        state.renderer.render(hwnd);
                    }
                });
                LRESULT(0)
            }

            WM_LBUTTONDOWN => {
                Self::handle_mouse_down(hwnd, lparam);
                LRESULT(0)
            }

            WM_MOUSEMOVE => {
                Self::handle_mouse_move(hwnd, lparam);
                LRESULT(0)
            }

            WM_LBUTTONUP => {
                Self::handle_mouse_up(hwnd, lparam);
                LRESULT(0)
            }

            WM_KEYDOWN => {
                Self::handle_key_down(hwnd, wparam);
                LRESULT(0)
            }

            WM_CLOSE => {
                OVERLAY_STATE.with(|s| {
                    if let Some(ref mut state) = *s.borrow_mut() {
                        if state.result.is_none() {
                            state.result = Some(SelectionOutcome::Cancelled);
                        }
                    }
                });
                let _ = DestroyWindow(hwnd);
                LRESULT(0)
            }

            WM_DESTROY => {
                PostQuitMessage(0);
                LRESULT(0)
            }

            _ => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }

    fn cursor_screen_pos(desktop: Rect, lparam: LPARAM) -> (i32, i32) {
        let x = (lparam.0 & 0xFFFF) as i16 as i32;
        let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
        (x + desktop.x, y + desktop.y)
    }

    unsafe fn handle_mouse_down(hwnd: HWND, lparam: LPARAM) {
        OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                let pos = Self::cursor_screen_pos(state.desktop, lparam);
                state.drag_start = Some(pos);
                state.drag_end = Some(pos);
                state.renderer.set_selection(None);
            }
        });

        let _ = InvalidateRect(hwnd, None, true);
    }

    unsafe fn handle_mouse_move(hwnd: HWND, lparam: LPARAM) {
        let dragging = OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                if state.drag_start.is_none() {
                    return false;
                }
                let pos = Self::cursor_screen_pos(state.desktop, lparam);
                state.drag_end = Some(pos);

                // Live preview, only once the drag clears the minimum size
                let preview = selection_from_drag(state.drag_start, state.drag_end);
                state.renderer.set_selection(preview);
                true
            } else {
                false
            }
        });

        if dragging {
            let _ = InvalidateRect(hwnd, None, true);
        }
    }

    unsafe fn handle_mouse_up(hwnd: HWND, lparam: LPARAM) {
        // A release without an active drag is not ours to handle
        let finished = OVERLAY_STATE.with(|s| {
            if let Some(ref mut state) = *s.borrow_mut() {
                if state.drag_start.is_none() {
                    return false;
                }
                let pos = Self::cursor_screen_pos(state.desktop, lparam);
                state.drag_end = Some(pos);

                let selection = selection_from_drag(state.drag_start, state.drag_end);
                state.drag_start = None;
                state.drag_end = None;

                // A too-small drag closes without emitting a region
                state.result = Some(match selection {
                    Some(rect) => SelectionOutcome::Region(rect),
                    None => SelectionOutcome::Cancelled,
                });
                true
            } else {
                false
            }
        });

        if finished {
            let _ = DestroyWindow(hwnd);
        }
    }

    unsafe fn handle_key_down(hwnd: HWND, wparam: WPARAM) {
        const VK_ESCAPE: usize = 0x1B;

        if wparam.0 == VK_ESCAPE {
            OVERLAY_STATE.with(|s| {
                if let Some(ref mut state) = *s.borrow_mut() {
                    state.drag_start = None;
                    state.drag_end = None;
                    state.result = Some(SelectionOutcome::Cancelled);
                }
            });
            let _ = DestroyWindow(hwnd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::calc_selection_rect;

    #[test]
    fn drag_state_produces_region_on_release() {
        let mut state = OverlayState::new(Rect::new(0, 0, 1920, 1080));
        state.drag_start = Some((100, 100));
        state.drag_end = Some((300, 250));

        let selection = selection_from_drag(state.drag_start, state.drag_end);
        assert_eq!(selection, Some(Rect::new(100, 100, 200, 150)));
    }

    #[test]
    fn overlay_offsets_client_coords_by_desktop_origin() {
        let desktop = Rect::new(-1920, 0, 3840, 1080);
        // Client (10, 20) packed into lparam
        let lparam = LPARAM((20 << 16) | 10);
        let (x, y) = OverlayWindow::cursor_screen_pos(desktop, lparam);
        assert_eq!((x, y), (-1910, 20));
    }

    #[test]
    fn preview_rect_uses_normalized_drag() {
        // Dragging up and to the left still previews the min-corner rect
        let rect = calc_selection_rect(500, 400, 120, 90);
        assert_eq!(rect, Rect::new(120, 90, 380, 310));
    }
}
