//! Background keyboard hook thread

use crate::{CaptureEvent, HotkeyError, HotkeyResult, HotkeySelection};
use crossbeam_channel::{bounded, Sender};
use std::cell::RefCell;
use std::thread::{self, JoinHandle};
use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, KBDLLHOOKSTRUCT, MSG,
    PM_NOREMOVE, WH_KEYBOARD_LL, WM_KEYDOWN, WM_QUIT, WM_SYSKEYDOWN, WM_USER,
};

thread_local! {
    static HOOK_STATE: RefCell<Option<HookState>> = RefCell::new(None);
}

struct HookState {
    tx: Sender<CaptureEvent>,
    selection: HotkeySelection,
}

/// Global hotkey listener.
///
/// `start` installs a low-level keyboard hook on a dedicated thread so the
/// UI thread never blocks; `stop` posts a quit message, joins the thread
/// and is a no-op when the listener is not running.
pub struct HotkeyListener {
    selection: HotkeySelection,
    thread: Option<JoinHandle<()>>,
    thread_id: u32,
}

impl HotkeyListener {
    pub fn new(initial_index: usize) -> Self {
        Self {
            selection: HotkeySelection::new(initial_index),
            thread: None,
            thread_id: 0,
        }
    }

    /// Handle for reading and changing the trigger key at runtime
    pub fn selection(&self) -> HotkeySelection {
        self.selection.clone()
    }

    /// Install the hook and begin observing key events
    pub fn start(&mut self, tx: Sender<CaptureEvent>) -> HotkeyResult<()> {
        if self.thread.is_some() {
            return Err(HotkeyError::AlreadyRunning);
        }

        let selection = self.selection.clone();
        let (ready_tx, ready_rx) = bounded::<HotkeyResult<u32>>(1);

        let handle = thread::spawn(move || {
            listener_thread(tx, selection, ready_tx);
        });

        match ready_rx.recv() {
            Ok(Ok(thread_id)) => {
                self.thread = Some(handle);
                self.thread_id = thread_id;
                log::info!("hotkey listener running, trigger {}", self.selection.label());
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(HotkeyError::StartAborted)
            }
        }
    }

    /// Stop the listener; safe to call when never started or already stopped
    pub fn stop(&mut self) {
        let Some(handle) = self.thread.take() else {
            return;
        };

        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = handle.join();
        self.thread_id = 0;
        log::info!("hotkey listener stopped");
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn listener_thread(
    tx: Sender<CaptureEvent>,
    selection: HotkeySelection,
    ready_tx: Sender<HotkeyResult<u32>>,
) {
    unsafe {
        let hinstance = match GetModuleHandleW(None) {
            Ok(hmodule) => HINSTANCE(hmodule.0),
            Err(e) => {
                let _ = ready_tx.send(Err(e.into()));
                return;
            }
        };

        // State must be in place before the hook can fire
        HOOK_STATE.with(|s| {
            *s.borrow_mut() = Some(HookState { tx, selection });
        });

        let hook = match SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), hinstance, 0)
        {
            Ok(hook) => hook,
            Err(e) => {
                HOOK_STATE.with(|s| {
                    *s.borrow_mut() = None;
                });
                let _ = ready_tx.send(Err(e.into()));
                return;
            }
        };

        // Force the message queue into existence so stop() can post WM_QUIT
        // before the first GetMessageW call
        let mut msg = MSG::default();
        let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);

        let _ = ready_tx.send(Ok(GetCurrentThreadId()));

        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        let _ = UnhookWindowsHookEx(hook);
        HOOK_STATE.with(|s| {
            *s.borrow_mut() = None;
        });
    }
}

unsafe extern "system" fn keyboard_hook_proc(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if code >= 0 {
        let event = wparam.0 as u32;
        if event == WM_KEYDOWN || event == WM_SYSKEYDOWN {
            let kb = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
            let vk_code = kb.vkCode;

            HOOK_STATE.with(|s| {
                if let Some(ref state) = *s.borrow() {
                    if state.selection.matches(vk_code) {
                        log::debug!("trigger key down (vk {vk_code:#x})");
                        // Never block inside the hook; a full or closed
                        // channel drops the event
                        let _ = state.tx.try_send(CaptureEvent);
                    }
                }
            });
        }
    }

    CallNextHookEx(None, code, wparam, lparam)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_is_noop() {
        let mut listener = HotkeyListener::new(0);
        assert!(!listener.is_running());
        listener.stop();
        listener.stop();
        assert!(!listener.is_running());
    }

    #[test]
    fn selection_handle_outlives_listener() {
        let selection = {
            let listener = HotkeyListener::new(1);
            listener.selection()
        };
        assert_eq!(selection.get(), 1);
    }
}
