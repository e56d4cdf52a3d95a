//! ZoneShot - region screenshots on a global hotkey

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod capture;
mod state;
mod ui;

use crate::state::{AppEvent, UiState};
use crate::ui::ZoneShotApp;
use anyhow::Context;
use crossbeam_channel::unbounded;
use eframe::egui;
use hotkey::{CaptureEvent, HotkeyListener};
use overlay::{OverlayWindow, SelectionOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::HiDpi::{
    SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
};
use windows::Win32::UI::WindowsAndMessaging::{
    SetForegroundWindow, ShowWindow, SW_HIDE, SW_SHOW,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Physical-pixel coordinates everywhere, regardless of display scaling
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let ui_state = Arc::new(Mutex::new(UiState::new()));

    // Events marshaled onto the UI thread via the egui update loop
    let (event_tx, event_rx) = unbounded::<AppEvent>();
    let (capture_tx, capture_rx) = unbounded::<CaptureEvent>();

    let mut listener = HotkeyListener::new(ui_state.lock().hotkey_index);
    let hotkey_selection = listener.selection();
    listener
        .start(capture_tx)
        .context("failed to install the global keyboard hook")?;

    // Forward hotkey events into the UI event stream, preserving order
    let forward_tx = event_tx.clone();
    let _forward_handle = thread::spawn(move || {
        for _event in capture_rx.iter() {
            if forward_tx.send(AppEvent::CaptureRequested).is_err() {
                break;
            }
        }
    });

    // Setup callbacks
    let ui_state_clone = ui_state.clone();
    let overlay_tx = event_tx.clone();
    {
        let mut state = ui_state.lock();
        state.on_select_region = Some(Arc::new(move || {
            on_select_region_click(ui_state_clone.clone(), overlay_tx.clone());
        }));
    }

    let ui_state_clone = ui_state.clone();
    {
        let mut state = ui_state.lock();
        state.on_browse_folder = Some(Arc::new(move || {
            on_browse_folder_click(ui_state_clone.clone());
        }));
    }

    let ui_state_clone = ui_state.clone();
    {
        let mut state = ui_state.lock();
        state.on_hotkey_changed = Some(Arc::new(move |index| {
            ui_state_clone.lock().hotkey_index = index;
            hotkey_selection.set(index);
            log::info!("trigger key changed to {}", hotkey_selection.label());
        }));
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([440.0, 400.0])
            .with_min_inner_size([400.0, 320.0])
            .with_title("ZoneShot")
            .with_resizable(true),
        ..Default::default()
    };

    let ui_state_for_app = ui_state.clone();
    let _ = eframe::run_native(
        "ZoneShot",
        native_options,
        Box::new(|cc| Ok(Box::new(ZoneShotApp::new(cc, ui_state_for_app, event_rx)))),
    );

    // The listener thread must be gone before the process exits
    listener.stop();

    Ok(())
}

/// Show or hide the main window by raw HWND
pub fn set_main_window_visible(ui_state: &Arc<Mutex<UiState>>, visible: bool) {
    let hwnd_raw = {
        let state = ui_state.lock();
        state.main_hwnd
    };
    if hwnd_raw == 0 {
        return;
    }

    let hwnd = HWND(hwnd_raw as *mut std::ffi::c_void);
    unsafe {
        let _ = ShowWindow(hwnd, if visible { SW_SHOW } else { SW_HIDE });
        if visible {
            let _ = SetForegroundWindow(hwnd);
        }
    }
}

fn on_select_region_click(ui_state: Arc<Mutex<UiState>>, event_tx: crossbeam_channel::Sender<AppEvent>) {
    {
        let mut state = ui_state.lock();
        if state.window_hidden {
            return;
        }
        state.window_hidden = true;
        state.status_text = "选择区域...".to_string();
    }

    set_main_window_visible(&ui_state, false);

    // The overlay runs its own message loop, so keep it off the UI thread
    thread::spawn(move || {
        // Small delay for the main window to finish hiding
        thread::sleep(Duration::from_millis(100));

        let outcome = match OverlayWindow::show() {
            Ok(outcome) => outcome,
            Err(e) => {
                log::warn!("selection overlay failed: {e}");
                SelectionOutcome::Cancelled
            }
        };

        let _ = event_tx.send(AppEvent::SelectionDone(outcome));
    });
}

fn on_browse_folder_click(ui_state: Arc<Mutex<UiState>>) {
    let current = ui_state.lock().save_folder.clone();

    let picked = rfd::FileDialog::new()
        .set_title("选择保存文件夹")
        .set_directory(&current)
        .pick_folder();

    if let Some(folder) = picked {
        log::info!("save folder changed to {}", folder.display());
        ui_state.lock().save_folder = folder;
    }
}
