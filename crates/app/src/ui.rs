//! Settings window using egui

use crate::state::{AppEvent, UiState};
use crate::{capture, set_main_window_visible};
use crossbeam_channel::Receiver;
use eframe::egui;
use hotkey::HOTKEY_KEYS;
use overlay::SelectionOutcome;
use parking_lot::Mutex;
use std::sync::Arc;

/// Main application window
pub struct ZoneShotApp {
    state: Arc<Mutex<UiState>>,
    events: Receiver<AppEvent>,
}

impl ZoneShotApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        state: Arc<Mutex<UiState>>,
        events: Receiver<AppEvent>,
    ) -> Self {
        Self::setup_custom_fonts(&cc.egui_ctx);
        Self { state, events }
    }

    /// Load a CJK-capable system font so the UI text renders
    fn setup_custom_fonts(ctx: &egui::Context) {
        use std::fs;

        let mut fonts = egui::FontDefinitions::default();

        let font_paths = [
            "C:\\Windows\\Fonts\\msyh.ttc",   // Microsoft YaHei
            "C:\\Windows\\Fonts\\simhei.ttf", // SimHei
            "C:\\Windows\\Fonts\\simsun.ttc", // SimSun
        ];

        let mut font_loaded = false;
        for font_path in &font_paths {
            if let Ok(font_data) = fs::read(font_path) {
                fonts.font_data.insert(
                    "cjk_font".to_owned(),
                    egui::FontData::from_owned(font_data),
                );
                font_loaded = true;
                break;
            }
        }

        if font_loaded {
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "cjk_font".to_owned());

            fonts
                .families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("cjk_font".to_owned());
        }

        ctx.set_fonts(fonts);
    }

    /// Drain background events on the UI thread.
    ///
    /// This is the only place Region and SaveFolder are touched in response
    /// to overlay or hotkey activity.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                AppEvent::SelectionDone(outcome) => {
                    {
                        let mut state = self.state.lock();
                        match outcome {
                            SelectionOutcome::Region(rect) => {
                                log::info!(
                                    "region set to {}x{} at ({}, {})",
                                    rect.width,
                                    rect.height,
                                    rect.x,
                                    rect.y
                                );
                                state.region = Some(rect);
                                state.status_text = "已设置截图区域".to_string();
                            }
                            SelectionOutcome::Cancelled => {
                                state.status_text = "已取消选择".to_string();
                            }
                        }
                        state.window_hidden = false;
                    }
                    set_main_window_visible(&self.state, true);
                }
                AppEvent::CaptureRequested => {
                    let mut state = self.state.lock();
                    capture::perform_capture(&mut state);
                }
            }
        }
    }
}

impl eframe::App for ZoneShotApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        {
            use raw_window_handle::{HasWindowHandle, RawWindowHandle};
            let mut state = self.state.lock();
            if state.main_hwnd == 0 {
                if let Ok(handle) = frame.window_handle() {
                    if let RawWindowHandle::Win32(win32) = handle.as_raw() {
                        state.main_hwnd = win32.hwnd.get();
                    }
                }
            }
        }

        self.drain_events();

        // Clone what the panels need so the lock is not held while rendering
        let (region_label, region_set, status_text, hotkey_index, folder_text, on_select, on_browse, on_hotkey) = {
            let state = self.state.lock();
            (
                state.region_label(),
                state.region.is_some(),
                state.status_text.clone(),
                state.hotkey_index,
                state.save_folder.display().to_string(),
                state.on_select_region.clone(),
                state.on_browse_folder.clone(),
                state.on_hotkey_changed.clone(),
            )
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new("📸 ZoneShot")
                        .size(26.0)
                        .color(egui::Color32::from_rgb(51, 51, 51)),
                );
            });
            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);

            // Capture region
            ui.group(|ui| {
                ui.label(egui::RichText::new("截图区域").strong());
                ui.add_space(4.0);

                let select_btn = egui::Button::new(
                    egui::RichText::new("拖动设置截图区域")
                        .size(15.0)
                        .color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(0, 120, 212))
                .min_size(egui::vec2(ui.available_width(), 40.0))
                .rounding(8.0);

                if ui.add(select_btn).clicked() {
                    if let Some(ref callback) = on_select {
                        callback();
                    }
                }

                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(&region_label)
                        .size(12.0)
                        .color(if region_set {
                            egui::Color32::from_rgb(0, 160, 0)
                        } else {
                            egui::Color32::from_rgb(102, 102, 102)
                        }),
                );
            });

            ui.add_space(6.0);

            // Hotkey
            ui.group(|ui| {
                ui.label(egui::RichText::new("截图热键").strong());
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("按键:");

                    let mut selected = hotkey_index;
                    egui::ComboBox::from_id_source("hotkey_combo")
                        .selected_text(HOTKEY_KEYS[selected].1)
                        .show_ui(ui, |ui| {
                            for (i, (_, label)) in HOTKEY_KEYS.iter().enumerate() {
                                ui.selectable_value(&mut selected, i, *label);
                            }
                        });

                    if selected != hotkey_index {
                        if let Some(ref callback) = on_hotkey {
                            callback(selected);
                        }
                    }

                    ui.label(
                        egui::RichText::new("（程序在后台时也可触发）")
                            .size(12.0)
                            .color(egui::Color32::from_rgb(102, 102, 102)),
                    );
                });
            });

            ui.add_space(6.0);

            // Save location
            ui.group(|ui| {
                ui.label(egui::RichText::new("保存位置").strong());
                ui.add_space(4.0);
                ui.label(egui::RichText::new(&folder_text).size(12.0));
                ui.add_space(4.0);
                if ui.button("选择文件夹").clicked() {
                    if let Some(ref callback) = on_browse {
                        callback();
                    }
                }
            });

            ui.add_space(10.0);

            ui.label(
                egui::RichText::new(&status_text)
                    .size(14.0)
                    .color(egui::Color32::from_rgb(85, 85, 85)),
            );

            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("设置好区域后，按下热键即可截图并保存。")
                    .size(12.0)
                    .color(egui::Color32::from_rgb(136, 136, 136)),
            );
        });

        // Keep draining while idle so hotkey presses are picked up promptly
        ctx.request_repaint();
    }
}
