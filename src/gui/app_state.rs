use crate::audio::audio_stream::{self, AudioStream};
use crate::audio::{AudioAnalyzer, EnergyReading};
use crate::config::{APP_VERSION, CanvasMode, Config};
use crate::detector::DetectorOutput;
use crate::visual::VisualEngine;
use eframe::egui;
use log::{debug, error, info};
use std::sync::{Arc, Mutex};

use super::components::{render_config_panel, render_live_monitoring, render_spectrum};

pub struct AppState {
    active_config: Arc<Mutex<Config>>,
    pending_config: Config, // Local copy for sliders
    devices: Vec<String>,
    active_device_idx: usize,
    pending_device_idx: usize, // Local selection for device selector
    analyzer: Arc<Mutex<AudioAnalyzer>>,
    audio_stream: Option<AudioStream>,
    audio_error: Option<String>,
    detector_output: Arc<Mutex<DetectorOutput>>,
    visuals_window_open: bool,
    visuals_window: VisualEngine,
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_top_panel(ctx);
        self.render_bottom_panel(ctx);
        self.render_central_panel(ctx);
        self.render_visualizer_window(ctx);

        ctx.request_repaint();
    }
}

impl AppState {
    pub fn new(
        config: Arc<Mutex<Config>>,
        analyzer: Arc<Mutex<AudioAnalyzer>>,
        detector_output: Arc<Mutex<DetectorOutput>>,
    ) -> Self {
        debug!("Initializing GUI state...");

        let devices = audio_stream::list_input_devices();
        debug!("Found {} audio input devices", devices.len());

        let selected_device_idx = audio_stream::default_input_device_name()
            .and_then(|default_name| devices.iter().position(|name| *name == default_name))
            .unwrap_or(0);

        let selected_device = devices
            .get(selected_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("None");
        info!("Selected initial audio device: {selected_device}");

        let pending_config = config.lock().unwrap().clone();
        debug!(
            "Initial config loaded: strips={}, energy_fft={}, detector_fft={}",
            pending_config.visual.default_strips,
            pending_config.audio.energy_fft_size,
            pending_config.audio.detector_fft_size
        );

        let visuals_window = VisualEngine::new(analyzer.clone(), config.clone());

        Self {
            active_config: config,
            pending_config,
            devices,
            pending_device_idx: selected_device_idx,
            active_device_idx: selected_device_idx,
            analyzer,
            audio_stream: None,
            audio_error: None,
            detector_output,
            visuals_window_open: false,
            visuals_window,
        }
    }

    fn audio_ready(&self) -> bool {
        self.audio_stream.is_some()
    }

    /// Opens the selected microphone. Each call is a fresh attempt; a failure
    /// leaves the app running on silence with the error on screen.
    fn start_audio(&mut self) {
        // Release the previous device before opening the next one.
        self.audio_stream = None;

        match audio_stream::create_audio_stream(
            self.pending_device_idx,
            &self.devices,
            self.analyzer.clone(),
        ) {
            Ok(stream) => {
                debug!(
                    "Audio stream running: {} @ {} Hz",
                    stream.device_name(),
                    stream.sample_rate()
                );
                self.audio_stream = Some(stream);
                self.audio_error = None;
                self.active_device_idx = self.pending_device_idx;
            }
            Err(err) => {
                error!("Audio initialization error: {err:#}");
                self.audio_error = Some(format!(
                    "Error accessing microphone ({err:#}). Please check permissions and try again."
                ));
            }
        }
    }

    fn apply_settings(&mut self) {
        let device_name = self
            .devices
            .get(self.pending_device_idx)
            .map(|s| s.as_str())
            .unwrap_or("Unknown");

        debug!(
            "Applying settings - Device: {}, Config: {:?}",
            device_name, self.pending_config
        );

        // Lock and copy pending config to shared config
        {
            let mut config = self.active_config.lock().unwrap();
            *config = self.pending_config.clone();
        }
        self.analyzer
            .lock()
            .unwrap()
            .reconfigure(&self.pending_config.audio);

        if self.pending_device_idx != self.active_device_idx {
            if self.audio_ready() {
                debug!("Reloading audio stream with new device...");
                self.start_audio();
            } else {
                self.active_device_idx = self.pending_device_idx;
            }
        }

        info!("Settings applied successfully");
    }

    fn reset_to_default(&mut self) {
        debug!("Resetting config to defaults");
        self.pending_config = Config::default();
    }

    fn disable_apply_button(&self) -> bool {
        let config_unchanged = self.pending_config == *self.active_config.lock().unwrap();
        let device_unchanged = self.pending_device_idx == self.active_device_idx;

        config_unchanged && device_unchanged
    }

    /// Energy shown in the monitor. The visualizer samples once per frame
    /// while it is open; otherwise the monitor samples for itself.
    fn current_reading(&self) -> EnergyReading {
        if self.visuals_window_open {
            self.visuals_window.last_reading()
        } else if self.audio_ready() {
            self.analyzer.lock().unwrap().sample_energy()
        } else {
            EnergyReading::default()
        }
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(format!("Glowstrips {APP_VERSION}"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.audio_ready() {
                        ui.colored_label(egui::Color32::GREEN, "Listening");
                    } else {
                        ui.colored_label(egui::Color32::RED, "No Audio Stream");
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Device Selection
            ui.horizontal(|ui| {
                ui.label("Audio Device:");
                egui::ComboBox::from_id_salt("device_selector")
                    .selected_text(
                        self.devices
                            .get(self.pending_device_idx)
                            .map(|name| name.as_str())
                            .unwrap_or("No devices"),
                    )
                    .show_ui(ui, |ui| {
                        for (idx, name) in self.devices.iter().enumerate() {
                            ui.selectable_value(&mut self.pending_device_idx, idx, name);
                        }
                    });

                if !self.audio_ready() && ui.button("Start Audio").clicked() {
                    info!("Starting audio");
                    self.start_audio();
                }
            });

            if let Some(message) = &self.audio_error {
                ui.add_space(4.0);
                ui.colored_label(egui::Color32::RED, message.as_str());
            }
            ui.add_space(4.0);
        });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_space(4.0);
                let apply_enabled = !self.disable_apply_button();

                if apply_enabled {
                    if ui.button("Apply Settings").clicked() {
                        self.apply_settings();
                    }
                } else {
                    ui.add_enabled(false, egui::Button::new("Apply Settings"));
                }

                if ui.button("↺ Reset to Default").clicked() {
                    self.reset_to_default();
                }

                ui.separator();

                ui.add_enabled_ui(!self.visuals_window_open, |ui| {
                    if ui.button("Open Visualizer").clicked() {
                        self.visuals_window_open = true;
                        info!("Visualizer window opened");
                    }
                });

                if self.visuals_window_open {
                    ui.colored_label(egui::Color32::GREEN, "● Visuals Active");
                }
            });
            ui.add_space(8.0);
        });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        let reading = self.current_reading();
        let detector_output = *self.detector_output.lock().unwrap();
        let spectrum = self.analyzer.lock().unwrap().energy_spectrum();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(8.0);

                    render_live_monitoring(ui, &reading, &detector_output);
                    render_spectrum(ui, &spectrum);

                    ui.add_space(20.0);

                    render_config_panel(ui, &mut self.pending_config);
                });
        });
    }

    fn render_visualizer_window(&mut self, ctx: &egui::Context) {
        if !self.visuals_window_open {
            return;
        }

        let visualizer_id = egui::ViewportId::from_hash_of("glowstrips_visualizer");
        let canvas_mode = self.active_config.lock().unwrap().visual.canvas_mode;
        let audio_ready = self.audio_ready();

        ctx.show_viewport_immediate(
            visualizer_id,
            visualizer_viewport(canvas_mode),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested()) {
                    info!("Visualizer window closed");
                    self.visuals_window_open = false;
                }
                self.visuals_window.render(ctx, audio_ready);
            },
        );
    }
}

/// Viewport for the visualizer. Only the responsive canvas can be resized.
fn visualizer_viewport(canvas_mode: CanvasMode) -> egui::ViewportBuilder {
    let inner_size = match canvas_mode {
        CanvasMode::Fixed { width, height } => [width, height],
        CanvasMode::Responsive => [800.0, 600.0],
    };
    egui::ViewportBuilder::default()
        .with_title("Glowstrips")
        .with_inner_size(inner_size)
        .with_resizable(matches!(canvas_mode, CanvasMode::Responsive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualConfig;

    #[test]
    fn fixed_canvas_window_is_not_resizable() {
        let viewport = visualizer_viewport(VisualConfig::fixed_canvas().canvas_mode);
        assert_eq!(viewport.resizable, Some(false));
        assert_eq!(viewport.inner_size, Some(egui::vec2(800.0, 1000.0)));
    }

    #[test]
    fn responsive_canvas_window_resizes() {
        let viewport = visualizer_viewport(CanvasMode::Responsive);
        assert_eq!(viewport.resizable, Some(true));
    }
}
