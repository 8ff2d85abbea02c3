use eframe::egui;

use crate::config::{AudioConfig, CanvasMode, Config, VisualConfig};

const FFT_SIZES: [usize; 5] = [256, 512, 1024, 2048, 4096];

pub fn render_config_panel(ui: &mut egui::Ui, config: &mut Config) {
    ui.label(egui::RichText::new("Configuration").size(16.0));
    ui.add_space(8.0);

    render_motion(ui, &mut config.visual);
    ui.add_space(8.0);

    render_glow(ui, &mut config.visual);
    ui.add_space(8.0);

    render_canvas(ui, &mut config.visual);
    ui.add_space(8.0);

    render_audio_analysis(ui, &mut config.audio);

    ui.add_space(20.0);
}

fn render_motion(ui: &mut egui::Ui, config: &mut VisualConfig) {
    egui::CollapsingHeader::new("Strip Motion")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("motion_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Base Speed:")
                        .on_hover_text("Idle scroll speed in pixels per frame");
                    ui.add(egui::Slider::new(&mut config.base_speed, 0.01..=5.0));
                    ui.end_row();

                    ui.label("Max Speed:")
                        .on_hover_text("Ceiling for audio-driven scrolling");
                    ui.add(egui::Slider::new(&mut config.max_speed, 1.0..=200.0));
                    ui.end_row();

                    ui.label("Speed Smoothing:")
                        .on_hover_text("Higher = snappier response to audio");
                    ui.add(egui::Slider::new(&mut config.speed_smoothing, 0.01..=1.0));
                    ui.end_row();

                    ui.label("Sound Threshold:")
                        .on_hover_text("Quieter input than this is ignored");
                    ui.add(egui::Slider::new(&mut config.sound_threshold, 0.0..=0.2));
                    ui.end_row();

                    ui.label("Audio Reactivity:")
                        .on_hover_text("Higher = stronger reaction to sound");
                    ui.add(egui::Slider::new(&mut config.audio_multiplier, 0.5..=10.0));
                    ui.end_row();
                });
        });
}

fn render_glow(ui: &mut egui::Ui, config: &mut VisualConfig) {
    egui::CollapsingHeader::new("Glow")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("glow_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Glow Opacity:")
                        .on_hover_text("Alpha per unit of glow, out of 255");
                    ui.add(egui::Slider::new(&mut config.glow_opacity, 0.0..=255.0));
                    ui.end_row();

                    ui.label("Glow Smoothing:");
                    ui.add(egui::Slider::new(&mut config.glow_smoothing, 0.01..=1.0));
                    ui.end_row();

                    ui.label("Pulse Rate:")
                        .on_hover_text("Ambient glow oscillation per frame");
                    ui.add(egui::Slider::new(&mut config.glow_time_step, 0.0..=0.2));
                    ui.end_row();

                    ui.label("Blur Radius:");
                    ui.add(egui::Slider::new(&mut config.blur_radius, 0.0..=40.0).suffix(" px"));
                    ui.end_row();
                });
        });
}

fn render_canvas(ui: &mut egui::Ui, config: &mut VisualConfig) {
    egui::CollapsingHeader::new("Canvas")
        .default_open(false)
        .show(ui, |ui| {
            ui.add_space(4.0);

            let mut fixed = matches!(config.canvas_mode, CanvasMode::Fixed { .. });
            if ui
                .checkbox(&mut fixed, "Fixed 800 × 1000 canvas")
                .on_hover_text("Otherwise the canvas follows the visualizer window")
                .changed()
            {
                config.canvas_mode = if fixed {
                    VisualConfig::fixed_canvas().canvas_mode
                } else {
                    CanvasMode::Responsive
                };
            }
            ui.add_space(4.0);

            egui::Grid::new("canvas_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Strips:");
                    ui.add(egui::Slider::new(&mut config.default_strips, 1..=31));
                    ui.end_row();

                    if let Some(breakpoint) = config.breakpoints.first_mut() {
                        ui.label("Narrow Below:")
                            .on_hover_text("Canvases narrower than this use fewer strips");
                        ui.add(
                            egui::Slider::new(&mut breakpoint.below_width, 200.0..=2000.0)
                                .suffix(" px"),
                        );
                        ui.end_row();

                        ui.label("Narrow Strips:");
                        ui.add(egui::Slider::new(&mut breakpoint.strips, 1..=31));
                        ui.end_row();
                    }

                    ui.label("Gradient Steps:");
                    ui.add(egui::Slider::new(&mut config.gradient_steps, 10..=400));
                    ui.end_row();

                    ui.label("Resize Delay:");
                    ui.add(
                        egui::Slider::new(&mut config.resize_debounce_ms, 0..=1000).suffix(" ms"),
                    );
                    ui.end_row();
                });
        });
}

fn render_audio_analysis(ui: &mut egui::Ui, config: &mut AudioConfig) {
    egui::CollapsingHeader::new("Audio Analysis")
        .default_open(false)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("audio_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Energy FFT Size:");
                    fft_size_selector(ui, "energy_fft_size", &mut config.energy_fft_size);
                    ui.end_row();

                    ui.label("Energy Smoothing:");
                    ui.add(egui::Slider::new(&mut config.energy_smoothing, 0.0..=0.99));
                    ui.end_row();

                    ui.label("Detector FFT Size:");
                    fft_size_selector(ui, "detector_fft_size", &mut config.detector_fft_size);
                    ui.end_row();

                    ui.label("Detector Smoothing:");
                    ui.add(egui::Slider::new(&mut config.detector_smoothing, 0.0..=0.99));
                    ui.end_row();

                    ui.label("Floor:")
                        .on_hover_text("Level mapped to zero energy");
                    ui.add(
                        egui::Slider::new(&mut config.min_decibels, -140.0..=-40.0).suffix(" dB"),
                    );
                    ui.end_row();

                    ui.label("Ceiling:")
                        .on_hover_text("Level mapped to full energy");
                    ui.add(egui::Slider::new(&mut config.max_decibels, -39.0..=0.0).suffix(" dB"));
                    ui.end_row();

                    ui.label("Detector Interval:")
                        .on_hover_text("How often the frequency detector runs");
                    ui.add(
                        egui::Slider::new(&mut config.detector_interval_ms, 5..=200).suffix(" ms"),
                    );
                    ui.end_row();
                });
        });
}

fn fft_size_selector(ui: &mut egui::Ui, id: &str, value: &mut usize) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.to_string())
        .show_ui(ui, |ui| {
            for size in FFT_SIZES {
                ui.selectable_value(value, size, size.to_string());
            }
        });
}
