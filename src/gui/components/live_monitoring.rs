use crate::audio::EnergyReading;
use crate::detector::DetectorOutput;
use eframe::egui;

pub fn render_live_monitoring(
    ui: &mut egui::Ui,
    reading: &EnergyReading,
    detector_output: &DetectorOutput,
) {
    ui.label(egui::RichText::new("Live Monitoring").size(16.0));
    ui.add_space(8.0);

    render_energy(ui, reading);
    ui.add_space(8.0);

    render_frequency_detector(ui, detector_output);
    ui.add_space(12.0);
}

fn render_energy(ui: &mut egui::Ui, reading: &EnergyReading) {
    ui.group(|ui| {
        ui.colored_label(egui::Color32::LIGHT_BLUE, "Band Energy:");
        egui::Grid::new("energy_grid")
            .num_columns(2)
            .spacing([20.0, 4.0])
            .show(ui, |ui| {
                for (name, value) in [
                    ("Low", reading.low),
                    ("Mid", reading.mid),
                    ("High", reading.high),
                ] {
                    ui.label(name);
                    ui.add(
                        egui::ProgressBar::new(value.clamp(0.0, 1.0))
                            .desired_width(200.0)
                            .text(format!("{:.1}%", value * 100.0)),
                    );
                    ui.end_row();
                }
            });

        ui.horizontal(|ui| {
            ui.label("Amplitude:");
            ui.strong(format!("{:.4}", reading.amplitude));
        });
    });
}

fn render_frequency_detector(ui: &mut egui::Ui, output: &DetectorOutput) {
    ui.group(|ui| {
        ui.colored_label(egui::Color32::LIGHT_GREEN, "Frequency Detector:");
        match (output.frequency_hz, output.band) {
            (Some(hz), Some(band)) => {
                ui.horizontal(|ui| {
                    ui.label("Detected Frequency:");
                    ui.strong(format!("{hz} Hz"));
                });
                ui.colored_label(
                    egui::Color32::from_rgb(100, 160, 255),
                    egui::RichText::new(band.label()).strong(),
                );
            }
            _ => {
                ui.colored_label(egui::Color32::GRAY, "Listening...");
            }
        }
    });
}
