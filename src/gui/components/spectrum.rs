use eframe::egui;

/// Bar plot of a byte spectrum, low frequencies on the left.
pub fn render_spectrum(ui: &mut egui::Ui, bins: &[u8]) {
    ui.group(|ui| {
        ui.label("Spectrum");

        let desired_height = 120.0;
        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), desired_height),
            egui::Sense::hover(),
        );

        let rect = response.rect;
        painter.rect_filled(rect, 0.0, egui::Color32::from_gray(20));

        if bins.is_empty() {
            return;
        }

        // Group bins so each bar is at least two pixels wide.
        let bars = ((rect.width() / 2.0) as usize).clamp(1, bins.len());
        let per_bar = bins.len().div_ceil(bars);
        let bar_width = rect.width() / bins.len().div_ceil(per_bar) as f32;

        for (i, group) in bins.chunks(per_bar).enumerate() {
            let peak = group.iter().copied().max().unwrap_or(0);
            if peak == 0 {
                continue;
            }

            let height = peak as f32 / 255.0 * rect.height();
            let x = rect.left() + i as f32 * bar_width;
            let bar = egui::Rect::from_min_max(
                egui::pos2(x, rect.bottom() - height),
                egui::pos2(x + bar_width * 0.8, rect.bottom()),
            );
            painter.rect_filled(bar, 0.0, egui::Color32::from_rgb(255, 120, 40));
        }
    });
}
