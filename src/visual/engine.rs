use crate::audio::{AudioAnalyzer, EnergyReading};
use crate::config::{Config, VisualConfig};
use crate::visual::canvas::{CanvasSize, ResizeDebouncer};
use crate::visual::glow::GlowLayer;
use crate::visual::scene::StripScene;
use eframe::egui;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Horizontal spacing of glow mesh vertices, in pixels.
const GLOW_COLUMN_STEP: usize = 2;
/// Vertical spacing of glow mesh vertices inside the edge falloff, in pixels.
const GLOW_ROW_STEP: usize = 4;

/// Draws the strip visualizer into a viewport, one scene frame per repaint.
pub struct VisualEngine {
    analyzer: Arc<Mutex<AudioAnalyzer>>,
    config: Arc<Mutex<Config>>,
    scene: Option<StripScene>,
    debouncer: ResizeDebouncer,
    pattern_texture: Option<egui::TextureHandle>,
    texture_generation: Option<u64>,
    last_reading: EnergyReading,
}

impl VisualEngine {
    pub fn new(analyzer: Arc<Mutex<AudioAnalyzer>>, config: Arc<Mutex<Config>>) -> Self {
        let delay = config.lock().unwrap().visual.resize_debounce_ms;
        Self {
            analyzer,
            config,
            scene: None,
            debouncer: ResizeDebouncer::new(Duration::from_millis(delay)),
            pattern_texture: None,
            texture_generation: None,
            last_reading: EnergyReading::default(),
        }
    }

    /// Reading used for the most recent frame.
    pub fn last_reading(&self) -> EnergyReading {
        self.last_reading
    }

    /// Renders one frame. With `audio_ready` false the strips run on silence.
    pub fn render(&mut self, ctx: &egui::Context, audio_ready: bool) {
        let visual_config = self.config.lock().unwrap().visual.clone();

        egui::CentralPanel::default()
            .frame(
                egui::Frame::default()
                    .fill(egui::Color32::BLACK)
                    .inner_margin(0.0),
            )
            .show(ctx, |ui| {
                let available = ui.max_rect();
                if available.width() < 1.0 || available.height() < 1.0 {
                    return;
                }

                let seen = CanvasSize::resolve(
                    visual_config.canvas_mode,
                    available.width(),
                    available.height(),
                );
                self.sync_scene(seen, visual_config);

                self.last_reading = if audio_ready {
                    self.analyzer.lock().unwrap().sample_energy()
                } else {
                    EnergyReading::default()
                };

                let Some(scene) = self.scene.as_mut() else {
                    return;
                };
                scene.advance(&self.last_reading);

                if self.texture_generation != Some(scene.generation()) {
                    upload_pattern(ui.ctx(), scene, &mut self.pattern_texture);
                    self.texture_generation = Some(scene.generation());
                }

                let canvas = scene.canvas();
                let rect = egui::Rect::from_min_size(
                    available.min,
                    egui::vec2(canvas.width, canvas.height),
                );
                let painter = ui.painter_at(rect);

                if let Some(texture) = &self.pattern_texture {
                    paint_strips(&painter, rect, scene, texture.id());
                }
                paint_glow(&painter, rect, &scene.glow().composite());
            });

        ctx.request_repaint();
    }

    fn sync_scene(&mut self, seen: CanvasSize, config: VisualConfig) {
        self.debouncer
            .set_delay(Duration::from_millis(config.resize_debounce_ms));

        match self.scene.as_mut() {
            Some(scene) => {
                scene.reconfigure(config);
                if let Some(size) = self.debouncer.observe(scene.canvas(), seen, Instant::now()) {
                    scene.rebuild(size);
                }
            }
            None => {
                debug!("Building scene for {}x{}", seen.width, seen.height);
                self.scene = Some(StripScene::new(config, seen));
            }
        }
    }
}

fn upload_pattern(
    ctx: &egui::Context,
    scene: &StripScene,
    texture: &mut Option<egui::TextureHandle>,
) {
    let pattern = scene.pattern();
    let image = egui::ColorImage::from_rgba_unmultiplied(
        [pattern.width(), pattern.height()],
        &pattern.to_rgba(),
    );
    debug!(
        "Uploading strip pattern {}x{} (generation {})",
        pattern.width(),
        pattern.height(),
        scene.generation()
    );

    match texture {
        Some(handle) => handle.set(image, egui::TextureOptions::LINEAR),
        None => {
            *texture = Some(ctx.load_texture(
                "strip_pattern",
                image,
                egui::TextureOptions::LINEAR,
            ))
        }
    }
}

/// Tiles the pattern down every strip, starting one cycle above the canvas.
fn paint_strips(
    painter: &egui::Painter,
    rect: egui::Rect,
    scene: &StripScene,
    texture: egui::TextureId,
) {
    let canvas = scene.canvas();
    let cycle_height = canvas.cycle_height();
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

    for strip in scene.strips() {
        for y in strip.tile_positions(cycle_height, canvas.height) {
            let tile = egui::Rect::from_min_size(
                egui::pos2(rect.left() + strip.x, rect.top() + y),
                egui::vec2(strip.width, cycle_height),
            );
            painter.image(texture, tile, uv, egui::Color32::WHITE);
        }
    }
}

/// Draws the blurred glow as a white mesh whose vertex alpha follows the layer.
fn paint_glow(painter: &egui::Painter, rect: egui::Rect, layer: &GlowLayer) {
    let width = layer.columns.len();
    if width == 0 {
        return;
    }

    let mut xs: Vec<usize> = (0..width).step_by(GLOW_COLUMN_STEP).collect();
    if xs.last() != Some(&(width - 1)) {
        xs.push(width - 1);
    }
    let ys = layer.row_samples(GLOW_ROW_STEP);
    if xs.len() < 2 || ys.len() < 2 {
        return;
    }

    let mut mesh = egui::Mesh::default();
    for &y in &ys {
        for &x in &xs {
            let alpha = (layer.alpha_at(x, y) * 255.0).round().clamp(0.0, 255.0) as u8;
            mesh.colored_vertex(
                egui::pos2(rect.left() + x as f32, rect.top() + y as f32),
                egui::Color32::from_white_alpha(alpha),
            );
        }
    }

    let stride = xs.len() as u32;
    for row in 0..ys.len() as u32 - 1 {
        for col in 0..stride - 1 {
            let a = row * stride + col;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            mesh.add_triangle(a, b, c);
            mesh.add_triangle(b, d, c);
        }
    }

    painter.add(egui::Shape::mesh(mesh));
}
