//! The repeating colour ramp every strip scrolls through.

pub type Rgb = [f32; 3];

const BLACK: Rgb = [0.0, 0.0, 0.0];
const ORANGE: Rgb = [255.0, 60.0, 0.0];
const AMBER: Rgb = [255.0, 180.0, 0.0];
const WHITE: Rgb = [255.0, 255.0, 255.0];
const PINK: Rgb = [255.0, 170.0, 220.0];
const BLUE: Rgb = [30.0, 120.0, 255.0];

/// Segment start positions and colours. The last stop closes the ramp at 1.0.
const STOPS: [(f32, Rgb); 7] = [
    (0.0, BLACK),
    (0.2, ORANGE),
    (0.35, AMBER),
    (0.5, WHITE),
    (0.65, PINK),
    (0.8, BLUE),
    (1.0, BLACK),
];

/// Pixel width of the generated pattern. The ramp is horizontally uniform,
/// strips stretch it to their own width.
pub const PATTERN_WIDTH: usize = 4;

/// Colour of the ramp at `pos` in `[0, 1)`. Values outside are wrapped.
pub fn ramp_color(pos: f32) -> Rgb {
    let pos = pos.rem_euclid(1.0);

    let segment = STOPS
        .windows(2)
        .find(|pair| pos < pair[1].0)
        .unwrap_or(&STOPS[STOPS.len() - 2..]);
    let (start, from) = segment[0];
    let (end, to) = segment[1];

    let t = (pos - start) / (end - start);
    std::array::from_fn(|c| from[c] + (to[c] - from[c]) * t)
}

/// One vertical period of the strip motif: the ramp drawn twice, stacked.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientPattern {
    rows: Vec<[u8; 3]>,
}

impl GradientPattern {
    /// Rasterizes the pattern for a canvas `canvas_height` pixels tall, using
    /// `steps` solid bands per ramp.
    pub fn generate(canvas_height: f32, steps: usize) -> Self {
        let height = canvas_height.round().max(1.0) as usize;
        let steps = steps.max(1);
        let cycle_height = height as f32 / 2.0;
        let step_height = cycle_height / steps as f32;

        let mut rows = vec![[0u8; 3]; height];
        for i in 0..steps {
            let pos = i as f32 / steps as f32;
            let color = ramp_color(pos).map(|v| v.round().clamp(0.0, 255.0) as u8);

            // Bands overlap their successor by one pixel so no seam shows.
            let top = i as f32 * step_height;
            for y in [top, top + cycle_height] {
                fill_rows(&mut rows, y, y + step_height + 1.0, color);
            }
        }

        Self { rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        PATTERN_WIDTH
    }

    pub fn rows(&self) -> &[[u8; 3]] {
        &self.rows
    }

    /// Opaque RGBA bytes, row-major, `width() * height()` pixels.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.rows.len() * PATTERN_WIDTH * 4);
        for [r, g, b] in &self.rows {
            for _ in 0..PATTERN_WIDTH {
                rgba.extend_from_slice(&[*r, *g, *b, 255]);
            }
        }
        rgba
    }
}

fn fill_rows(rows: &mut [[u8; 3]], top: f32, bottom: f32, color: [u8; 3]) {
    let first = top.floor().max(0.0) as usize;
    let last = (bottom.ceil().max(0.0) as usize).min(rows.len());
    if first < last {
        rows[first..last].fill(color);
    }
}
