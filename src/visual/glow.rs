//! Off-screen glow accumulation and blur.
//!
//! Every glow write spans the full canvas height, so the buffer keeps one
//! alpha value per pixel column. The gaussian blur is separable: columns are
//! blurred horizontally each frame, and the vertical pass over a full-height
//! band reduces to a fixed falloff profile near the top and bottom edges.

/// Normalized gaussian taps for standard deviation `sigma`, radius `ceil(3σ)`.
pub fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let radius = (sigma * 3.0).ceil() as i32;
    let mut taps: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.iter_mut().for_each(|t| *t /= sum);
    taps
}

/// Convolves `signal` with the centred `kernel`. Outside the signal is transparent.
pub fn blur(signal: &[f32], kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as isize;
    let len = signal.len() as isize;

    (0..len)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(k, w)| {
                    let j = i + k as isize - radius;
                    (0..len).contains(&j).then(|| signal[j as usize] * w)
                })
                .sum()
        })
        .collect()
}

pub struct GlowBuffer {
    columns: Vec<f32>,
    kernel: Vec<f32>,
    rows: Vec<f32>,
}

impl GlowBuffer {
    pub fn new(width: f32, height: f32, blur_radius: f32) -> Self {
        let width = width.round().max(1.0) as usize;
        let height = height.round().max(1.0) as usize;
        let kernel = gaussian_kernel(blur_radius);
        let rows = blur(&vec![1.0; height], &kernel);

        Self {
            columns: vec![0.0; width],
            kernel,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.columns.fill(0.0);
    }

    /// Paints a full-height band from `x0` to `x1` with `alpha` (0-1),
    /// source-over. Partially covered columns get proportional alpha.
    pub fn fill_band(&mut self, x0: f32, x1: f32, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        let first = x0.floor().max(0.0) as usize;
        let last = (x1.ceil().max(0.0) as usize).min(self.columns.len());

        for (c, dst) in self.columns.iter_mut().enumerate().take(last).skip(first) {
            let left = c as f32;
            let coverage = (x1.min(left + 1.0) - x0.max(left)).clamp(0.0, 1.0);
            let a = alpha * coverage;
            *dst = a + *dst * (1.0 - a);
        }
    }

    /// Unblurred alpha per column.
    pub fn columns(&self) -> &[f32] {
        &self.columns
    }

    /// Blurs the accumulated glow.
    pub fn composite(&self) -> GlowLayer {
        GlowLayer {
            columns: blur(&self.columns, &self.kernel),
            rows: self.rows.clone(),
            reach: self.kernel.len() / 2 + 1,
        }
    }
}

/// Blurred glow, ready to be drawn over the canvas.
pub struct GlowLayer {
    pub columns: Vec<f32>,
    pub rows: Vec<f32>,
    reach: usize,
}

impl GlowLayer {
    pub fn alpha_at(&self, x: usize, y: usize) -> f32 {
        match (self.columns.get(x), self.rows.get(y)) {
            (Some(c), Some(r)) => c * r,
            _ => 0.0,
        }
    }

    /// Row indices worth a mesh vertex: dense within blur reach of the top and
    /// bottom edges, where the vertical falloff happens, and nothing between.
    pub fn row_samples(&self, step: usize) -> Vec<usize> {
        let height = self.rows.len();
        let step = step.max(1);
        let last = height.saturating_sub(1);

        let mut samples: Vec<usize> = (0..self.reach.min(height)).step_by(step).collect();
        samples.extend((height.saturating_sub(self.reach)..height).step_by(step));
        samples.push(last);
        samples.sort_unstable();
        samples.dedup();
        samples
    }
}
