use crate::config::CanvasMode;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    /// Never smaller than one pixel in either direction.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Canvas size for `mode` given the space the viewport offers.
    pub fn resolve(mode: CanvasMode, available_width: f32, available_height: f32) -> Self {
        match mode {
            CanvasMode::Responsive => Self::new(available_width, available_height),
            CanvasMode::Fixed { width, height } => Self::new(width, height),
        }
    }

    /// One vertical period of the scrolling pattern.
    pub fn cycle_height(&self) -> f32 {
        self.height / 2.0
    }

    /// Sizes that differ by less than half a pixel draw the same.
    pub fn same_pixels(&self, other: &CanvasSize) -> bool {
        (self.width - other.width).abs() < 0.5 && (self.height - other.height).abs() < 0.5
    }
}

/// Coalesces bursts of size changes into one, once the size has been stable
/// for `delay`.
pub struct ResizeDebouncer {
    delay: Duration,
    pending: Option<(CanvasSize, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records the size seen at `now` against the size currently in use.
    /// Returns the size to rebuild for once it has settled.
    pub fn observe(
        &mut self,
        current: CanvasSize,
        seen: CanvasSize,
        now: Instant,
    ) -> Option<CanvasSize> {
        if seen.same_pixels(&current) {
            self.pending = None;
            return None;
        }

        match self.pending {
            Some((size, since)) if size.same_pixels(&seen) => {
                if now.duration_since(since) >= self.delay {
                    self.pending = None;
                    Some(seen)
                } else {
                    None
                }
            }
            _ => {
                self.pending = Some((seen, now));
                None
            }
        }
    }
}
