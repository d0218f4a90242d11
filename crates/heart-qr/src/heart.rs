//! Heart silhouette membership.
//!
//! Uses the implicit heart curve `f(x, y) = (x² + y² − 1)³ − x²y³`, which is
//! negative inside the heart and positive outside. Only additions and
//! multiplications are involved, so every real input is valid.

/// Shape and position knobs for the heart silhouette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartParams {
    /// Horizontal scale of the silhouette.
    pub sx: f64,
    /// Vertical scale; `sy > sx` stretches the lower point.
    pub sy: f64,
    /// Vertical shift so the point sits below the geometric center.
    pub y_shift: f64,
    /// Acceptance threshold on `f`. 0 is the exact curve; larger keeps more.
    pub expand_threshold: f64,
}

impl Default for HeartParams {
    fn default() -> Self {
        Self {
            sx: 0.95,
            sy: 1.12,
            y_shift: 0.10,
            expand_threshold: 0.06,
        }
    }
}

impl HeartParams {
    /// Builder: set horizontal and vertical scale.
    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.sx = sx;
        self.sy = sy;
        self
    }

    /// Builder: set vertical shift.
    pub fn with_y_shift(mut self, y_shift: f64) -> Self {
        self.y_shift = y_shift;
        self
    }

    /// Builder: set the acceptance threshold.
    pub fn with_expand_threshold(mut self, threshold: f64) -> Self {
        self.expand_threshold = threshold;
        self
    }

    /// Whether the normalized point `(nx, ny)` lies inside the silhouette.
    ///
    /// `ny` grows upward.
    pub fn contains(&self, nx: f64, ny: f64) -> bool {
        let x = nx / self.sx;
        let y = (ny + self.y_shift) / self.sy;
        heart_value(x, y) <= self.expand_threshold
    }
}

/// Evaluate the implicit heart curve.
pub fn heart_value(x: f64, y: f64) -> f64 {
    let a = x * x + y * y - 1.0;
    a * a * a - x * x * y * y * y
}

/// Map grid position `(row, col)` of an `n`-module symbol to normalized
/// heart coordinates.
///
/// The grid is re-centered on `(n - 1) / 2`, scaled to roughly `[-1, 1]` and
/// multiplied by `shrink`. Smaller `shrink` pulls points toward the center,
/// which makes the heart cover more of the symbol. Rows grow downward, so
/// `ny` is negated.
pub fn normalize(row: usize, col: usize, n: usize, shrink: f64) -> (f64, f64) {
    let center = (n as f64 - 1.0) / 2.0;
    if center <= 0.0 {
        return (0.0, 0.0);
    }
    let nx = (col as f64 - center) / center * shrink;
    let ny = -(row as f64 - center) / center * shrink;
    (nx, ny)
}
