//! Square dark/light module grid produced by the QR encoder.

/// An immutable N×N grid of QR modules, row-major, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Build a matrix from row-major module data.
    ///
    /// Returns `None` when `modules.len()` is not `size * size` or `size` is 0.
    pub fn from_modules(size: usize, modules: Vec<bool>) -> Option<Self> {
        if size == 0 || modules.len() != size * size {
            return None;
        }
        Some(Self { size, modules })
    }

    /// Build a matrix by evaluating `is_dark(row, col)` for every cell.
    pub fn from_fn(size: usize, mut is_dark: impl FnMut(usize, usize) -> bool) -> Self {
        let mut modules = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                modules.push(is_dark(row, col));
            }
        }
        Self { size, modules }
    }

    /// Module count per side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the module at `(row, col)` is dark. Out-of-range cells are light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        self.modules[row * self.size + col]
    }

    /// Number of dark modules.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Iterate `(row, col, dark)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .map(move |(i, &dark)| (i / self.size, i % self.size, dark))
    }
}
