//! Complex 2D sample grids backing every spectrum array.

use ndarray::Array2;
use num_complex::Complex64;

use crate::errors::{ErrorInfo, TwodError};

/// Complex 2D array indexed `[i1, i3]` (omega_1 first).
pub type ComplexGrid = Array2<Complex64>;

/// Zero-filled grid of the given shape, or the 1x1 placeholder when no
/// shape is known yet.
pub fn zeros(shape: Option<(usize, usize)>) -> ComplexGrid {
    match shape {
        Some(shape) => Array2::zeros(shape),
        None => placeholder(),
    }
}

/// Degenerate 1x1 zero grid returned for reads of uninitialized storage.
pub fn placeholder() -> ComplexGrid {
    Array2::zeros((1, 1))
}

/// Returns the `(rows, cols)` shape of a grid.
pub fn shape_of(grid: &ComplexGrid) -> (usize, usize) {
    grid.dim()
}

/// Fails with `TypeMismatch` when `grid` does not have the expected shape.
pub fn ensure_shape(grid: &ComplexGrid, expected: (usize, usize)) -> Result<(), TwodError> {
    let actual = grid.dim();
    if actual != expected {
        return Err(TwodError::TypeMismatch(
            ErrorInfo::new("shape-mismatch", "array shape disagrees with the spectrum axes")
                .with_context("expected", format!("{}x{}", expected.0, expected.1))
                .with_context("actual", format!("{}x{}", actual.0, actual.1)),
        ));
    }
    Ok(())
}

/// Adds `src` into `dst` elementwise after checking shapes.
pub fn accumulate(dst: &mut ComplexGrid, src: &ComplexGrid) -> Result<(), TwodError> {
    ensure_shape(src, dst.dim())?;
    *dst += src;
    Ok(())
}
