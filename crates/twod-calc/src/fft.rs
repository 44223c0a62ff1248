//! Fourier assembly of time-domain responses into 2D spectra.
//!
//! Responses are indexed `[i1, i3]` (t1 rows, t3 columns). Rephasing data
//! are forward transformed along t3, non-rephasing data inverse transformed;
//! both are inverse transformed along t1 with `1/N1` normalisation and
//! shifted so zero frequency sits at index `N/2`.

use ndarray::Axis;
use rustfft::{FftDirection, FftPlanner};
use twod_core::grid::ComplexGrid;
use twod_core::Complex64;

fn transform_lanes(grid: &mut ComplexGrid, axis: Axis, direction: FftDirection, scale: f64) {
    let len = grid.len_of(axis);
    if len == 0 {
        return;
    }
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft(len, direction);
    let mut buf = vec![Complex64::new(0.0, 0.0); len];
    for mut lane in grid.lanes_mut(axis) {
        for (dst, src) in buf.iter_mut().zip(lane.iter()) {
            *dst = *src;
        }
        fft.process(&mut buf);
        for (dst, src) in lane.iter_mut().zip(&buf) {
            *dst = *src * scale;
        }
    }
}

/// Moves the zero-frequency sample of both axes to index `N/2`.
pub fn fftshift(grid: &ComplexGrid) -> ComplexGrid {
    let (rows, cols) = grid.dim();
    let mut out = ComplexGrid::zeros((rows, cols));
    for ((i, j), value) in grid.indexed_iter() {
        out[[(i + rows / 2) % rows, (j + cols / 2) % cols]] = *value;
    }
    out
}

/// Spectrum of a (conjugated) rephasing response.
pub fn assemble_rephasing(resp: &ComplexGrid) -> ComplexGrid {
    let mut data = resp.clone();
    let n1 = data.nrows().max(1) as f64;
    // t3 varies along the columns, so its lanes run along Axis(1)
    transform_lanes(&mut data, Axis(1), FftDirection::Forward, 1.0);
    transform_lanes(&mut data, Axis(0), FftDirection::Inverse, 1.0 / n1);
    fftshift(&data)
}

/// Spectrum of a non-rephasing response. The t3 inverse transform is left
/// unnormalised.
pub fn assemble_non_rephasing(resp: &ComplexGrid) -> ComplexGrid {
    let mut data = resp.clone();
    let n1 = data.nrows().max(1) as f64;
    transform_lanes(&mut data, Axis(1), FftDirection::Inverse, 1.0);
    transform_lanes(&mut data, Axis(0), FftDirection::Inverse, 1.0 / n1);
    fftshift(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_moves_origin_to_centre() {
        let mut grid = ComplexGrid::zeros((4, 5));
        grid[[0, 0]] = Complex64::new(1.0, 0.0);
        let shifted = fftshift(&grid);
        assert_eq!(shifted[[2, 2]], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn constant_response_peaks_at_zero_frequency() {
        let resp = ComplexGrid::from_elem((8, 8), Complex64::new(1.0, 0.0));
        for spectrum in [assemble_rephasing(&resp), assemble_non_rephasing(&resp)] {
            assert!((spectrum[[4, 4]].re - 8.0).abs() < 1e-9);
            assert!(spectrum[[0, 0]].norm() < 1e-9);
        }
    }
}
