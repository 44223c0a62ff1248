//! Laboratory settings: laser polarisations and isotropic averaging.

use nalgebra::{Matrix3, Vector3};

/// Polarisations of the three excitation pulses and the detected field.
#[derive(Debug, Clone, PartialEq)]
pub struct LabSettings {
    polarizations: [Vector3<f64>; 4],
}

impl Default for LabSettings {
    fn default() -> Self {
        Self::four_wave_mixing()
    }
}

fn pair_products(v: [&Vector3<f64>; 4]) -> Vector3<f64> {
    Vector3::new(
        v[3].dot(v[2]) * v[1].dot(v[0]),
        v[3].dot(v[1]) * v[2].dot(v[0]),
        v[3].dot(v[0]) * v[2].dot(v[1]),
    )
}

impl LabSettings {
    /// Four-wave-mixing geometry with all fields polarised along x.
    pub fn four_wave_mixing() -> Self {
        let x = Vector3::x();
        Self::new([x, x, x, x])
    }

    /// Explicit polarisations `[e1, e2, e3, e4]`.
    pub fn new(polarizations: [Vector3<f64>; 4]) -> Self {
        Self { polarizations }
    }

    /// Polarisation vectors.
    pub fn polarizations(&self) -> &[Vector3<f64>; 4] {
        &self.polarizations
    }

    /// Rotational average of `(e4.d4)(e3.d3)(e2.d2)(e1.d1)` over isotropic
    /// orientations of the dipoles `[d1, d2, d3, d4]`.
    pub fn orientational_average(&self, dipoles: [&Vector3<f64>; 4]) -> f64 {
        let m = Matrix3::new(4.0, -1.0, -1.0, -1.0, 4.0, -1.0, -1.0, -1.0, 4.0) / 30.0;
        let p = &self.polarizations;
        let fe = pair_products([&p[0], &p[1], &p[2], &p[3]]);
        let fd = pair_products(dipoles);
        fe.dot(&(m * fd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_dipoles_average_to_one_fifth() {
        let lab = LabSettings::default();
        let d = Vector3::new(0.0, 0.0, 1.0);
        let avg = lab.orientational_average([&d, &d, &d, &d]);
        assert!((avg - 0.2).abs() < 1e-12);
    }

    #[test]
    fn perpendicular_pairs_average_to_one_fifteenth() {
        let lab = LabSettings::default();
        let a = Vector3::x();
        let b = Vector3::y();
        let avg = lab.orientational_average([&a, &a, &b, &b]);
        assert!((avg - 1.0 / 15.0).abs() < 1e-12);
    }
}
