//! Output frequency axes shared by both calculators.

use twod_core::{FrequencyAxis, TimeAxis};

/// omega_1 and omega_3 axes conjugate to `t1` and `t3`, offset by the
/// rotating-wave frequency.
pub fn output_axes(t1: &TimeAxis, t3: &TimeAxis, rwa: f64) -> (FrequencyAxis, FrequencyAxis) {
    (
        t1.frequency_axis().shifted(rwa),
        t3.frequency_axis().shifted(rwa),
    )
}
