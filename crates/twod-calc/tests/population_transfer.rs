mod common;

use approx::assert_abs_diff_eq;
use nalgebra::DMatrix;
use twod_calc::{
    BandSystem, ElementaryProcess, LabSettings, PathwayResponseEngine, PopulationPropagator,
    ResponseContext, SecularResponseEngine,
};
use twod_core::{ComplexGrid, TimeAxis};

use common::{cm, dimer, time_axis};

fn downhill(rate: f64) -> DMatrix<f64> {
    DMatrix::from_row_slice(2, 2, &[0.0, rate, 0.0, -rate])
}

#[test]
fn zero_rates_leave_populations_in_place() {
    let prop = PopulationPropagator::new(&DMatrix::zeros(3, 3), &time_axis(4, 10.0), 3).unwrap();
    assert_eq!(prop.len(), 4);
    assert_eq!(prop.order(), 3);
    for tc in 0..4 {
        assert_eq!(prop.uee(tc).unwrap(), &DMatrix::identity(3, 3));
        assert_eq!(prop.transfer(tc).unwrap(), DMatrix::zeros(3, 3));
    }
    assert!(prop.uee(4).is_none());
}

#[test]
fn downhill_transfer_matches_closed_form() {
    let k = 0.01;
    let prop = PopulationPropagator::new(&downhill(k), &time_axis(51, 1.0), 2).unwrap();
    let t = 50.0;
    let survived = (-k * t).exp();

    let uee = prop.uee(50).unwrap();
    assert_abs_diff_eq!(uee[(1, 1)], survived, epsilon = 1e-10);
    assert_abs_diff_eq!(uee[(0, 1)], 1.0 - survived, epsilon = 1e-10);
    // columns conserve population
    assert_abs_diff_eq!(uee[(0, 1)] + uee[(1, 1)], 1.0, epsilon = 1e-10);

    let uc0 = prop.uc0(50).unwrap();
    assert_abs_diff_eq!(uc0[(0, 0)], 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(uc0[(1, 1)], survived, epsilon = 1e-12);
    assert_abs_diff_eq!(uc0[(0, 1)], 0.0, epsilon = 1e-12);

    let first = prop.correction(1, 50).unwrap();
    assert_abs_diff_eq!(first[(0, 1)], 1.0 - survived, epsilon = 1e-4);
    assert!(prop.correction(2, 50).is_none());

    let transfer = prop.transfer(50).unwrap();
    assert_abs_diff_eq!(transfer[(0, 1)], 1.0 - survived, epsilon = 1e-10);
}

#[test]
fn negative_waiting_times_are_rejected() {
    let t2 = TimeAxis::new(-5.0, 4, 1.0).unwrap();
    let err = PopulationPropagator::new(&downhill(0.1), &t2, 1).unwrap_err();
    assert_eq!(err.code(), "negative-waiting-time");
}

#[test]
fn single_state_never_transfers_on_an_offset_axis() {
    let rates = DMatrix::from_element(1, 1, -0.1);
    let t2 = TimeAxis::new(5.0, 3, 10.0).unwrap();
    let prop = PopulationPropagator::new(&rates, &t2, 3).unwrap();
    for (tc, t) in [5.0_f64, 15.0, 25.0].into_iter().enumerate() {
        let decayed = (-0.1 * t).exp();
        assert_abs_diff_eq!(prop.uee(tc).unwrap()[(0, 0)], decayed, epsilon = 1e-12);
        assert_abs_diff_eq!(prop.uc0(tc).unwrap()[(0, 0)], decayed, epsilon = 1e-12);
        assert_abs_diff_eq!(prop.transfer(tc).unwrap()[(0, 0)], 0.0, epsilon = 1e-9);
    }
}

#[test]
fn offset_axis_samples_the_same_times_as_a_dense_one() {
    let k = 0.01;
    let offset = TimeAxis::new(5.0, 3, 10.0).unwrap();
    let dense = time_axis(6, 5.0);
    let sparse = PopulationPropagator::new(&downhill(k), &offset, 2).unwrap();
    let full = PopulationPropagator::new(&downhill(k), &dense, 2).unwrap();
    for (tc, dc) in [(0, 1), (1, 3), (2, 5)] {
        let t = offset.value(tc).unwrap();
        let survived = (-k * t).exp();
        assert_abs_diff_eq!(sparse.uc0(tc).unwrap()[(1, 1)], survived, epsilon = 1e-12);
        assert_abs_diff_eq!(
            sparse.transfer(tc).unwrap(),
            full.transfer(dc).unwrap(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            sparse.correction(1, tc).unwrap()[(0, 1)],
            1.0 - survived,
            epsilon = 1e-3
        );
    }
}

#[test]
fn band_system_sorts_excitons_and_keeps_transfer_block() {
    let agg = dimer(cm(12_000.0), cm(12_400.0), cm(100.0), 0.002);
    let band = BandSystem::from_aggregate(&agg).unwrap();
    assert_eq!(band.block_sizes(), [1, 2, 1]);
    assert!(band.omega_single(0) < band.omega_single(1));
    assert_abs_diff_eq!(band.omega_double(0), cm(24_400.0), epsilon = 1e-9);
    assert_abs_diff_eq!(band.relaxation()[(0, 1)], 0.002, epsilon = 1e-15);
    assert_abs_diff_eq!(band.lifetime_rate(1), 0.002, epsilon = 1e-15);
    // total oscillator strength is basis independent
    let strength = band.dge(0).norm_squared() + band.dge(1).norm_squared();
    assert_abs_diff_eq!(strength, 2.0, epsilon = 1e-10);
}

fn transfer_response(tc: usize) -> ComplexGrid {
    let agg = dimer(cm(12_000.0), cm(12_400.0), cm(100.0), 0.01);
    let band = BandSystem::from_aggregate(&agg).unwrap();
    let t2 = time_axis(3, 50.0);
    let prop = PopulationPropagator::new(band.relaxation(), &t2, 3).unwrap();
    let lab = LabSettings::default();
    let t1s = time_axis(16, 2.0).data();
    let t3s = t1s.clone();
    let transfer = prop.transfer(tc).unwrap();
    let ctx = ResponseContext {
        lab: &lab,
        band: &band,
        it2: tc,
        t2: t2.value(tc).unwrap(),
        t1s: &t1s,
        t3s: &t3s,
        rwa: cm(12_200.0),
        rmin: 1.0e-4,
        coherent: prop.uc0(tc).unwrap(),
        transfer: &transfer,
    };
    let mut out = ComplexGrid::zeros((16, 16));
    SecularResponseEngine
        .accumulate(ElementaryProcess::R1gTrans, &ctx, &mut out)
        .unwrap();
    out
}

#[test]
fn transfer_pathways_switch_on_with_waiting_time() {
    let at_zero = transfer_response(0);
    assert!(at_zero.iter().all(|z| z.norm() < 1e-12));
    let later = transfer_response(2);
    assert!(later.iter().any(|z| z.norm() > 1e-3));
}

#[test]
fn engine_rejects_mis_sized_output() {
    let agg = dimer(cm(12_000.0), cm(12_400.0), 0.0, 0.0);
    let band = BandSystem::from_aggregate(&agg).unwrap();
    let lab = LabSettings::default();
    let times = vec![0.0, 1.0];
    let identity = DMatrix::identity(2, 2);
    let zeros = DMatrix::zeros(2, 2);
    let ctx = ResponseContext {
        lab: &lab,
        band: &band,
        it2: 0,
        t2: 0.0,
        t1s: &times,
        t3s: &times,
        rwa: 0.0,
        rmin: 1.0e-4,
        coherent: &identity,
        transfer: &zeros,
    };
    let mut out = ComplexGrid::zeros((3, 2));
    let err = SecularResponseEngine
        .accumulate(ElementaryProcess::R3g, &ctx, &mut out)
        .unwrap_err();
    assert_eq!(err.code(), "shape-mismatch");
}
