use twod_core::grid::ComplexGrid;
use twod_core::{Complex64, FrequencyAxis, TwodError};
use twod_spectrum::{DataKind, TwoDSpectrum};
use twod_store::{LiouvilleType, Resolution, ResolutionAwareStore, StoreKey};

fn axes(n1: usize, n3: usize) -> (FrequencyAxis, FrequencyAxis) {
    (
        FrequencyAxis::new(-1.0, n1, 0.5).unwrap(),
        FrequencyAxis::new(0.0, n3, 0.25).unwrap(),
    )
}

fn ramp(n1: usize, n3: usize, scale: f64) -> ComplexGrid {
    ComplexGrid::from_shape_fn((n1, n3), |(i, j)| {
        Complex64::new(scale * (i * n3 + j) as f64, -scale)
    })
}

fn spectrum(n1: usize, n3: usize) -> TwoDSpectrum {
    let mut spect = TwoDSpectrum::default();
    let (x, y) = axes(n1, n3);
    spect.set_axes(x, y).unwrap();
    spect
}

#[test]
fn fresh_spectrum_is_empty() {
    let spect = TwoDSpectrum::new(true, false);
    assert_eq!(spect.t2(), -1.0);
    assert!(spect.keep_pathways());
    assert!(!spect.keep_stypes());
    assert!(spect.data_type().is_none());
    assert!(matches!(spect.total(), Err(TwodError::NoData(_))));
    assert!(TwoDSpectrum::new(false, false).store().is_none());
}

#[test]
fn data_type_labels_parse() {
    assert_eq!("Reph".parse::<DataKind>().unwrap(), DataKind::Reph);
    let err = "Both".parse::<DataKind>().unwrap_err();
    assert!(matches!(err, TwodError::InvalidDataType(_)));
}

#[test]
fn add_data_accumulates_exactly() {
    let mut spect = spectrum(4, 3);
    let a = ramp(4, 3, 1.0);
    let b = ramp(4, 3, 0.5);
    spect.add_data(&a, DataKind::Reph).unwrap();
    spect.add_data(&b, DataKind::Reph).unwrap();
    assert_eq!(spect.data(DataKind::Reph).unwrap(), &(&a + &b));
    assert_eq!(spect.data_type(), Some(DataKind::Reph));
}

#[test]
fn add_data_rejects_foreign_shape() {
    let mut spect = TwoDSpectrum::default();
    spect.add_data(&ramp(2, 2, 1.0), DataKind::Nonr).unwrap();
    let err = spect.add_data(&ramp(3, 2, 1.0), DataKind::Nonr).unwrap_err();
    assert!(matches!(err, TwodError::TypeMismatch(_)));

    let mut with_axes = spectrum(4, 3);
    assert!(with_axes.add_data(&ramp(2, 2, 1.0), DataKind::Reph).is_err());
}

#[test]
fn families_do_not_mix() {
    let mut spect = spectrum(2, 2);
    spect.set_data(ramp(2, 2, 1.0), DataKind::Tot).unwrap();
    let err = spect.set_data(ramp(2, 2, 1.0), DataKind::Reph).unwrap_err();
    assert!(matches!(err, TwodError::DataTypeConflict(_)));
    assert!(spect.add_data(&ramp(2, 2, 1.0), DataKind::Nonr).is_err());
    assert!(spect.set_data_type(DataKind::Reph).is_err());

    let mut separated = spectrum(2, 2);
    separated.set_data(ramp(2, 2, 1.0), DataKind::Reph).unwrap();
    separated.set_data(ramp(2, 2, 2.0), DataKind::Nonr).unwrap();
    separated.add_data(&ramp(2, 2, 1.0), DataKind::Nonr).unwrap();
    assert_eq!(separated.data_type(), Some(DataKind::Reph));
    assert_eq!(separated.data(DataKind::Nonr).unwrap(), &ramp(2, 2, 3.0));
    let err = separated.set_data(ramp(2, 2, 1.0), DataKind::Tot).unwrap_err();
    assert_eq!(err.code(), "data-type-conflict");
}

#[test]
fn set_data_overwrites() {
    let mut spect = spectrum(2, 2);
    spect.set_data(ramp(2, 2, 1.0), DataKind::Tot).unwrap();
    spect.set_data(ramp(2, 2, 3.0), DataKind::Tot).unwrap();
    assert_eq!(spect.data(DataKind::Tot).unwrap(), &ramp(2, 2, 3.0));
}

#[test]
fn value_at_reads_selected_array() {
    let mut spect = spectrum(4, 3);
    assert!(matches!(spect.value_at(0.0, 0.0), Err(TwodError::NoData(_))));

    spect.set_data(ramp(4, 3, 1.0), DataKind::Reph).unwrap();
    spect.set_data(ramp(4, 3, 2.0), DataKind::Nonr).unwrap();
    // x = 0.0 is index 2, y = 0.5 is index 2
    assert_eq!(spect.value_at(0.0, 0.5).unwrap(), Complex64::new(8.0, -1.0));
    spect.set_data_type(DataKind::Nonr).unwrap();
    assert_eq!(spect.value_at(0.0, 0.5).unwrap(), Complex64::new(16.0, -2.0));
    spect.set_data_type(DataKind::Tot).unwrap_err();
}

#[test]
fn total_and_maximum_combine_parts() {
    let mut spect = spectrum(2, 2);
    spect.set_data(ramp(2, 2, 1.0), DataKind::Reph).unwrap();
    assert!(spect.max_value().is_err());
    assert_eq!(spect.total().unwrap(), ramp(2, 2, 1.0));

    spect.set_data(ramp(2, 2, 2.0), DataKind::Nonr).unwrap();
    assert_eq!(spect.total().unwrap(), ramp(2, 2, 3.0));
    assert_eq!(spect.max_value().unwrap(), 9.0);
}

#[test]
fn divide_by_scales_every_part() {
    let mut spect = spectrum(2, 2);
    spect.set_data(ramp(2, 2, 4.0), DataKind::Reph).unwrap();
    spect.set_data(ramp(2, 2, 2.0), DataKind::Nonr).unwrap();
    spect.divide_by(2.0);
    assert_eq!(spect.data(DataKind::Reph).unwrap(), &ramp(2, 2, 2.0));
    assert_eq!(spect.data(DataKind::Nonr).unwrap(), &ramp(2, 2, 1.0));
}

#[test]
fn pathways_go_through_the_store() {
    let mut spect = TwoDSpectrum::new(true, true);
    let (x, y) = axes(3, 3);
    spect.set_axes(x, y).unwrap();
    spect.add_pathway(LiouvilleType::R2g, "a", ramp(3, 3, 1.0)).unwrap();
    spect.add_pathway(LiouvilleType::R1g, "b", ramp(3, 3, 1.0)).unwrap();
    assert!(spect.add_pathway(LiouvilleType::R2g, "a", ramp(3, 3, 1.0)).is_err());
    assert!(spect.add_pathway(LiouvilleType::R2g, "c", ramp(2, 3, 1.0)).is_err());

    spect.set_resolution(Resolution::Types).unwrap();
    spect.set_resolution(Resolution::Signals).unwrap();
    let store = spect.store().unwrap();
    assert_eq!(store.read(StoreKey::Total, None).unwrap(), ramp(3, 3, 2.0));
    assert!(spect.set_resolution(Resolution::Types).is_err());

    let mut bare = TwoDSpectrum::new(false, false);
    let err = bare.add_pathway(LiouvilleType::R1g, "a", ramp(1, 1, 1.0)).unwrap_err();
    assert_eq!(err.code(), "pathways-not-kept");
}
