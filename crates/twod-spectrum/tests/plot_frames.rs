use twod_core::grid::ComplexGrid;
use twod_core::{Complex64, FrequencyAxis};
use twod_spectrum::{DataKind, PlotOptions, SpectrumPart, SpectrumType, TwoDSpectrum};

fn spectrum() -> TwoDSpectrum {
    let mut spect = TwoDSpectrum::default();
    let x = FrequencyAxis::new(0.0, 5, 1.0).unwrap();
    let y = FrequencyAxis::new(0.0, 4, 1.0).unwrap();
    spect.set_axes(x, y).unwrap();
    let reph = ComplexGrid::from_shape_fn((5, 4), |(i, j)| Complex64::new(i as f64 - j as f64, 1.0));
    let nonr = ComplexGrid::from_elem((5, 4), Complex64::new(1.0, -2.0));
    spect.set_data(reph, DataKind::Reph).unwrap();
    spect.set_data(nonr, DataKind::Nonr).unwrap();
    spect
}

#[test]
fn labels_parse() {
    assert_eq!("nonrephasing".parse::<SpectrumType>().unwrap(), SpectrumType::NonRephasing);
    assert_eq!("abs".parse::<SpectrumPart>().unwrap(), SpectrumPart::Abs);
    assert!("phase".parse::<SpectrumPart>().is_err());
    assert!("both".parse::<SpectrumType>().is_err());
}

#[test]
fn total_real_frame_covers_full_grid() {
    let frame = spectrum()
        .plot_frame(SpectrumType::Total, SpectrumPart::Real, &PlotOptions::default())
        .unwrap();
    assert_eq!(frame.values.dim(), (5, 4));
    assert_eq!(frame.x, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(frame.y.len(), 4);
    // values range from -2 to 5
    assert_eq!(frame.vmax, 5.0);
    assert_eq!(frame.vmin, -2.5);
    assert_eq!(frame.positive_levels.len(), 9);
    assert_eq!(frame.negative_levels.len(), 9);
    assert_eq!(frame.negative_levels[0], -5.0);
}

#[test]
fn explicit_vmax_and_window() {
    let options = PlotOptions {
        window: Some([1.0, 3.0, 0.0, 1.0]),
        vmax: Some(1.0),
        ..PlotOptions::default()
    };
    let frame = spectrum()
        .plot_frame(SpectrumType::Rephasing, SpectrumPart::Imaginary, &options)
        .unwrap();
    assert_eq!(frame.values.dim(), (3, 2));
    assert_eq!(frame.x, vec![1.0, 2.0, 3.0]);
    assert_eq!(frame.vmax, 1.0);
    assert_eq!(frame.vmin, -0.5);
}

#[test]
fn missing_part_is_reported() {
    let mut spect = TwoDSpectrum::default();
    let axis = FrequencyAxis::new(0.0, 2, 1.0).unwrap();
    spect.set_axes(axis.clone(), axis).unwrap();
    spect
        .set_data(ComplexGrid::zeros((2, 2)), DataKind::Reph)
        .unwrap();
    let err = spect
        .plot_frame(SpectrumType::NonRephasing, SpectrumPart::Real, &PlotOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), "missing-array");
}
