use twod_core::TwodError;
use twod_spectrum::{ContainerStatus, SpectrumContainer, TwoDSpectrum};

fn at(t2: f64) -> TwoDSpectrum {
    let mut spect = TwoDSpectrum::default();
    spect.set_t2(t2);
    spect
}

#[test]
fn spectra_are_kept_in_t2_order() {
    let container: SpectrumContainer = [at(20.0), at(0.0), at(10.0)].into_iter().collect();
    assert_eq!(container.t2_values(), vec![0.0, 10.0, 20.0]);
    assert_eq!(container.len(), 3);
    assert_eq!(container.status(), ContainerStatus::Complete);
    assert_eq!(container.get_spectrum(10.0).unwrap().t2(), 10.0);
    assert_eq!((&container).into_iter().count(), 3);
}

#[test]
fn same_t2_replaces() {
    let mut container = SpectrumContainer::new();
    container.set_spectrum(at(5.0));
    let mut replacement = TwoDSpectrum::new(true, true);
    replacement.set_t2(5.0);
    container.set_spectrum(replacement);
    assert_eq!(container.len(), 1);
    assert!(container.get_spectrum(5.0).unwrap().keep_pathways());
}

#[test]
fn missing_t2_is_no_data() {
    let container = SpectrumContainer::unavailable();
    assert!(container.is_empty());
    assert_eq!(container.status(), ContainerStatus::EngineUnavailable);
    assert!(matches!(container.get_spectrum(1.0), Err(TwodError::NoData(_))));
}
