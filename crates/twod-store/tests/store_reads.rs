use twod_core::grid::ComplexGrid;
use twod_core::{Complex64, TwodError};
use twod_store::{
    LiouvilleType, Process, Resolution, ResolutionAwareStore, Signal, SpectrumStore, StoreKey,
};

fn grid(value: f64) -> ComplexGrid {
    ComplexGrid::from_elem((2, 2), Complex64::new(value, -value))
}

#[test]
fn uninitialized_reads_return_placeholder() {
    let store = SpectrumStore::with_shape((4, 4));
    for key in ["R1g", "GSB", "REPH", "total"] {
        let data = store.read(key.parse().unwrap(), None).unwrap();
        assert_eq!(data.dim(), (1, 1));
        assert_eq!(data[[0, 0]], Complex64::new(0.0, 0.0));
    }
    assert_eq!(store.read(StoreKey::Type(LiouvilleType::R1g), Some("x")).unwrap().dim(), (1, 1));
}

#[test]
fn duplicate_tag_is_rejected() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R1g, "p1", grid(1.0)).unwrap();
    let err = store.write(LiouvilleType::R1g, "p1", grid(2.0)).unwrap_err();
    assert!(matches!(err, TwodError::DuplicateTag(_)));

    store.write(LiouvilleType::R1g, "p2", grid(2.0)).unwrap();
    store.write(LiouvilleType::R2g, "p1", grid(3.0)).unwrap();
    assert_eq!(store.read(LiouvilleType::R1g.into(), Some("p1")).unwrap(), grid(1.0));
    assert_eq!(store.read(LiouvilleType::R1g.into(), Some("p2")).unwrap(), grid(2.0));
    assert_eq!(store.read(LiouvilleType::R1g.into(), None).unwrap(), grid(3.0));
    assert_eq!(store.tags(LiouvilleType::R1g), vec!["p1".to_string(), "p2".to_string()]);
    assert_eq!(store.pathway_count(), 3);
}

#[test]
fn all_tags_lists_every_type_and_tag() {
    let mut store = SpectrumStore::new();
    assert_eq!(store.all_tags().count(), 0);
    store.write(LiouvilleType::R3g, "b", grid(1.0)).unwrap();
    store.write(LiouvilleType::R1g, "z", grid(1.0)).unwrap();
    store.write(LiouvilleType::R3g, "a", grid(1.0)).unwrap();
    let tags: Vec<_> = store.all_tags().collect();
    assert_eq!(
        tags,
        vec![
            (LiouvilleType::R1g, "z"),
            (LiouvilleType::R3g, "a"),
            (LiouvilleType::R3g, "b"),
        ]
    );

    store.set_resolution(Resolution::Types).unwrap();
    assert_eq!(store.all_tags().count(), 0);
}

#[test]
fn unknown_tag_fails() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R3g, "a", grid(1.0)).unwrap();
    let err = store.read(LiouvilleType::R3g.into(), Some("b")).unwrap_err();
    assert_eq!(err.code(), "unknown-tag");
}

#[test]
fn missing_type_reads_as_zeros_of_declared_shape() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R3g, "a", grid(1.0)).unwrap();
    let data = store.read(LiouvilleType::R4fs.into(), None).unwrap();
    assert_eq!(data, ComplexGrid::zeros((2, 2)));
}

#[test]
fn shape_is_fixed_by_first_write() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R1g, "a", grid(1.0)).unwrap();
    let err = store
        .write(LiouvilleType::R1g, "b", ComplexGrid::zeros((3, 2)))
        .unwrap_err();
    assert!(matches!(err, TwodError::TypeMismatch(_)));

    let mut declared = SpectrumStore::with_shape((5, 5));
    assert!(declared.write(LiouvilleType::R1g, "a", grid(1.0)).is_err());
}

#[test]
fn coarse_views_sum_member_types() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R1g, "a", grid(1.0)).unwrap();
    store.write(LiouvilleType::R2g, "b", grid(2.0)).unwrap();
    store.write(LiouvilleType::R3g, "c", grid(4.0)).unwrap();

    assert_eq!(store.read(Process::GSB.into(), None).unwrap(), grid(3.0));
    assert_eq!(store.read(Signal::REPH.into(), None).unwrap(), grid(6.0));
    assert_eq!(store.read(StoreKey::Total, None).unwrap(), grid(7.0));
    assert_eq!(store.pathway_count(), 3);
}

#[test]
fn reads_follow_the_active_resolution() {
    let mut store = SpectrumStore::new();
    store.write(LiouvilleType::R1g, "a", grid(1.0)).unwrap();
    store.write(LiouvilleType::R3fs, "b", grid(2.0)).unwrap();
    store.set_resolution(Resolution::Types).unwrap();

    assert_eq!(store.read(LiouvilleType::R1g.into(), None).unwrap(), grid(1.0));
    assert!(store.read(LiouvilleType::R1g.into(), Some("a")).is_err());

    store.set_resolution(Resolution::Processes).unwrap();
    assert_eq!(store.read(Process::GSB.into(), None).unwrap(), grid(1.0));
    assert_eq!(store.read(Signal::DC.into(), None).unwrap(), grid(2.0));
    let err = store.read(Signal::NONR.into(), None).unwrap_err();
    assert_eq!(err.code(), "unavailable-at-resolution");
    assert!(store.read(LiouvilleType::R1g.into(), None).is_err());

    store.set_resolution(Resolution::Off).unwrap();
    assert_eq!(store.read(StoreKey::Total, None).unwrap(), grid(3.0));
    assert!(store.read(Process::GSB.into(), None).is_err());
}

#[test]
fn address_drives_get_and_put() {
    let mut store = SpectrumStore::new();
    assert!(store.get().is_err());

    store.set_address("R2fs".parse().unwrap(), Some("t1".into()));
    store.put(grid(1.5)).unwrap();
    assert_eq!(store.get().unwrap(), grid(1.5));

    store.set_address("ESA".parse().unwrap(), None);
    assert_eq!(store.get().unwrap(), grid(1.5));
    assert!(store.put(grid(1.0)).is_err());

    store.set_address(StoreKey::Type(LiouvilleType::R1g), None);
    assert_eq!(store.put(grid(1.0)).unwrap_err().code(), "missing-tag");
}

#[test]
fn key_labels_parse() {
    assert_eq!("R4g".parse::<StoreKey>().unwrap(), StoreKey::Type(LiouvilleType::R4g));
    assert_eq!("SE".parse::<StoreKey>().unwrap(), StoreKey::Process(Process::SE));
    assert_eq!("NONR".parse::<StoreKey>().unwrap(), StoreKey::Signal(Signal::NONR));
    assert_eq!("DC".parse::<StoreKey>().unwrap(), StoreKey::Process(Process::DC));
    assert_eq!("total".parse::<StoreKey>().unwrap(), StoreKey::Total);
    assert_eq!("R9".parse::<StoreKey>().unwrap_err().code(), "unknown-key");
    assert!(matches!("XYZ".parse::<Process>(), Err(TwodError::UnknownProcess(_))));
    assert!(matches!("XYZ".parse::<Signal>(), Err(TwodError::UnknownSignal(_))));
}

#[test]
fn trim_slices_every_array() {
    let mut store = SpectrumStore::new();
    let mut data = ComplexGrid::zeros((4, 5));
    data[[2, 3]] = Complex64::new(9.0, 0.0);
    store.write(LiouvilleType::R1g, "a", data).unwrap();
    store.trim((1, 2), (2, 4)).unwrap();
    assert_eq!(store.shape(), Some((2, 3)));
    let trimmed = store.read(LiouvilleType::R1g.into(), Some("a")).unwrap();
    assert_eq!(trimmed.dim(), (2, 3));
    assert_eq!(trimmed[[1, 1]], Complex64::new(9.0, 0.0));
    assert!(store.trim((0, 5), (0, 1)).is_err());
}
