use twod_core::errors::{ErrorInfo, TwodError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("type", "R1g")
        .with_context("tag", "pw-1")
}

#[test]
fn duplicate_tag_surface() {
    let err = TwodError::DuplicateTag(sample_info("duplicate-tag", "tag already stored"));
    assert_eq!(err.code(), "duplicate-tag");
    assert!(err.info().context.contains_key("tag"));
}

#[test]
fn conversion_surface() {
    let err = TwodError::UnsupportedConversion(
        sample_info("unsupported-conversion", "types to off").with_hint("lower to signals first"),
    );
    assert_eq!(err.info().hint.as_deref(), Some("lower to signals first"));
    let rendered = err.to_string();
    assert!(rendered.starts_with("unsupported conversion: types to off"));
    assert!(rendered.contains("hint: lower to signals first"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = TwodError::NoData(ErrorInfo::new("no-data", "no data in spectrum"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "NoData");
    assert_eq!(json["detail"]["code"], "no-data");
    let restored: TwodError = serde_json::from_value(json).unwrap();
    assert_eq!(restored, err);
}
