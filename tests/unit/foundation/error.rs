use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PassError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(PassError::render("x").to_string().contains("render error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PassError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: PassError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, PassError::Serde(_)));
    assert!(err.to_string().contains("serialization error:"));
}
