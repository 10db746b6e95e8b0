use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlipwayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SlipwayError::navigation("x")
            .to_string()
            .contains("navigation error:")
    );
    assert!(
        SlipwayError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        SlipwayError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn script_error_names_handler_and_keeps_source() {
    let err = SlipwayError::script("intro", anyhow::anyhow!("division by zero"));
    let msg = err.to_string();
    assert!(msg.contains("script 'intro' failed"));
    assert!(msg.contains("division by zero"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlipwayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
