use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PosterError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PosterError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(PosterError::font("x").to_string().contains("font error:"));
    assert!(
        PosterError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn io_and_other_preserve_source() {
    let err: PosterError = std::io::Error::other("disk gone").into();
    assert!(err.to_string().contains("disk gone"));

    let err = PosterError::Other(anyhow::Error::new(std::io::Error::other("boom")));
    assert!(err.to_string().contains("boom"));
}
