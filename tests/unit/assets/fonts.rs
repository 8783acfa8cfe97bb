use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "fieldposter_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn directory_candidates_are_tried_in_order() {
    let tmp = temp_dir("fonts_dir_order");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("DejaVuSansMono.ttf"), b"late").unwrap();
    std::fs::write(tmp.join("IBMPlexMono-Regular.ttf"), b"early").unwrap();

    let mut book = FontBook::new(Some(tmp.clone())).without_system_fonts();
    let font = book.resolve(FontRole::Mono).unwrap();
    assert_eq!(font.bytes.as_slice(), b"early");
    assert_eq!(font.family, "IBMPlexMono-Regular");
    assert_eq!(
        font.origin,
        FontOrigin::Directory(tmp.join("IBMPlexMono-Regular.ttf"))
    );

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn explicit_file_wins_over_directory() {
    let tmp = temp_dir("fonts_explicit");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("DejaVuSans.ttf"), b"dir").unwrap();
    let pinned = tmp.join("custom.otf");
    std::fs::write(&pinned, b"pinned").unwrap();

    let mut book = FontBook::new(Some(tmp.clone())).without_system_fonts();
    book.set_file(FontRole::Sans, &pinned);
    let font = book.resolve(FontRole::Sans).unwrap();
    assert_eq!(font.bytes.as_slice(), b"pinned");
    assert_eq!(font.origin, FontOrigin::File(pinned));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn unreadable_explicit_file_falls_through() {
    let tmp = temp_dir("fonts_fallthrough");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("DejaVuSans-Bold.ttf"), b"bold").unwrap();

    let mut book = FontBook::new(Some(tmp.clone())).without_system_fonts();
    book.set_file(FontRole::SansBold, tmp.join("missing.ttf"));
    let font = book.resolve(FontRole::SansBold).unwrap();
    assert_eq!(font.bytes.as_slice(), b"bold");

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn pinned_files_list_in_role_order() {
    let mut book = FontBook::new(None).without_system_fonts();
    assert!(book.pinned_files().is_empty());
    book.set_file(FontRole::SansBold, "b.ttf");
    book.set_file(FontRole::Mono, "m.ttf");
    assert_eq!(
        book.pinned_files(),
        vec![
            (FontRole::Mono, PathBuf::from("m.ttf")),
            (FontRole::SansBold, PathBuf::from("b.ttf")),
        ]
    );
}

#[test]
fn nothing_resolves_without_sources() {
    let mut book = FontBook::new(None).without_system_fonts();
    assert!(!book.uses_system_fonts());
    assert!(book.resolve(FontRole::MonoBold).is_none());
    // cached miss
    assert!(book.resolve(FontRole::MonoBold).is_none());
}

#[test]
fn sha256_matches_known_digest() {
    let font = LoadedFont {
        bytes: Arc::new(b"abc".to_vec()),
        index: 0,
        family: "x".to_string(),
        origin: FontOrigin::System,
    };
    assert_eq!(
        font.sha256_hex(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn every_role_has_candidates() {
    for role in [
        FontRole::Mono,
        FontRole::MonoBold,
        FontRole::Sans,
        FontRole::SansBold,
    ] {
        assert!(!directory_candidates(role).is_empty());
    }
}
