use super::*;

#[test]
fn warp_vanishes_outside_reach() {
    assert_eq!(warp(0.0), 0.0);
    assert_eq!(warp(WARP_REACH), 0.0);
    assert_eq!(warp(2000.0), 0.0);
    assert!(warp(150.0).abs() > 100.0);
}

#[test]
fn alpha_truncates_like_integer_opacity() {
    assert_eq!(alpha(255.9), 1.0);
    assert_eq!(alpha(-3.0), 0.0);
    assert_eq!(alpha(51.7), 51.0 / 255.0);
}

#[test]
fn lerp_truncates_each_channel() {
    let mid = truncating_lerp(GOLD, PLATINUM, 0.5);
    assert_eq!((mid.r, mid.g, mid.b), (237, 215, 160));
    assert_eq!(truncating_lerp(GOLD, PLATINUM, 0.0), GOLD);
}

#[test]
fn layers_and_type_are_present() {
    let scene = build().unwrap();
    let names: Vec<&str> = scene.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        ["base", "distorted-grid", "force-lines", "pathways", "orbitals", "core", "type"]
    );
    let title = scene.texts().find(|t| t.content == "MEMORY").unwrap();
    assert_eq!(title.anchor, TextAnchor::Middle);
    assert_eq!(title.font, FontRole::SansBold);
    assert_eq!(build().unwrap(), scene);
}
