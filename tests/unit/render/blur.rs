use super::*;

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(radius_for_sigma(8.0), 24);
    assert_eq!(radius_for_sigma(0.1), 1);
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgba8_premul(&src, w, h, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 1.0).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8, "alpha mass {sum_a}");
    assert!(out[center + 3] < 255);
}

#[test]
fn rejects_bad_inputs() {
    assert!(blur_rgba8_premul(&[0u8; 8], 1, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 4], 1, 1, 0.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 4], 1, 1, f64::NAN).is_err());
}

#[test]
fn kernel_sums_to_one_in_q16() {
    let k = gaussian_kernel_q16(radius_for_sigma(3.5), 3.5);
    assert_eq!(k.len(), 2 * 11 + 1);
    assert_eq!(k.iter().map(|&v| u64::from(v)).sum::<u64>(), 65536);
}
