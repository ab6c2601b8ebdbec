use super::*;
use crate::testing::{planar_from_fn, random_packed};

fn estimate(image: &PlanarImage, sigma: f32) -> AtmosphericLight {
    let mut eroded = PlanarImage::new_default(image.width(), image.height());
    let mut dark = Buffer2::new_default(image.width(), image.height());
    estimate_atmospheric_light(image, sigma, &mut eroded, &mut dark)
}

#[test]
fn test_argmax_first_prefers_lowest_index() {
    assert_eq!(argmax_first([1.0, 5.0, 3.0, 5.0]), (1, 5.0));
    assert_eq!(argmax_first([2.0, 2.0, 2.0]), (0, 2.0));
}

#[test]
fn test_argmax_first_empty() {
    let (idx, val) = argmax_first(std::iter::empty());
    assert_eq!(idx, 0);
    assert_eq!(val, f32::NEG_INFINITY);
}

#[test]
fn test_flat_image_selects_first_pixel() {
    let image = planar_from_fn(32, 16, |_, _| [100.0, 100.0, 100.0]);
    let light = estimate(&image, 0.875);
    assert_eq!((light.row, light.col), (0, 0));
    assert_eq!(light.rgb, [87.5, 87.5, 87.5]);
}

#[test]
fn test_isolated_highlight_is_eroded() {
    // A single bright pixel cannot win: the 3x3 minimum around it is the background.
    let image = planar_from_fn(16, 16, |x, y| {
        if (x, y) == (9, 9) {
            [255.0, 255.0, 255.0]
        } else {
            [10.0, 20.0, 30.0]
        }
    });
    let light = estimate(&image, 1.0);
    assert_eq!((light.row, light.col), (0, 0));
    assert_eq!(light.rgb, [10.0, 20.0, 30.0]);
}

#[test]
fn test_tie_break_takes_first_in_row_major_order() {
    // Two bright 5x5 blocks whose dark channel maxima are both 200.
    // Block B sits on earlier rows, so its first interior pixel (6, 41) wins
    // even though block A starts at a smaller column.
    let image = planar_from_fn(64, 32, |x, y| {
        if (20..25).contains(&y) && (10..15).contains(&x) {
            [250.0, 200.0, 230.0]
        } else if (5..10).contains(&y) && (40..45).contains(&x) {
            [200.0, 220.0, 240.0]
        } else {
            [0.0, 0.0, 0.0]
        }
    });
    let light = estimate(&image, 0.875);
    assert_eq!((light.row, light.col), (6, 41));
    assert_eq!(light.rgb, [175.0, 192.5, 210.0]);
}

#[test]
fn test_uses_unfiltered_color_at_location() {
    // Dark channel peaks in the block interior; the reported light is the
    // original pixel there, not its eroded value.
    let image = planar_from_fn(12, 12, |x, y| {
        if (3..8).contains(&x) && (3..8).contains(&y) {
            if (x, y) == (4, 4) {
                [240.0, 180.0, 200.0]
            } else {
                [150.0, 150.0, 150.0]
            }
        } else {
            [0.0, 0.0, 0.0]
        }
    });
    let light = estimate(&image, 1.0);
    // (4, 4) is the first interior pixel; its neighborhood minimum is 150
    // just like the rest of the interior.
    assert_eq!((light.row, light.col), (4, 4));
    assert_eq!(light.rgb, [240.0, 180.0, 200.0]);
}

#[test]
fn test_black_image_clamps_to_minimum() {
    let image = planar_from_fn(8, 8, |_, _| [0.0, 0.0, 0.0]);
    let light = estimate(&image, 0.875);
    assert_eq!(light.rgb, [1e-3, 1e-3, 1e-3]);
}

#[test]
fn test_from_color_clamps_both_ends() {
    let light = AtmosphericLight::from_color([255.0, 0.0, 300.0], 1.0, 0, 0);
    assert_eq!(light.rgb, [255.0, 1e-3, 255.0]);
}

#[test]
fn test_components_in_range_for_random_images() {
    for seed in 0..4 {
        let packed = random_packed(40, 24, seed);
        let image = PlanarImage::from_packed(&packed, 40, 24);
        let light = estimate(&image, 0.875);
        for c in light.rgb {
            assert!((1e-3..=255.0).contains(&c), "component {c} out of range");
        }
        assert!(light.row < 24 && light.col < 40);
    }
}

#[test]
fn test_dark_channel_prime_is_channel_minimum() {
    let image = planar_from_fn(4, 4, |_, _| [90.0, 30.0, 60.0]);
    assert_eq!(dark_channel_prime(&image, 5), 30.0);
}

#[test]
fn test_dark_channel_map_peaks_at_light_location() {
    // Channel levels vary across the image so the map is not flat.
    let image = planar_from_fn(24, 18, |x, y| {
        [
            (x * 10) as f32,
            (200 - y * 5) as f32,
            ((x + y) * 6) as f32,
        ]
    });
    let mut eroded = PlanarImage::new_default(24, 18);
    let mut dark = Buffer2::new_default(24, 18);
    let light = estimate_atmospheric_light(&image, 1.0, &mut eroded, &mut dark);

    let max = dark.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    assert_eq!(dark[(light.col, light.row)], max);
    assert!(dark.iter().any(|&v| v != max));
    for i in 0..dark.len() {
        assert_eq!(dark[i], dark_channel_prime(&eroded, i));
    }
}

#[test]
#[should_panic(expected = "Dark channel dimensions mismatch")]
fn test_dark_channel_map_dimension_mismatch_panics() {
    let eroded = PlanarImage::new_default(4, 4);
    let mut dark = Buffer2::new_default(4, 3);
    dark_channel_map(&eroded, &mut dark);
}
