use super::*;
use crate::testing::{gray_3x3, random_packed};

const LIGHT_160: AtmosphericLight = AtmosphericLight {
    rgb: [160.0, 160.0, 160.0],
    row: 0,
    col: 0,
};

fn unit_omega() -> Config {
    Config {
        omega_prime: 1.0,
        ..Config::default()
    }
}

/// Corners at 160, everything else 0. The center pixel filters to
/// 640/9 (box), 40 (center) and 80 (corner).
fn corner_grid() -> PlanarImage {
    #[rustfmt::skip]
    let grid = [
        160.0, 0.0, 160.0,
        0.0,   0.0, 0.0,
        160.0, 0.0, 160.0,
    ];
    gray_3x3(grid)
}

fn center_transmission(config: &Config, category: EdgeCategory) -> (f32, KernelPlanes) {
    let image = corner_grid();
    let edges = Buffer2::new_filled(3, 3, category);
    let mut filtered = KernelPlanes::new_default(3, 3);
    let mut map = Buffer2::new_default(3, 3);
    estimate_transmission(&image, &LIGHT_160, &edges, config, &mut filtered, &mut map);
    (map[(1, 1)], filtered)
}

#[test]
fn test_kernel_weights_sum_to_one() {
    for kernel in SmoothingKernel::ALL {
        let sum: f32 = kernel.weights().iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "{kernel:?} sums to {sum}");
    }
}

#[test]
fn test_kernel_weight_layout() {
    assert_eq!(SmoothingKernel::Box.weights(), [1.0f32 / 9.0; 9]);

    let center = SmoothingKernel::Center.weights();
    assert_eq!(center[4], 0.25);
    assert_eq!(center[1], 0.125);
    assert_eq!(center[0], 0.0625);

    let corner = SmoothingKernel::Corner.weights();
    assert_eq!(corner[4], 0.25);
    assert_eq!(corner[0], 0.125);
    assert_eq!(corner[1], 0.0625);
}

#[test]
fn test_transmission_from_filtered_uses_smallest_ratio() {
    // Ratios 0.9, 0.95, 1.0 -> min 0.9.
    let t = transmission_from_filtered([90.0, 190.0, 50.0], &[100.0, 200.0, 50.0], 0.9375);
    assert!((t - (1.0 - 0.9375 * 0.9)).abs() < 1e-6);
}

#[test]
fn test_transmission_clamps_to_unit_range() {
    // Filtered brighter than the light drives t negative before clamping.
    assert_eq!(
        transmission_from_filtered([300.0; 3], &[100.0; 3], 1.0),
        0.0
    );
    // Black pixel is fully transmitted.
    assert_eq!(transmission_from_filtered([0.0; 3], &[100.0; 3], 1.0), 1.0);
}

#[test]
fn test_smooth_pixel_uses_box_kernel() {
    let (t, _) = center_transmission(&unit_omega(), EdgeCategory::Smooth);
    let expected = 1.0 - (640.0 / 9.0) / 160.0;
    assert!((t - expected).abs() < 1e-5, "t = {t}, expected {expected}");
}

#[test]
fn test_axis_pixel_uses_center_kernel() {
    let (t, _) = center_transmission(&unit_omega(), EdgeCategory::AxisEdge);
    assert!((t - 0.75).abs() < 1e-6, "t = {t}");
}

#[test]
fn test_diagonal_pixel_uses_corner_kernel() {
    let (t, _) = center_transmission(&unit_omega(), EdgeCategory::DiagonalEdge);
    assert!((t - 0.5).abs() < 1e-6, "t = {t}");
}

#[test]
fn test_fixed_kernel_ignores_edge_map() {
    let config = unit_omega().with_kernel_selection(KernelSelection::Fixed(SmoothingKernel::Center));
    let (t, filtered) = center_transmission(&config, EdgeCategory::DiagonalEdge);
    assert!((t - 0.75).abs() < 1e-6, "t = {t}");

    // Only the selected kernel is computed.
    let corner = filtered.get(SmoothingKernel::Corner);
    assert!(corner.planes.iter().all(|p| p.iter().all(|&v| v == 0.0)));
    assert_eq!(filtered.get(SmoothingKernel::Center).planes[0][(1, 1)], 40.0);
}

#[test]
fn test_omega_scales_haze_removal() {
    let config = Config {
        omega_prime: 0.5,
        ..Config::default()
    };
    let (t, _) = center_transmission(&config, EdgeCategory::DiagonalEdge);
    // 1 - 0.5 * (80 / 160)
    assert!((t - 0.75).abs() < 1e-6, "t = {t}");
}

#[test]
fn test_random_image_transmission_in_unit_range() {
    let (width, height) = (48, 40);
    let image = PlanarImage::from_packed(&random_packed(width, height, 11), width, height);
    let light = AtmosphericLight::from_color([250.0, 40.0, 0.0], 0.875, 0, 0);
    let mut edges = Buffer2::new_default(width, height);
    crate::edge::classify_edges(&image, 80.0, &mut edges);

    let mut filtered = KernelPlanes::new_default(width, height);
    let mut map = Buffer2::new_default(width, height);
    estimate_transmission(&image, &light, &edges, &Config::default(), &mut filtered, &mut map);

    assert!(map.iter().all(|t| (0.0..=1.0).contains(t)));
}

#[test]
fn test_stats_summary() {
    let map = Buffer2::new(2, 2, vec![0.1f32, 0.5, 0.9, 0.3]);
    let stats = TransmissionStats::from_map(&map, 0.25);
    assert_eq!(stats.min, 0.1);
    assert_eq!(stats.max, 0.9);
    assert!((stats.mean - 0.45).abs() < 1e-6);
    assert_eq!(stats.below_floor, 1);
}

#[test]
fn test_stats_floor_is_strict() {
    let map = Buffer2::new_filled(4, 4, 0.25f32);
    assert_eq!(TransmissionStats::from_map(&map, 0.25).below_floor, 0);
}

#[test]
#[should_panic(expected = "Transmission dimensions mismatch")]
fn test_dimension_mismatch_panics() {
    let image = corner_grid();
    let edges = Buffer2::new_default(3, 3);
    let mut filtered = KernelPlanes::new_default(3, 3);
    let mut map = Buffer2::new_default(4, 3);
    estimate_transmission(&image, &LIGHT_160, &edges, &Config::default(), &mut filtered, &mut map);
}
