use camconv_3d::{Mat33, Mat44, Real};
use camconv_render::{ExecutionStrategy, RenderConfig};
use camconv_resolver::{
    synthesize_dataset, AxisLabel, CameraConvention, ConventionHypothesis, ConventionResolver,
    ResolverConfig, ResolverError, StorageDirection,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const RESOLUTION: usize = 128;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_cloud(seed: u64, len: usize) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            [
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
                rng.random_range(-0.5..0.5),
            ]
        })
        .collect()
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / n, v[1] / n, v[2] / n]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

// canonical camera-to-world matrix of a camera at `position` looking at the origin
fn look_at(position: [f64; 3]) -> Mat44<f64> {
    let look = normalize([-position[0], -position[1], -position[2]]);
    let right = normalize(cross(look, [0.0, 0.0, 1.0]));
    let down = cross(look, right);

    let mut m = [[0.0; 4]; 4];
    for i in 0..3 {
        m[i][0] = right[i];
        m[i][1] = down[i];
        m[i][2] = look[i];
        m[i][3] = position[i];
    }
    m[3][3] = 1.0;
    m
}

fn cameras() -> Vec<Mat44<f64>> {
    [
        [3.0, 0.0, 0.4],
        [0.0, 3.0, 1.0],
        [-2.8, 0.3, -0.6],
        [0.5, -2.9, 0.7],
    ]
    .into_iter()
    .map(look_at)
    .collect()
}

fn intrinsics<T: Real>() -> Mat33<T> {
    let (f, c) = (T::narrow(1.2), T::narrow(0.5));
    let (zero, one) = (T::zero(), T::one());
    [[f, zero, c], [zero, f, c], [zero, zero, one]]
}

fn render_config() -> RenderConfig {
    RenderConfig {
        resolution: [RESOLUTION, RESOLUTION].into(),
        ..Default::default()
    }
}

fn assert_extrinsics_close<T: Real>(actual: &[Mat44<T>], expected: &[Mat44<f64>], eps: f64) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        for (ra, re) in a.iter().zip(e) {
            for (x, y) in ra.iter().zip(re) {
                approx::assert_abs_diff_eq!(x.widen(), *y, epsilon = eps);
            }
        }
    }
}

#[test]
fn recovers_world2cam_x_forward_convention() -> Result<(), ResolverError> {
    init_logger();

    let convention = CameraConvention {
        storage: StorageDirection::WorldToCamera,
        look: AxisLabel::PosX,
        up: AxisLabel::PosZ,
        right: AxisLabel::NegY,
    };
    let vertices = random_cloud(42, 200);
    let canonical = cameras();
    let dataset = synthesize_dataset(
        &vertices,
        &canonical,
        &[intrinsics::<f64>(); 4],
        &convention,
        &render_config(),
    )?;

    let resolver = ConventionResolver::new(ResolverConfig::default());
    let resolution = resolver.resolve(&dataset, &vertices)?;

    assert_eq!(resolution.convention, convention);
    assert_eq!(
        resolution.hypothesis,
        ConventionHypothesis::from_convention(&convention)?
    );
    assert!(resolution.score <= resolver.config().tolerance);
    assert_extrinsics_close(&resolution.extrinsics, &canonical, 1e-9);
    Ok(())
}

#[test]
fn recovers_opengl_convention_in_f32() -> Result<(), ResolverError> {
    init_logger();

    let convention = CameraConvention {
        storage: StorageDirection::CameraToWorld,
        look: AxisLabel::NegZ,
        up: AxisLabel::PosY,
        right: AxisLabel::PosX,
    };
    let vertices = random_cloud(7, 200)
        .into_iter()
        .map(|p| p.map(|x| x as f32))
        .collect::<Vec<_>>();
    let canonical = cameras();
    let canonical_f32 = canonical
        .iter()
        .map(|m| m.map(|row| row.map(|x| x as f32)))
        .collect::<Vec<_>>();

    let dataset = synthesize_dataset(
        &vertices,
        &canonical_f32,
        &[intrinsics::<f32>(); 4],
        &convention,
        &render_config(),
    )?;

    let resolver = ConventionResolver::new(ResolverConfig::default());
    let resolution = resolver.resolve(&dataset, &vertices)?;

    assert_eq!(resolution.convention, convention);
    assert_extrinsics_close(&resolution.extrinsics, &canonical, 1e-5);
    Ok(())
}

#[test]
fn recovers_left_handed_convention() -> Result<(), ResolverError> {
    init_logger();

    // right x down = -look, so the stored frame is a reflection of the canonical one
    let convention = CameraConvention {
        storage: StorageDirection::CameraToWorld,
        look: AxisLabel::PosZ,
        up: AxisLabel::PosY,
        right: AxisLabel::PosX,
    };
    assert!(!convention.is_right_handed());

    let vertices = random_cloud(5, 200);
    let canonical = cameras();
    let dataset = synthesize_dataset(
        &vertices,
        &canonical,
        &[intrinsics::<f64>(); 4],
        &convention,
        &render_config(),
    )?;

    let resolver = ConventionResolver::new(ResolverConfig::default());
    let resolution = resolver.resolve(&dataset, &vertices)?;

    assert_eq!(resolution.convention, convention);
    assert!(!resolution.convention.is_right_handed());
    assert_extrinsics_close(&resolution.extrinsics, &canonical, 1e-9);
    Ok(())
}

#[test]
fn canonical_dataset_resolves_to_identity() -> Result<(), ResolverError> {
    let vertices = random_cloud(3, 150);
    let canonical = cameras();
    let dataset = synthesize_dataset(
        &vertices,
        &canonical,
        &[intrinsics::<f64>(); 4],
        &CameraConvention::CANONICAL,
        &render_config(),
    )?;

    let resolver = ConventionResolver::new(ResolverConfig::default());
    let resolution = resolver.resolve(&dataset, &vertices)?;

    assert_eq!(resolution.hypothesis, ConventionHypothesis::IDENTITY);
    assert_eq!(resolution.extrinsics, canonical);
    Ok(())
}

#[test]
fn resolution_is_deterministic() -> Result<(), ResolverError> {
    let convention = CameraConvention {
        storage: StorageDirection::WorldToCamera,
        look: AxisLabel::PosY,
        up: AxisLabel::PosX,
        right: AxisLabel::NegZ,
    };
    let vertices = random_cloud(11, 120);
    let dataset = synthesize_dataset(
        &vertices,
        &cameras(),
        &[intrinsics::<f64>(); 4],
        &convention,
        &render_config(),
    )?;

    let parallel = ConventionResolver::new(ResolverConfig::default());
    let serial = ConventionResolver::new(ResolverConfig {
        strategy: ExecutionStrategy::Serial,
        ..Default::default()
    });

    let first = parallel.resolve(&dataset, &vertices)?;
    assert_eq!(first.convention, convention);
    assert_eq!(parallel.resolve(&dataset, &vertices)?, first);
    assert_eq!(serial.resolve(&dataset, &vertices)?, first);
    Ok(())
}
