use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use camconv_3d::{camera, frames, homogeneous};

fn bench_world2cam(c: &mut Criterion) {
    let mut group = c.benchmark_group("world2cam");

    let cam2world = [[
        [0.0f32, 0.0, 1.0, 0.3],
        [1.0, 0.0, 0.0, -1.2],
        [0.0, 1.0, 0.0, 4.0],
        [0.0, 0.0, 0.0, 1.0],
    ]];
    let intrinsics = [camera::PinholeIntrinsics::new(1.0, 0.5, 0.5).camera_matrix::<f64>()];

    for num_points in [1000, 10000, 100000].iter() {
        group.throughput(criterion::Throughput::Elements(*num_points as u64));
        let parameter_string = format!("{}", num_points);

        let points = vec![[2.0f32, 2.0, 2.0]; *num_points];
        let xyz = homogeneous::homogenize_points(&points);

        group.bench_with_input(
            BenchmarkId::new("transform_world2cam", &parameter_string),
            &xyz,
            |b, xyz| {
                b.iter(|| black_box(frames::transform_world2cam(xyz, &cam2world).unwrap()));
            },
        );

        let xyz_cam = frames::transform_world2cam(&xyz, &cam2world).unwrap();
        group.bench_with_input(
            BenchmarkId::new("project", &parameter_string),
            &xyz_cam,
            |b, xyz_cam| {
                b.iter(|| black_box(camera::project(xyz_cam, &intrinsics).unwrap()));
            },
        );
    }
}

criterion_group!(benches, bench_world2cam);
criterion_main!(benches);
