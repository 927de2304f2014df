use criterion::{Criterion, black_box, criterion_group, criterion_main};
use glam::{Quat, Vec3};
use lumen_math::*;

fn rotated_box() -> OrientedBox {
    OrientedBox::new(
        Vec3::new(10.0, 2.0, -4.0),
        Quat::from_euler(glam::EulerRot::XYZ, 0.3, 1.1, -0.4),
        Vec3::new(4.0, 2.0, 6.0),
    )
}

fn bench_closest_point(c: &mut Criterion) {
    let b = black_box(rotated_box());
    let p = black_box(Vec3::new(17.0, 5.0, 1.0));
    c.bench_function("oriented_box_closest_point", |bencher| {
        bencher.iter(|| black_box(b.closest_point(p)))
    });
}

fn bench_distance(c: &mut Criterion) {
    let b = black_box(rotated_box());
    let p = black_box(Vec3::new(17.0, 5.0, 1.0));
    c.bench_function("oriented_box_distance", |bencher| {
        bencher.iter(|| black_box(b.distance(p)))
    });
}

fn bench_band_classification(c: &mut Criterion) {
    let inner = black_box(rotated_box());
    let outer = black_box(inner.expand_by(3.0));
    let p = black_box(Vec3::new(15.0, 3.0, -2.0));
    c.bench_function("inner_outer_pair_distance", |bencher| {
        bencher.iter(|| {
            let d_inner = inner.distance(p);
            let d_outer = outer.distance(p);
            black_box((d_inner, d_outer))
        })
    });
}

fn bench_from_collider(c: &mut Criterion) {
    let t = black_box(
        VolumeTransform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(0.5),
            Vec3::new(2.0, 0.5, 3.0),
        ),
    );
    c.bench_function("oriented_box_from_collider", |bencher| {
        bencher.iter(|| black_box(OrientedBox::from_collider(&t, Vec3::ZERO, Vec3::ONE)))
    });
}

criterion_group!(
    benches,
    bench_closest_point,
    bench_distance,
    bench_band_classification,
    bench_from_collider
);
criterion_main!(benches);
