//! Throughput of the heavier filters on a 512×512 buffer.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use raster_fx::blur::{box_blur, gaussian_blur, sharpen};
use raster_fx::dither::{dither, DitherKernel};
use raster_fx::mapping::{polar_map, sphere_map, PolarParams};
use raster_fx::{PixelBuffer, Rgba8};

const SIZE: u32 = 512;

fn gradient() -> PixelBuffer {
    let mut buf = PixelBuffer::new(SIZE, SIZE);
    buf.process_pixels(|x, y, _| {
        Rgba8::new_opaque((x / 2) as u8, (y / 2) as u8, ((x + y) / 4) as u8)
    });
    buf
}

fn bench_blur(c: &mut Criterion) {
    let mut group = c.benchmark_group("blur");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));
    let src = gradient();

    for radius in [2, 8, 32] {
        group.bench_with_input(BenchmarkId::new("box", radius), &radius, |b, &r| {
            b.iter(|| {
                let mut buf = src.clone();
                box_blur(&mut buf, black_box(r));
                buf
            })
        });
        group.bench_with_input(BenchmarkId::new("gaussian", radius), &radius, |b, &r| {
            b.iter(|| {
                let mut buf = src.clone();
                gaussian_blur(&mut buf, black_box(r));
                buf
            })
        });
    }

    group.bench_function("sharpen", |b| {
        b.iter(|| {
            let mut buf = src.clone();
            sharpen(&mut buf);
            buf
        })
    });
    group.finish();
}

fn bench_dither(c: &mut Criterion) {
    let mut group = c.benchmark_group("dither");
    group.throughput(Throughput::Elements((SIZE * SIZE) as u64));
    let src = gradient();

    for kernel in DitherKernel::ALL {
        group.bench_function(kernel.name(), |b| {
            b.iter(|| {
                let mut buf = src.clone();
                dither(&mut buf, black_box(kernel));
                buf
            })
        });
    }
    group.finish();
}

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap");
    let texture = gradient();
    let canvas = PixelBuffer::filled(SIZE, SIZE, Rgba8::new_opaque(0, 0, 0));

    group.bench_function("sphere", |b| {
        b.iter(|| {
            let mut buf = canvas.clone();
            sphere_map(&mut buf, &texture, 0.0, 0.0, SIZE as f64, black_box(0.25));
            buf
        })
    });

    let half = SIZE as f64 / 2.0;
    group.bench_function("polar", |b| {
        b.iter(|| {
            let mut buf = canvas.clone();
            let params = PolarParams::new(half, half, half, half / 3.0);
            polar_map(&mut buf, &texture, black_box(params));
            buf
        })
    });
    group.finish();
}

criterion_group!(benches, bench_blur, bench_dither, bench_remap);
criterion_main!(benches);
