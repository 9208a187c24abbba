use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mmult::matrix::buffer::MatrixBuffer;
use mmult::{Kernel, KernelArgs};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SIZES: &[usize] = &[64, 127, 256];

fn bench_kernels(c: &mut Criterion) {
    for kernel in Kernel::ALL {
        let mut group = c.benchmark_group(kernel.label());
        for &n in SIZES {
            group.throughput(Throughput::Elements((n as u64).pow(3)));

            let mut rng = StdRng::seed_from_u64(0xdead_beef ^ n as u64);
            let a = MatrixBuffer::random(n, n, &mut rng).unwrap();
            let b = MatrixBuffer::random(n, n, &mut rng).unwrap();
            let mut out = vec![0.0f32; n * n];

            group.bench_function(BenchmarkId::new("square", n), |bench| {
                let mut args =
                    KernelArgs::new(a.as_slice(), b.as_slice(), &mut out, n, n, n).unwrap();
                bench.iter(|| {
                    kernel.run(black_box(&mut args));
                    black_box(args.output()[n / 2]);
                });
            });
        }
        group.finish();
    }
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
