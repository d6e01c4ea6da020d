use cl_demos::{bench, ops::VectorAdd, reference, Session, SessionConfig};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

fn bench_vec_add(c: &mut Criterion) {
    let mut g = c.benchmark_group("vec_add");

    for n in SIZES {
        let (a, b) = bench::inputs(n);
        let mut out = vec![0i32; n];
        g.throughput(Throughput::Bytes((n * std::mem::size_of::<i32>()) as u64));

        g.bench_with_input(BenchmarkId::new("cpu", n), &n, |bch, _| {
            bch.iter(|| reference::vector_add(&a, &b, &mut out));
        });
    }

    // device half only runs when a GPU is around
    let cfg = SessionConfig::default().with_kernel_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/kernels"));
    match Session::bootstrap(&cfg, "add.cl") {
        Ok(session) => {
            let kernel = session.kernel("simple_add").unwrap();
            for n in SIZES {
                let (a, b) = bench::inputs(n);
                let job = VectorAdd::upload(&session, &a, &b).unwrap();
                let mut out = vec![0i32; n];
                g.throughput(Throughput::Bytes((n * std::mem::size_of::<i32>()) as u64));

                g.bench_with_input(BenchmarkId::new("ocl", n), &n, |bch, _| {
                    bch.iter(|| job.run(&session, &kernel, &mut out).unwrap());
                });
            }
        }
        Err(err) => eprintln!("skipping device benchmarks: {err}"),
    }

    g.finish();
}

criterion_group!(benches, bench_vec_add);
criterion_main!(benches);
