use criterion::{criterion_group, criterion_main, Criterion};
use futures_util::future::join_all;
use lazuli::{Arguments, Container, Definition, InstantiateErrorKind};
use tokio::runtime::Runtime;

const CHAIN: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

#[inline]
fn container_with_chain() -> Container {
    let container = Container::new();
    container
        .register(CHAIN[0], Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>(0_u64)))
        .unwrap();
    for window in CHAIN.windows(2) {
        container
            .register(
                window[1],
                Definition::new([window[0]], |args: Arguments| Ok::<_, InstantiateErrorKind>(*args.get::<u64>(0)? + 1)),
            )
            .unwrap();
    }
    container
}

#[inline]
fn container_with_diamond() -> Container {
    let container = Container::new();
    container
        .register("root", Definition::from_fn(|_| Ok::<_, InstantiateErrorKind>(1_u64)))
        .unwrap();
    for name in ["left", "right"] {
        container
            .register(name, Definition::new(["root"], |args: Arguments| args.get::<u64>(0).map(|root| *root * 2)))
            .unwrap();
    }
    container
        .register(
            "top",
            Definition::new(["left", "right"], |args: Arguments| {
                Ok::<_, InstantiateErrorKind>(*args.get::<u64>(0)? + *args.get::<u64>(1)?)
            }),
        )
        .unwrap();
    container
}

fn criterion_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let last = CHAIN[CHAIN.len() - 1];

    c.bench_function("container_register_chain", |b| b.iter(container_with_chain))
        .bench_function("container_resolve_chain", |b| {
            b.to_async(&runtime).iter(|| async { container_with_chain().resolve(last).await.unwrap() })
        })
        .bench_function("container_resolve_chain_with_cache", |b| {
            let container = container_with_chain();
            runtime.block_on(container.resolve(last)).unwrap();
            b.to_async(&runtime).iter(|| container.resolve(last))
        })
        .bench_function("container_resolve_diamond_concurrent", |b| {
            b.to_async(&runtime).iter(|| async {
                let container = container_with_diamond();
                join_all((0..8).map(|_| container.resolve("top"))).await
            })
        })
        .bench_function("container_inject", |b| {
            let container = container_with_chain();
            let definition = Definition::new([last], |args: Arguments| args.get::<u64>(0).map(|val| *val));
            b.to_async(&runtime).iter(|| container.inject(definition.clone(), None))
        });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
