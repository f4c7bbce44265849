//! # Matrix Generation Benchmarks / 矩阵生成基准测试
//!
//! Measures discovery over a full five-type layout and scoped matrix
//! generation from an already-discovered generator.
//!
//! 测量对完整五类型布局的发现过程，以及从已完成发现的生成器
//! 进行范围过滤的矩阵生成。

use criterion::{Criterion, criterion_group, criterion_main};
use matrix_forge::core::generator::MatrixGenerator;
use matrix_forge::core::models::{Scope, TestType};
use std::fs;
use std::hint::black_box;
use tempfile::TempDir;

fn full_layout() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for test_type in TestType::ALL {
        fs::create_dir(dir.path().join(test_type.dir_name()))
            .expect("failed to create subdir");
    }
    dir
}

fn bench_discover_tests(c: &mut Criterion) {
    let suite = full_layout();

    c.bench_function("discover_tests_full_layout", |b| {
        b.iter(|| {
            let mut generator = MatrixGenerator::with_defaults(black_box(suite.path()));
            generator.discover_tests().unwrap()
        })
    });
}

fn bench_generate_matrix(c: &mut Criterion) {
    let suite = full_layout();
    let mut generator = MatrixGenerator::with_defaults(suite.path());
    generator.discover_tests().unwrap();

    let mut group = c.benchmark_group("generate_matrix");
    for scope in [Scope::All, Scope::Type(TestType::E2e)] {
        group.bench_function(scope.as_str(), |b| {
            b.iter(|| generator.generate_matrix(black_box(scope)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_discover_tests, bench_generate_matrix);
criterion_main!(benches);
