use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use medcost_rs::{
    model::{Fitted, InferenceModel, RandomForest, RandomForestRegressor},
    preprocessing::{Applicant, Region, Sex, Smoker},
};
use ndarray::{Array1, Array2};

/// Insurance-shaped synthetic data: charges grow with age and BMI, jump for smokers.
fn synthetic(n: usize) -> (Array2<f64>, Array1<f64>) {
    let mut x = Vec::with_capacity(n * 6);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let applicant = Applicant {
            age: 18 + (i * 7 % 47) as u32,
            sex: if i % 2 == 0 { Sex::Male } else { Sex::Female },
            bmi: 18.0 + (i * 13 % 200) as f64 / 10.0,
            children: (i % 4) as u32,
            smoker: if i % 5 == 0 { Smoker::Yes } else { Smoker::No },
            region: match i % 4 {
                0 => Region::Southwest,
                1 => Region::Southeast,
                2 => Region::Northwest,
                _ => Region::Northeast,
            },
        };
        let smoker = if applicant.smoker == Smoker::Yes { 23_000.0 } else { 0.0 };
        y.push(250.0 * applicant.age as f64 + 300.0 * applicant.bmi + smoker);
        x.extend_from_slice(applicant.features().as_slice());
    }
    (
        Array2::from_shape_vec((n, 6), x).expect("shape"),
        Array1::from_vec(y),
    )
}

fn train(n_samples: usize, n_trees: usize) -> RandomForest<Fitted> {
    let (x, y) = synthetic(n_samples);
    RandomForestRegressor::new()
        .with_n_estimators(n_trees)
        .fit(&x, &y)
        .expect("Failed to fit forest")
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);
    for n in [200, 1338].iter() {
        let (x, y) = synthetic(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, _| {
            b.iter(|| {
                let forest = RandomForestRegressor::new()
                    .with_n_estimators(20)
                    .fit(black_box(&x), black_box(&y));
                black_box(forest)
            });
        });
    }
    group.finish();
}

fn bench_predict_single(c: &mut Criterion) {
    let forest = train(1338, 100);
    let input = Applicant::default().features();

    c.bench_function("forest_predict_single", |b| {
        b.iter(|| black_box(forest.predict(black_box(input.as_slice()))));
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let forest = train(1338, 100);

    for batch_size in [10, 100, 1000].iter() {
        let (x, _) = synthetic(*batch_size);
        c.bench_with_input(
            BenchmarkId::new("forest_predict_batch", batch_size),
            batch_size,
            |b, _| {
                b.iter(|| black_box(forest.predict_batch(black_box(&x))));
            },
        );
    }
}

criterion_group!(benches, bench_fit, bench_predict_single, bench_predict_batch);
criterion_main!(benches);
