use criterion::{black_box, criterion_group, criterion_main, Criterion};
use weather_predict::{
    DatasetSource, ForestConfig, HistoricalDataset, RandomForestRegressor, TrainedRainClassifier,
};

const DIRECTIONS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

fn weather_csv(rows: usize) -> String {
    let mut csv =
        String::from("MinTemp,MaxTemp,WindGustDir,WindGustSpeed,Humidity,Pressure,Temp,RainTomorrow\n");
    for i in 0..rows {
        let t = i as f64;
        let temp = 15.0 + 8.0 * (0.3 * t).sin();
        let humidity = 60.0 + 25.0 * (0.2 * t).cos();
        csv.push_str(&format!(
            "{:.1},{:.1},{},{},{:.0},{:.1},{:.1},{}\n",
            temp - 6.0,
            temp + 5.0,
            DIRECTIONS[i % 16],
            30 + (i % 11) * 3,
            humidity,
            1000.0 + 0.1 * t,
            temp,
            if humidity > 70.0 { "Yes" } else { "No" }
        ));
    }
    csv
}

fn bench_training(c: &mut Criterion) {
    let source = DatasetSource::csv_bytes(weather_csv(500).into_bytes());
    let dataset = HistoricalDataset::load(&source).expect("synthetic log loads");
    let config = ForestConfig::builder().n_trees(50).build();

    c.bench_function("rain_classifier_500_rows", |b| {
        b.iter(|| TrainedRainClassifier::train(black_box(&dataset), &config))
    });

    let temps = dataset.numeric_column("Temp").expect("Temp column");
    let x: Vec<Vec<f64>> = temps[..temps.len() - 1].iter().map(|&v| vec![v]).collect();
    let y = temps[1..].to_vec();
    c.bench_function("lag_regressor_500_rows", |b| {
        b.iter(|| RandomForestRegressor::fit(black_box(&x), black_box(&y), &config))
    });
}

criterion_group!(benches, bench_training);
criterion_main!(benches);
