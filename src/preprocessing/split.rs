//! Детерминированное разбиение на обучающую и тестовую выборки

use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub y_train: Vec<usize>,
    pub x_test: Array2<f64>,
    pub y_test: Vec<usize>,
}

/// Тестовая доля `ceil(f * n)` строк, остальные в обучение.
/// Стратификации нет.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &[usize],
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidConfig(format!(
            "test fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }
    if x.nrows() != y.len() {
        return Err(PipelineError::InvalidConfig(format!(
            "{} feature rows but {} labels",
            x.nrows(),
            y.len()
        )));
    }

    let n_samples = x.nrows();
    // Поправка на погрешность: 0.3 * 100 == 30.000000000000004
    let n_test = (test_fraction * n_samples as f64 - 1e-9).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::NoData(format!(
            "{} rows cannot be split with test fraction {}",
            n_samples, test_fraction
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);

    tracing::info!("Split {} rows: {} train, {} test", n_samples, n_train, n_test);

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), train_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        x_test: x.select(Axis(0), test_idx),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
