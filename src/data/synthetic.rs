//! Встроенные синтетические наборы данных

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::types::{Record, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinDataset {
    /// Гауссовы кластеры: колонки `f0..`, категориальная колонка `class`
    Blobs {
        n_samples: usize,
        n_classes: usize,
        n_features: usize,
        seed: u64,
    },
}

impl BuiltinDataset {
    pub fn name(&self) -> String {
        match self {
            BuiltinDataset::Blobs {
                n_samples,
                n_classes,
                n_features,
                ..
            } => format!("blobs({}x{}, {} classes)", n_samples, n_features, n_classes),
        }
    }

    pub fn generate(&self) -> Result<Table> {
        match *self {
            BuiltinDataset::Blobs {
                n_samples,
                n_classes,
                n_features,
                seed,
            } => blobs(n_samples, n_classes, n_features, seed),
        }
    }
}

fn blobs(n_samples: usize, n_classes: usize, n_features: usize, seed: u64) -> Result<Table> {
    if n_classes == 0 || n_features == 0 {
        return Err(PipelineError::InvalidConfig(
            "blobs need at least one class and one feature".to_string(),
        ));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;

    // Центры кластеров
    let centers: Vec<Vec<f64>> = (0..n_classes)
        .map(|_| (0..n_features).map(|_| rng.gen_range(-5.0..5.0)).collect())
        .collect();

    let mut columns: Vec<String> = (0..n_features).map(|j| format!("f{}", j)).collect();
    columns.push("class".to_string());

    let mut records = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        // Классы по кругу, чтобы выборка была сбалансированной
        let class = i % n_classes;
        let mut values: Vec<String> = centers[class]
            .iter()
            .map(|c| format!("{}", c + noise.sample(&mut rng)))
            .collect();
        values.push(format!("class_{}", class));
        records.push(Record::new(values));
    }

    Table::new(columns, records)
}
