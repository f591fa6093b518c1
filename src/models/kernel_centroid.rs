//! Классический заменитель квантового ядерного классификатора

use ndarray::ArrayView1;

use crate::error::{PipelineError, Result};
use crate::models::classifier::ExternalClassifier;
use crate::preprocessing::assembler;
use crate::types::{ClassificationResult, ClassifierInput};

/// Упрощенный ядерный классификатор: класс с наибольшим средним
/// RBF-сходством с обучающими векторами
pub struct KernelCentroidClassifier {
    /// `None` -> 1 / размерность
    gamma: Option<f64>,
}

impl KernelCentroidClassifier {
    pub fn new(gamma: Option<f64>) -> Self {
        Self { gamma }
    }

    fn kernel(gamma: f64, a: ArrayView1<f64>, b: &[f64]) -> f64 {
        let dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
        (-gamma * dist).exp()
    }

    fn predict_one(&self, input: &ClassifierInput, gamma: f64, x: ArrayView1<f64>) -> usize {
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (k, group) in input.training.groups().iter().enumerate() {
            let score = group
                .vectors
                .iter()
                .map(|t| Self::kernel(gamma, x, t))
                .sum::<f64>()
                / group.vectors.len() as f64;
            if score > best_score {
                best = k;
                best_score = score;
            }
        }
        best
    }

    fn failure(&self, message: String) -> PipelineError {
        PipelineError::Classifier {
            name: self.name().to_string(),
            message,
        }
    }
}

impl Default for KernelCentroidClassifier {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ExternalClassifier for KernelCentroidClassifier {
    fn name(&self) -> &str {
        "kernel-centroid"
    }

    fn run(&mut self, input: &ClassifierInput) -> Result<ClassificationResult> {
        if let Some(group) = input.training.groups().iter().find(|g| g.vectors.is_empty()) {
            return Err(self.failure(format!("no training vectors for class '{}'", group.name)));
        }

        let dimension = input.dimension();
        if dimension == 0 {
            return Err(self.failure("zero-dimensional input".to_string()));
        }
        let gamma = self.gamma.unwrap_or(1.0 / dimension as f64);

        // Точность на тестовой выборке
        let (test_x, test_y) = assembler::flatten(&input.test)?;
        if test_x.ncols() != dimension {
            return Err(self.failure(format!(
                "test vectors have dimension {}, datapoints {}",
                test_x.ncols(),
                dimension
            )));
        }
        let correct = test_x
            .rows()
            .into_iter()
            .zip(&test_y)
            .filter(|(row, &label)| self.predict_one(input, gamma, row.view()) == label)
            .count();
        let testing_accuracy = correct as f64 / test_y.len() as f64;

        let predicted_labels: Vec<usize> = input
            .datapoints
            .rows()
            .into_iter()
            .map(|row| self.predict_one(input, gamma, row))
            .collect();
        let predicted_classes = predicted_labels
            .iter()
            .map(|&k| input.class_names[k].clone())
            .collect();

        tracing::info!(
            "{}: testing accuracy {:.3} on {} vectors",
            self.name(),
            testing_accuracy,
            test_y.len()
        );

        Ok(ClassificationResult {
            testing_accuracy,
            predicted_labels,
            predicted_classes,
        })
    }
}
