//! Понижение размерности методом главных компонент

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};

const MAX_SWEEPS: usize = 100;

/// PCA, обучаемый только на обучающей выборке
#[derive(Debug, Clone)]
pub struct Pca {
    n_components: usize,
    mean: Option<Array1<f64>>,
    /// n_components x n_features, строки ортонормированы
    components: Option<Array2<f64>>,
    explained_variance: Option<Array1<f64>>,
    explained_variance_ratio: Option<Array1<f64>>,
    is_fitted: bool,
}

impl Pca {
    pub fn new(n_components: usize) -> Self {
        Self {
            n_components,
            mean: None,
            components: None,
            explained_variance: None,
            explained_variance_ratio: None,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        let n_samples = X.nrows();
        let n_features = X.ncols();

        if n_samples < 2 {
            return Err(PipelineError::NoData(
                "PCA requires at least 2 training rows".to_string(),
            ));
        }
        if self.n_components == 0 || self.n_components > n_features.min(n_samples) {
            return Err(PipelineError::InvalidConfig(format!(
                "n_components must lie in [1, {}], got {}",
                n_features.min(n_samples),
                self.n_components
            )));
        }

        let mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::NoData("empty training set".to_string()))?;
        let centered = X - &mean;

        // Ковариационная матрица (n - 1 в знаменателе)
        let cov = centered.t().dot(&centered) / (n_samples as f64 - 1.0);
        if cov.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite { stage: "pca" });
        }

        let (eigenvalues, eigenvectors) = symmetric_eigen(&cov);

        // Сортировка по убыванию собственных значений
        let mut order: Vec<usize> = (0..n_features).collect();
        order.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));

        let mut components = Array2::zeros((self.n_components, n_features));
        let mut explained_variance = Array1::zeros(self.n_components);
        for (k, &idx) in order.iter().take(self.n_components).enumerate() {
            let mut direction = eigenvectors.column(idx).to_owned();

            // Знак: наибольшая по модулю компонента положительна
            let pivot = direction
                .iter()
                .copied()
                .fold(0.0_f64, |acc, v| if v.abs() > acc.abs() { v } else { acc });
            if pivot < 0.0 {
                direction.mapv_inplace(|v| -v);
            }

            components.row_mut(k).assign(&direction);
            explained_variance[k] = eigenvalues[idx].max(0.0);
        }

        let total_variance: f64 = eigenvalues.iter().map(|v| v.max(0.0)).sum::<f64>().max(1e-12);
        let explained_variance_ratio = &explained_variance / total_variance;

        tracing::debug!(
            "PCA fitted: {} -> {} dims, explained variance ratio {:?}",
            n_features,
            self.n_components,
            explained_variance_ratio
        );

        self.mean = Some(mean);
        self.components = Some(components);
        self.explained_variance = Some(explained_variance);
        self.explained_variance_ratio = Some(explained_variance_ratio);
        self.is_fitted = true;
        Ok(())
    }

    /// Проекция (X - mean) на главные направления
    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted("pca"));
        }

        let mean = self.mean.as_ref().ok_or(PipelineError::NotFitted("pca"))?;
        let components = self.components.as_ref().ok_or(PipelineError::NotFitted("pca"))?;

        if X.ncols() != mean.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "PCA fitted on {} features, got {}",
                mean.len(),
                X.ncols()
            )));
        }

        Ok((X - mean).dot(&components.t()))
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn components(&self) -> Option<&Array2<f64>> {
        self.components.as_ref()
    }

    pub fn explained_variance(&self) -> Option<&Array1<f64>> {
        self.explained_variance.as_ref()
    }

    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.explained_variance_ratio.as_ref()
    }
}

/// Собственные значения и векторы (по столбцам) симметричной матрицы,
/// циклический метод Якоби
fn symmetric_eigen(A: &Array2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = A.nrows();
    let mut a = A.clone();
    let mut v = Array2::<f64>::eye(n);

    let scale: f64 = a.iter().map(|x| x * x).sum::<f64>().max(f64::MIN_POSITIVE);

    for _ in 0..MAX_SWEEPS {
        let mut off = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                off += a[[p, q]] * a[[p, q]];
            }
        }
        if off <= 1e-24 * scale {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[[p, q]];
                if apq.abs() < f64::MIN_POSITIVE {
                    continue;
                }

                let theta = (a[[q, q]] - a[[p, p]]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                // A <- J^T A J
                for k in 0..n {
                    let akp = a[[k, p]];
                    let akq = a[[k, q]];
                    a[[k, p]] = c * akp - s * akq;
                    a[[k, q]] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[[p, k]];
                    let aqk = a[[q, k]];
                    a[[p, k]] = c * apk - s * aqk;
                    a[[q, k]] = s * apk + c * aqk;
                }
                // V <- V J
                for k in 0..n {
                    let vkp = v[[k, p]];
                    let vkq = v[[k, q]];
                    v[[k, p]] = c * vkp - s * vkq;
                    v[[k, q]] = s * vkp + c * vkq;
                }
            }
        }
    }

    (a.diag().to_owned(), v)
}
