//! Стандартизация признаков

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};

/// Минимальное стандартное отклонение, ниже которого признак считается константой
const MIN_STD: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    std: Option<Array1<f64>>,
    feature_names: Vec<String>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
            feature_names: Vec::new(),
            is_fitted: false,
        }
    }

    /// Имена признаков для сообщений об ошибках
    pub fn with_feature_names(mut self, names: &[String]) -> Self {
        self.feature_names = names.to_vec();
        self
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PipelineError::NoData("empty training set".to_string()));
        }

        // Среднее и стандартное отклонение (ddof = 0) по каждому признаку
        let mean = X
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::NoData("empty training set".to_string()))?;
        let std = X.std_axis(Axis(0), 0.0);

        if mean.iter().chain(std.iter()).any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite { stage: "standard scaler" });
        }

        // Деление на ноль не подменяется единицей, а сообщается
        if let Some(j) = std.iter().position(|s| *s < MIN_STD) {
            let column = self
                .feature_names
                .get(j)
                .cloned()
                .unwrap_or_else(|| format!("#{}", j));
            return Err(PipelineError::DegenerateFeature { column });
        }

        tracing::debug!("Scaler fitted: mean={:?}, std={:?}", mean, std);

        self.mean = Some(mean);
        self.std = Some(std);
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted("standard scaler"));
        }

        let mean = self.mean.as_ref().ok_or(PipelineError::NotFitted("standard scaler"))?;
        let std = self.std.as_ref().ok_or(PipelineError::NotFitted("standard scaler"))?;

        if X.ncols() != mean.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "scaler fitted on {} features, got {}",
                mean.len(),
                X.ncols()
            )));
        }

        // (X - mean) / std
        let mut normalized = X.clone();
        for mut row in normalized.rows_mut() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = (*val - mean[i]) / std[i];
            }
        }

        Ok(normalized)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }

    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    pub fn std(&self) -> Option<&Array1<f64>> {
        self.std.as_ref()
    }
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}
