//! Масштабирование в фиксированный интервал

#![allow(non_snake_case)]

use ndarray::{Array1, Array2, Axis};

use crate::error::{PipelineError, Result};

/// Целевой интервал для признаков классификатора
pub const FEATURE_RANGE: (f64, f64) = (-1.0, 1.0);

#[derive(Debug, Clone)]
pub struct MinMaxScaler {
    feature_range: (f64, f64),
    data_min: Option<Array1<f64>>,
    data_max: Option<Array1<f64>>,
    is_fitted: bool,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::with_range(FEATURE_RANGE)
    }

    pub fn with_range(feature_range: (f64, f64)) -> Self {
        Self {
            feature_range,
            data_min: None,
            data_max: None,
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, X: &Array2<f64>) -> Result<()> {
        if X.nrows() == 0 {
            return Err(PipelineError::NoData("nothing to fit range on".to_string()));
        }
        if X.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite { stage: "min-max scaler" });
        }

        let data_min = X.fold_axis(Axis(0), f64::INFINITY, |acc, v| acc.min(*v));
        let data_max = X.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, v| acc.max(*v));

        tracing::debug!("Range fitted: min={:?}, max={:?}", data_min, data_max);

        self.data_min = Some(data_min);
        self.data_max = Some(data_max);
        self.is_fitted = true;
        Ok(())
    }

    /// Обучение на объединении нескольких выборок (построчно)
    pub fn fit_union(&mut self, parts: &[&Array2<f64>]) -> Result<()> {
        let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
        let stacked = ndarray::concatenate(Axis(0), &views)
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        self.fit(&stacked)
    }

    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted("min-max scaler"));
        }

        let data_min = self.data_min.as_ref().ok_or(PipelineError::NotFitted("min-max scaler"))?;
        let data_max = self.data_max.as_ref().ok_or(PipelineError::NotFitted("min-max scaler"))?;

        if X.ncols() != data_min.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "range fitted on {} features, got {}",
                data_min.len(),
                X.ncols()
            )));
        }

        let (low, high) = self.feature_range;
        let mut scaled = X.clone();
        for mut row in scaled.rows_mut() {
            for (j, val) in row.iter_mut().enumerate() {
                let span = data_max[j] - data_min[j];
                // Константный признак отображается в нижнюю границу
                let unit = if span > 0.0 { (*val - data_min[j]) / span } else { 0.0 };
                *val = low + unit * (high - low);
            }
        }

        Ok(scaled)
    }

    pub fn fit_transform(&mut self, X: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(X)?;
        self.transform(X)
    }
}

impl Default for MinMaxScaler {
    fn default() -> Self {
        Self::new()
    }
}
