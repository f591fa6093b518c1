//! Цепочка преобразований: стандартизация -> PCA -> масштабирование в [-1, 1]
//!
//! Порядок этапов фиксирован и не настраивается. Стандартизация и PCA
//! обучаются только на обучающей выборке; масштабирование в интервал
//! обучается на объединении обучающей и тестовой выборок.

#![allow(non_snake_case)]

use ndarray::Array2;

use crate::error::{PipelineError, Result};
use crate::preprocessing::normalization::StandardScaler;
use crate::preprocessing::range::MinMaxScaler;
use crate::preprocessing::reduction::Pca;

#[derive(Debug, Clone)]
pub struct FittedTransforms {
    scaler: StandardScaler,
    reducer: Pca,
    range: MinMaxScaler,
}

/// Результат обучения цепочки вместе с преобразованными выборками
pub struct ChainOutput {
    pub transforms: FittedTransforms,
    pub train: Array2<f64>,
    pub test: Array2<f64>,
}

impl FittedTransforms {
    pub fn fit(
        X_train: &Array2<f64>,
        X_test: &Array2<f64>,
        n_components: usize,
        feature_names: &[String],
    ) -> Result<ChainOutput> {
        if X_train.ncols() != X_test.ncols() {
            return Err(PipelineError::InvalidConfig(format!(
                "train has {} features, test has {}",
                X_train.ncols(),
                X_test.ncols()
            )));
        }

        let mut scaler = StandardScaler::new().with_feature_names(feature_names);
        let train_scaled = scaler.fit_transform(X_train)?;
        let test_scaled = scaler.transform(X_test)?;

        let mut reducer = Pca::new(n_components);
        let train_reduced = reducer.fit_transform(&train_scaled)?;
        let test_reduced = reducer.transform(&test_scaled)?;

        let mut range = MinMaxScaler::new();
        range.fit_union(&[&train_reduced, &test_reduced])?;
        let train = range.transform(&train_reduced)?;
        let test = range.transform(&test_reduced)?;

        tracing::info!(
            "Transforms fitted: {} -> {} features",
            X_train.ncols(),
            n_components
        );

        Ok(ChainOutput {
            transforms: Self {
                scaler,
                reducer,
                range,
            },
            train,
            test,
        })
    }

    /// Применение всех этапов в фиксированном порядке
    pub fn transform(&self, X: &Array2<f64>) -> Result<Array2<f64>> {
        let scaled = self.scaler.transform(X)?;
        let reduced = self.reducer.transform(&scaled)?;
        let out = self.range.transform(&reduced)?;
        if out.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::NonFinite { stage: "transform chain" });
        }
        Ok(out)
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn reducer(&self) -> &Pca {
        &self.reducer
    }

    pub fn range(&self) -> &MinMaxScaler {
        &self.range
    }
}
