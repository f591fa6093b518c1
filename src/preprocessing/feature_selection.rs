//! Схема признаков и выбор колонок
//!
//! Единственная точка проверки наличия колонок после кодирования:
//! все отсутствующие колонки (признаки и индикаторы классов) сообщаются
//! одной ошибкой до любых вычислений.

use ndarray::Array2;

use crate::error::{PipelineError, Result};
use crate::types::EncodedDataset;

pub struct FeatureSchema {
    feature_columns: Vec<String>,
    label_indicators: Vec<String>,
}

/// Схема, проверенная на конкретном наборе данных
#[derive(Debug, Clone)]
pub struct ValidatedSchema {
    feature_columns: Vec<String>,
}

impl ValidatedSchema {
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn dimension(&self) -> usize {
        self.feature_columns.len()
    }

    /// Индексы признаков в наборе; колонки ищутся по имени, а не по
    /// позициям из проверенного набора
    fn resolve(&self, dataset: &EncodedDataset) -> Result<Vec<usize>> {
        let missing: Vec<String> = self
            .feature_columns
            .iter()
            .filter(|c| dataset.column_index(c).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        Ok(self
            .feature_columns
            .iter()
            .filter_map(|c| dataset.column_index(c))
            .collect())
    }
}

impl FeatureSchema {
    pub fn new(feature_columns: &[String], label_indicators: &[String]) -> Self {
        Self {
            feature_columns: feature_columns.to_vec(),
            label_indicators: label_indicators.to_vec(),
        }
    }

    pub fn validate(&self, dataset: &EncodedDataset) -> Result<ValidatedSchema> {
        let missing: Vec<String> = self
            .feature_columns
            .iter()
            .chain(self.label_indicators.iter())
            .filter(|c| dataset.column_index(c).is_none())
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        Ok(ValidatedSchema {
            feature_columns: self.feature_columns.clone(),
        })
    }
}

/// Плотная матрица признаков в объявленном порядке
pub fn select(schema: &ValidatedSchema, dataset: &EncodedDataset) -> Result<Array2<f64>> {
    let indices = schema.resolve(dataset)?;
    let n_samples = dataset.nrows();
    let mut features = Array2::zeros((n_samples, schema.dimension()));

    for i in 0..n_samples {
        let row = dataset.row(i);
        for (j, &idx) in indices.iter().enumerate() {
            let value = row[idx];
            if value.is_nan() {
                return Err(PipelineError::MissingValue {
                    row: i,
                    column: schema.feature_columns[j].clone(),
                });
            }
            features[[i, j]] = value;
        }
    }

    tracing::info!(
        "Selected {} features for {} rows",
        schema.dimension(),
        n_samples
    );

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dataset() -> EncodedDataset {
        EncodedDataset::new(
            vec![
                "Horsepower".to_string(),
                "Weight".to_string(),
                "Type_SUV".to_string(),
                "Type_Sedan".to_string(),
            ],
            array![[265.0, 4451.0, 1.0, 0.0], [170.0, 3252.0, 0.0, 1.0]],
        )
        .unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selects_in_declared_order() {
        let schema = FeatureSchema::new(&names(&["Weight", "Horsepower"]), &names(&["Type_SUV"]));
        let validated = schema.validate(&dataset()).unwrap();
        let x = select(&validated, &dataset()).unwrap();
        assert_eq!(x, array![[4451.0, 265.0], [3252.0, 170.0]]);
    }

    #[test]
    fn reports_every_missing_column() {
        let schema = FeatureSchema::new(
            &names(&["Weight", "Origin_Asia"]),
            &names(&["Type_SUV", "Type_Wagon"]),
        );
        match schema.validate(&dataset()) {
            Err(PipelineError::MissingColumns(cols)) => {
                assert_eq!(cols, names(&["Origin_Asia", "Type_Wagon"]));
            }
            other => panic!("unexpected result: {:?}", other.map(|s| s.dimension())),
        }
    }

    #[test]
    fn narrower_dataset_is_rejected_by_select() {
        let validated = FeatureSchema::new(&names(&["Type_SUV"]), &[])
            .validate(&dataset())
            .unwrap();
        let narrow = EncodedDataset::new(names(&["Horsepower"]), array![[265.0]]).unwrap();
        assert!(matches!(
            select(&validated, &narrow),
            Err(PipelineError::MissingColumns(cols)) if cols == names(&["Type_SUV"])
        ));
    }

    #[test]
    fn missing_value_is_reported_with_position() {
        let dataset = EncodedDataset::new(
            names(&["Cylinders"]),
            array![[6.0], [f64::NAN]],
        )
        .unwrap();
        let validated = FeatureSchema::new(&names(&["Cylinders"]), &[])
            .validate(&dataset)
            .unwrap();
        assert!(matches!(
            select(&validated, &dataset),
            Err(PipelineError::MissingValue { row: 1, .. })
        ));
    }
}
