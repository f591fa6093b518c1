//! Конфигурация конвейера
//!
//! Все параметры (seed, доля теста, размерность, классы, колонки) задаются
//! явно при построении конвейера и передаются в каждый этап.

use serde::{Deserialize, Serialize};

use crate::data::{BuiltinDataset, DataSource};
use crate::error::{PipelineError, Result};
use crate::preprocessing::filter::{CompareOp, Predicate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub source: DataSource,
    #[serde(default = "default_filter")]
    pub filter: Predicate,
    /// Колонки, раскрываемые в индикаторы one-hot
    pub categorical_columns: Vec<String>,
    /// Категориальная колонка, из индикаторов которой выводится метка
    pub label_column: String,
    pub class_names: Vec<String>,
    /// Признаки в порядке объявления (числовые и индикаторные)
    pub feature_columns: Vec<String>,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Размерность после PCA (число кубитов)
    #[serde(default = "default_n_components")]
    pub n_components: usize,
}

fn default_filter() -> Predicate { Predicate::All(Vec::new()) }
fn default_test_fraction() -> f64 { 0.3 }
fn default_seed() -> u64 { 10598 }
fn default_n_components() -> usize { 5 }

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.class_names.len() < 2 {
            return Err(PipelineError::InvalidConfig(
                "at least two class names are required".to_string(),
            ));
        }
        for (i, name) in self.class_names.iter().enumerate() {
            if self.class_names[..i].contains(name) {
                return Err(PipelineError::InvalidConfig(format!(
                    "duplicate class name '{}'",
                    name
                )));
            }
        }
        if !self.categorical_columns.contains(&self.label_column) {
            return Err(PipelineError::InvalidConfig(format!(
                "label column '{}' must be listed as categorical",
                self.label_column
            )));
        }
        if self.feature_columns.is_empty() {
            return Err(PipelineError::InvalidConfig(
                "feature column list is empty".to_string(),
            ));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.n_components == 0 || self.n_components > self.feature_columns.len() {
            return Err(PipelineError::InvalidConfig(format!(
                "n_components must lie in [1, {}], got {}",
                self.feature_columns.len(),
                self.n_components
            )));
        }
        Ok(())
    }

    /// Классификация легковых автомобилей по типу кузова
    pub fn vehicles(source: DataSource) -> Self {
        let class_names = ["SUV", "Sedan", "Sports"];
        let feature_columns = [
            "EngineSize",
            "Cylinders",
            "Horsepower",
            "MPG_City",
            "MPG_Highway",
            "Weight",
            "Wheelbase",
            "Length",
            "MSRP",
            "Origin_Asia",
            "Origin_Europe",
            "DriveTrain_All",
            "DriveTrain_Front",
        ];

        Self {
            source,
            filter: Predicate::All(vec![
                Predicate::OneOf {
                    column: "Type".to_string(),
                    values: class_names.iter().map(|c| c.to_string()).collect(),
                },
                Predicate::Present("Cylinders".to_string()),
                Predicate::Compare {
                    column: "Horsepower".to_string(),
                    op: CompareOp::Ge,
                    threshold: 100.0,
                },
            ]),
            categorical_columns: vec![
                "Type".to_string(),
                "Origin".to_string(),
                "DriveTrain".to_string(),
            ],
            label_column: "Type".to_string(),
            class_names: class_names.iter().map(|c| c.to_string()).collect(),
            feature_columns: feature_columns.iter().map(|c| c.to_string()).collect(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            n_components: default_n_components(),
        }
    }

    /// Синтетические кластеры, все признаки `f*` и классы `class_*`
    pub fn blobs(n_samples: usize, n_classes: usize, n_features: usize, seed: u64) -> Self {
        Self {
            source: DataSource::Builtin(BuiltinDataset::Blobs {
                n_samples,
                n_classes,
                n_features,
                seed,
            }),
            filter: default_filter(),
            categorical_columns: vec!["class".to_string()],
            label_column: "class".to_string(),
            class_names: (0..n_classes).map(|k| format!("class_{}", k)).collect(),
            feature_columns: (0..n_features).map(|j| format!("f{}", j)).collect(),
            test_fraction: default_test_fraction(),
            seed,
            n_components: default_n_components().min(n_features),
        }
    }

    /// Имя индикаторной колонки класса
    pub fn class_indicator(&self, class_name: &str) -> String {
        format!("{}_{}", self.label_column, class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicles_preset_is_valid() {
        let config = PipelineConfig::vehicles(DataSource::Path("cars.csv".into()));
        assert!(config.validate().is_ok());
        assert_eq!(config.feature_columns.len(), 13);
        assert_eq!(config.class_indicator("SUV"), "Type_SUV");
    }

    #[test]
    fn rejects_fraction_outside_unit_interval() {
        let mut config = PipelineConfig::blobs(100, 3, 13, 1);
        config.test_fraction = 1.0;
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_too_many_components() {
        let mut config = PipelineConfig::blobs(100, 3, 4, 1);
        config.n_components = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_config_uses_defaults() {
        let json = r#"{
            "source": { "path": "cars.csv" },
            "categorical_columns": ["Type"],
            "label_column": "Type",
            "class_names": ["SUV", "Sedan"],
            "feature_columns": ["EngineSize", "Horsepower", "Weight", "Length", "MSRP"]
        }"#;
        let config = PipelineConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 10598);
        assert_eq!(config.n_components, 5);
        assert!((config.test_fraction - 0.3).abs() < 1e-12);
    }
}
