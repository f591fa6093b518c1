//! Конвейер: загрузка -> фильтр -> кодирование -> признаки -> разбиение ->
//! преобразования -> группировка по классам -> внешний классификатор

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data;
use crate::error::{PipelineError, Result};
use crate::models::ExternalClassifier;
use crate::preprocessing::{
    assembler, feature_selection, filter, train_test_split, FeatureSchema, FittedTransforms,
    LabelEncoder, OneHotEncoder,
};
use crate::types::{ClassPartitionedMap, ClassificationResult, ClassifierInput, Table};

/// Подготовленный вход классификатора и обученные преобразования
pub struct PreparedData {
    /// Откуда взяты строки
    pub source: String,
    pub input: ClassifierInput,
    pub transforms: FittedTransforms,
    pub n_rows_loaded: usize,
    pub n_rows_filtered: usize,
    pub n_train: usize,
    pub n_test: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub classifier: String,
    pub n_rows_loaded: usize,
    pub n_rows_filtered: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub n_components: usize,
    pub explained_variance_ratio: Vec<f64>,
    pub training_counts: Vec<(String, usize)>,
    pub test_counts: Vec<(String, usize)>,
    pub result: ClassificationResult,
}

pub const IN_MEMORY_SOURCE: &str = "in-memory table";

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn prepare(&self) -> Result<PreparedData> {
        let table = data::load(&self.config.source)?;
        self.prepare_from(table, self.config.source.describe())
    }

    /// Подготовка уже загруженной таблицы; источник из конфигурации не используется
    pub fn prepare_table(&self, table: Table) -> Result<PreparedData> {
        self.prepare_from(table, IN_MEMORY_SOURCE.to_string())
    }

    fn prepare_from(&self, table: Table, source: String) -> Result<PreparedData> {
        let config = &self.config;
        let n_rows_loaded = table.len();

        // 1. Фильтрация
        let filtered = filter::apply(&table, &config.filter)?;
        if filtered.is_empty() {
            return Err(PipelineError::NoData(format!(
                "filter matched none of {} rows",
                n_rows_loaded
            )));
        }

        // 2. One-hot кодирование по всему отфильтрованному набору
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&filtered, &config.categorical_columns)?;

        // 3. Проверка схемы, метки и признаки
        let labeler = LabelEncoder::new(&config.label_column, &config.class_names);
        let schema = FeatureSchema::new(&config.feature_columns, labeler.indicator_columns())
            .validate(&encoded)?;
        let labels = labeler.encode(&encoded)?;
        let features = feature_selection::select(&schema, &encoded)?;

        // 4. Разбиение
        let split = train_test_split(&features, &labels, config.test_fraction, config.seed)?;

        // 5. Стандартизация -> PCA -> [-1, 1]
        let chain = FittedTransforms::fit(
            &split.x_train,
            &split.x_test,
            config.n_components,
            schema.feature_columns(),
        )?;

        // 6. Группировка по классам
        let training = assembler::assemble(&chain.train, &split.y_train, &config.class_names)?;
        let test = assembler::assemble(&chain.test, &split.y_test, &config.class_names)?;
        warn_empty_classes("training", &training);
        warn_empty_classes("test", &test);

        let (datapoints, datapoint_labels) = assembler::flatten(&test)?;

        tracing::info!(
            "Prepared classifier input: {} train / {} test vectors of dimension {}",
            training.total_rows(),
            test.total_rows(),
            datapoints.ncols()
        );

        Ok(PreparedData {
            source,
            input: ClassifierInput {
                training,
                test,
                datapoints,
                datapoint_labels,
                class_names: config.class_names.clone(),
            },
            transforms: chain.transforms,
            n_rows_loaded,
            n_rows_filtered: filtered.len(),
            n_train: split.y_train.len(),
            n_test: split.y_test.len(),
        })
    }

    pub fn run<C: ExternalClassifier>(&self, classifier: &mut C) -> Result<PipelineReport> {
        let prepared = self.prepare()?;
        self.run_prepared(prepared, classifier)
    }

    pub fn run_prepared<C: ExternalClassifier>(
        &self,
        prepared: PreparedData,
        classifier: &mut C,
    ) -> Result<PipelineReport> {
        tracing::info!("Running classifier '{}'", classifier.name());
        let result = classifier.run(&prepared.input)?;

        Ok(PipelineReport {
            generated_at: Utc::now(),
            source: prepared.source.clone(),
            classifier: classifier.name().to_string(),
            n_rows_loaded: prepared.n_rows_loaded,
            n_rows_filtered: prepared.n_rows_filtered,
            n_train: prepared.n_train,
            n_test: prepared.n_test,
            n_components: self.config.n_components,
            explained_variance_ratio: prepared
                .transforms
                .reducer()
                .explained_variance_ratio()
                .map(|r| r.to_vec())
                .unwrap_or_default(),
            training_counts: prepared.input.training.counts(),
            test_counts: prepared.input.test.counts(),
            result,
        })
    }
}

fn warn_empty_classes(split: &str, map: &ClassPartitionedMap) {
    for group in map.groups() {
        if group.vectors.is_empty() {
            tracing::warn!("Class '{}' has no {} vectors", group.name, split);
        }
    }
}
