/// Запуск конвейера QSVM на фиксированной конфигурации

use anyhow::Context;
use tracing_subscriber;

use qsvm_prep::{
    data::DataSource,
    KernelCentroidClassifier, Pipeline, PipelineConfig,
};

/// Путь или URL к CSV с автомобилями
const DATA_ENV: &str = "QSVM_DATA";

fn main() -> anyhow::Result<()> {
    // Инициализация логирования
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::var(DATA_ENV) {
        Ok(location) => PipelineConfig::vehicles(DataSource::parse(&location)),
        Err(_) => {
            tracing::info!("{} not set, using built-in blobs", DATA_ENV);
            PipelineConfig::blobs(100, 3, 13, 10598)
        }
    };

    let pipeline = Pipeline::new(config).context("invalid pipeline configuration")?;
    let mut classifier = KernelCentroidClassifier::default();
    let report = pipeline
        .run(&mut classifier)
        .context("pipeline run failed")?;

    println!("testing success ratio: {}", report.result.testing_accuracy);
    println!("predicted labels: {:?}", report.result.predicted_labels);
    println!("predicted classes: {:?}", report.result.predicted_classes);
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
