//! Загрузка CSV из файла, по URL или из встроенного набора

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::data::synthetic::BuiltinDataset;
use crate::error::{PipelineError, Result};
use crate::types::{Record, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Path(PathBuf),
    /// HTTP(S) адрес CSV-файла
    Url(String),
    Builtin(BuiltinDataset),
}

impl DataSource {
    /// Путь или URL, определяется по схеме
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Path(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
            DataSource::Builtin(dataset) => dataset.name(),
        }
    }
}

pub fn load(source: &DataSource) -> Result<Table> {
    let table = match source {
        DataSource::Path(path) => {
            let file = File::open(path).map_err(|e| PipelineError::Load {
                source_name: path.display().to_string(),
                message: e.to_string(),
            })?;
            load_from_reader(file)?
        }
        DataSource::Url(url) => {
            let body = reqwest::blocking::get(url.as_str())?
                .error_for_status()?
                .bytes()?;
            load_from_reader(body.as_ref())?
        }
        DataSource::Builtin(dataset) => dataset.generate()?,
    };

    tracing::info!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        source.describe()
    );

    Ok(table)
}

/// CSV с заголовком; значения не преобразуются
pub fn load_from_reader<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if columns.is_empty() {
        return Err(PipelineError::Load {
            source_name: "csv".to_string(),
            message: "missing header row".to_string(),
        });
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        records.push(Record::new(row.iter().map(|v| v.to_string()).collect()));
    }

    Table::new(columns, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARS: &str = "\
Make,Model,Type,Origin,DriveTrain,MSRP,EngineSize,Cylinders,Horsepower
Acura,MDX,SUV,Asia,All,\"$36,945\",3.5,6,265
Audi,A4 1.8T 4dr,Sedan,Europe,Front,\"$25,940\",1.8,4,170
Mazda,RX-8 4dr,Sports,Asia,Rear,\"$25,700\",1.3,,197
";

    #[test]
    fn loads_csv_verbatim() {
        let table = load_from_reader(CARS.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.columns().len(), 9);

        let msrp = table.require_column("MSRP").unwrap();
        assert_eq!(table.records()[0].get(msrp), Some("$36,945"));
        assert_eq!(table.records()[0].numeric(msrp), Some(36945.0));

        let cylinders = table.require_column("Cylinders").unwrap();
        assert_eq!(table.records()[2].numeric(cylinders), None);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        let data = "a,b\n1,2\n3\n";
        assert!(load_from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let source = DataSource::Path(PathBuf::from("/nonexistent/cars.csv"));
        assert!(matches!(load(&source), Err(PipelineError::Load { .. })));
    }

    #[test]
    fn parses_location_scheme() {
        assert!(matches!(
            DataSource::parse("https://example.org/cars.csv"),
            DataSource::Url(_)
        ));
        assert!(matches!(DataSource::parse("data/cars.csv"), DataSource::Path(_)));
    }
}
