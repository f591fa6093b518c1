/// Типы данных конвейера

use std::collections::HashMap;

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Строка исходных данных. Значения хранятся как есть, без преобразований.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    /// Числовое значение ячейки; `None` для пустых и нечисловых ячеек
    pub fn numeric(&self, idx: usize) -> Option<f64> {
        self.get(idx).and_then(parse_numeric)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Разбор числа с допуском для денежного формата ("$36,945")
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Таблица с именованными колонками
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        for (row, record) in records.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(PipelineError::Load {
                    source_name: "table".to_string(),
                    message: format!(
                        "row {} has {} fields, expected {}",
                        row,
                        record.len(),
                        columns.len()
                    ),
                });
            }
        }
        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
    }

    /// Новая таблица с теми же колонками и подмножеством строк
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            columns: self.columns.clone(),
            records,
        }
    }
}

/// Закодированный набор данных: числовые колонки и индикаторы one-hot.
/// Отсутствующие числовые значения хранятся как NaN.
#[derive(Debug, Clone)]
pub struct EncodedDataset {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    values: Array2<f64>,
}

impl EncodedDataset {
    pub fn new(columns: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if columns.len() != values.ncols() {
            return Err(PipelineError::InvalidConfig(format!(
                "{} column names for {} columns",
                columns.len(),
                values.ncols()
            )));
        }
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Ok(Self {
            columns,
            index,
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }
}

/// Векторы признаков одного класса
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub name: String,
    pub vectors: Vec<Vec<f64>>,
}

/// Отображение "имя класса -> упорядоченные векторы" в порядке списка классов
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassPartitionedMap {
    groups: Vec<ClassGroup>,
}

impl ClassPartitionedMap {
    pub fn new(groups: Vec<ClassGroup>) -> Self {
        Self { groups }
    }

    pub fn get(&self, class_name: &str) -> Option<&[Vec<f64>]> {
        self.groups
            .iter()
            .find(|g| g.name == class_name)
            .map(|g| g.vectors.as_slice())
    }

    pub fn groups(&self) -> &[ClassGroup] {
        &self.groups
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(|g| g.vectors.len()).sum()
    }

    pub fn counts(&self) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| (g.name.clone(), g.vectors.len()))
            .collect()
    }
}

/// Вход внешнего классификатора
#[derive(Debug, Clone)]
pub struct ClassifierInput {
    pub training: ClassPartitionedMap,
    pub test: ClassPartitionedMap,
    /// Все тестовые векторы подряд в порядке списка классов
    pub datapoints: Array2<f64>,
    /// Метки строк `datapoints`
    pub datapoint_labels: Vec<usize>,
    pub class_names: Vec<String>,
}

impl ClassifierInput {
    pub fn class_to_label(&self) -> HashMap<String, usize> {
        self.class_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect()
    }

    pub fn dimension(&self) -> usize {
        self.datapoints.ncols()
    }
}

/// Результат внешнего классификатора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub testing_accuracy: f64,
    pub predicted_labels: Vec<usize>,
    pub predicted_classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_numeric_handles_currency() {
        assert_eq!(parse_numeric("$36,945"), Some(36945.0));
        assert_eq!(parse_numeric(" 3.5 "), Some(3.5));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("Sedan"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn table_rejects_ragged_rows() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let records = vec![Record::new(vec!["1".to_string()])];
        assert!(Table::new(columns, records).is_err());
    }

    #[test]
    fn partitioned_map_counts_rows() {
        let map = ClassPartitionedMap::new(vec![
            ClassGroup {
                name: "a".to_string(),
                vectors: vec![vec![0.0], vec![1.0]],
            },
            ClassGroup {
                name: "b".to_string(),
                vectors: vec![vec![2.0]],
            },
        ]);
        assert_eq!(map.total_rows(), 3);
        assert_eq!(map.get("b").map(|v| v.len()), Some(1));
        assert!(map.get("c").is_none());
        assert_eq!(map.class_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
