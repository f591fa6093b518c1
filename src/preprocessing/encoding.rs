//! One-hot кодирование категориальных колонок и вывод меток классов

#![allow(non_snake_case)]

use std::collections::BTreeSet;

use ndarray::Array2;

use crate::error::{PipelineError, Result};
use crate::types::{EncodedDataset, Table};

pub struct OneHotEncoder {
    /// Колонка -> отсортированные значения, найденные при обучении
    categories: Vec<(String, Vec<String>)>,
    numeric_columns: Vec<String>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
            numeric_columns: Vec::new(),
            is_fitted: false,
        }
    }

    /// Категории определяются один раз по всему отфильтрованному набору
    pub fn fit(&mut self, table: &Table, categorical_columns: &[String]) -> Result<()> {
        if table.is_empty() {
            return Err(PipelineError::NoData(
                "filtered dataset is empty, nothing to encode".to_string(),
            ));
        }

        let mut categories = Vec::with_capacity(categorical_columns.len());
        for column in categorical_columns {
            let idx = table.require_column(column)?;
            let values: BTreeSet<String> = table
                .records()
                .iter()
                .filter_map(|r| r.get(idx))
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
                .collect();
            categories.push((column.clone(), values.into_iter().collect()));
        }

        // Числовая колонка: все непустые значения разбираются как числа
        let mut numeric_columns = Vec::new();
        for (idx, column) in table.columns().iter().enumerate() {
            if categorical_columns.contains(column) {
                continue;
            }
            let mut non_empty = table
                .records()
                .iter()
                .filter_map(|r| r.get(idx))
                .filter(|v| !v.is_empty())
                .peekable();
            if non_empty.peek().is_none() {
                continue;
            }
            if non_empty.all(|v| crate::types::parse_numeric(v).is_some()) {
                numeric_columns.push(column.clone());
            } else {
                tracing::debug!("Dropping non-numeric column '{}'", column);
            }
        }

        self.categories = categories;
        self.numeric_columns = numeric_columns;
        self.is_fitted = true;
        Ok(())
    }

    pub fn output_columns(&self) -> Vec<String> {
        let mut columns = self.numeric_columns.clone();
        for (column, values) in &self.categories {
            for value in values {
                columns.push(format!("{}_{}", column, value));
            }
        }
        columns
    }

    pub fn transform(&self, table: &Table) -> Result<EncodedDataset> {
        if !self.is_fitted {
            return Err(PipelineError::NotFitted("one-hot encoder"));
        }

        let columns = self.output_columns();
        let mut X = Array2::from_elem((table.len(), columns.len()), f64::NAN);

        let numeric_idx: Vec<usize> = self
            .numeric_columns
            .iter()
            .map(|c| table.require_column(c))
            .collect::<Result<_>>()?;
        let categorical_idx: Vec<usize> = self
            .categories
            .iter()
            .map(|(c, _)| table.require_column(c))
            .collect::<Result<_>>()?;

        for (i, record) in table.records().iter().enumerate() {
            let mut j = 0;
            for &idx in &numeric_idx {
                if let Some(v) = record.numeric(idx) {
                    X[[i, j]] = v;
                }
                j += 1;
            }
            for ((_, values), &idx) in self.categories.iter().zip(&categorical_idx) {
                let cell = record.get(idx).unwrap_or("");
                for value in values {
                    X[[i, j]] = if cell == value { 1.0 } else { 0.0 };
                    j += 1;
                }
            }
        }

        tracing::info!(
            "Encoded {} rows into {} columns",
            table.len(),
            columns.len()
        );

        EncodedDataset::new(columns, X)
    }

    pub fn fit_transform(
        &mut self,
        table: &Table,
        categorical_columns: &[String],
    ) -> Result<EncodedDataset> {
        self.fit(table, categorical_columns)?;
        self.transform(table)
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Метки классов по индикаторным колонкам `"{label_column}_{class}"`
pub struct LabelEncoder {
    class_names: Vec<String>,
    indicator_columns: Vec<String>,
}

impl LabelEncoder {
    pub fn new(label_column: &str, class_names: &[String]) -> Self {
        Self {
            class_names: class_names.to_vec(),
            indicator_columns: class_names
                .iter()
                .map(|c| format!("{}_{}", label_column, c))
                .collect(),
        }
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn indicator_columns(&self) -> &[String] {
        &self.indicator_columns
    }

    /// Метка строки: индекс первого класса с индикатором 1
    pub fn encode(&self, dataset: &EncodedDataset) -> Result<Vec<usize>> {
        let missing: Vec<String> = self
            .indicator_columns
            .iter()
            .filter(|c| dataset.column_index(c).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns(missing));
        }

        let indices: Vec<usize> = self
            .indicator_columns
            .iter()
            .filter_map(|c| dataset.column_index(c))
            .collect();

        (0..dataset.nrows())
            .map(|row| {
                let values = dataset.row(row);
                indices
                    .iter()
                    .position(|&j| values[j] == 1.0)
                    .ok_or(PipelineError::Unlabeled { row })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_from_reader;

    fn table() -> Table {
        let data = "\
Make,Type,Origin,MSRP,Cylinders
Acura,SUV,Asia,\"$36,945\",6
Audi,Sedan,Europe,\"$25,940\",4
Mazda,Sports,Asia,\"$25,700\",
BMW,Sedan,Europe,\"$44,995\",6
";
        load_from_reader(data.as_bytes()).unwrap()
    }

    fn categorical() -> Vec<String> {
        vec!["Type".to_string(), "Origin".to_string()]
    }

    #[test]
    fn expands_categories_and_drops_text() {
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&table(), &categorical()).unwrap();

        assert_eq!(
            encoded.columns(),
            &[
                "MSRP",
                "Cylinders",
                "Type_SUV",
                "Type_Sedan",
                "Type_Sports",
                "Origin_Asia",
                "Origin_Europe"
            ]
        );
        assert_eq!(encoded.values()[[0, 0]], 36945.0);
        assert!(encoded.values()[[2, 1]].is_nan());
        assert_eq!(encoded.values()[[1, 3]], 1.0);
        assert_eq!(encoded.values()[[1, 2]], 0.0);
    }

    #[test]
    fn labels_follow_class_order() {
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&table(), &categorical()).unwrap();

        let classes = vec!["SUV".to_string(), "Sedan".to_string(), "Sports".to_string()];
        let labels = LabelEncoder::new("Type", &classes).encode(&encoded).unwrap();
        assert_eq!(labels, vec![0, 1, 2, 1]);
    }

    #[test]
    fn absent_category_is_a_missing_column() {
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&table(), &categorical()).unwrap();

        let classes = vec!["SUV".to_string(), "Wagon".to_string()];
        let result = LabelEncoder::new("Type", &classes).encode(&encoded);
        assert!(matches!(
            result,
            Err(PipelineError::MissingColumns(cols)) if cols == vec!["Type_Wagon".to_string()]
        ));
    }

    #[test]
    fn row_outside_declared_classes_is_unlabeled() {
        let mut encoder = OneHotEncoder::new();
        let encoded = encoder.fit_transform(&table(), &categorical()).unwrap();

        let classes = vec!["SUV".to_string(), "Sedan".to_string()];
        let result = LabelEncoder::new("Type", &classes).encode(&encoded);
        assert!(matches!(result, Err(PipelineError::Unlabeled { row: 2 })));
    }

    #[test]
    fn empty_table_is_no_data() {
        let empty = table().with_records(Vec::new());
        let mut encoder = OneHotEncoder::new();
        assert!(matches!(
            encoder.fit(&empty, &categorical()),
            Err(PipelineError::NoData(_))
        ));
    }
}
