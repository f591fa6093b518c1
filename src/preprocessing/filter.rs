//! Фильтрация строк по категориальным и числовым условиям

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::Lt => value < threshold,
            CompareOp::Le => value <= threshold,
            CompareOp::Gt => value > threshold,
            CompareOp::Ge => value >= threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Equals { column: String, value: String },
    OneOf { column: String, values: Vec<String> },
    /// Нечисловая ячейка не удовлетворяет сравнению
    Compare { column: String, op: CompareOp, threshold: f64 },
    /// Ячейка непустая
    Present(String),
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Проверка, что все упомянутые колонки есть в таблице
    pub fn check_columns(&self, table: &Table) -> Result<()> {
        match self {
            Predicate::Equals { column, .. }
            | Predicate::OneOf { column, .. }
            | Predicate::Compare { column, .. }
            | Predicate::Present(column) => table.require_column(column).map(|_| ()),
            Predicate::All(items) | Predicate::Any(items) => {
                items.iter().try_for_each(|p| p.check_columns(table))
            }
            Predicate::Not(inner) => inner.check_columns(table),
        }
    }

    fn eval(&self, table: &Table, record: &Record) -> bool {
        // Колонки проверены заранее в check_columns
        let cell = |column: &str| table.column_index(column).and_then(|i| record.get(i));

        match self {
            Predicate::Equals { column, value } => cell(column) == Some(value.as_str()),
            Predicate::OneOf { column, values } => cell(column)
                .map(|v| values.iter().any(|candidate| candidate == v))
                .unwrap_or(false),
            Predicate::Compare {
                column,
                op,
                threshold,
            } => table
                .column_index(column)
                .and_then(|i| record.numeric(i))
                .map(|v| op.holds(v, *threshold))
                .unwrap_or(false),
            Predicate::Present(column) => cell(column).map(|v| !v.is_empty()).unwrap_or(false),
            Predicate::All(items) => items.iter().all(|p| p.eval(table, record)),
            Predicate::Any(items) => items.iter().any(|p| p.eval(table, record)),
            Predicate::Not(inner) => !inner.eval(table, record),
        }
    }
}

/// Отфильтрованная таблица, порядок строк сохраняется
pub fn apply(table: &Table, predicate: &Predicate) -> Result<Table> {
    predicate.check_columns(table)?;

    let records: Vec<Record> = table
        .records()
        .iter()
        .filter(|r| predicate.eval(table, r))
        .cloned()
        .collect();

    tracing::info!("Filter kept {} of {} rows", records.len(), table.len());

    Ok(table.with_records(records))
}
