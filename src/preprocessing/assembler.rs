//! Группировка векторов признаков по классам

use ndarray::Array2;

use crate::error::{PipelineError, Result};
use crate::types::{ClassGroup, ClassPartitionedMap};

/// Векторы с меткой `k` попадают в группу `class_names[k]`, порядок строк
/// сохраняется. Размер группы ограничен числом строк выборки.
pub fn assemble(
    x: &Array2<f64>,
    labels: &[usize],
    class_names: &[String],
) -> Result<ClassPartitionedMap> {
    if x.nrows() != labels.len() {
        return Err(PipelineError::InvalidConfig(format!(
            "{} vectors but {} labels",
            x.nrows(),
            labels.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(PipelineError::NoData(
            "cannot assemble classifier input from an empty split".to_string(),
        ));
    }
    if let Some(&bad) = labels.iter().find(|&&l| l >= class_names.len()) {
        return Err(PipelineError::InvalidConfig(format!(
            "label {} outside of {} declared classes",
            bad,
            class_names.len()
        )));
    }

    let cap = x.nrows();
    let groups = class_names
        .iter()
        .enumerate()
        .map(|(k, name)| ClassGroup {
            name: name.clone(),
            vectors: x
                .rows()
                .into_iter()
                .zip(labels)
                .filter(|(_, &label)| label == k)
                .map(|(row, _)| row.to_vec())
                .take(cap)
                .collect(),
        })
        .collect();

    Ok(ClassPartitionedMap::new(groups))
}

/// Все векторы подряд в порядке классов и их метки
pub fn flatten(map: &ClassPartitionedMap) -> Result<(Array2<f64>, Vec<usize>)> {
    let n_rows = map.total_rows();
    let dimension = map
        .groups()
        .iter()
        .flat_map(|g| g.vectors.first())
        .map(|v| v.len())
        .next()
        .ok_or_else(|| PipelineError::NoData("class map is empty".to_string()))?;

    let mut values = Vec::with_capacity(n_rows * dimension);
    let mut labels = Vec::with_capacity(n_rows);
    for (k, group) in map.groups().iter().enumerate() {
        for vector in &group.vectors {
            if vector.len() != dimension {
                return Err(PipelineError::InvalidConfig(format!(
                    "class '{}' holds a vector of dimension {}, expected {}",
                    group.name,
                    vector.len(),
                    dimension
                )));
            }
            values.extend_from_slice(vector);
            labels.push(k);
        }
    }

    let datapoints = Array2::from_shape_vec((n_rows, dimension), values)
        .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;

    Ok((datapoints, labels))
}
