pub mod gap;

#[cfg(feature = "python")]
use gap::{group_by_length, mine_emerging_patterns, Item, MineError, MinerConfig, Pattern};
#[cfg(feature = "python")]
use numpy::ndarray::{Array2, ArrayView2};
#[cfg(feature = "python")]
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
#[cfg(feature = "python")]
use pyo3::exceptions::{PyRuntimeError, PyValueError};
#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn to_py_err(err: MineError) -> PyErr {
    match err {
        MineError::InvalidConfig(_) | MineError::TransactionTooLong { .. } => {
            PyValueError::new_err(err.to_string())
        }
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// One `(n, len)` array per pattern length, shortest first.
#[cfg(feature = "python")]
fn levels_to_arrays<'py>(
    py: Python<'py>,
    patterns: &[Pattern],
) -> PyResult<Vec<Bound<'py, PyArray2<Item>>>> {
    let mut result = Vec::new();

    for level in group_by_length(patterns) {
        if level.is_empty() {
            continue;
        }

        let pattern_len = level.pattern_len;
        let num_patterns = level.len();
        let mut data = Vec::with_capacity(num_patterns * pattern_len);
        for pattern in level.iter_patterns() {
            data.extend_from_slice(pattern);
        }

        let array = Array2::from_shape_vec((num_patterns, pattern_len), data)
            .map_err(|_| PyValueError::new_err("Failed to create array"))?;

        result.push(array.into_pyarray(py));
    }

    Ok(result)
}

/// Rows of a padded matrix; a row ends at its first negative entry.
#[cfg(feature = "python")]
fn padded_rows(matrix: ArrayView2<i32>) -> Vec<Vec<Item>> {
    matrix
        .rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .take_while(|&&value| value >= 0)
                .map(|&value| value as Item)
                .collect()
        })
        .collect()
}

#[cfg(feature = "python")]
#[allow(clippy::too_many_arguments)]
fn run<'py>(
    py: Python<'py>,
    positive: Vec<Vec<Item>>,
    negative: Vec<Vec<Item>>,
    gap: usize,
    positive_lower_bound: usize,
    negative_upper_bound: usize,
    workers: usize,
    batch_size: usize,
) -> PyResult<Vec<Bound<'py, PyArray2<Item>>>> {
    let config = MinerConfig::new(gap, positive_lower_bound, negative_upper_bound)
        .with_workers(workers)
        .with_batch_size(batch_size);

    let patterns = py
        .allow_threads(|| mine_emerging_patterns(positive, negative, &config))
        .map_err(to_py_err)?;

    levels_to_arrays(py, &patterns)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (positive, negative, gap, positive_lower_bound, negative_upper_bound, workers=1, batch_size=1000))]
#[allow(clippy::too_many_arguments)]
fn mine_emerging<'py>(
    py: Python<'py>,
    positive: Vec<Vec<Item>>,
    negative: Vec<Vec<Item>>,
    gap: usize,
    positive_lower_bound: usize,
    negative_upper_bound: usize,
    workers: usize,
    batch_size: usize,
) -> PyResult<Vec<Bound<'py, PyArray2<Item>>>> {
    run(py, positive, negative, gap, positive_lower_bound, negative_upper_bound, workers, batch_size)
}

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(signature = (positive, negative, gap, positive_lower_bound, negative_upper_bound, workers=1, batch_size=1000))]
#[allow(clippy::too_many_arguments)]
fn mine_emerging_padded<'py>(
    py: Python<'py>,
    positive: PyReadonlyArray2<'py, i32>,
    negative: PyReadonlyArray2<'py, i32>,
    gap: usize,
    positive_lower_bound: usize,
    negative_upper_bound: usize,
    workers: usize,
    batch_size: usize,
) -> PyResult<Vec<Bound<'py, PyArray2<Item>>>> {
    let positive = padded_rows(positive.as_array());
    let negative = padded_rows(negative.as_array());
    run(py, positive, negative, gap, positive_lower_bound, negative_upper_bound, workers, batch_size)
}

#[cfg(feature = "python")]
#[pymodule]
fn gapminer(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(mine_emerging, m)?)?;
    m.add_function(wrap_pyfunction!(mine_emerging_padded, m)?)?;
    Ok(())
}
