//! Pure summation of finer-grained spectra into coarser views.
//!
//! Every function allocates a zero accumulator of the declared grid shape (or
//! the 1x1 placeholder when nothing has been written yet) and never mutates
//! its input.

use std::collections::BTreeMap;

use twod_core::errors::TwodError;
use twod_core::grid::{self, ComplexGrid};

use crate::taxonomy::{LiouvilleType, Process, Signal, PATHWAY_TYPES};

/// Pathway arrays of one type keyed by their tag.
pub type TaggedGrids = BTreeMap<String, ComplexGrid>;
/// Pathways resolution storage.
pub type PathwayMap = BTreeMap<LiouvilleType, TaggedGrids>;
/// Types resolution storage.
pub type TypeMap = BTreeMap<LiouvilleType, ComplexGrid>;
/// Processes resolution storage.
pub type ProcessMap = BTreeMap<Process, ComplexGrid>;
/// Signals resolution storage.
pub type SignalMap = BTreeMap<Signal, ComplexGrid>;

type Shape = Option<(usize, usize)>;

/// Sum over every tag stored for one type.
pub fn sum_tags(tagged: Option<&TaggedGrids>, shape: Shape) -> Result<ComplexGrid, TwodError> {
    let mut acc = grid::zeros(shape);
    if let Some(tagged) = tagged {
        for data in tagged.values() {
            grid::accumulate(&mut acc, data)?;
        }
    }
    Ok(acc)
}

fn sum_types_from_pathways(
    pathways: &PathwayMap,
    types: &[LiouvilleType],
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    let mut acc = grid::zeros(shape);
    for ty in types {
        if let Some(tagged) = pathways.get(ty) {
            for data in tagged.values() {
                grid::accumulate(&mut acc, data)?;
            }
        }
    }
    Ok(acc)
}

fn sum_types(
    stored: &TypeMap,
    types: &[LiouvilleType],
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    let mut acc = grid::zeros(shape);
    for ty in types {
        if let Some(data) = stored.get(ty) {
            grid::accumulate(&mut acc, data)?;
        }
    }
    Ok(acc)
}

fn sum_all<'a>(
    grids: impl Iterator<Item = &'a ComplexGrid>,
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    let mut acc = grid::zeros(shape);
    for data in grids {
        grid::accumulate(&mut acc, data)?;
    }
    Ok(acc)
}

/// Collapses the tag level: one array per pathway type, absent types as zeros.
pub fn pathways_to_types(pathways: &PathwayMap, shape: Shape) -> Result<TypeMap, TwodError> {
    PATHWAY_TYPES
        .iter()
        .map(|ty| Ok((*ty, sum_tags(pathways.get(ty), shape)?)))
        .collect()
}

/// Sum of all pathways of the types belonging to `process`.
pub fn pathways_to_process(
    pathways: &PathwayMap,
    process: Process,
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    sum_types_from_pathways(pathways, process.types(), shape)
}

/// Sum of all pathways of the types belonging to `signal`.
pub fn pathways_to_signal(
    pathways: &PathwayMap,
    signal: Signal,
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    sum_types_from_pathways(pathways, signal.types(), shape)
}

/// Sum of every stored pathway.
pub fn pathways_to_total(pathways: &PathwayMap, shape: Shape) -> Result<ComplexGrid, TwodError> {
    sum_types_from_pathways(pathways, &PATHWAY_TYPES, shape)
}

/// Sum of the type arrays belonging to `process`.
pub fn types_to_process(
    types: &TypeMap,
    process: Process,
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    sum_types(types, process.types(), shape)
}

/// Sum of the type arrays belonging to `signal`.
pub fn types_to_signal(
    types: &TypeMap,
    signal: Signal,
    shape: Shape,
) -> Result<ComplexGrid, TwodError> {
    sum_types(types, signal.types(), shape)
}

/// All four process arrays.
pub fn types_to_processes(types: &TypeMap, shape: Shape) -> Result<ProcessMap, TwodError> {
    Process::ALL
        .iter()
        .map(|process| Ok((*process, types_to_process(types, *process, shape)?)))
        .collect()
}

/// All three signal arrays.
pub fn types_to_signals(types: &TypeMap, shape: Shape) -> Result<SignalMap, TwodError> {
    Signal::ALL
        .iter()
        .map(|signal| Ok((*signal, types_to_signal(types, *signal, shape)?)))
        .collect()
}

/// Sum of every type array.
pub fn types_to_total(types: &TypeMap, shape: Shape) -> Result<ComplexGrid, TwodError> {
    sum_types(types, &PATHWAY_TYPES, shape)
}

/// Sum of every process array.
pub fn processes_to_total(processes: &ProcessMap, shape: Shape) -> Result<ComplexGrid, TwodError> {
    sum_all(processes.values(), shape)
}

/// Sum of every signal array.
pub fn signals_to_total(signals: &SignalMap, shape: Shape) -> Result<ComplexGrid, TwodError> {
    sum_all(signals.values(), shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn filled(value: f64) -> ComplexGrid {
        ComplexGrid::from_elem((2, 3), Complex64::new(value, -value))
    }

    #[test]
    fn absent_types_become_zero_arrays() {
        let mut pathways = PathwayMap::new();
        pathways
            .entry(LiouvilleType::R3g)
            .or_default()
            .insert("a".into(), filled(1.0));
        let types = pathways_to_types(&pathways, Some((2, 3))).unwrap();
        assert_eq!(types.len(), 8);
        assert_eq!(types[&LiouvilleType::R1g], ComplexGrid::zeros((2, 3)));
        assert_eq!(types[&LiouvilleType::R3g], filled(1.0));
    }

    #[test]
    fn placeholder_accumulator_without_shape() {
        let total = pathways_to_total(&PathwayMap::new(), None).unwrap();
        assert_eq!(total.dim(), (1, 1));
    }
}
