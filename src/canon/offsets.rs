//! Mapping from variables to their columns in the flattened variable vector.

use std::collections::HashMap;

use crate::error::{CanonError, Result};
use crate::expr::{Shape, VarId};

/// Mapping from variable IDs to column indices in the optimization variable.
#[derive(Debug, Clone, Default)]
pub struct VariableOffsets {
    /// Map from variable ID to (start_col, size).
    pub id_to_col: HashMap<VarId, (usize, usize)>,
    /// Total number of columns covered so far.
    pub total_vars: usize,
}

impl VariableOffsets {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out variables back to back in the given order.
    pub fn from_vars(vars: &[(VarId, Shape)]) -> Self {
        let mut offsets = VariableOffsets::new();
        let mut offset = 0;

        for (var_id, shape) in vars {
            offsets.insert(*var_id, offset, shape.size());
            offset += shape.size();
        }

        offsets
    }

    /// Assign `size` columns starting at `offset` to a variable.
    pub fn insert(&mut self, var_id: VarId, offset: usize, size: usize) {
        self.id_to_col.insert(var_id, (offset, size));
        self.total_vars = self.total_vars.max(offset + size);
    }

    /// Get the column range for a variable.
    pub fn get(&self, var_id: VarId) -> Option<(usize, usize)> {
        self.id_to_col.get(&var_id).copied()
    }

    /// Get the first column of a variable.
    pub fn offset(&self, var_id: VarId) -> Result<usize> {
        self.get(var_id)
            .map(|(start, _)| start)
            .ok_or(CanonError::UnknownVariable(var_id))
    }

    /// Number of variables in the map.
    pub fn len(&self) -> usize {
        self.id_to_col.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_col.is_empty()
    }

    /// Check that the column ranges are disjoint and exactly cover `[0, n)`.
    pub fn validate(&self, n: usize) -> Result<()> {
        let mut ranges: Vec<(usize, usize)> = self.id_to_col.values().copied().collect();
        ranges.sort_unstable();

        let mut next = 0;
        for (start, size) in ranges {
            if start < next {
                return Err(CanonError::InvalidOffsets(format!(
                    "column {} is assigned to more than one variable",
                    start
                )));
            }
            if start > next {
                return Err(CanonError::InvalidOffsets(format!(
                    "columns {}..{} belong to no variable",
                    next, start
                )));
            }
            next = start + size;
        }

        if next != n {
            return Err(CanonError::InvalidOffsets(format!(
                "offsets cover {} columns but the problem has {}",
                next, n
            )));
        }
        Ok(())
    }
}
