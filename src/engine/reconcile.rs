//! Column reconciliation.
//!
//! Merges a client-supplied desired column list against the stored
//! columns: retained ids keep their task lists (and take the new name),
//! new ids become empty columns, absent ids are dropped together with
//! their tasks. The result follows the desired order, which is how
//! column reordering is expressed.
//!
//! A bare rename does not rewrite the `status` of the tasks already in
//! the column; the relocation paths own that field.

use crate::board::{Column, ColumnSpec};
use crate::error::{EngineError, Result};
use std::collections::HashSet;

/// Reject desired lists that would violate column-id uniqueness or
/// create two columns with the same name (which would make status →
/// column resolution ambiguous).
pub fn validate_column_specs(desired: &[ColumnSpec]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for spec in desired {
        if !ids.insert(spec.id) {
            return Err(EngineError::invalid_ref(format!(
                "duplicate column id {} in column list",
                spec.id
            )));
        }
        if !names.insert(spec.name.as_str()) {
            return Err(EngineError::invalid_ref(format!(
                "duplicate column name {:?} in column list",
                spec.name
            )));
        }
    }
    Ok(())
}

/// Compute the new column list for a board edit.
pub fn reconcile_columns(existing: Vec<Column>, desired: &[ColumnSpec]) -> Result<Vec<Column>> {
    validate_column_specs(desired)?;

    let mut existing: Vec<Option<Column>> = existing.into_iter().map(Some).collect();
    let columns = desired
        .iter()
        .map(|spec| {
            let retained = existing
                .iter_mut()
                .find(|c| c.as_ref().is_some_and(|c| c.id == spec.id))
                .and_then(Option::take);
            match retained {
                Some(mut column) => {
                    // Rename in place, tasks untouched.
                    column.name = spec.name.clone();
                    column
                }
                None => Column::new(spec.id, spec.name.clone()),
            }
        })
        .collect();
    Ok(columns)
}
