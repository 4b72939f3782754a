//! Rename reconciliation.
//!
//! A naive column diff reports a rename as a removed column plus an added
//! column, which a renderer would turn into a data-destroying drop/create.
//! This pass re-tags such pairs as a single rename entry: a removed and an
//! added column in the same table are merged when their core shape (type,
//! nullability, size, text-ness, default, reference target) matches, and
//! each side's exclusive flags survive as added/removed markers on the
//! merged entry. Matching is symmetric in entry order, so it holds whether
//! the add or the remove appears first in the raw diff.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use tabledef_core::prelude::ColumnDefinition;

use crate::differ::diff_column;
use crate::entry::ChangeEntry;

/// Merges removed+added column pairs that represent renames.
///
/// Expects the entries of a single table's diff. Entries that take part in
/// a merge are replaced by one `ColumnModified` at the position of the
/// earlier of the two; everything else keeps its order.
#[must_use]
pub fn reconcile_renames(entries: Vec<ChangeEntry>) -> Vec<ChangeEntry> {
    let mut merged: HashMap<usize, ChangeEntry> = HashMap::new();
    let mut consumed: HashSet<usize> = HashSet::new();

    for (i, entry) in entries.iter().enumerate() {
        if consumed.contains(&i) {
            continue;
        }
        let ChangeEntry::ColumnRemoved(before) = entry else {
            continue;
        };

        for (j, candidate) in entries.iter().enumerate() {
            if i == j || consumed.contains(&j) {
                continue;
            }
            let ChangeEntry::ColumnAdded(after) = candidate else {
                continue;
            };
            if !is_rename_candidate(before, after) {
                continue;
            }

            debug!(
                table = %before.table_name,
                from = %before.name,
                to = %after.name,
                "reconciled drop+add pair into a rename"
            );

            let mut changes = diff_column(before, after).unwrap_or_default();
            changes.renamed_from = Some(before.name.clone());

            consumed.insert(i);
            consumed.insert(j);
            merged.insert(
                i.min(j),
                ChangeEntry::ColumnModified {
                    table: before.table_name.clone(),
                    before: before.clone(),
                    after: after.clone(),
                    changes,
                },
            );
            break;
        }
    }

    if consumed.is_empty() {
        return entries;
    }

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if let Some(replacement) = merged.remove(&index) {
                Some(replacement)
            } else if consumed.contains(&index) {
                None
            } else {
                Some(entry)
            }
        })
        .collect()
}

/// Whether a removed and an added column plausibly describe one rename.
///
/// The core shape must match exactly; constraint flags (`unique`,
/// `primary_key`, `generated`) may differ and become change markers on the
/// merged entry.
fn is_rename_candidate(before: &ColumnDefinition, after: &ColumnDefinition) -> bool {
    before.table_name == after.table_name
        && before.name != after.name
        && before.base_type == after.base_type
        && before.nullable == after.nullable
        && before.size_bound == after.size_bound
        && before.is_large_text == after.is_large_text
        && before.default_value == after.default_value
        && before.references_table == after.references_table
        && before.references_column == after.references_column
}
