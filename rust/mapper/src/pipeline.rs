// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Whole-document transformation pass.
//!
//! Iterates every metadata attachment in document order, matches its
//! field/value against the lookup table and, on a hit, runs owner
//! resolution, geometry conflict resolution and material assignment in
//! sequence. One resolver instance spans the pass so conflicts are
//! detected across attachments.

use rustc_hash::FxHashSet;

use ifc_matmap_core::{AttributeValue, IfcType, Model};

use crate::assigner::assign;
use crate::error::Result;
use crate::index::MaterialIndex;
use crate::owners::owners_of;
use crate::resolver::GeometryResolver;
use crate::styles::StyleLedger;
use crate::table::MaterialTable;

/// Counters for one transformation pass.
///
/// A run with skipped attachments completed in a degraded state; the
/// document is still written.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Attachments whose field/value matched a rule and were applied
    pub attachments_matched: usize,
    /// Lookup hits that named a material with no indexed entities
    pub attachments_skipped: usize,
    pub products_linked: usize,
    pub clones_made: usize,
    pub markers_created: usize,
    pub markers_detached: usize,
}

/// Apply the lookup table to the whole document.
///
/// Recoverable problems are logged and local to one attachment; only a
/// representation item outside the closed geometric/mapped set aborts
/// the pass.
pub fn apply_material_mapping(model: &mut Model, table: &MaterialTable) -> Result<RunSummary> {
    for (field, value, material) in table.rules() {
        tracing::debug!(field, value, material, "mapping rule");
    }

    let index = MaterialIndex::build(model);
    let ledger = StyleLedger::build(model);
    let mut resolver = GeometryResolver::new();
    let mut summary = RunSummary::default();

    // Snapshot ids up front; inserts during the pass must not affect the
    // iteration order
    let attachments = model.entities_of(IfcType::IfcPropertySingleValue);

    for attachment in attachments {
        let Some(entity) = model.entity(attachment) else {
            continue;
        };
        // IfcPropertySingleValue: Name, Description, NominalValue, Unit
        let Some(field) = entity.get_string(0).map(str::to_string) else {
            continue;
        };
        let Some(value) = entity.get(2).and_then(AttributeValue::as_display_string) else {
            tracing::info!(attachment, "property has no nominal value; skipped");
            continue;
        };

        let Some(material) = table.material_for(&field, &value) else {
            continue;
        };
        let Some(entry) = index.get(material) else {
            tracing::warn!(material, "failed to find material entities for lookup hit");
            summary.attachments_skipped += 1;
            continue;
        };

        tracing::debug!(attachment, field = %field, value = %value, material, "applying material");
        summary.attachments_matched += 1;

        let products = owners_of(model, attachment);
        let mut leaves = FxHashSet::default();
        for &product in &products {
            leaves.extend(resolver.resolve(model, product)?);
        }

        let outcome = assign(model, entry, &leaves, &products, &ledger)?;
        summary.products_linked += outcome.products_linked;
        summary.markers_created += outcome.markers_created;
        summary.markers_detached += outcome.markers_detached;
    }

    summary.clones_made = resolver.clones_made();
    Ok(summary)
}
