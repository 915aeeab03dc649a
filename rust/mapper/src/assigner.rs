// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material assignment.
//!
//! Once a leaf set has been resolved, links the governing products into
//! the material's relationship and attaches a fresh appearance marker to
//! every leaf. Either half can be missing from the material index, in
//! which case that half is skipped and logged (partial application).

use rustc_hash::FxHashSet;

use ifc_matmap_core::{AttributeValue, Entity, Model};

use crate::error::Result;
use crate::index::MaterialEntry;
use crate::styles::StyleLedger;

/// What one assignment actually did
#[derive(Debug, Default)]
pub struct AssignOutcome {
    pub products_linked: usize,
    pub markers_created: usize,
    pub markers_detached: usize,
}

/// Apply a material to a resolved leaf set.
///
/// Related-object collections only grow: products already present are
/// left alone, new ones are appended after the existing entries. Leaves
/// that already carry a marker get it detached first; the detached marker
/// entity stays in the document.
pub fn assign(
    model: &mut Model,
    entry: MaterialEntry,
    leaves: &FxHashSet<u32>,
    products: &[u32],
    ledger: &StyleLedger,
) -> Result<AssignOutcome> {
    let mut outcome = AssignOutcome::default();

    match entry.relationship {
        Some(rel) => {
            // IfcRelAssociatesMaterial: GlobalId, OwnerHistory, Name,
            // Description, RelatedObjects, RelatingMaterial
            let mut related = model
                .expect(rel)?
                .get_list(4)
                .map(<[AttributeValue]>::to_vec)
                .unwrap_or_default();
            let present: FxHashSet<u32> = related
                .iter()
                .filter_map(AttributeValue::as_entity_ref)
                .collect();
            for &product in products {
                if !present.contains(&product) {
                    related.push(AttributeValue::EntityRef(product));
                    outcome.products_linked += 1;
                }
            }
            if outcome.products_linked > 0 {
                model.set_attr(rel, 4, AttributeValue::List(related))?;
            }
        }
        None => {
            tracing::warn!("material has no association relationship; products not linked");
        }
    }

    match entry.style {
        Some(style) => {
            // Deterministic marker creation order
            let mut sorted: Vec<u32> = leaves.iter().copied().collect();
            sorted.sort_unstable();

            for leaf in sorted {
                if let Some(marker) = ledger.marker_for(leaf) {
                    // The item already carried an appearance from a prior
                    // authoring pass; orphan it
                    ledger.detach(model, marker)?;
                    outcome.markers_detached += 1;
                }

                let assignment = model.insert(Entity::new(
                    "IFCPRESENTATIONSTYLEASSIGNMENT",
                    vec![AttributeValue::List(vec![AttributeValue::EntityRef(style)])],
                ));
                model.insert(Entity::new(
                    "IFCSTYLEDITEM",
                    vec![
                        AttributeValue::EntityRef(leaf),
                        AttributeValue::List(vec![AttributeValue::EntityRef(assignment)]),
                        AttributeValue::String(String::new()),
                    ],
                ));
                outcome.markers_created += 1;
            }
        }
        None => {
            tracing::warn!("material has no surface style; leaves left unpainted");
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_matmap_core::{IfcType, Model};

    fn doc(body: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n{body}ENDSEC;\nEND-ISO-10303-21;\n"
        )
    }

    fn setup() -> Model {
        Model::parse(&doc(
            "#1=IFCMATERIAL('Concrete',$,$);\n\
             #2=IFCRELASSOCIATESMATERIAL('g',$,$,$,(#8),#1);\n\
             #3=IFCSURFACESTYLE('Concrete',.BOTH.,());\n\
             #5=IFCEXTRUDEDAREASOLID($,$,$,1.);\n\
             #6=IFCEXTRUDEDAREASOLID($,$,$,2.);\n\
             #7=IFCWALL('w1',$,$,$,$,$,$);\n\
             #8=IFCWALL('w2',$,$,$,$,$,$);\n",
        ))
        .unwrap()
    }

    #[test]
    fn test_relationship_append_only_no_duplicates() {
        let mut model = setup();
        let ledger = StyleLedger::build(&model);
        let entry = MaterialEntry {
            relationship: Some(2),
            style: Some(3),
        };
        let leaves = FxHashSet::from_iter([5, 6]);

        let outcome = assign(&mut model, entry, &leaves, &[7, 8], &ledger).unwrap();

        // #8 was already present, only #7 is appended
        assert_eq!(outcome.products_linked, 1);
        let related: Vec<u32> = model
            .entity(2)
            .unwrap()
            .get_list(4)
            .unwrap()
            .iter()
            .filter_map(AttributeValue::as_entity_ref)
            .collect();
        assert_eq!(related, vec![8, 7]);
    }

    #[test]
    fn test_markers_created_per_leaf() {
        let mut model = setup();
        let ledger = StyleLedger::build(&model);
        let entry = MaterialEntry {
            relationship: Some(2),
            style: Some(3),
        };
        let leaves = FxHashSet::from_iter([5, 6]);

        let outcome = assign(&mut model, entry, &leaves, &[], &ledger).unwrap();
        assert_eq!(outcome.markers_created, 2);
        assert_eq!(outcome.markers_detached, 0);

        let markers = model.entities_of(IfcType::IfcStyledItem);
        assert_eq!(markers.len(), 2);
        for marker in markers {
            let entity = model.entity(marker).unwrap();
            let leaf = entity.get_ref(0).unwrap();
            assert!(leaves.contains(&leaf));
            // Marker -> assignment -> surface style
            let assignment = entity.get_list(1).unwrap()[0].as_entity_ref().unwrap();
            let styles = model.entity(assignment).unwrap().get_list(0).unwrap();
            assert_eq!(styles[0].as_entity_ref(), Some(3));
        }
    }

    #[test]
    fn test_stale_marker_detached_not_deleted() {
        let mut model = setup();
        let stale = model.insert(Entity::new(
            "IFCSTYLEDITEM",
            vec![
                AttributeValue::EntityRef(5),
                AttributeValue::List(vec![]),
                AttributeValue::String(String::new()),
            ],
        ));
        let ledger = StyleLedger::build(&model);
        let entry = MaterialEntry {
            relationship: None,
            style: Some(3),
        };
        let leaves = FxHashSet::from_iter([5]);

        let outcome = assign(&mut model, entry, &leaves, &[], &ledger).unwrap();
        assert_eq!(outcome.markers_detached, 1);
        assert_eq!(outcome.markers_created, 1);

        // Stale marker orphaned but still in the document
        let orphan = model.entity(stale).unwrap();
        assert!(orphan.get(0).unwrap().is_null());
    }

    #[test]
    fn test_partial_application_without_style() {
        let mut model = setup();
        let ledger = StyleLedger::build(&model);
        let entry = MaterialEntry {
            relationship: Some(2),
            style: None,
        };
        let leaves = FxHashSet::from_iter([5]);

        let outcome = assign(&mut model, entry, &leaves, &[7], &ledger).unwrap();
        assert_eq!(outcome.products_linked, 1);
        assert_eq!(outcome.markers_created, 0);
        assert!(model.entities_of(IfcType::IfcStyledItem).is_empty());
    }
}
