// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared-subgraph conflict resolver.
//!
//! Walks from a product down to the leaf geometric items it owns. A
//! representation item, representation map or representation that was
//! already claimed by an earlier traversal (possibly under a different
//! metadata attachment) is in conflict: painting it would leak the
//! material onto the other owner. Conflicts are resolved by cloning the
//! minimal chain from the shared node down to the leaf and repointing the
//! visiting owner's reference onto the clone.
//!
//! The visited sets live on the resolver and span the whole run, so
//! conflicts are detected globally, not just within one product.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use ifc_matmap_core::{is_geometric_item, AttributeValue, IfcType, Model};

use crate::error::{Error, Result};

/// Conflict-resolving traversal over product geometry.
///
/// One instance per document transformation; the visited sets are the
/// cross-attachment conflict detection state.
#[derive(Debug, Default)]
pub struct GeometryResolver {
    seen_items: FxHashSet<u32>,
    seen_maps: FxHashSet<u32>,
    seen_reps: FxHashSet<u32>,
    clones_made: usize,
}

impl GeometryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of clone entities inserted so far in this run
    pub fn clones_made(&self) -> usize {
        self.clones_made
    }

    /// Resolve the set of leaf geometric items exclusively owned by a
    /// product, cloning any shared sub-graph on the way down.
    ///
    /// May insert clones into the document and rewrite parent references;
    /// originals are never modified once cloned.
    pub fn resolve(&mut self, model: &mut Model, product: u32) -> Result<FxHashSet<u32>> {
        let mut leaves = FxHashSet::default();

        // IfcProduct: GlobalId, OwnerHistory, Name, Description,
        // ObjectType, ObjectPlacement, Representation
        let Some(shape) = model.entity(product).and_then(|e| e.get_ref(6)) else {
            return Ok(leaves);
        };
        let Some(shape_entity) = model.entity(shape) else {
            return Ok(leaves);
        };
        if shape_entity.kind != IfcType::IfcProductDefinitionShape {
            return Ok(leaves);
        }

        // IfcProductDefinitionShape: Name, Description, Representations
        let reps: Vec<u32> = shape_entity
            .get_list(2)
            .map(|list| list.iter().filter_map(AttributeValue::as_entity_ref).collect())
            .unwrap_or_default();

        for rep in reps {
            self.resolve_children(model, rep, &mut leaves)?;
        }
        Ok(leaves)
    }

    /// Resolve every item of a representation, then apply list surgery
    /// for the children that had to be cloned: the original reference is
    /// removed and the clone reference appended.
    fn resolve_children(
        &mut self,
        model: &mut Model,
        rep: u32,
        leaves: &mut FxHashSet<u32>,
    ) -> Result<()> {
        // IfcRepresentation: ContextOfItems, RepresentationIdentifier,
        // RepresentationType, Items
        let item_ids: Vec<u32> = match model.entity(rep).and_then(|e| e.get_list(3)) {
            Some(list) => list.iter().filter_map(AttributeValue::as_entity_ref).collect(),
            None => return Ok(()),
        };

        let mut replaced: SmallVec<[(u32, u32); 4]> = SmallVec::new();
        for item in item_ids {
            if let Some(fresh) = self.resolve_item(model, item, leaves)? {
                replaced.push((item, fresh));
            }
        }

        if !replaced.is_empty() {
            let mut items = model
                .expect(rep)?
                .get_list(3)
                .map(<[AttributeValue]>::to_vec)
                .unwrap_or_default();
            for &(original, fresh) in &replaced {
                items.retain(|v| v.as_entity_ref() != Some(original));
                items.push(AttributeValue::EntityRef(fresh));
            }
            model.set_attr(rep, 3, AttributeValue::List(items))?;
        }
        Ok(())
    }

    /// Resolve one representation item.
    ///
    /// Returns `Some(clone)` when a conflict forced this owner onto a
    /// fresh entity, so the caller can rewrite its own reference.
    fn resolve_item(
        &mut self,
        model: &mut Model,
        item: u32,
        leaves: &mut FxHashSet<u32>,
    ) -> Result<Option<u32>> {
        let entity = model.expect(item)?;
        let kind = entity.kind;

        if is_geometric_item(&entity.type_name) {
            let replacement = if self.seen_items.contains(&item) {
                // Conflict: another owner already claimed this leaf
                let clone = self.clone_into(model, item)?;
                tracing::debug!(original = item, clone, "cloned shared geometric item");
                Some(clone)
            } else {
                None
            };
            let used = replacement.unwrap_or(item);
            self.seen_items.insert(used);
            leaves.insert(used);
            return Ok(replacement);
        }

        if kind != IfcType::IfcMappedItem {
            // Neither variant of the closed item set: schema violation
            return Err(Error::UnsupportedItem {
                id: item,
                type_name: entity.type_name.clone(),
            });
        }

        let replacement = if self.seen_items.contains(&item) {
            // The clone keeps the original's map reference until the map
            // itself turns out to be in conflict below
            let clone = self.clone_into(model, item)?;
            tracing::debug!(original = item, clone, "cloned shared mapped item");
            Some(clone)
        } else {
            None
        };
        let mapped = replacement.unwrap_or(item);
        self.seen_items.insert(mapped);

        // IfcMappedItem: MappingSource, MappingTarget
        let source = model.expect(mapped)?.get_ref(0).ok_or(Error::MissingReference {
            id: mapped,
            attr: "MappingSource",
        })?;
        let map = if self.seen_maps.contains(&source) {
            let clone = self.clone_into(model, source)?;
            model.set_attr(mapped, 0, AttributeValue::EntityRef(clone))?;
            tracing::debug!(original = source, clone, "cloned shared representation map");
            clone
        } else {
            source
        };
        self.seen_maps.insert(map);

        // IfcRepresentationMap: MappingOrigin, MappedRepresentation
        let target = model.expect(map)?.get_ref(1).ok_or(Error::MissingReference {
            id: map,
            attr: "MappedRepresentation",
        })?;
        let rep = if self.seen_reps.contains(&target) {
            let clone = self.clone_into(model, target)?;
            model.set_attr(map, 1, AttributeValue::EntityRef(clone))?;
            tracing::debug!(original = target, clone, "cloned shared representation");
            clone
        } else {
            target
        };
        self.seen_reps.insert(rep);

        self.resolve_children(model, rep, leaves)?;
        Ok(replacement)
    }

    fn clone_into(&mut self, model: &mut Model, id: u32) -> Result<u32> {
        let clone = model.clone_entity(id)?;
        self.clones_made += 1;
        Ok(clone)
    }
}
