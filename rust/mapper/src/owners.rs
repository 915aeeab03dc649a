// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owner resolution for metadata attachments.
//!
//! A property reaches its products through a fixed two-hop inbound chain:
//! property -> property set -> IfcRelDefinesByProperties, whose
//! RelatedObjects are the governed products.

use ifc_matmap_core::{is_product, IfcType, Model};

/// Products governed by a metadata attachment, in document order.
///
/// Inbound references of an unexpected relationship kind are warned about
/// and skipped; the chain continues through the remaining references.
pub fn owners_of(model: &Model, attachment: u32) -> Vec<u32> {
    let mut products = Vec::new();

    for &holder in model.referencing(attachment) {
        for &rel in model.referencing(holder) {
            let Some(entity) = model.entity(rel) else {
                continue;
            };
            if entity.kind != IfcType::IfcRelDefinesByProperties {
                tracing::warn!(
                    entity = rel,
                    kind = %entity.type_name,
                    "unexpected relationship kind on metadata attachment; skipping"
                );
                continue;
            }
            // IfcRelDefinesByProperties: GlobalId, OwnerHistory, Name,
            // Description, RelatedObjects, RelatingPropertyDefinition
            let Some(related) = entity.get_list(4) else {
                continue;
            };
            for value in related {
                let Some(object) = value.as_entity_ref() else {
                    continue;
                };
                let product = model
                    .entity(object)
                    .is_some_and(|e| is_product(&e.type_name));
                if product && !products.contains(&object) {
                    products.push(object);
                }
            }
        }
    }

    products
}
