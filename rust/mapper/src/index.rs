// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material entity index.
//!
//! Pairs each material name with its association relationship (the
//! mutable related-objects collection) and its surface style. The two are
//! matched by shared name; either half may be missing, in which case the
//! assignment is applied partially.

use rustc_hash::FxHashMap;

use ifc_matmap_core::{IfcType, Model};

/// The document entities indexed under one material name
#[derive(Debug, Default, Clone, Copy)]
pub struct MaterialEntry {
    /// IfcRelAssociatesMaterial linking the material to its products
    pub relationship: Option<u32>,
    /// IfcSurfaceStyle carrying the visual appearance
    pub style: Option<u32>,
}

/// Material name -> relationship/style entities
#[derive(Debug, Default)]
pub struct MaterialIndex {
    by_name: FxHashMap<String, MaterialEntry>,
}

impl MaterialIndex {
    /// Scan the document once for materials and surface styles
    pub fn build(model: &Model) -> Self {
        let mut by_name: FxHashMap<String, MaterialEntry> = FxHashMap::default();

        for id in model.entities_of(IfcType::IfcMaterial) {
            // IfcMaterial: Name, Description, Category
            let Some(name) = model.entity(id).and_then(|e| e.get_string(0)) else {
                continue;
            };
            for &source in model.referencing(id) {
                let is_rel = model
                    .entity(source)
                    .is_some_and(|e| e.kind == IfcType::IfcRelAssociatesMaterial);
                if is_rel {
                    by_name.entry(name.to_string()).or_default().relationship = Some(source);
                }
            }
        }

        for id in model.entities_of(IfcType::IfcSurfaceStyle) {
            // IfcSurfaceStyle: Name, Side, Styles
            let Some(name) = model.entity(id).and_then(|e| e.get_string(0)) else {
                continue;
            };
            by_name.entry(name.to_string()).or_default().style = Some(id);
        }

        Self { by_name }
    }

    /// Entities for a material name, if any were indexed
    pub fn get(&self, name: &str) -> Option<MaterialEntry> {
        self.by_name.get(name).copied()
    }
}
