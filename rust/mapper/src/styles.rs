// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appearance-marker ledger.
//!
//! Tracks which styled item currently targets each representation item so
//! a stale marker can be detached before a new one is attached. Built
//! once per run; detaching clears the marker's Item reference but leaves
//! the marker entity in the document.

use rustc_hash::FxHashMap;

use ifc_matmap_core::{AttributeValue, IfcType, Model};

use crate::error::Result;

/// Representation item -> styled item currently attached to it
#[derive(Debug, Default)]
pub struct StyleLedger {
    by_item: FxHashMap<u32, u32>,
}

impl StyleLedger {
    /// Scan every existing styled item in the document.
    ///
    /// Duplicate markers on one item are not expected but not rejected;
    /// the last one scanned wins.
    pub fn build(model: &Model) -> Self {
        let mut by_item = FxHashMap::default();
        for id in model.entities_of(IfcType::IfcStyledItem) {
            // IfcStyledItem: Item, Styles, Name
            if let Some(item) = model.entity(id).and_then(|e| e.get_ref(0)) {
                by_item.insert(item, id);
            }
        }
        Self { by_item }
    }

    /// The marker currently attached to an item, if any
    pub fn marker_for(&self, item: u32) -> Option<u32> {
        self.by_item.get(&item).copied()
    }

    /// Clear a marker's item reference. The marker entity itself stays in
    /// the document as a known orphan.
    pub fn detach(&self, model: &mut Model, marker: u32) -> Result<()> {
        model.set_attr(marker, 0, AttributeValue::Null)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_matmap_core::Model;

    fn doc(body: &str) -> String {
        format!(
            "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n{body}ENDSEC;\nEND-ISO-10303-21;\n"
        )
    }

    #[test]
    fn test_build_and_lookup() {
        let model = Model::parse(&doc(
            "#1=IFCEXTRUDEDAREASOLID($,$,$,1.);\n\
             #2=IFCSTYLEDITEM(#1,(#3),'');\n\
             #3=IFCPRESENTATIONSTYLEASSIGNMENT((#4));\n\
             #4=IFCSURFACESTYLE('Old',.BOTH.,());\n",
        ))
        .unwrap();

        let ledger = StyleLedger::build(&model);
        assert_eq!(ledger.marker_for(1), Some(2));
        assert_eq!(ledger.marker_for(99), None);
    }

    #[test]
    fn test_duplicate_markers_last_wins() {
        let model = Model::parse(&doc(
            "#1=IFCEXTRUDEDAREASOLID($,$,$,1.);\n\
             #2=IFCSTYLEDITEM(#1,(),'');\n\
             #3=IFCSTYLEDITEM(#1,(),'');\n",
        ))
        .unwrap();

        let ledger = StyleLedger::build(&model);
        assert_eq!(ledger.marker_for(1), Some(3));
    }

    #[test]
    fn test_detach_orphans_marker() {
        let mut model = Model::parse(&doc(
            "#1=IFCEXTRUDEDAREASOLID($,$,$,1.);\n\
             #2=IFCSTYLEDITEM(#1,(),'');\n",
        ))
        .unwrap();

        let ledger = StyleLedger::build(&model);
        ledger.detach(&mut model, 2).unwrap();

        // Reference cleared, entity kept
        let marker = model.entity(2).unwrap();
        assert!(marker.get(0).unwrap().is_null());
        assert!(model.referencing(1).is_empty());
    }
}
