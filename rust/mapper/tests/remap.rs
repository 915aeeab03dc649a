// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end material remapping over an in-memory document.

use ifc_matmap_core::{AttributeValue, IfcType, Model};
use ifc_matmap_mapper::{apply_material_mapping, MaterialTable};

/// Two walls carry a `Material = Concrete-Std` property and both instance
/// the same representation map over a single extruded solid.
const SHARED_GEOMETRY_DOC: &str = "ISO-10303-21;
HEADER;
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCMATERIAL('Concrete',$,$);
#2=IFCRELASSOCIATESMATERIAL('g0',$,$,$,(),#1);
#3=IFCSURFACESTYLE('Concrete',.BOTH.,(#4));
#4=IFCSURFACESTYLERENDERING($,$,$,$,$,$,$,$,.FLAT.);
#10=IFCEXTRUDEDAREASOLID($,$,$,1.);
#11=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#10));
#12=IFCREPRESENTATIONMAP($,#11);
#20=IFCMAPPEDITEM(#12,$);
#21=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#20));
#22=IFCPRODUCTDEFINITIONSHAPE($,$,(#21));
#23=IFCWALL('p1',$,'P1',$,$,$,#22);
#30=IFCMAPPEDITEM(#12,$);
#31=IFCSHAPEREPRESENTATION($,'Body','MappedRepresentation',(#30));
#32=IFCPRODUCTDEFINITIONSHAPE($,$,(#31));
#33=IFCWALL('p2',$,'P2',$,$,$,#32);
#40=IFCPROPERTYSINGLEVALUE('Material',$,IFCLABEL('Concrete-Std'),$);
#41=IFCPROPERTYSET('ps1',$,'Set',$,(#40));
#42=IFCRELDEFINESBYPROPERTIES('r1',$,$,$,(#23,#33),#41);
ENDSEC;
END-ISO-10303-21;
";

const TABLE: &str = "material,field,value\nConcrete,Material,Concrete-Std\n";

fn leaf_of(model: &Model, marker: u32) -> u32 {
    model.entity(marker).unwrap().get_ref(0).unwrap()
}

fn style_of(model: &Model, marker: u32) -> u32 {
    let assignment = model
        .entity(marker)
        .unwrap()
        .get_list(1)
        .unwrap()[0]
        .as_entity_ref()
        .unwrap();
    model.entity(assignment).unwrap().get_list(0).unwrap()[0]
        .as_entity_ref()
        .unwrap()
}

#[test]
fn shared_geometry_is_split_per_product() {
    let mut model = Model::parse(SHARED_GEOMETRY_DOC).unwrap();
    let table = MaterialTable::parse(TABLE);

    let summary = apply_material_mapping(&mut model, &table).unwrap();

    assert_eq!(summary.attachments_matched, 1);
    assert_eq!(summary.products_linked, 2);
    // Second product hit the shared map: map, representation and leaf cloned
    assert_eq!(summary.clones_made, 3);
    assert_eq!(summary.markers_created, 2);

    // Both walls appended to the material relationship
    let related: Vec<u32> = model
        .entity(2)
        .unwrap()
        .get_list(4)
        .unwrap()
        .iter()
        .filter_map(AttributeValue::as_entity_ref)
        .collect();
    assert_eq!(related, vec![23, 33]);

    // Two markers over two distinct leaves, both pointing at the
    // Concrete surface style
    let markers = model.entities_of(IfcType::IfcStyledItem);
    assert_eq!(markers.len(), 2);
    let leaves: Vec<u32> = markers.iter().map(|&m| leaf_of(&model, m)).collect();
    assert_ne!(leaves[0], leaves[1]);
    assert!(leaves.contains(&10));
    for &marker in &markers {
        assert_eq!(style_of(&model, marker), 3);
    }

    // The shared originals were never mutated
    let map = model.entity(12).unwrap();
    assert_eq!(map.get_ref(1), Some(11));
    let rep = model.entity(11).unwrap();
    assert_eq!(rep.get_list(3).unwrap()[0].as_entity_ref(), Some(10));

    // One of the two mapped items was repointed onto a cloned chain
    let sources = [
        model.entity(20).unwrap().get_ref(0).unwrap(),
        model.entity(30).unwrap().get_ref(0).unwrap(),
    ];
    assert!(sources.contains(&12));
    assert_ne!(sources[0], sources[1]);
}

#[test]
fn rerun_appends_a_second_marker_generation() {
    let mut model = Model::parse(SHARED_GEOMETRY_DOC).unwrap();
    let table = MaterialTable::parse(TABLE);

    apply_material_mapping(&mut model, &table).unwrap();
    let markers_after_first = model.entities_of(IfcType::IfcStyledItem);
    assert_eq!(markers_after_first.len(), 2);

    let second = apply_material_mapping(&mut model, &table).unwrap();

    // The run is not idempotent: prior markers are orphaned and a second
    // generation is created
    assert_eq!(second.markers_detached, 2);
    assert_eq!(second.markers_created, 2);
    // Geometry was already split, so nothing new to clone
    assert_eq!(second.clones_made, 0);
    // No duplicate appends to the relationship either
    assert_eq!(second.products_linked, 0);

    let markers = model.entities_of(IfcType::IfcStyledItem);
    assert_eq!(markers.len(), 4);
    let orphans = markers
        .iter()
        .filter(|&&m| model.entity(m).unwrap().get(0).unwrap().is_null())
        .count();
    assert_eq!(orphans, 2);
}

#[test]
fn output_round_trips_through_the_writer() {
    let mut model = Model::parse(SHARED_GEOMETRY_DOC).unwrap();
    let table = MaterialTable::parse(TABLE);
    apply_material_mapping(&mut model, &table).unwrap();

    let out = model.to_step_string();
    let reparsed = Model::parse(&out).unwrap();
    assert_eq!(reparsed.len(), model.len());
    assert_eq!(
        reparsed.entities_of(IfcType::IfcStyledItem).len(),
        model.entities_of(IfcType::IfcStyledItem).len()
    );
}

#[test]
fn unmatched_value_leaves_document_untouched() {
    let mut model = Model::parse(SHARED_GEOMETRY_DOC).unwrap();
    let before = model.len();
    let table = MaterialTable::parse("m,f,v\nConcrete,Material,SomethingElse\n");

    let summary = apply_material_mapping(&mut model, &table).unwrap();
    assert_eq!(summary.attachments_matched, 0);
    assert_eq!(model.len(), before);
}

#[test]
fn attachment_without_nominal_value_is_skipped() {
    let mut model = Model::parse(
        "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n\
         #1=IFCMATERIAL('Concrete',$,$);\n\
         #2=IFCRELASSOCIATESMATERIAL('g0',$,$,$,(),#1);\n\
         #3=IFCSURFACESTYLE('Concrete',.BOTH.,());\n\
         #40=IFCPROPERTYSINGLEVALUE('Material',$,$,$);\n\
         #41=IFCPROPERTYSET('ps1',$,'Set',$,(#40));\n\
         ENDSEC;\nEND-ISO-10303-21;\n",
    )
    .unwrap();
    let before = model.len();
    let table = MaterialTable::parse(TABLE);

    // The field matches a rule but there is no value to match against
    let summary = apply_material_mapping(&mut model, &table).unwrap();
    assert_eq!(summary.attachments_matched, 0);
    assert_eq!(summary.attachments_skipped, 0);
    assert!(model.entities_of(IfcType::IfcStyledItem).is_empty());
    assert_eq!(model.len(), before);
}

#[test]
fn missing_material_entities_skip_attachment() {
    let mut model = Model::parse(SHARED_GEOMETRY_DOC).unwrap();
    let table = MaterialTable::parse("m,f,v\nGranite,Material,Concrete-Std\n");

    let summary = apply_material_mapping(&mut model, &table).unwrap();
    assert_eq!(summary.attachments_matched, 0);
    assert_eq!(summary.attachments_skipped, 1);
    assert!(model.entities_of(IfcType::IfcStyledItem).is_empty());
}
