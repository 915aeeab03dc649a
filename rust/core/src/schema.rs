// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity kind tags.
//!
//! Fast type checking using an enum instead of string comparison. Only the
//! kinds this toolkit dispatches on get a variant; everything else is
//! carried opaquely under `Unknown` and round-trips by raw type name.

/// Entity kinds with dedicated handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfcType {
    // Metadata
    IfcPropertySingleValue,
    IfcPropertySet,

    // Relationships
    IfcRelDefinesByProperties,
    IfcRelAssociatesMaterial,

    // Materials and appearance
    IfcMaterial,
    IfcSurfaceStyle,
    IfcStyledItem,
    IfcPresentationStyleAssignment,

    // Shape structure
    IfcProductDefinitionShape,
    IfcShapeRepresentation,
    IfcRepresentationMap,
    IfcMappedItem,

    // Everything else
    Unknown,
}

impl IfcType {
    /// Parse a kind tag from a raw (uppercase) STEP type name
    pub fn from_name(name: &str) -> Self {
        match name {
            "IFCPROPERTYSINGLEVALUE" => Self::IfcPropertySingleValue,
            "IFCPROPERTYSET" => Self::IfcPropertySet,
            "IFCRELDEFINESBYPROPERTIES" => Self::IfcRelDefinesByProperties,
            "IFCRELASSOCIATESMATERIAL" => Self::IfcRelAssociatesMaterial,
            "IFCMATERIAL" => Self::IfcMaterial,
            "IFCSURFACESTYLE" => Self::IfcSurfaceStyle,
            "IFCSTYLEDITEM" => Self::IfcStyledItem,
            "IFCPRESENTATIONSTYLEASSIGNMENT" => Self::IfcPresentationStyleAssignment,
            "IFCPRODUCTDEFINITIONSHAPE" => Self::IfcProductDefinitionShape,
            "IFCSHAPEREPRESENTATION" => Self::IfcShapeRepresentation,
            "IFCREPRESENTATIONMAP" => Self::IfcRepresentationMap,
            "IFCMAPPEDITEM" => Self::IfcMappedItem,
            _ => Self::Unknown,
        }
    }
}

/// Check whether a raw type name is a geometric representation item, i.e.
/// a leaf that directly describes shape.
///
/// Covers the IfcGeometricRepresentationItem subtypes that appear as
/// representation items in practice, including the IFC4 tessellated kinds.
pub fn is_geometric_item(name: &str) -> bool {
    matches!(
        name,
        "IFCEXTRUDEDAREASOLID"
            | "IFCREVOLVEDAREASOLID"
            | "IFCSURFACECURVESWEPTAREASOLID"
            | "IFCSWEPTAREASOLID"
            | "IFCSWEPTDISKSOLID"
            | "IFCSWEPTSURFACE"
            | "IFCFACETEDBREP"
            | "IFCFACETEDBREPWITHVOIDS"
            | "IFCMANIFOLDSOLIDBREP"
            | "IFCADVANCEDBREP"
            | "IFCTRIANGULATEDFACESET"
            | "IFCPOLYGONALFACESET"
            | "IFCCSGSOLID"
            | "IFCCSGPRIMITIVE3D"
            | "IFCBOOLEANRESULT"
            | "IFCBOOLEANCLIPPINGRESULT"
            | "IFCHALFSPACESOLID"
            | "IFCPOLYGONALBOUNDEDHALFSPACE"
            | "IFCSHELLBASEDSURFACEMODEL"
            | "IFCFACEBASEDSURFACEMODEL"
            | "IFCGEOMETRICSET"
            | "IFCGEOMETRICCURVESET"
            | "IFCBOUNDINGBOX"
            | "IFCSECTIONEDSPINE"
            | "IFCCURVEBOUNDEDPLANE"
            | "IFCRECTANGULARTRIMMEDSURFACE"
            | "IFCELEMENTARYSURFACE"
            | "IFCPLANE"
            | "IFCANNOTATIONFILLAREA"
            | "IFCANNOTATIONSURFACE"
            | "IFCTEXTLITERAL"
            | "IFCTEXTLITERALWITHEXTENT"
            | "IFCPOLYLINE"
            | "IFCINDEXEDPOLYCURVE"
            | "IFCCOMPOSITECURVE"
            | "IFCTRIMMEDCURVE"
            | "IFCBSPLINECURVE"
            | "IFCLINE"
            | "IFCCIRCLE"
            | "IFCELLIPSE"
            | "IFCOFFSETCURVE2D"
            | "IFCOFFSETCURVE3D"
            | "IFCCARTESIANPOINT"
            | "IFCPOINTONCURVE"
            | "IFCPOINTONSURFACE"
            | "IFCDIRECTION"
            | "IFCVECTOR"
            | "IFCPLANAREXTENT"
            | "IFCPLACEMENT"
            | "IFCAXIS2PLACEMENT3D"
            | "IFCFILLAREASTYLEHATCHING"
            | "IFCFILLAREASTYLETILES"
    )
}

/// Check whether a raw type name is a product (design object) kind.
///
/// Building elements, furnishing, MEP segments and proxies. Reinforcement
/// kinds are matched by substring since the family is large.
pub fn is_product(name: &str) -> bool {
    matches!(
        name,
        "IFCWALL"
            | "IFCWALLSTANDARDCASE"
            | "IFCSLAB"
            | "IFCBEAM"
            | "IFCCOLUMN"
            | "IFCROOF"
            | "IFCSTAIR"
            | "IFCSTAIRFLIGHT"
            | "IFCRAMP"
            | "IFCRAMPFLIGHT"
            | "IFCRAILING"
            | "IFCPLATE"
            | "IFCMEMBER"
            | "IFCFOOTING"
            | "IFCPILE"
            | "IFCCOVERING"
            | "IFCCURTAINWALL"
            | "IFCDOOR"
            | "IFCWINDOW"
            | "IFCCHIMNEY"
            | "IFCSHADINGDEVICE"
            | "IFCBUILDINGELEMENTPROXY"
            | "IFCBUILDINGELEMENTPART"
            | "IFCDISCRETEACCESSORY"
            | "IFCFASTENER"
            | "IFCMECHANICALFASTENER"
            | "IFCFURNISHINGELEMENT"
            | "IFCFURNITURE"
            | "IFCDISTRIBUTIONELEMENT"
            | "IFCFLOWSEGMENT"
            | "IFCFLOWFITTING"
            | "IFCFLOWTERMINAL"
            | "IFCDUCTSEGMENT"
            | "IFCPIPESEGMENT"
            | "IFCCABLESEGMENT"
            | "IFCSPACE"
            | "IFCPROXY"
            | "IFCPRODUCT"
    ) || name.contains("REINFORC")
}
