// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC MatMap Mapper
//!
//! Metadata-driven material reassignment over an IFC document.
//!
//! ## Overview
//!
//! An external lookup table maps metadata field/value pairs to material
//! names. For every matching property attachment in the document, the
//! governed products are found, their leaf geometry is resolved, and a
//! fresh appearance marker is attached to each leaf.
//!
//! Geometry is routinely shared between products through the mapped-item
//! instancing mechanism. Repainting shared geometry in place would leak
//! the material onto every other product referencing the same instance,
//! so the [`GeometryResolver`] detects such conflicts and clones the
//! minimal chain of entities before any mutation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_matmap_core::Model;
//! use ifc_matmap_mapper::{apply_material_mapping, MaterialTable};
//!
//! let mut model = Model::parse(&std::fs::read_to_string("in.ifc")?)?;
//! let table = MaterialTable::from_path("mapping.csv")?;
//! let summary = apply_material_mapping(&mut model, &table)?;
//! println!("painted {} leaves", summary.markers_created);
//! ```

pub mod assigner;
pub mod error;
pub mod index;
pub mod owners;
pub mod pipeline;
pub mod resolver;
pub mod styles;
pub mod table;

pub use assigner::{assign, AssignOutcome};
pub use error::{Error, Result};
pub use index::{MaterialEntry, MaterialIndex};
pub use owners::owners_of;
pub use pipeline::{apply_material_mapping, RunSummary};
pub use resolver::GeometryResolver;
pub use styles::StyleLedger;
pub use table::MaterialTable;
