// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC MatMap Core
//!
//! Mutable STEP/IFC document model built with [nom](https://docs.rs/nom)
//! and [memchr](https://docs.rs/memchr).
//!
//! ## Overview
//!
//! This crate provides the entity-graph substrate for material remapping:
//!
//! - **STEP Tokenization**: Zero-copy parsing of entity records
//! - **Arena Model**: Entities addressed by stable integer id, with all
//!   cross-references stored as ids
//! - **Inverse Index**: "Who references this entity" queries, kept in
//!   sync through inserts and attribute writes
//! - **Round-trip Output**: Unknown entity kinds are carried opaquely and
//!   serialized unchanged
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_matmap_core::Model;
//!
//! let content = std::fs::read_to_string("model.ifc")?;
//! let mut model = Model::parse(&content)?;
//!
//! for id in model.entities_of(ifc_matmap_core::IfcType::IfcMaterial) {
//!     println!("material #{id}");
//! }
//!
//! let clone = model.clone_entity(42)?;
//! ```

pub mod error;
pub mod model;
pub mod parser;
pub mod schema;
pub mod value;

pub use error::{Error, Result};
pub use model::{Entity, Model};
pub use parser::{parse_entity, Token};
pub use schema::{is_geometric_item, is_product, IfcType};
pub use value::AttributeValue;
