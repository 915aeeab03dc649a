// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for remapping operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during material remapping.
///
/// Only structural violations of the representation-item contract are
/// fatal; everything recoverable is logged and skipped instead of
/// surfacing here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Representation item #{id} has unsupported kind {type_name}")]
    UnsupportedItem { id: u32, type_name: String },

    #[error("Entity #{id} is missing required reference {attr}")]
    MissingReference { id: u32, attr: &'static str },

    #[error("Document model error: {0}")]
    Core(#[from] ifc_matmap_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
