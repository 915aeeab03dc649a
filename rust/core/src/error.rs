// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for document-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or mutating a STEP document.
///
/// I/O is not represented here: parsing takes a string and the writer
/// returns `io::Result` directly.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed STEP input: {0}")]
    Malformed(String),

    #[error("Failed to parse entity #{id}: {message}")]
    Parse { id: u32, message: String },

    #[error("Unknown entity #{0}")]
    UnknownEntity(u32),

    #[error("Entity #{id} has no attribute at index {index}")]
    MissingAttribute { id: u32, index: usize },
}

impl Error {
    /// Shorthand for a per-entity parse error
    pub fn parse(id: u32, message: impl Into<String>) -> Self {
        Error::Parse {
            id,
            message: message.into(),
        }
    }
}
