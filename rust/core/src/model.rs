// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mutable document model.
//!
//! The document is an arena of entities addressed by their STEP id. All
//! references between entities are stored as ids and resolved through the
//! arena, so cloning an entity is "insert a new slot with copied
//! attributes" and repointing a reference is "overwrite the id in the
//! parent's attribute slot". An inverse-reference index is kept in sync on
//! every insert and attribute write to answer "who references this
//! entity" queries.

use std::collections::BTreeMap;
use std::io::{self, Write};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::parser;
use crate::schema::IfcType;
use crate::value::AttributeValue;

/// Emitted when the input carried no header section of its own
const DEFAULT_HEADER: &str = "ISO-10303-21;\n\
HEADER;\n\
FILE_DESCRIPTION((''),'2;1');\n\
FILE_NAME('','',(''),(''),'','','');\n\
FILE_SCHEMA(('IFC4'));\n\
ENDSEC;\n\
DATA;\n";

/// A node in the document graph
#[derive(Debug, Clone)]
pub struct Entity {
    /// Document-unique id, assigned on insertion and never reused
    pub id: u32,
    /// Kind tag for dispatch; `Unknown` for kinds carried opaquely
    pub kind: IfcType,
    /// Raw STEP type name, kept verbatim for serialization
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl Entity {
    /// Create a detached entity; the id is assigned by `Model::insert`
    pub fn new(type_name: impl Into<String>, attributes: Vec<AttributeValue>) -> Self {
        let type_name = type_name.into();
        Self {
            id: 0,
            kind: IfcType::from_name(&type_name),
            type_name,
            attributes,
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get entity reference attribute
    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(AttributeValue::as_entity_ref)
    }

    /// Get string attribute
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(AttributeValue::as_string)
    }

    /// Get list attribute
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(AttributeValue::as_list)
    }
}

/// The full structured model being transformed
pub struct Model {
    entities: BTreeMap<u32, Entity>,
    /// target id -> ids of entities whose attributes reference it
    referenced_by: FxHashMap<u32, Vec<u32>>,
    next_id: u32,
    /// Raw header block (through `DATA;`), preserved verbatim
    header: Option<String>,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            referenced_by: FxHashMap::default(),
            next_id: 1,
            header: None,
        }
    }

    /// Parse a serialized STEP document.
    ///
    /// The header section is kept as raw text; every record in the DATA
    /// section is tokenized, including kinds this toolkit knows nothing
    /// about, so the whole document round-trips.
    pub fn parse(content: &str) -> Result<Self> {
        let bytes = content.as_bytes();
        let data = memchr::memmem::find(bytes, b"DATA;")
            .ok_or_else(|| Error::Malformed("no DATA section found".to_string()))?;
        let body_start = data + b"DATA;".len();

        let mut model = Self::new();
        model.header = Some(content[..body_start].to_string());

        let mut pos = body_start;
        while pos < bytes.len() {
            let hash = match memchr::memchr(b'#', &bytes[pos..]) {
                Some(offset) => pos + offset,
                None => break,
            };

            let mut digits_end = hash + 1;
            while digits_end < bytes.len() && bytes[digits_end].is_ascii_digit() {
                digits_end += 1;
            }
            if digits_end == hash + 1 {
                pos = hash + 1;
                continue;
            }

            // Allow `#45 = ` as well as `#45=`
            let mut eq = digits_end;
            while eq < bytes.len() && bytes[eq].is_ascii_whitespace() {
                eq += 1;
            }
            if eq >= bytes.len() || bytes[eq] != b'=' {
                pos = digits_end;
                continue;
            }

            let end = record_end(bytes, eq + 1)
                .ok_or_else(|| Error::Malformed("unterminated entity record".to_string()))?;
            let record = &content[hash..=end];

            let (id, type_name, tokens) = parser::parse_entity(record)?;
            let attributes = tokens.iter().map(AttributeValue::from_token).collect();
            model.insert_with_id(
                id,
                Entity {
                    id,
                    kind: IfcType::from_name(type_name),
                    type_name: type_name.to_string(),
                    attributes,
                },
            )?;

            pos = end + 1;
        }

        Ok(model)
    }

    /// Number of entities in the document
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by id
    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Look up an entity by id, erroring on a dangling reference
    pub fn expect(&self, id: u32) -> Result<&Entity> {
        self.entity(id).ok_or(Error::UnknownEntity(id))
    }

    /// Iterate all entities in ascending id (document) order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Ids of every entity of the given kind, in document order
    pub fn entities_of(&self, kind: IfcType) -> Vec<u32> {
        self.entities
            .values()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// Ids of the entities whose attributes reference `id`
    pub fn referencing(&self, id: u32) -> &[u32] {
        self.referenced_by.get(&id).map_or(&[], Vec::as_slice)
    }

    /// Insert a new entity, assigning a fresh document-unique id
    pub fn insert(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.index_refs(&entity);
        self.entities.insert(id, entity);
        id
    }

    /// Clone an entity's type and attributes into a fresh slot.
    ///
    /// The original is left untouched; the clone differs only in id.
    pub fn clone_entity(&mut self, id: u32) -> Result<u32> {
        let original = self.expect(id)?;
        let copy = Entity::new(original.type_name.clone(), original.attributes.clone());
        Ok(self.insert(copy))
    }

    /// Overwrite one attribute slot, keeping the inverse index consistent
    pub fn set_attr(&mut self, id: u32, index: usize, value: AttributeValue) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(Error::UnknownEntity(id))?;
        let slot = entity
            .attributes
            .get_mut(index)
            .ok_or(Error::MissingAttribute { id, index })?;

        let mut stale = Vec::new();
        slot.collect_refs(&mut stale);
        let mut fresh = Vec::new();
        value.collect_refs(&mut fresh);
        *slot = value;

        for target in stale {
            if let Some(sources) = self.referenced_by.get_mut(&target) {
                if let Some(at) = sources.iter().position(|&s| s == id) {
                    sources.remove(at);
                }
            }
        }
        for target in fresh {
            self.referenced_by.entry(target).or_default().push(id);
        }
        Ok(())
    }

    /// Serialize the document: preserved header, entities in ascending id
    /// order, closing section markers
    pub fn write_step<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match &self.header {
            Some(header) => {
                out.write_all(header.as_bytes())?;
                if !header.ends_with('\n') {
                    out.write_all(b"\n")?;
                }
            }
            None => out.write_all(DEFAULT_HEADER.as_bytes())?,
        }

        let mut line = String::new();
        for entity in self.entities.values() {
            line.clear();
            line.push('#');
            line.push_str(&entity.id.to_string());
            line.push('=');
            line.push_str(&entity.type_name);
            line.push('(');
            for (i, attr) in entity.attributes.iter().enumerate() {
                if i > 0 {
                    line.push(',');
                }
                attr.write_step(&mut line);
            }
            line.push_str(");\n");
            out.write_all(line.as_bytes())?;
        }

        out.write_all(b"ENDSEC;\nEND-ISO-10303-21;\n")
    }

    /// Serialize to an in-memory string
    pub fn to_step_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_step(&mut buf);
        String::from_utf8(buf).unwrap_or_default()
    }

    fn insert_with_id(&mut self, id: u32, entity: Entity) -> Result<()> {
        if self.entities.contains_key(&id) {
            return Err(Error::Malformed(format!("duplicate entity id #{id}")));
        }
        self.index_refs(&entity);
        self.entities.insert(id, entity);
        if id >= self.next_id {
            self.next_id = id + 1;
        }
        Ok(())
    }

    fn index_refs(&mut self, entity: &Entity) {
        let mut refs = Vec::new();
        for attr in &entity.attributes {
            attr.collect_refs(&mut refs);
        }
        for target in refs {
            self.referenced_by.entry(target).or_default().push(entity.id);
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the terminating `;` of a record, skipping quoted strings
fn record_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut in_string = false;
    for (offset, &byte) in bytes[from..].iter().enumerate() {
        match byte {
            b'\'' => in_string = !in_string,
            b';' if !in_string => return Some(from + offset),
            _ => {}
        }
    }
    None
}
