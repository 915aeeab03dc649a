// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owned attribute values for document entities.
//!
//! Tokens borrow from the input buffer; attribute values own their data so
//! the document can be mutated and written back out after the source
//! buffer is gone.

use crate::parser::Token;

/// A single entity attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference: #123
    EntityRef(u32),
    /// String literal
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value: .TRUE., .ELEMENT.
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value: IFCLABEL('Concrete')
    Typed(String, Vec<AttributeValue>),
    /// Null value: $
    Null,
    /// Derived value: *
    Derived,
}

impl AttributeValue {
    /// Convert a borrowed parser token into an owned value
    pub fn from_token(token: &Token<'_>) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(unescape(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum((*e).to_string()),
            Token::List(items) => {
                AttributeValue::List(items.iter().map(Self::from_token).collect())
            }
            Token::TypedValue(name, args) => AttributeValue::Typed(
                (*name).to_string(),
                args.iter().map(Self::from_token).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Get as string
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list
    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Render the value the way a user would compare against it.
    ///
    /// Typed wrappers like IFCLABEL('X') unwrap to their single argument,
    /// matching how property nominal values are matched against external
    /// lookup tables.
    pub fn as_display_string(&self) -> Option<String> {
        match self {
            AttributeValue::String(s) => Some(s.clone()),
            AttributeValue::Integer(i) => Some(i.to_string()),
            AttributeValue::Float(f) => Some(f.to_string()),
            AttributeValue::Enum(e) => Some(e.clone()),
            AttributeValue::Typed(_, args) if args.len() == 1 => args[0].as_display_string(),
            _ => None,
        }
    }

    /// Collect every entity id referenced by this value, recursing into
    /// lists and typed wrappers
    pub fn collect_refs(&self, out: &mut Vec<u32>) {
        match self {
            AttributeValue::EntityRef(id) => out.push(*id),
            AttributeValue::List(items) | AttributeValue::Typed(_, items) => {
                for item in items {
                    item.collect_refs(out);
                }
            }
            _ => {}
        }
    }

    /// Append the STEP text form of this value
    pub fn write_step(&self, out: &mut String) {
        match self {
            AttributeValue::EntityRef(id) => {
                out.push('#');
                out.push_str(&id.to_string());
            }
            AttributeValue::String(s) => {
                out.push('\'');
                out.push_str(&escape(s));
                out.push('\'');
            }
            AttributeValue::Integer(i) => out.push_str(&i.to_string()),
            AttributeValue::Float(f) => push_float(out, *f),
            AttributeValue::Enum(e) => {
                out.push('.');
                out.push_str(e);
                out.push('.');
            }
            AttributeValue::List(items) => {
                out.push('(');
                write_separated(out, items);
                out.push(')');
            }
            AttributeValue::Typed(name, args) => {
                out.push_str(name);
                out.push('(');
                write_separated(out, args);
                out.push(')');
            }
            AttributeValue::Null => out.push('$'),
            AttributeValue::Derived => out.push('*'),
        }
    }
}

fn write_separated(out: &mut String, items: &[AttributeValue]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        item.write_step(out);
    }
}

/// STEP floats always carry a decimal point (e.g. "1.")
fn push_float(out: &mut String, f: f64) {
    let s = f.to_string();
    let has_point = s.contains('.') || s.contains('e') || s.contains('E');
    out.push_str(&s);
    if !has_point {
        out.push('.');
    }
}

/// STEP escapes a quote inside a string by doubling it
fn unescape(raw: &str) -> String {
    raw.replace("''", "'")
}

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}
