//! Schemaless documents: an ordered sequence of opaque `(name, value)` fields plus
//! an optional external identifier. Grounded on the original m3ninx `doc` package
//! (see `doc/document_matcher.go` in the retrieved source) and on the teacher's
//! `core::types::Document`, adapted from typed `FieldValue` fields to opaque bytes
//! per the data model this crate implements.

use crate::core::error::{Error, Result};

/// The reserved field name under which a document's external identifier is indexed,
/// making identifiers searchable via the ordinary term-match API. Callers must not
/// use this name for their own fields.
pub const ID_RESERVED_FIELD_NAME: &[u8] = b"_m_id";

/// A single `(name, value)` pair. Both are opaque byte strings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Field {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Field {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Field { name: name.into(), value: value.into() }
    }

    fn is_reserved(&self) -> bool {
        self.name == ID_RESERVED_FIELD_NAME
    }
}

/// An ordered sequence of fields plus an optional external identifier.
///
/// Serializable so that a persistent implementation built atop this core (out of
/// scope here, see §6 of the contract this crate implements) can write documents
/// to a log or snapshot without a second representation.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub id: Option<Vec<u8>>,
    pub fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Self {
        Document { id: None, fields: Vec::new() }
    }

    pub fn with_id(id: impl Into<Vec<u8>>) -> Self {
        Document { id: Some(id.into()), fields: Vec::new() }
    }

    pub fn add_field(mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// The field with this name, if present. Returns the first match: a document is
    /// not required to have unique field names.
    pub fn get(&self, name: &[u8]) -> Option<&[u8]> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_slice())
    }
}

/// Rejects bytes that cannot appear in a valid UTF-8 sequence, or a field that uses
/// the reserved field name. The segment propagates this verdict unchanged (§7 of
/// `SPEC_FULL.md`).
pub fn validate_document(doc: &Document) -> Result<()> {
    for field in &doc.fields {
        validate_field(field)?;
    }
    Ok(())
}

fn validate_field(field: &Field) -> Result<()> {
    if field.is_reserved() {
        return Err(Error::validation(format!(
            "field name {:?} collides with the reserved id field",
            String::from_utf8_lossy(&field.name),
        )));
    }
    std::str::from_utf8(&field.name).map_err(|_| {
        Error::validation(format!("field name {:?} is not valid UTF-8", field.name))
    })?;
    std::str::from_utf8(&field.value).map_err(|_| {
        Error::validation(format!("field value {:?} is not valid UTF-8", field.value))
    })?;
    Ok(())
}
