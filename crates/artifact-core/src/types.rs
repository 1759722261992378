//! ABI type descriptors - the closed grammar of parameter types
//!
//! Mirrors the `type` objects emitted by the contract compiler:
//!
//! ```text
//! {"kind": "struct", "path": "...", "fields": [{"name": "a", "type": {...}}]}
//! {"kind": "array", "length": 3, "type": {...}}
//! {"kind": "integer", "sign": "unsigned", "width": 32}
//! {"kind": "field"} | {"kind": "boolean"} | {"kind": "string", "length": 8}
//! ```
//!
//! Any other `kind` deserializes to [`TypeDescriptor::Unknown`] instead of
//! failing. Consumers decide whether that is acceptable via [`TypeMode`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// One node of an ABI type tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDescriptor {
    /// Named fields in declaration order
    Struct {
        #[serde(default)]
        fields: Vec<StructField>,
    },

    /// Fixed-length homogeneous array
    Array {
        length: u64,
        #[serde(rename = "type")]
        element: Box<TypeDescriptor>,
    },

    Integer,

    Field,

    Boolean,

    /// Fixed-length string; `length` is taken as-is as the word count
    String { length: u64 },

    /// Any tag outside the grammar above
    #[serde(other)]
    Unknown,
}

/// A named member of a [`TypeDescriptor::Struct`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
}

impl TypeDescriptor {
    /// Parse a type tree out of a raw JSON `type` object
    pub fn from_value(value: &serde_json::Value) -> crate::Result<Self> {
        Ok(TypeDescriptor::deserialize(value)?)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Integer | TypeDescriptor::Field | TypeDescriptor::Boolean
        )
    }

    pub fn struct_of(fields: Vec<(&str, TypeDescriptor)>) -> Self {
        TypeDescriptor::Struct {
            fields: fields
                .into_iter()
                .map(|(name, ty)| StructField {
                    name: name.to_string(),
                    ty,
                })
                .collect(),
        }
    }

    pub fn array_of(length: u64, element: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            length,
            element: Box::new(element),
        }
    }
}

/// How a type walk treats [`TypeDescriptor::Unknown`] nodes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeMode {
    /// Unknown kinds resolve to the fallback value (size 0, dummy `null`)
    #[default]
    Lenient,
    /// Unknown kinds fail the walk with `Error::UnknownTypeKind`
    Strict,
}

/// Location of a node inside a type tree, rendered as `$.a.b[].c`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypePath {
    segments: Vec<PathSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Field(String),
    Element,
}

impl TypePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.segments.push(PathSegment::Field(name.to_string()));
    }

    pub(crate) fn push_element(&mut self) {
        self.segments.push(PathSegment::Element);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{}", name)?,
                PathSegment::Element => write!(f, "[]")?,
            }
        }
        Ok(())
    }
}
