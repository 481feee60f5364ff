use std::collections::BTreeMap;

use super::types::{AttributeRef, DataType, Object};

/// The unit of typed data in an expression tree.
///
/// Attributes nest: an `Object`-typed attribute owns its fields through the
/// `DataType::Object` variant. Everything here is mutable during evaluation,
/// frozen in shape when the enclosing closure returns, and only re-touched by
/// the finalizer for deferred cross-references.
#[derive(Debug, Clone)]
pub struct AttributeExpr {
    pub ty: DataType,
    pub description: Option<String>,
    pub validation: Option<Validation>,
    /// Opaque annotations carried through to generators untouched.
    pub metadata: BTreeMap<String, String>,
    /// Set by the finalizer on object fields named in the parent's
    /// required list. Never set directly by constructs.
    pub required: bool,
}

impl AttributeExpr {
    pub fn new(ty: DataType) -> Self {
        AttributeExpr {
            ty,
            description: None,
            validation: None,
            metadata: BTreeMap::new(),
            required: false,
        }
    }

    pub fn empty_object() -> Self {
        AttributeExpr::new(DataType::Object(Object::new()))
    }

    /// Field lookup on an object-typed attribute; `None` for other types.
    pub fn field(&self, name: &str) -> Option<AttributeRef> {
        match &self.ty {
            DataType::Object(o) => o.field(name),
            _ => None,
        }
    }

    /// Append names to the required list, creating the validation record on
    /// first use. Duplicate names are kept; the finalizer treats the list as
    /// a set.
    pub fn add_required(&mut self, names: &[&str]) {
        let v = self.validation.get_or_insert_with(Validation::default);
        v.required.extend(names.iter().map(|n| n.to_string()));
    }

    /// Deep copy. Shares nothing with `self`.
    pub fn dup(&self) -> AttributeExpr {
        AttributeExpr {
            ty: self.ty.dup(),
            description: self.description.clone(),
            validation: self.validation.clone(),
            metadata: self.metadata.clone(),
            required: self.required,
        }
    }
}

/// Constraints attached to an attribute.
///
/// Only `required` participates in finalization; the remaining fields are
/// carried verbatim into generated schemas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub required: Vec<String>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

impl Validation {
    pub fn has_constraints(&self) -> bool {
        !self.required.is_empty()
            || self.pattern.is_some()
            || self.minimum.is_some()
            || self.maximum.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
    }
}
