use std::cell::RefCell;
use std::rc::Rc;

use super::attribute::AttributeExpr;

/// Shared handle to an attribute expression.
///
/// Evaluation is single-threaded by contract, so `Rc<RefCell<_>>` is the
/// ownership model for the whole expression tree: configuration closures
/// mutate the attribute behind the handle while the tree keeps its shape.
pub type AttributeRef = Rc<RefCell<AttributeExpr>>;

/// Shared handle to a named user type.
///
/// Identity is `Rc` pointer identity: two user types with the same shape are
/// still distinct types, and the identity-preserving fast path of the
/// construct builder is expressed as cloning the `Rc`, never the value.
pub type UserTypeRef = Rc<RefCell<UserTypeExpr>>;

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    String,
    /// Unconstrained value, maps to a free-form schema.
    Any,
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Primitive::Boolean => "boolean",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
            Primitive::Any => "any",
        };
        write!(f, "{}", s)
    }
}

/// The polymorphic type of an attribute.
#[derive(Debug, Clone)]
pub enum DataType {
    Primitive(Primitive),
    /// Composite with named fields; field order is declaration order and is
    /// preserved into generated output.
    Object(Object),
    /// Homogeneous list; the element attribute carries its own validation.
    Array(AttributeRef),
    /// String-keyed map of a single element type.
    Map(AttributeRef),
    /// Reference to a defined named type. Shared, not copied.
    User(UserTypeRef),
    /// Forward reference by name, resolved during finalization. A name that
    /// never resolves is a usage diagnostic, not a panic.
    Ref(String),
}

impl DataType {
    pub fn is_object(&self) -> bool {
        matches!(self, DataType::Object(_))
    }

    /// Short display name used in diagnostics and generated comments.
    pub fn name(&self) -> String {
        match self {
            DataType::Primitive(p) => p.to_string(),
            DataType::Object(_) => "object".to_string(),
            DataType::Array(_) => "array".to_string(),
            DataType::Map(_) => "map".to_string(),
            DataType::User(u) => u.borrow().name.clone(),
            DataType::Ref(name) => name.clone(),
        }
    }

    /// Deep, independent copy. `User` types are duplicated into a fresh
    /// handle that keeps the name but has its own identity, so refinements
    /// applied to the copy never leak into other references of the original.
    pub fn dup(&self) -> DataType {
        match self {
            DataType::Primitive(p) => DataType::Primitive(*p),
            DataType::Object(o) => DataType::Object(o.dup()),
            DataType::Array(elem) => DataType::Array(dup_ref(elem)),
            DataType::Map(elem) => DataType::Map(dup_ref(elem)),
            DataType::User(u) => DataType::User(Rc::new(RefCell::new(u.borrow().dup()))),
            DataType::Ref(name) => DataType::Ref(name.clone()),
        }
    }

    /// Structural equality, ignoring user type identity.
    pub fn structurally_eq(&self, other: &DataType) -> bool {
        match (self, other) {
            (DataType::Primitive(a), DataType::Primitive(b)) => a == b,
            (DataType::Object(a), DataType::Object(b)) => a.structurally_eq(b),
            (DataType::Array(a), DataType::Array(b)) | (DataType::Map(a), DataType::Map(b)) => {
                a.borrow().ty.structurally_eq(&b.borrow().ty)
            }
            (DataType::User(a), DataType::User(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.name == b.name && a.attribute.borrow().ty.structurally_eq(&b.attribute.borrow().ty)
            }
            (DataType::Ref(a), DataType::Ref(b)) => a == b,
            _ => false,
        }
    }
}

fn dup_ref(att: &AttributeRef) -> AttributeRef {
    Rc::new(RefCell::new(att.borrow().dup()))
}

/// Ordered collection of named fields backing an `Object`-typed attribute.
///
/// Names are unique; insertion order is significant and drives generated
/// field order. Lookups are linear, objects in a design stay small.
#[derive(Debug, Clone, Default)]
pub struct Object {
    fields: Vec<NamedAttribute>,
}

#[derive(Debug, Clone)]
pub struct NamedAttribute {
    pub name: String,
    pub attribute: AttributeRef,
}

impl Object {
    pub fn new() -> Self {
        Object { fields: Vec::new() }
    }

    /// Add a field. Returns `false` when the name is already taken; the
    /// first definition wins.
    pub fn insert(&mut self, name: &str, attribute: AttributeRef) -> bool {
        if self.field(name).is_some() {
            return false;
        }
        self.fields.push(NamedAttribute {
            name: name.to_string(),
            attribute,
        });
        true
    }

    pub fn field(&self, name: &str) -> Option<AttributeRef> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| Rc::clone(&f.attribute))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedAttribute> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn dup(&self) -> Object {
        Object {
            fields: self
                .fields
                .iter()
                .map(|f| NamedAttribute {
                    name: f.name.clone(),
                    attribute: dup_ref(&f.attribute),
                })
                .collect(),
        }
    }

    pub fn structurally_eq(&self, other: &Object) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().zip(other.fields.iter()).all(|(a, b)| {
                a.name == b.name
                    && a.attribute.borrow().ty.structurally_eq(&b.attribute.borrow().ty)
            })
    }
}

/// A named type: an attribute with an identity distinct from its shape.
#[derive(Debug, Clone)]
pub struct UserTypeExpr {
    pub name: String,
    pub attribute: AttributeRef,
}

impl UserTypeExpr {
    pub fn new(name: &str, attribute: AttributeExpr) -> Self {
        UserTypeExpr {
            name: name.to_string(),
            attribute: Rc::new(RefCell::new(attribute)),
        }
    }

    /// Independent structural copy keeping the name. The copy is a distinct
    /// type for identity purposes even though it compares structurally equal.
    pub fn dup(&self) -> UserTypeExpr {
        UserTypeExpr {
            name: self.name.clone(),
            attribute: dup_ref(&self.attribute),
        }
    }
}

/// Wrap a primitive in a fresh attribute handle. Convenience for call sites
/// that build leaf attributes by hand.
pub fn primitive_attr(p: Primitive) -> AttributeRef {
    Rc::new(RefCell::new(AttributeExpr::new(DataType::Primitive(p))))
}
