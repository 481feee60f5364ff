use std::cell::RefCell;
use std::rc::Rc;

use super::types::{AttributeRef, UserTypeRef};

pub type ServiceRef = Rc<RefCell<ServiceExpr>>;
pub type MethodRef = Rc<RefCell<MethodExpr>>;

/// Top of the expression tree: one API design.
#[derive(Debug, Default)]
pub struct RootExpr {
    pub name: String,
    /// Declaration order, preserved into generated output.
    pub services: Vec<ServiceRef>,
    /// Named types defined by the design, in declaration order.
    pub types: Vec<UserTypeRef>,
    /// Guard for finalization idempotency.
    pub finalized: bool,
}

impl RootExpr {
    pub fn new(name: &str) -> Self {
        RootExpr {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn service(&self, name: &str) -> Option<ServiceRef> {
        self.services
            .iter()
            .find(|s| s.borrow().name == name)
            .map(Rc::clone)
    }

    pub fn user_type(&self, name: &str) -> Option<UserTypeRef> {
        self.types
            .iter()
            .find(|t| t.borrow().name == name)
            .map(Rc::clone)
    }
}

/// A group of methods generated together as one transport unit.
#[derive(Debug)]
pub struct ServiceExpr {
    pub name: String,
    pub description: Option<String>,
    /// Declaration order = generated endpoint order.
    pub methods: Vec<MethodRef>,
}

impl ServiceExpr {
    pub fn new(name: &str) -> Self {
        ServiceExpr {
            name: name.to_string(),
            description: None,
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<MethodRef> {
        self.methods
            .iter()
            .find(|m| m.borrow().name == name)
            .map(Rc::clone)
    }
}

/// One operation: optional request shape, response shape, declared errors.
///
/// Built incrementally while its configuration closure runs; read-only after
/// finalization.
#[derive(Debug)]
pub struct MethodExpr {
    pub name: String,
    pub description: Option<String>,
    pub payload: Option<AttributeRef>,
    pub result: Option<AttributeRef>,
    pub errors: Vec<ErrorExpr>,
}

impl MethodExpr {
    pub fn new(name: &str) -> Self {
        MethodExpr {
            name: name.to_string(),
            description: None,
            payload: None,
            result: None,
            errors: Vec::new(),
        }
    }
}

/// A declared error shape on a method.
#[derive(Debug, Clone)]
pub struct ErrorExpr {
    pub name: String,
    pub attribute: AttributeRef,
}
