use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use crate::design::{AttributeRef, DataType, RootExpr, UserTypeExpr};
use crate::eval::diagnostics::Diagnostics;

/// Second pass over a completed tree.
///
/// Types and methods can be declared in any order, so field-level
/// constraints and by-name type references cannot always be resolved while
/// the first pass runs. This walk resolves `DataType::Ref` forward
/// references against the defined user types, propagates each object's
/// required-name list onto the matching child attributes, and reports a
/// diagnostic for every name that never resolves.
///
/// Idempotent: a second call on an already-finalized root changes nothing
/// and reports nothing.
pub fn finalize(root: &mut RootExpr, diags: &mut Diagnostics) {
    if root.finalized {
        return;
    }
    debug!(design = %root.name, "finalizing expression tree");

    let mut walker = Walker {
        root,
        diags,
        visited: HashSet::new(),
    };
    for ut in walker.root.types.to_vec() {
        walker.user_type(&ut);
    }
    for service in walker.root.services.to_vec() {
        for method in service.borrow().methods.iter() {
            let m = method.borrow();
            if let Some(p) = &m.payload {
                walker.attribute(p);
            }
            if let Some(r) = &m.result {
                walker.attribute(r);
            }
            for err in &m.errors {
                walker.attribute(&err.attribute);
            }
        }
    }
    root.finalized = true;
}

struct Walker<'a> {
    root: &'a RootExpr,
    diags: &'a mut Diagnostics,
    /// User types already walked, by handle identity. Guards against cycles
    /// through self-referential types.
    visited: HashSet<*const RefCell<UserTypeExpr>>,
}

impl Walker<'_> {
    fn user_type(&mut self, ut: &Rc<RefCell<UserTypeExpr>>) {
        if !self.visited.insert(Rc::as_ptr(ut)) {
            return;
        }
        let att = Rc::clone(&ut.borrow().attribute);
        self.attribute(&att);
    }

    fn attribute(&mut self, att: &AttributeRef) {
        // Resolve a forward reference in place before descending.
        let pending = match &att.borrow().ty {
            DataType::Ref(name) => Some(name.clone()),
            _ => None,
        };
        if let Some(name) = pending {
            match self.root.user_type(&name) {
                Some(ut) => att.borrow_mut().ty = DataType::User(ut),
                None => {
                    self.diags
                        .report(format!("type \"{}\" is not defined", name));
                    return;
                }
            }
        }

        // Collect children while borrowed, recurse after the borrow ends.
        let mut children: Vec<AttributeRef> = Vec::new();
        let mut user: Option<Rc<RefCell<UserTypeExpr>>> = None;
        {
            let borrowed = att.borrow();
            match &borrowed.ty {
                DataType::Object(obj) => {
                    if let Some(v) = &borrowed.validation {
                        for name in &v.required {
                            match obj.field(name) {
                                Some(field) => field.borrow_mut().required = true,
                                None => self.diags.report(format!(
                                    "required field \"{}\" is not defined",
                                    name
                                )),
                            }
                        }
                    }
                    children.extend(obj.iter().map(|f| Rc::clone(&f.attribute)));
                }
                DataType::Array(elem) | DataType::Map(elem) => children.push(Rc::clone(elem)),
                DataType::User(ut) => {
                    // A required list declared on a user-typed attribute
                    // (e.g. `payload(Operands, |e| required(...))`) applies
                    // to the fields of the underlying object. The builder
                    // already duplicated the type for this use site, so the
                    // marks stay local to it.
                    if let Some(v) = &borrowed.validation {
                        let ut_att = Rc::clone(&ut.borrow().attribute);
                        let ut_att = ut_att.borrow();
                        if let DataType::Object(obj) = &ut_att.ty {
                            for name in &v.required {
                                match obj.field(name) {
                                    Some(field) => field.borrow_mut().required = true,
                                    None => self.diags.report(format!(
                                        "required field \"{}\" is not defined",
                                        name
                                    )),
                                }
                            }
                        }
                    }
                    user = Some(Rc::clone(ut));
                }
                DataType::Primitive(_) | DataType::Ref(_) => {}
            }
        }
        for child in &children {
            self.attribute(child);
        }
        if let Some(ut) = user {
            self.user_type(&ut);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::design::{
        AttributeExpr, ErrorExpr, MethodExpr, Object, Primitive, ServiceExpr, UserTypeExpr,
    };
    use crate::design::{primitive_attr, DataType};

    fn object_with(fields: &[&str]) -> AttributeExpr {
        let mut obj = Object::new();
        for f in fields {
            obj.insert(f, primitive_attr(Primitive::String));
        }
        AttributeExpr::new(DataType::Object(obj))
    }

    fn root_with_payload(payload: AttributeExpr) -> RootExpr {
        let mut root = RootExpr::new("test");
        let method = Rc::new(RefCell::new(MethodExpr::new("m")));
        method.borrow_mut().payload = Some(Rc::new(RefCell::new(payload)));
        let service = Rc::new(RefCell::new(ServiceExpr::new("svc")));
        service.borrow_mut().methods.push(method);
        root.services.push(service);
        root
    }

    #[test]
    fn test_required_propagates_to_fields() {
        let mut payload = object_with(&["left", "right", "note"]);
        payload.add_required(&["left", "right"]);
        let mut root = root_with_payload(payload);
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        assert!(diags.is_empty());

        let svc = root.service("svc").unwrap();
        let svc = svc.borrow();
        let m = svc.methods[0].borrow();
        let p = m.payload.as_ref().unwrap().borrow();
        assert!(p.field("left").unwrap().borrow().required);
        assert!(p.field("right").unwrap().borrow().required);
        assert!(!p.field("note").unwrap().borrow().required);
    }

    #[test]
    fn test_unknown_required_name_reported() {
        let mut payload = object_with(&["left"]);
        payload.add_required(&["rigth"]);
        let mut root = root_with_payload(payload);
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(diags.iter().next().unwrap().message.contains("rigth"));
    }

    #[test]
    fn test_forward_reference_resolves() {
        let payload = AttributeExpr::new(DataType::Ref("Operands".to_string()));
        let mut root = root_with_payload(payload);
        root.types.push(Rc::new(RefCell::new(UserTypeExpr::new(
            "Operands",
            object_with(&["left", "right"]),
        ))));
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        assert!(diags.is_empty());

        let svc = root.service("svc").unwrap();
        let svc = svc.borrow();
        let m = svc.methods[0].borrow();
        let p = m.payload.as_ref().unwrap().borrow();
        match &p.ty {
            DataType::User(ut) => assert_eq!(ut.borrow().name, "Operands"),
            other => panic!("reference not resolved: {:?}", other),
        }
    }

    #[test]
    fn test_undefined_reference_reported() {
        let payload = AttributeExpr::new(DataType::Ref("Missing".to_string()));
        let mut root = root_with_payload(payload);
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().message,
            "type \"Missing\" is not defined"
        );
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut payload = object_with(&["left"]);
        payload.add_required(&["left", "missing"]);
        let mut root = root_with_payload(payload);
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        let after_first = diags.len();
        finalize(&mut root, &mut diags);
        assert_eq!(diags.len(), after_first);
        assert!(root.finalized);
    }

    #[test]
    fn test_error_attributes_walked() {
        let payload = object_with(&["left"]);
        let mut root = root_with_payload(payload);
        {
            let svc = root.service("svc").unwrap();
            let svc = svc.borrow();
            svc.methods[0].borrow_mut().errors.push(ErrorExpr {
                name: "bad_input".to_string(),
                attribute: Rc::new(RefCell::new(AttributeExpr::new(DataType::Ref(
                    "Nope".to_string(),
                )))),
            });
        }
        let mut diags = Diagnostics::new();
        finalize(&mut root, &mut diags);
        assert_eq!(diags.len(), 1);
    }
}
