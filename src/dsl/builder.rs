use std::cell::RefCell;
use std::rc::Rc;

use crate::design::{AttributeExpr, AttributeRef, DataType};
use crate::eval::{ConfigFn, Eval, ExprHandle};

use super::arg::ConstructArg;

/// The generic construct builder shared by `Payload`, `Result`, `Error` and
/// every other construct that accepts `(value, optional refining closure)`.
///
/// `construct` is the diagnostic name reported on misuse, so error messages
/// stay construct-specific even though the dispatch is generic. `fns` models
/// the trailing closure list: a leading `None` slot is dropped (a nil
/// placeholder, not a closure), more than one remaining slot is an arity
/// violation.
///
/// Returns `None` when the construct failed; the caller must leave its
/// target field unset and must not refine a failure value.
///
/// Type duplication rules:
/// - named type, no closure: the attribute shares the exact type handle;
/// - named type with closure: the type is deep-copied first and the closure
///   refines the copy, so the customization never leaks into other
///   references of the same named type.
pub fn construct(
    eval: &mut Eval,
    name: &str,
    value: ConstructArg,
    mut fns: Vec<Option<ConfigFn>>,
) -> Option<AttributeRef> {
    if matches!(fns.first(), Some(None)) {
        fns.remove(0);
    }
    if fns.len() > 1 {
        eval.diagnostics.report_for(name, "too many arguments");
        return None;
    }

    let mut refine: Option<ConfigFn> = None;
    let att = match value {
        ConstructArg::Closure(f) => {
            refine = Some(f);
            Rc::new(RefCell::new(AttributeExpr::empty_object()))
        }
        ConstructArg::NamedRef(ut) => {
            if fns.is_empty() {
                // Identity-preserving fast path: no customization, share the
                // type instance instead of copying it.
                return Some(Rc::new(RefCell::new(AttributeExpr::new(DataType::User(
                    ut,
                )))));
            }
            let dup = Rc::new(RefCell::new(ut.borrow().dup()));
            Rc::new(RefCell::new(AttributeExpr::new(DataType::User(dup))))
        }
        ConstructArg::Bare(ty) => Rc::new(RefCell::new(AttributeExpr::new(ty))),
        ConstructArg::Invalid(what) => {
            eval.diagnostics.report_for(
                name,
                format!("invalid argument {}, must be a type or a function", what),
            );
            return None;
        }
    };

    if let Some(f) = fns.pop().flatten() {
        if refine.is_some() {
            eval.diagnostics.report_for(
                name,
                "invalid arguments, must be (type), (func) or (type, func)",
            );
        }
        refine = Some(f);
    }
    if let Some(f) = refine {
        eval.execute(f, ExprHandle::Attribute(Rc::clone(&att)));
    }
    Some(att)
}
