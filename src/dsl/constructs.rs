use std::cell::RefCell;
use std::rc::Rc;

use crate::design::{
    AttributeExpr, DataType, ErrorExpr, MethodExpr, MethodRef, Object, Primitive, Validation,
};
use crate::eval::{ConfigFn, Eval, ExprHandle};

use super::arg::ConstructArg;
use super::builder::construct;

fn current_kind(eval: &Eval) -> Option<&'static str> {
    eval.current().map(ExprHandle::kind)
}

/// Define a method on the current service.
pub fn method(eval: &mut Eval, name: &str, f: impl FnOnce(&mut Eval) + 'static) -> Option<MethodRef> {
    let Some(service) = eval.current().and_then(ExprHandle::as_service) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Method", kind);
        return None;
    };
    let m = Rc::new(RefCell::new(MethodExpr::new(name)));
    service.borrow_mut().methods.push(Rc::clone(&m));
    eval.execute(Box::new(f), ExprHandle::Method(Rc::clone(&m)));
    Some(m)
}

/// Define the request shape of the current method.
///
/// The value is a primitive, a bare structural type, a named type reference,
/// or an [`inline`](super::inline) closure; see [`construct`] for the
/// duplication and sharing rules.
pub fn payload(eval: &mut Eval, value: impl Into<ConstructArg>) {
    payload_fns(eval, value.into(), vec![]);
}

/// [`payload`] with a refining closure applied at this use site only.
pub fn payload_with(
    eval: &mut Eval,
    value: impl Into<ConstructArg>,
    f: impl FnOnce(&mut Eval) + 'static,
) {
    payload_fns(eval, value.into(), vec![Some(Box::new(f))]);
}

/// Full-control form taking the raw closure list. A leading `None` slot is
/// dropped; more than one remaining closure is an arity violation that
/// leaves the payload unset.
pub fn payload_fns(eval: &mut Eval, value: ConstructArg, fns: Vec<Option<ConfigFn>>) {
    let Some(m) = eval.current().and_then(ExprHandle::as_method) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Payload", kind);
        return;
    };
    if let Some(att) = construct(eval, "Payload", value, fns) {
        m.borrow_mut().payload = Some(att);
    }
}

/// Define the response shape of the current method.
pub fn result(eval: &mut Eval, value: impl Into<ConstructArg>) {
    result_fns(eval, value.into(), vec![]);
}

/// [`result`] with a refining closure.
pub fn result_with(
    eval: &mut Eval,
    value: impl Into<ConstructArg>,
    f: impl FnOnce(&mut Eval) + 'static,
) {
    result_fns(eval, value.into(), vec![Some(Box::new(f))]);
}

pub fn result_fns(eval: &mut Eval, value: ConstructArg, fns: Vec<Option<ConfigFn>>) {
    let Some(m) = eval.current().and_then(ExprHandle::as_method) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Result", kind);
        return;
    };
    if let Some(att) = construct(eval, "Result", value, fns) {
        m.borrow_mut().result = Some(att);
    }
}

/// Declare an error shape returned by the current method.
pub fn error(eval: &mut Eval, name: &str, value: impl Into<ConstructArg>) {
    let Some(m) = eval.current().and_then(ExprHandle::as_method) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Error", kind);
        return;
    };
    if let Some(att) = construct(eval, "Error", value.into(), vec![]) {
        m.borrow_mut().errors.push(ErrorExpr {
            name: name.to_string(),
            attribute: att,
        });
    }
}

/// Add a named field to the current object attribute.
///
/// Field order is declaration order. A duplicate name is reported and the
/// first definition wins.
pub fn attribute(eval: &mut Eval, name: &str, value: impl Into<ConstructArg>) {
    attribute_fns(eval, name, value.into(), vec![]);
}

/// [`attribute`] with a refining closure shaping the field's own attribute.
pub fn attribute_with(
    eval: &mut Eval,
    name: &str,
    value: impl Into<ConstructArg>,
    f: impl FnOnce(&mut Eval) + 'static,
) {
    attribute_fns(eval, name, value.into(), vec![Some(Box::new(f))]);
}

pub fn attribute_fns(eval: &mut Eval, name: &str, value: ConstructArg, fns: Vec<Option<ConfigFn>>) {
    let Some(att) = eval.current().and_then(ExprHandle::as_attribute) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Attribute", kind);
        return;
    };
    if !att.borrow().ty.is_object() {
        eval.diagnostics
            .report_for("Attribute", "current expression is not an object");
        return;
    }
    let Some(field) = construct(eval, "Attribute", value, fns) else {
        return;
    };
    let mut att = att.borrow_mut();
    if let DataType::Object(obj) = &mut att.ty {
        if !obj.insert(name, field) {
            eval.diagnostics
                .report_for("Attribute", format!("duplicate field \"{}\"", name));
        }
    }
}

/// Mark fields of the current attribute as required.
///
/// The names are recorded on the attribute's validation and resolved by the
/// finalizer once the whole tree exists, so a field may be required before
/// it is declared.
pub fn required(eval: &mut Eval, names: &[&str]) {
    let Some(att) = eval.current().and_then(ExprHandle::as_attribute) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible("Required", kind);
        return;
    };
    att.borrow_mut().add_required(names);
}

/// Set the description of the current expression. Valid on services,
/// methods and attributes alike.
pub fn description(eval: &mut Eval, text: &str) {
    match eval.current() {
        Some(ExprHandle::Service(s)) => s.borrow_mut().description = Some(text.to_string()),
        Some(ExprHandle::Method(m)) => m.borrow_mut().description = Some(text.to_string()),
        Some(ExprHandle::Attribute(a)) => a.borrow_mut().description = Some(text.to_string()),
        None => eval.diagnostics.incompatible("Description", None),
    }
}

/// Constrain the current string attribute to match a regular expression.
pub fn pattern(eval: &mut Eval, regex: &str) {
    with_validation(eval, "Pattern", |v| v.pattern = Some(regex.to_string()));
}

/// Lower bound for the current numeric attribute.
pub fn minimum(eval: &mut Eval, min: f64) {
    with_validation(eval, "Minimum", |v| v.minimum = Some(min));
}

/// Upper bound for the current numeric attribute.
pub fn maximum(eval: &mut Eval, max: f64) {
    with_validation(eval, "Maximum", |v| v.maximum = Some(max));
}

/// Minimum length of the current string or array attribute.
pub fn min_length(eval: &mut Eval, n: usize) {
    with_validation(eval, "MinLength", |v| v.min_length = Some(n));
}

/// Maximum length of the current string or array attribute.
pub fn max_length(eval: &mut Eval, n: usize) {
    with_validation(eval, "MaxLength", |v| v.max_length = Some(n));
}

fn with_validation(eval: &mut Eval, construct: &str, f: impl FnOnce(&mut Validation)) {
    let Some(att) = eval.current().and_then(ExprHandle::as_attribute) else {
        let kind = current_kind(eval);
        eval.diagnostics.incompatible(construct, kind);
        return;
    };
    let mut att = att.borrow_mut();
    f(att.validation.get_or_insert_with(Validation::default));
}

/// An array of the given element type.
pub fn array_of(eval: &mut Eval, elem: impl Into<ConstructArg>) -> DataType {
    DataType::Array(element_attr(eval, "ArrayOf", elem.into()))
}

/// A string-keyed map of the given element type.
pub fn map_of(eval: &mut Eval, elem: impl Into<ConstructArg>) -> DataType {
    DataType::Map(element_attr(eval, "MapOf", elem.into()))
}

/// Element shapes must be types. An unsupported shape is reported and the
/// element falls back to a free-form value so evaluation continues.
fn element_attr(
    eval: &mut Eval,
    construct: &str,
    arg: ConstructArg,
) -> crate::design::AttributeRef {
    let ty = match arg {
        ConstructArg::Bare(ty) => ty,
        ConstructArg::NamedRef(ut) => DataType::User(ut),
        ConstructArg::Closure(_) => {
            eval.diagnostics
                .report_for(construct, "invalid element a function, must be a type");
            DataType::Primitive(Primitive::Any)
        }
        ConstructArg::Invalid(what) => {
            eval.diagnostics
                .report_for(construct, format!("invalid element {}, must be a type", what));
            DataType::Primitive(Primitive::Any)
        }
    };
    Rc::new(RefCell::new(AttributeExpr::new(ty)))
}

/// A fresh empty object type, for bare structural use.
pub fn empty_object() -> DataType {
    DataType::Object(Object::new())
}
