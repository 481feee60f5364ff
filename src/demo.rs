//! The bundled calculator design: a small, complete design exercised by the
//! CLI and the integration tests. It touches every construct shape —
//! primitive payloads, inline objects, array elements, shared and refined
//! named types, length constraints, declared errors.

use std::rc::Rc;

use crate::design::Primitive;
use crate::dsl::{
    array_of, attribute, attribute_with, description, error, inline, method, min_length, payload,
    payload_with, required, result, Design,
};

pub fn calc_design() -> Design {
    let mut design = Design::new("calc");

    let operands = design.user_type("Operands", |e| {
        description(e, "A pair of integer operands");
        attribute(e, "left", Primitive::Int32);
        attribute(e, "right", Primitive::Int32);
    });

    let ops_add = Rc::clone(&operands);
    let ops_div = Rc::clone(&operands);
    design.service("calculator", move |e| {
        description(e, "Basic arithmetic over integer operands");

        method(e, "add", move |e| {
            // shared reference: no customization, same type instance
            payload(e, &ops_add);
            result(e, Primitive::Int64);
        });

        method(e, "divide", move |e| {
            // local refinement: duplicated before the marks are applied
            payload_with(e, &ops_div, |e| required(e, &["left", "right"]));
            result(e, Primitive::Float64);
            error(e, "div_by_zero", Primitive::String);
        });

        method(e, "sum", |e| {
            payload(
                e,
                inline(|e| {
                    let values = array_of(e, Primitive::Int32);
                    attribute(e, "values", values);
                    required(e, &["values"]);
                }),
            );
            result(e, Primitive::Int64);
        });

        method(e, "explain", |e| {
            payload(
                e,
                inline(|e| {
                    attribute_with(e, "expression", Primitive::String, |e| min_length(e, 1));
                    required(e, &["expression"]);
                }),
            );
            result(e, Primitive::String);
        });
    });

    design
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_calc_design_is_clean() {
        let design = calc_design();
        assert!(design.diagnostics().is_empty());
        let root = design.finalize().unwrap();
        assert_eq!(root.services.len(), 1);
        let svc = root.service("calculator").unwrap();
        assert_eq!(svc.borrow().methods.len(), 4);
    }
}
