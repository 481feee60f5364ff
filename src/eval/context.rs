use std::rc::Rc;

use crate::design::{AttributeRef, MethodRef, ServiceRef};
use crate::eval::diagnostics::Diagnostics;

/// A deferred configuration callback, invoked exactly once with the
/// evaluation context threaded through so nested constructs find their
/// enclosing expression on the stack.
pub type ConfigFn = Box<dyn FnOnce(&mut Eval)>;

/// Handle to the expression a configuration closure is currently shaping.
#[derive(Clone)]
pub enum ExprHandle {
    Service(ServiceRef),
    Method(MethodRef),
    Attribute(AttributeRef),
}

impl ExprHandle {
    /// Human-readable kind used in incompatible-context diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ExprHandle::Service(_) => "service",
            ExprHandle::Method(_) => "method",
            ExprHandle::Attribute(_) => "attribute",
        }
    }

    pub fn as_service(&self) -> Option<ServiceRef> {
        match self {
            ExprHandle::Service(s) => Some(Rc::clone(s)),
            _ => None,
        }
    }

    pub fn as_method(&self) -> Option<MethodRef> {
        match self {
            ExprHandle::Method(m) => Some(Rc::clone(m)),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<AttributeRef> {
        match self {
            ExprHandle::Attribute(a) => Some(Rc::clone(a)),
            _ => None,
        }
    }
}

/// The evaluation context: an explicit LIFO stack of expressions under
/// configuration plus the batched diagnostics collector.
///
/// The stack discipline is strict: `execute` pushes the target, runs the
/// closure to completion, and restores the previous depth before returning,
/// so an inner construct can never corrupt the context of its caller.
/// The context is threaded through every construct as `&mut Eval`; there is
/// no global state, and evaluation is single-threaded.
#[derive(Default)]
pub struct Eval {
    stack: Vec<ExprHandle>,
    pub diagnostics: Diagnostics,
}

impl Eval {
    pub fn new() -> Self {
        Eval::default()
    }

    /// Run `f` with `target` as the current expression.
    ///
    /// The previous current expression is restored on return even if the
    /// closure left extra frames behind.
    pub fn execute(&mut self, f: ConfigFn, target: ExprHandle) {
        self.stack.push(target);
        let depth = self.stack.len();
        f(self);
        debug_assert!(self.stack.len() >= depth, "evaluation stack underflow");
        self.stack.truncate(depth - 1);
    }

    /// The expression currently being configured, if any.
    pub fn current(&self) -> Option<&ExprHandle> {
        self.stack.last()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::design::{AttributeExpr, MethodExpr};
    use std::cell::RefCell;

    fn method_handle(name: &str) -> ExprHandle {
        ExprHandle::Method(Rc::new(RefCell::new(MethodExpr::new(name))))
    }

    fn attribute_handle() -> ExprHandle {
        ExprHandle::Attribute(Rc::new(RefCell::new(AttributeExpr::empty_object())))
    }

    #[test]
    fn test_execute_restores_previous_current() {
        let mut eval = Eval::new();
        assert!(eval.current().is_none());
        eval.execute(
            Box::new(|e| {
                assert_eq!(e.current().unwrap().kind(), "method");
                e.execute(
                    Box::new(|inner| {
                        assert_eq!(inner.current().unwrap().kind(), "attribute");
                        assert_eq!(inner.depth(), 2);
                    }),
                    attribute_handle(),
                );
                // inner context popped, outer restored
                assert_eq!(e.current().unwrap().kind(), "method");
                assert_eq!(e.depth(), 1);
            }),
            method_handle("add"),
        );
        assert!(eval.current().is_none());
        assert_eq!(eval.depth(), 0);
    }

    #[test]
    fn test_execute_truncates_leaked_frames() {
        let mut eval = Eval::new();
        eval.execute(
            Box::new(|e| {
                // a misbehaving closure that pushes without popping
                e.stack.push(attribute_handle());
                e.stack.push(attribute_handle());
            }),
            method_handle("leaky"),
        );
        assert_eq!(eval.depth(), 0);
    }
}
