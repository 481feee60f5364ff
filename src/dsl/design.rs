use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::design::{AttributeExpr, RootExpr, ServiceExpr, ServiceRef, UserTypeExpr, UserTypeRef};
use crate::eval::{finalize, Diagnostic, Diagnostics, Eval, ExprHandle};

/// Entry point for authoring a design.
///
/// Owns the root expression and the evaluation context; the configuration
/// closures passed to [`Design::service`] and [`Design::user_type`] receive
/// the context and invoke the free-function constructs against it.
///
/// ```no_run
/// use apiforge::design::Primitive;
/// use apiforge::dsl::{attribute, method, payload, required, result, Design};
///
/// let mut design = Design::new("calc");
/// let operands = design.user_type("Operands", |e| {
///     attribute(e, "left", Primitive::Int32);
///     attribute(e, "right", Primitive::Int32);
/// });
/// design.service("calculator", move |e| {
///     method(e, "add", move |e| {
///         apiforge::dsl::payload_with(e, &operands, |e| required(e, &["left", "right"]));
///         result(e, Primitive::Int32);
///     });
/// });
/// let root = design.finalize().expect("clean design");
/// # let _ = root;
/// ```
pub struct Design {
    root: RootExpr,
    eval: Eval,
}

impl Design {
    pub fn new(name: &str) -> Self {
        Design {
            root: RootExpr::new(name),
            eval: Eval::new(),
        }
    }

    /// Define a named object type shaped by `f`. The returned handle is the
    /// type's identity: passing it to a construct without a refining closure
    /// shares this exact instance.
    pub fn user_type(&mut self, name: &str, f: impl FnOnce(&mut Eval) + 'static) -> UserTypeRef {
        if self.root.user_type(name).is_some() {
            self.eval
                .diagnostics
                .report_for("Type", format!("type \"{}\" defined twice", name));
        }
        let att = Rc::new(RefCell::new(AttributeExpr::empty_object()));
        self.eval
            .execute(Box::new(f), ExprHandle::Attribute(Rc::clone(&att)));
        let ut = Rc::new(RefCell::new(UserTypeExpr {
            name: name.to_string(),
            attribute: att,
        }));
        self.root.types.push(Rc::clone(&ut));
        debug!(name, "defined user type");
        ut
    }

    /// Define a service and run its configuration closure.
    pub fn service(&mut self, name: &str, f: impl FnOnce(&mut Eval) + 'static) -> ServiceRef {
        if self.root.service(name).is_some() {
            self.eval
                .diagnostics
                .report_for("Service", format!("service \"{}\" defined twice", name));
        }
        let s = Rc::new(RefCell::new(ServiceExpr::new(name)));
        self.root.services.push(Rc::clone(&s));
        self.eval
            .execute(Box::new(f), ExprHandle::Service(Rc::clone(&s)));
        debug!(name, "defined service");
        s
    }

    /// The evaluation context, for driving constructs outside a closure
    /// (mostly tests exercising misuse paths).
    pub fn eval_mut(&mut self) -> &mut Eval {
        &mut self.eval
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.eval.diagnostics
    }

    /// Run the finalizer and surface the batch.
    ///
    /// Returns the finalized, read-only tree only when no usage diagnostics
    /// were collected during evaluation or finalization; code generation
    /// must not run over a tree with unresolved diagnostics.
    pub fn finalize(mut self) -> Result<RootExpr, Vec<Diagnostic>> {
        finalize(&mut self.root, &mut self.eval.diagnostics);
        if self.eval.diagnostics.is_empty() {
            Ok(self.root)
        } else {
            Err(self.eval.diagnostics.drain())
        }
    }
}
