use crate::ast::{Expression, Identifier, Node, Program, Statement};
use crate::environment::Environment;
use crate::eval::eval_block;
use crate::modify::{modify, ModifyError};
use crate::object::{Object, ObjectKind, Procedure};
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum MacroError {
    #[error("macro must return a quoted node, got {0}")]
    NotQuote(ObjectKind),
    #[error("macro failed: {0}")]
    Eval(String),
    #[error(transparent)]
    Modify(#[from] ModifyError),
}

/// Move every top-level `let name = macro(..) {..}` out of the program and
/// into `env`. Macro definitions nested deeper are left alone.
#[tracing::instrument(skip_all)]
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    program.statements.retain(|stmt| match stmt {
        Statement::Let { name, value: Expression::Macro { parameters, body } } => {
            debug!(%name, "defining macro");
            let mac = Procedure::new(parameters.clone(), body.clone(), Rc::clone(env));
            env.set(name.0.clone(), Object::Macro(Rc::new(mac)));
            false
        },
        _ => true,
    });
}

/// Replace every call to a macro bound in `env` with the node its body
/// produces. Arguments reach the body unevaluated, as `Quote` objects.
/// Expansion output is not expanded again.
#[tracing::instrument(skip_all)]
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Result<Program, MacroError> {
    let expanded = modify(Node::Program(program), &mut |node: Node| {
        let Some((name, mac, arguments)) = macro_call(&node, env) else {
            return Ok(node);
        };
        debug!(%name, args = arguments.len(), "expanding macro");
        let args = arguments.into_iter()
            .map(|arg| Object::Quote(Rc::new(Node::Expression(arg))))
            .collect();
        let call_env = Rc::new(mac.bind(args));
        match eval_block(&mac.body, &call_env) {
            Some(Object::ReturnValue(value)) => quoted_node(*value),
            Some(value) => quoted_node(value),
            None => Err(MacroError::NotQuote(ObjectKind::Null)),
        }
    })?;
    match expanded {
        Node::Program(program) => Ok(program),
        other => Err(MacroError::Modify(ModifyError::mismatch("program", &other))),
    }
}

fn macro_call(node: &Node, env: &Environment) -> Option<(Identifier, Rc<Procedure>, Vec<Expression>)> {
    let Node::Expression(Expression::Call { function, arguments }) = node else {
        return None;
    };
    let Expression::Identifier(name) = function.as_ref() else {
        return None;
    };
    match env.get(&name.0) {
        Some(Object::Macro(mac)) => Some((name.clone(), mac, arguments.clone())),
        _ => None,
    }
}

fn quoted_node(value: Object) -> Result<Node, MacroError> {
    match value {
        Object::Quote(quoted) => Ok(Rc::try_unwrap(quoted).unwrap_or_else(|rc| (*rc).clone())),
        Object::Error(message) => Err(MacroError::Eval(message)),
        other => Err(MacroError::NotQuote(other.kind())),
    }
}
