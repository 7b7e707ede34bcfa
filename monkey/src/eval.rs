use crate::ast::{BlockStatement, Expression, Identifier, InfixOp, Node, PrefixOp, Program, Statement};
use crate::builtin;
use crate::environment::Environment;
use crate::modify::{modify, ModifyError};
use crate::object::{HashPair, Object, ObjectKind, Procedure};
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

/// Evaluate any node. Statements that produce nothing (`let`, empty
/// programs and blocks) yield `None`; every expression yields a value.
pub fn eval(node: &Node, env: &Rc<Environment>) -> Option<Object> {
    match node {
        Node::Program(program) => eval_program(program, env),
        Node::Statement(stmt) => eval_statement(stmt, env),
        Node::Expression(expr) => Some(eval_expression(expr, env)),
    }
}

// Return values are unwrapped at the top level, errors stop evaluation.
pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Option<Object> {
    let mut result = None;
    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Some(Object::ReturnValue(value)) => return Some(*value),
            Some(err @ Object::Error(_)) => return Some(err),
            other => result = other,
        }
    }
    result
}

// Unlike programs, blocks hand return values up still wrapped so enclosing
// blocks stop as well.
pub(crate) fn eval_block(block: &BlockStatement, env: &Rc<Environment>) -> Option<Object> {
    let mut result = None;
    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if let Some(Object::ReturnValue(_)) | Some(Object::Error(_)) = result {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Option<Object> {
    match stmt {
        Statement::Expression(expr) => Some(eval_expression(expr, env)),
        Statement::Let { name, value } => {
            let value = eval_expression(value, env);
            if value.stops_evaluation() {
                return Some(value);
            }
            env.set(name.0.clone(), value);
            None
        },
        Statement::Return { value } => {
            let value = match value {
                Some(expr) => eval_expression(expr, env),
                None => Object::Null,
            };
            if value.stops_evaluation() {
                return Some(value);
            }
            Some(Object::ReturnValue(Box::new(value)))
        },
        Statement::Block(block) => eval_block(block, env),
    }
}

pub(crate) fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Object {
    match expr {
        Expression::Integer(value) => Object::Integer(*value),
        Expression::Boolean(value) => Object::Boolean(*value),
        Expression::Str(value) => Object::Str(value.clone()),
        Expression::Identifier(ident) => eval_identifier(ident, env),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env);
            if right.stops_evaluation() {
                return right;
            }
            eval_prefix(*operator, right)
        },
        Expression::Infix { operator, left, right } => {
            let left = eval_expression(left, env);
            if left.stops_evaluation() {
                return left;
            }
            let right = eval_expression(right, env);
            if right.stops_evaluation() {
                return right;
            }
            eval_infix(*operator, left, right)
        },
        Expression::If { condition, consequence, alternative } => {
            let condition = eval_expression(condition, env);
            if condition.stops_evaluation() {
                return condition;
            }
            let branch = match (condition.is_truthy(), alternative) {
                (true, _) => consequence,
                (false, Some(alternative)) => alternative,
                (false, None) => return Object::Null,
            };
            eval_block(branch, env).unwrap_or(Object::Null)
        },
        Expression::Function { parameters, body } => Object::Function(Rc::new(
            Procedure::new(parameters.clone(), body.clone(), Rc::clone(env)))),
        Expression::Macro { parameters, body } => Object::Macro(Rc::new(
            Procedure::new(parameters.clone(), body.clone(), Rc::clone(env)))),
        Expression::Call { function, arguments } => {
            if let Expression::Identifier(Identifier(name)) = function.as_ref() {
                if name == "quote" {
                    return match arguments.as_slice() {
                        [arg] => quote(arg, env),
                        _ => Object::Error(format!(
                            "wrong number of arguments to quote. got={}, want=1", arguments.len())),
                    };
                }
            }
            let callee = eval_expression(function, env);
            if callee.stops_evaluation() {
                return callee;
            }
            match eval_expressions(arguments, env) {
                Ok(args) => apply_function(callee, args),
                Err(err) => err,
            }
        },
        Expression::Array(elements) => match eval_expressions(elements, env) {
            Ok(elements) => Object::Array(Rc::new(elements)),
            Err(err) => err,
        },
        Expression::Index { left, index } => {
            let left = eval_expression(left, env);
            if left.stops_evaluation() {
                return left;
            }
            let index = eval_expression(index, env);
            if index.stops_evaluation() {
                return index;
            }
            eval_index(&left, &index)
        },
        Expression::Hash(pairs) => eval_hash_literal(pairs, env),
    }
}

// Left to right, stopping at the first error or return.
fn eval_expressions(exprs: &[Expression], env: &Rc<Environment>) -> Result<Vec<Object>, Object> {
    let mut values = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.stops_evaluation() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_identifier(ident: &Identifier, env: &Rc<Environment>) -> Object {
    env.get(&ident.0)
        .or_else(|| builtin::lookup(&ident.0).map(Object::Builtin))
        .unwrap_or_else(|| Object::Error(format!("identifier not found: {}", ident)))
}

fn eval_prefix(operator: PrefixOp, right: Object) -> Object {
    match operator {
        PrefixOp::Bang => match right {
            Object::Boolean(value) => Object::Boolean(!value),
            Object::Null => Object::Boolean(true),
            _ => Object::Boolean(false),
        },
        PrefixOp::Minus => match right {
            Object::Integer(value) => Object::Integer(value.wrapping_neg()),
            other => Object::Error(format!("unknown operator: -{}", other.kind())),
        },
    }
}

fn eval_infix(operator: InfixOp, left: Object, right: Object) -> Object {
    match (&left, &right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::Str(l), Object::Str(r)) => eval_string_infix(operator, l, r),
        _ if left.kind() != right.kind() => Object::Error(format!(
            "type mismatch: {} {} {}", left.kind(), operator, right.kind())),
        // same kind otherwise, compared by their rendering
        _ => match operator {
            InfixOp::Eq => Object::Boolean(left.inspect() == right.inspect()),
            InfixOp::NotEq => Object::Boolean(left.inspect() != right.inspect()),
            _ => Object::Null,
        },
    }
}

fn eval_integer_infix(operator: InfixOp, l: i64, r: i64) -> Object {
    match operator {
        InfixOp::Plus => Object::Integer(l.wrapping_add(r)),
        InfixOp::Minus => Object::Integer(l.wrapping_sub(r)),
        InfixOp::Multiply => Object::Integer(l.wrapping_mul(r)),
        InfixOp::Divide if r == 0 => Object::Error("division by zero".to_string()),
        InfixOp::Divide => Object::Integer(l.wrapping_div(r)),
        InfixOp::Lt => Object::Boolean(l < r),
        InfixOp::Gt => Object::Boolean(l > r),
        InfixOp::Eq => Object::Boolean(l == r),
        InfixOp::NotEq => Object::Boolean(l != r),
    }
}

fn eval_string_infix(operator: InfixOp, l: &str, r: &str) -> Object {
    match operator {
        InfixOp::Plus => Object::Str(format!("{}{}", l, r)),
        _ => Object::Error(format!(
            "unknown operator: {} {} {}", ObjectKind::Str, operator, ObjectKind::Str)),
    }
}

fn eval_index(left: &Object, index: &Object) -> Object {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => usize::try_from(*i).ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Object::Null),
        (Object::Hash(pairs), _) => match index.hash_key() {
            Some(key) => pairs.get(&key).map(|pair| pair.value.clone()).unwrap_or(Object::Null),
            None => Object::Error(format!("unusable as hash key: {}", index.kind())),
        },
        _ => Object::Error(format!("index operator not supported: {}", left.kind())),
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<Environment>) -> Object {
    let mut hash = BTreeMap::new();
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if key.stops_evaluation() {
            return key;
        }
        let hash_key = match key.hash_key() {
            Some(hash_key) => hash_key,
            None => return Object::Error(format!("unusable as hash key: {}", key.kind())),
        };
        let value = eval_expression(value_expr, env);
        if value.stops_evaluation() {
            return value;
        }
        hash.insert(hash_key, HashPair{key, value});
    }
    Object::Hash(Rc::new(hash))
}

pub(crate) fn apply_function(callee: Object, args: Vec<Object>) -> Object {
    match callee {
        Object::Function(func) => {
            tracing::trace!(params = func.parameters.len(), args = args.len(), "applying function");
            let env = Rc::new(func.bind(args));
            match eval_block(&func.body, &env) {
                Some(Object::ReturnValue(value)) => *value,
                Some(value) => value,
                None => Object::Null,
            }
        },
        Object::Builtin(builtin) => {
            tracing::trace!(name = builtin.name, args = args.len(), "applying builtin");
            builtin.call(&args)
        },
        other => Object::Error(format!("not a function: {}", other.kind())),
    }
}

#[derive(Debug, Error)]
enum UnquoteError {
    #[error(transparent)]
    Modify(#[from] ModifyError),
    #[error("{0}")]
    Eval(String),
    #[error("cannot unquote {0} into the syntax tree")]
    Unrepresentable(ObjectKind),
}

// The argument is kept unevaluated, except for `unquote(..)` calls inside
// it which are evaluated now and spliced back in.
fn quote(expr: &Expression, env: &Rc<Environment>) -> Object {
    match eval_unquote_calls(Node::Expression(expr.clone()), env) {
        Ok(node) => Object::Quote(Rc::new(node)),
        Err(err) => Object::Error(err.to_string()),
    }
}

fn eval_unquote_calls(quoted: Node, env: &Rc<Environment>) -> Result<Node, UnquoteError> {
    modify(quoted, &mut |node: Node| {
        if let Node::Expression(Expression::Call { function, arguments }) = &node {
            if let (Expression::Identifier(Identifier(name)), [arg]) =
                    (function.as_ref(), arguments.as_slice()) {
                if name == "unquote" {
                    return object_to_node(eval_expression(arg, env));
                }
            }
        }
        Ok(node)
    })
}

fn object_to_node(obj: Object) -> Result<Node, UnquoteError> {
    let expr = match obj {
        Object::Integer(value) => Expression::Integer(value),
        Object::Boolean(value) => Expression::Boolean(value),
        Object::Str(value) => Expression::Str(value),
        Object::Quote(node) => return Ok(Rc::try_unwrap(node).unwrap_or_else(|rc| (*rc).clone())),
        Object::Error(message) => return Err(UnquoteError::Eval(message)),
        other => return Err(UnquoteError::Unrepresentable(other.kind())),
    };
    Ok(Node::Expression(expr))
}
