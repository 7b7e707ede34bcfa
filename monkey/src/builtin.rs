use crate::object::{Builtin, Object};
use std::rc::Rc;

macro_rules! nargs {
    ($args:ident, $want:expr) => {
        if $args.len() != $want {
            return Object::Error(format!(
                "wrong number of arguments. got={}, want={}", $args.len(), $want));
        }
    };
}

static BUILTINS: &[Builtin] = &[
    Builtin{name: "len", func: len},
    Builtin{name: "first", func: first},
    Builtin{name: "last", func: last},
    Builtin{name: "rest", func: rest},
    Builtin{name: "push", func: push},
    Builtin{name: "puts", func: puts},
];

pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|b| b.name == name).copied()
}

fn not_an_array(name: &str, arg: &Object) -> Object {
    Object::Error(format!("argument to `{}` must be ARRAY, got {}", name, arg.kind()))
}

fn len(args: &[Object]) -> Object {
    nargs!(args, 1);
    match &args[0] {
        Object::Str(s) => Object::Integer(s.chars().count() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => Object::Error(format!("argument to `len` not supported, got {}", other.kind())),
    }
}

fn first(args: &[Object]) -> Object {
    nargs!(args, 1);
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or(Object::Null),
        other => not_an_array("first", other),
    }
}

fn last(args: &[Object]) -> Object {
    nargs!(args, 1);
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or(Object::Null),
        other => not_an_array("last", other),
    }
}

fn rest(args: &[Object]) -> Object {
    nargs!(args, 1);
    match &args[0] {
        Object::Array(elements) if elements.is_empty() => Object::Null,
        Object::Array(elements) => Object::Array(Rc::new(elements[1..].to_vec())),
        other => not_an_array("rest", other),
    }
}

// A new array, the argument is left untouched
fn push(args: &[Object]) -> Object {
    nargs!(args, 2);
    match &args[0] {
        Object::Array(elements) => {
            let mut pushed = Vec::with_capacity(elements.len() + 1);
            pushed.extend(elements.iter().cloned());
            pushed.push(args[1].clone());
            Object::Array(Rc::new(pushed))
        },
        other => not_an_array("push", other),
    }
}

fn puts(args: &[Object]) -> Object {
    for arg in args {
        println!("{}", arg);
    }
    Object::Null
}
