use crate::ast::{BlockStatement, Identifier, Node};
use crate::environment::Environment;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Integer,
    Boolean,
    Null,
    Str,
    Array,
    Hash,
    Function,
    Builtin,
    ReturnValue,
    Error,
    Quote,
    Macro,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ObjectKind::Integer => "INTEGER",
            ObjectKind::Boolean => "BOOLEAN",
            ObjectKind::Null => "NULL",
            ObjectKind::Str => "STRING",
            ObjectKind::Array => "ARRAY",
            ObjectKind::Hash => "HASH",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Builtin => "BUILTIN",
            ObjectKind::ReturnValue => "RETURN_VALUE",
            ObjectKind::Error => "ERROR",
            ObjectKind::Quote => "QUOTE",
            ObjectKind::Macro => "MACRO",
        };
        write!(f, "{}", name)
    }
}

/// Identity of a hashable value: equal (kind, value) means the same key no
/// matter which object produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey {
    kind: ObjectKind,
    value: u64,
}

impl HashKey {
    pub fn kind(&self) -> ObjectKind { self.kind }

    pub fn value(&self) -> u64 { self.value }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

pub type BuiltinFn = fn(&[Object]) -> Object;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub fn call(&self, args: &[Object]) -> Object {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<builtin {}>", self.name)
    }
}

// Parameters, body and the environment they close over. Backs both
// functions and macros.
pub struct Procedure {
    pub parameters: Vec<Identifier>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

impl Procedure {
    pub fn new(parameters: Vec<Identifier>, body: BlockStatement, env: Rc<Environment>) -> Procedure {
        Procedure{parameters, body, env}
    }

    // Positional binding in a fresh child of the captured environment.
    // Surplus arguments are dropped, missing ones stay unbound.
    pub fn bind(&self, args: Vec<Object>) -> Environment {
        let env = Environment::enclosed(Rc::clone(&self.env));
        for (param, arg) in self.parameters.iter().zip(args) {
            env.set(param.0.clone(), arg);
        }
        env
    }

    fn signature(&self) -> String {
        self.parameters.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
    }
}

// The captured environment may hold this very procedure, never print it
impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "fn({}) ...", self.signature())
    }
}

#[derive(Clone, Debug)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Str(String),
    Array(Rc<Vec<Object>>),
    Hash(Rc<BTreeMap<HashKey, HashPair>>),
    Function(Rc<Procedure>),
    Builtin(Builtin),
    ReturnValue(Box<Object>),
    Error(String),
    Quote(Rc<Node>),
    Macro(Rc<Procedure>),
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Integer(_) => ObjectKind::Integer,
            Object::Boolean(_) => ObjectKind::Boolean,
            Object::Null => ObjectKind::Null,
            Object::Str(_) => ObjectKind::Str,
            Object::Array(_) => ObjectKind::Array,
            Object::Hash(_) => ObjectKind::Hash,
            Object::Function(_) => ObjectKind::Function,
            Object::Builtin(_) => ObjectKind::Builtin,
            Object::ReturnValue(_) => ObjectKind::ReturnValue,
            Object::Error(_) => ObjectKind::Error,
            Object::Quote(_) => ObjectKind::Quote,
            Object::Macro(_) => ObjectKind::Macro,
        }
    }

    // Errors and return carriers both cut evaluation short, whether they
    // show up as a statement result or as an operand.
    pub fn stops_evaluation(&self) -> bool {
        matches!(self, Object::Error(_) | Object::ReturnValue(_))
    }

    // Only `true` is truthy: null, zero and every other value are not.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Object::Boolean(true))
    }

    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(value) => *value as u64,
            Object::Boolean(value) => u64::from(*value),
            Object::Str(value) => {
                let mut hasher = DefaultHasher::new();
                value.hash(&mut hasher);
                hasher.finish()
            },
            _ => return None,
        };
        Some(HashKey{kind: self.kind(), value})
    }

    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

/// Display form of a value, as the REPL prints it.
pub fn inspect(object: &Object) -> String {
    object.inspect()
}

impl PartialEq for Object {
    fn eq(&self, other: &Object) -> bool {
        match (self, other) {
            (Object::Integer(l), Object::Integer(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Null, Object::Null) => true,
            (Object::Str(l), Object::Str(r)) => l == r,
            (Object::Array(l), Object::Array(r)) => l == r,
            (Object::Hash(l), Object::Hash(r)) => l == r,
            (Object::Function(l), Object::Function(r)) => Rc::ptr_eq(l, r),
            (Object::Macro(l), Object::Macro(r)) => Rc::ptr_eq(l, r),
            (Object::Builtin(l), Object::Builtin(r)) => l.name == r.name,
            (Object::ReturnValue(l), Object::ReturnValue(r)) => l == r,
            (Object::Error(l), Object::Error(r)) => l == r,
            (Object::Quote(l), Object::Quote(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
            Object::Str(value) => write!(f, "{}", value),
            Object::Array(elements) => {
                let elements: Vec<_> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            },
            Object::Hash(pairs) => {
                let pairs: Vec<_> = pairs.values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            },
            Object::Function(func) => write!(f, "fn({}) {}", func.signature(), func.body),
            Object::Macro(mac) => write!(f, "macro({}) {}", mac.signature(), mac.body),
            Object::Builtin(_) => write!(f, "builtin function"),
            Object::ReturnValue(value) => write!(f, "{}", value),
            Object::Error(message) => write!(f, "error: {}", message),
            Object::Quote(node) => write!(f, "QUOTE({})", node),
        }
    }
}
