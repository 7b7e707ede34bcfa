extern crate lexers;

mod ast;
mod builtin;
mod environment;
mod eval;
mod macro_expansion;
mod modify;
mod object;
mod parser;

pub use ast::{BlockStatement, Expression, Identifier, InfixOp, Node, PrefixOp, Program, Statement};
pub use environment::Environment;
pub use eval::{eval, eval_program};
pub use macro_expansion::{define_macros, expand_macros, MacroError};
pub use modify::{modify, ModifyError};
pub use object::{inspect, Builtin, HashKey, HashPair, Object, ObjectKind, Procedure};
pub use parser::{parse, ParseError, Parser, Precedence};

#[cfg(test)]
mod eval_test;
