mod scanner;
mod token;
mod lexer;

pub use scanner::Scanner;
pub use token::{lookup_ident, Token, TokenKind};
pub use lexer::Lexer;
