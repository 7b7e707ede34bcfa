#![deny(warnings)]

use crate::scanner::Scanner;
use crate::token::{lookup_ident, Token, TokenKind};

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

pub struct Lexer {
    src: Scanner,
}

impl Lexer {
    pub fn new(source: &str) -> Lexer {
        Lexer{src: Scanner::new(source)}
    }

    // single char token, consumes curr
    fn single(&mut self, kind: TokenKind, c: char) -> Token {
        self.src.advance();
        Token::new(kind, c)
    }

    // two char token if 'second' follows, else the single char one
    fn either(&mut self, c: char, second: char,
              double: TokenKind, single: TokenKind) -> Token {
        if self.src.accept(second) {
            self.src.advance();
            return Token::new(double, format!("{}{}", c, second));
        }
        self.single(single, c)
    }

    fn scan_string(&mut self) -> Token {
        self.src.advance(); // opening quote
        let contents = self.src.take_while(|c| c != '"');
        match self.src.curr() {
            Some('"') => {
                self.src.advance();
                Token::new(TokenKind::Str, contents)
            },
            _ => Token::new(TokenKind::Illegal, format!("\"{}", contents)),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.src.skip_all(is_whitespace);
        match self.src.curr() {
            None => Token::eof(),
            Some(c @ '=') => self.either(c, '=', TokenKind::Eq, TokenKind::Assign),
            Some(c @ '!') => self.either(c, '=', TokenKind::NotEq, TokenKind::Bang),
            Some(c @ '+') => self.single(TokenKind::Plus, c),
            Some(c @ '-') => self.single(TokenKind::Minus, c),
            Some(c @ '*') => self.single(TokenKind::Asterisk, c),
            Some(c @ '/') => self.single(TokenKind::Slash, c),
            Some(c @ '<') => self.single(TokenKind::Lt, c),
            Some(c @ '>') => self.single(TokenKind::Gt, c),
            Some(c @ ',') => self.single(TokenKind::Comma, c),
            Some(c @ ';') => self.single(TokenKind::Semicolon, c),
            Some(c @ ':') => self.single(TokenKind::Colon, c),
            Some(c @ '(') => self.single(TokenKind::LParen, c),
            Some(c @ ')') => self.single(TokenKind::RParen, c),
            Some(c @ '{') => self.single(TokenKind::LBrace, c),
            Some(c @ '}') => self.single(TokenKind::RBrace, c),
            Some(c @ '[') => self.single(TokenKind::LBracket, c),
            Some(c @ ']') => self.single(TokenKind::RBracket, c),
            Some('"') => self.scan_string(),
            Some(c) if is_letter(c) => {
                let ident = self.src.take_while(is_letter);
                Token::new(lookup_ident(&ident), ident)
            },
            Some(c) if c.is_ascii_digit() => {
                let digits = self.src.take_while(|d| d.is_ascii_digit());
                Token::new(TokenKind::Int, digits)
            },
            Some(c) => self.single(TokenKind::Illegal, c),
        }
    }
}

// Yields every token before EOF
impl Iterator for Lexer {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token)
        }
    }
}
