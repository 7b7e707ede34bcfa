use crate::ast::{BlockStatement, Expression, Identifier, InfixOp, PrefixOp, Program, Statement};
use lexers::{Lexer, Token, TokenKind};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected next token to be {expected}, got {found} instead")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),
    #[error("could not parse {0:?} as integer")]
    BadInteger(String),
    #[error("expected parameter name, got {0} instead")]
    BadParameter(TokenKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < >
    Sum,         // + -
    Product,     // * /
    Prefix,      // -x !x
    Call,        // f(x)
    Index,       // a[x]
}

pub fn precedence(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

type PrefixParseFn = fn(&mut Parser) -> Option<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> Option<Expression>;

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
    prefix_parse_fns: HashMap<TokenKind, PrefixParseFn>,
    infix_parse_fns: HashMap<TokenKind, InfixParseFn>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Parser {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        let mut parser = Parser{
            lexer, cur_token, peek_token,
            errors: Vec::new(),
            prefix_parse_fns: HashMap::new(),
            infix_parse_fns: HashMap::new(),
        };

        parser.register_prefix(TokenKind::Ident, Parser::parse_identifier);
        parser.register_prefix(TokenKind::Int, Parser::parse_integer_literal);
        parser.register_prefix(TokenKind::Str, Parser::parse_string_literal);
        parser.register_prefix(TokenKind::True, Parser::parse_boolean);
        parser.register_prefix(TokenKind::False, Parser::parse_boolean);
        parser.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        parser.register_prefix(TokenKind::LParen, Parser::parse_grouped_expression);
        parser.register_prefix(TokenKind::If, Parser::parse_if_expression);
        parser.register_prefix(TokenKind::Function, Parser::parse_function_literal);
        parser.register_prefix(TokenKind::Macro, Parser::parse_macro_literal);
        parser.register_prefix(TokenKind::LBracket, Parser::parse_array_literal);
        parser.register_prefix(TokenKind::LBrace, Parser::parse_hash_literal);

        for kind in [TokenKind::Plus, TokenKind::Minus, TokenKind::Asterisk,
                     TokenKind::Slash, TokenKind::Eq, TokenKind::NotEq,
                     TokenKind::Lt, TokenKind::Gt] {
            parser.register_infix(kind, Parser::parse_infix_expression);
        }
        parser.register_infix(TokenKind::LParen, Parser::parse_call_expression);
        parser.register_infix(TokenKind::LBracket, Parser::parse_index_expression);
        parser
    }

    pub fn from_str(source: &str) -> Parser {
        Parser::new(Lexer::new(source))
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn) {
        self.prefix_parse_fns.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn) {
        self.infix_parse_fns.insert(kind, f);
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool { self.cur_token.is(kind) }

    fn peek_token_is(&self, kind: TokenKind) -> bool { self.peek_token.is(kind) }

    fn error(&mut self, err: ParseError) {
        tracing::debug!(%err, "parse error");
        self.errors.push(err);
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            return Some(());
        }
        let found = self.peek_token.kind;
        self.error(ParseError::UnexpectedToken{expected: kind, found});
        None
    }

    fn peek_precedence(&self) -> Precedence { precedence(self.peek_token.kind) }

    fn cur_precedence(&self) -> Precedence { precedence(self.cur_token.kind) }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.cur_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }
        program
    }
}

// Statements
impl Parser {
    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn skip_semicolon(&mut self) {
        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier(self.cur_token.literal.clone());
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Let{name, value})
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let bare = [TokenKind::Semicolon, TokenKind::RBrace, TokenKind::Eof];
        if bare.iter().any(|&kind| self.peek_token_is(kind)) {
            self.skip_semicolon();
            return Some(Statement::Return{value: None});
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_semicolon();
        Some(Statement::Return{value: Some(value)})
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest);
        // the terminator goes even when the expression failed
        self.skip_semicolon();
        Some(Statement::Expression(expr?))
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.next_token(); // skip '{'
        while !self.cur_token_is(TokenKind::RBrace) && !self.cur_token_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        if self.cur_token_is(TokenKind::Eof) {
            self.error(ParseError::UnexpectedToken{
                expected: TokenKind::RBrace, found: TokenKind::Eof});
        }
        BlockStatement{statements}
    }
}

// Expressions
impl Parser {
    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = match self.prefix_parse_fns.get(&self.cur_token.kind) {
            Some(prefix) => *prefix,
            None => {
                let kind = self.cur_token.kind;
                self.error(ParseError::NoPrefixParseFn(kind));
                return None;
            }
        };
        let mut left = prefix(self)?;
        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_parse_fns.get(&self.peek_token.kind) {
                Some(infix) => *infix,
                None => return Some(left),
            };
            self.next_token();
            left = infix(self, left)?;
        }
        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier(self.cur_token.literal.clone())))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                let literal = self.cur_token.literal.clone();
                self.error(ParseError::BadInteger(literal));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::Str(self.cur_token.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(self.cur_token_is(TokenKind::True)))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = PrefixOp::from_token(self.cur_token.kind)?;
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix{operator, right: Box::new(right)})
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = InfixOp::from_token(self.cur_token.kind)?;
        let precedence = self.cur_precedence();
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix{operator, left: Box::new(left), right: Box::new(right)})
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement();
        let alternative = if self.peek_token_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };
        Some(Expression::If{condition: Box::new(condition), consequence, alternative})
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }
        loop {
            self.next_token();
            if !self.cur_token_is(TokenKind::Ident) {
                let kind = self.cur_token.kind;
                self.error(ParseError::BadParameter(kind));
                return None;
            }
            parameters.push(Identifier(self.cur_token.literal.clone()));
            if !self.peek_token_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(parameters)
    }

    // fn and macro literals share the `(params) { body }` tail
    fn parse_callable_tail(&mut self) -> Option<(Vec<Identifier>, BlockStatement)> {
        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.expect_peek(TokenKind::LBrace)?;
        Some((parameters, self.parse_block_statement()))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let (parameters, body) = self.parse_callable_tail()?;
        Some(Expression::Function{parameters, body})
    }

    fn parse_macro_literal(&mut self) -> Option<Expression> {
        let (parameters, body) = self.parse_callable_tail()?;
        Some(Expression::Macro{parameters, body})
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token_is(end) {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;
        Some(list)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call{function: Box::new(function), arguments})
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        Some(Expression::Array(self.parse_expression_list(TokenKind::RBracket)?))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;
        Some(Expression::Index{left: Box::new(left), index: Box::new(index)})
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();
        while !self.peek_token_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_token_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.expect_peek(TokenKind::RBrace)?;
        Some(Expression::Hash(pairs))
    }
}

/// Parse a whole source text. Errors are rendered for display; the program
/// may be missing statements wherever an error was reported.
pub fn parse(source: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::from_str(source);
    let program = parser.parse_program();
    let errors = parser.errors().iter().map(|e| e.to_string()).collect();
    (program, errors)
}
