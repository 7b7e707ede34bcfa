use lexers::TokenKind;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOp {
    Bang,
    Minus,
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<PrefixOp> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Bang),
            TokenKind::Minus => Some(PrefixOp::Minus),
            _ => None,
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PrefixOp::Bang => write!(f, "!"),
            PrefixOp::Minus => write!(f, "-"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOp {
    Plus,
    Minus,
    Multiply,
    Divide,
    Lt,
    Gt,
    Eq,
    NotEq,
}

impl InfixOp {
    pub fn from_token(kind: TokenKind) -> Option<InfixOp> {
        match kind {
            TokenKind::Plus => Some(InfixOp::Plus),
            TokenKind::Minus => Some(InfixOp::Minus),
            TokenKind::Asterisk => Some(InfixOp::Multiply),
            TokenKind::Slash => Some(InfixOp::Divide),
            TokenKind::Lt => Some(InfixOp::Lt),
            TokenKind::Gt => Some(InfixOp::Gt),
            TokenKind::Eq => Some(InfixOp::Eq),
            TokenKind::NotEq => Some(InfixOp::NotEq),
            _ => None,
        }
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let op = match self {
            InfixOp::Plus => "+",
            InfixOp::Minus => "-",
            InfixOp::Multiply => "*",
            InfixOp::Divide => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
        };
        write!(f, "{}", op)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier(pub String);

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    Integer(i64),
    Boolean(bool),
    Str(String),
    Prefix { operator: PrefixOp, right: Box<Expression> },
    Infix { operator: InfixOp, left: Box<Expression>, right: Box<Expression> },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function { parameters: Vec<Identifier>, body: BlockStatement },
    Call { function: Box<Expression>, arguments: Vec<Expression> },
    Array(Vec<Expression>),
    Index { left: Box<Expression>, index: Box<Expression> },
    // pairs keep source order
    Hash(Vec<(Expression, Expression)>),
    Macro { parameters: Vec<Identifier>, body: BlockStatement },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Let { name: Identifier, value: Expression },
    Return { value: Option<Expression> },
    Expression(Expression),
    Block(BlockStatement),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// Any tree position: the unit handed to `modify` callbacks and wrapped by
/// quoted runtime values.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Program(Program),
    Statement(Statement),
    Expression(Expression),
}

impl Expression {
    pub fn token_literal(&self) -> String {
        match self {
            Expression::Identifier(ident) => ident.0.clone(),
            Expression::Integer(value) => value.to_string(),
            Expression::Boolean(value) => value.to_string(),
            Expression::Str(value) => value.clone(),
            Expression::Prefix { operator, .. } => operator.to_string(),
            Expression::Infix { operator, .. } => operator.to_string(),
            Expression::If { .. } => "if".to_string(),
            Expression::Function { .. } => "fn".to_string(),
            Expression::Call { .. } => "(".to_string(),
            Expression::Array(_) | Expression::Index { .. } => "[".to_string(),
            Expression::Hash(_) => "{".to_string(),
            Expression::Macro { .. } => "macro".to_string(),
        }
    }
}

impl Statement {
    pub fn token_literal(&self) -> String {
        match self {
            Statement::Let { .. } => "let".to_string(),
            Statement::Return { .. } => "return".to_string(),
            Statement::Expression(expr) => expr.token_literal(),
            Statement::Block(_) => "{".to_string(),
        }
    }
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements.first()
            .map(|stmt| stmt.token_literal())
            .unwrap_or_default()
    }
}

impl Node {
    pub fn token_literal(&self) -> String {
        match self {
            Node::Program(program) => program.token_literal(),
            Node::Statement(stmt) => stmt.token_literal(),
            Node::Expression(expr) => expr.token_literal(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Program(_) => "program",
            Node::Statement(_) => "statement",
            Node::Expression(_) => "expression",
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

// Expression statements carry no terminator of their own, so a separator is
// needed to keep `a; -b` from re-reading as `a - b`.
fn fmt_statements(f: &mut fmt::Formatter, statements: &[Statement]) -> fmt::Result {
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", stmt)?;
        if matches!(stmt, Statement::Expression(_)) && i + 1 < statements.len() {
            write!(f, ";")?;
        }
    }
    Ok(())
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::Integer(value) => write!(f, "{}", value),
            Expression::Boolean(value) => write!(f, "{}", value),
            Expression::Str(value) => write!(f, "\"{}\"", value),
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix { operator, left, right } =>
                write!(f, "({} {} {})", left, operator, right),
            Expression::If { condition, consequence, alternative } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                match alternative {
                    Some(alt) => write!(f, " else {}", alt),
                    None => Ok(()),
                }
            },
            Expression::Function { parameters, body } =>
                write!(f, "fn({}) {}", join(parameters), body),
            Expression::Call { function, arguments } =>
                write!(f, "{}({})", function, join(arguments)),
            Expression::Array(elements) => write!(f, "[{}]", join(elements)),
            Expression::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expression::Hash(pairs) => {
                let pairs: Vec<_> = pairs.iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect();
                write!(f, "{{{}}}", pairs.join(", "))
            },
            Expression::Macro { parameters, body } =>
                write!(f, "macro({}) {}", join(parameters), body),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        fmt_statements(f, &self.statements)?;
        write!(f, " }}")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value: Some(value) } => write!(f, "return {};", value),
            Statement::Return { value: None } => write!(f, "return;"),
            Statement::Expression(expr) => write!(f, "{}", expr),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_statements(f, &self.statements)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Program(program) => write!(f, "{}", program),
            Node::Statement(stmt) => write!(f, "{}", stmt),
            Node::Expression(expr) => write!(f, "{}", expr),
        }
    }
}
