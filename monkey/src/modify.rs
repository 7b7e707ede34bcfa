use crate::ast::{BlockStatement, Expression, Identifier, Node, Program, Statement};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModifyError {
    #[error("cannot place {found} where {expected} is expected")]
    KindMismatch { expected: &'static str, found: String },
}

impl ModifyError {
    pub fn mismatch(expected: &'static str, found: &Node) -> ModifyError {
        ModifyError::KindMismatch { expected, found: format!("{} `{}`", found.kind(), found) }
    }
}

/// Rewrite a tree bottom-up: every child slot is rewritten first, then
/// `modifier` is applied to the node itself and its result returned.
///
/// The modifier may swap any node for another of the same category; a
/// statement returned where an expression sits (or the other way around) is
/// only accepted when it trivially converts, otherwise the rewrite fails with
/// `ModifyError::KindMismatch`.
pub fn modify<F, E>(node: Node, modifier: &mut F) -> Result<Node, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    let node = match node {
        Node::Program(program) => Node::Program(Program{
            statements: modify_statements(program.statements, modifier)?,
        }),
        Node::Statement(stmt) => Node::Statement(match stmt {
            Statement::Let { name, value } =>
                Statement::Let { name, value: modify_expression(value, modifier)? },
            Statement::Return { value } => Statement::Return {
                value: value.map(|v| modify_expression(v, modifier)).transpose()?,
            },
            Statement::Expression(expr) =>
                Statement::Expression(modify_expression(expr, modifier)?),
            Statement::Block(block) => Statement::Block(BlockStatement{
                statements: modify_statements(block.statements, modifier)?,
            }),
        }),
        Node::Expression(expr) => Node::Expression(modify_children(expr, modifier)?),
    };
    modifier(node)
}

fn modify_children<F, E>(expr: Expression, modifier: &mut F) -> Result<Expression, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    Ok(match expr {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, modifier)?),
        },
        Expression::Infix { operator, left, right } => {
            let left = modify_expression(*left, modifier)?;
            let right = modify_expression(*right, modifier)?;
            Expression::Infix { operator, left: Box::new(left), right: Box::new(right) }
        },
        Expression::If { condition, consequence, alternative } => {
            let condition = modify_expression(*condition, modifier)?;
            let consequence = modify_block(consequence, modifier)?;
            let alternative = alternative.map(|alt| modify_block(alt, modifier)).transpose()?;
            Expression::If { condition: Box::new(condition), consequence, alternative }
        },
        Expression::Function { parameters, body } => Expression::Function {
            parameters: modify_parameters(parameters, modifier)?,
            body: modify_block(body, modifier)?,
        },
        Expression::Macro { parameters, body } => Expression::Macro {
            parameters: modify_parameters(parameters, modifier)?,
            body: modify_block(body, modifier)?,
        },
        Expression::Call { function, arguments } => {
            let function = modify_expression(*function, modifier)?;
            let arguments = arguments.into_iter()
                .map(|arg| modify_expression(arg, modifier))
                .collect::<Result<_, E>>()?;
            Expression::Call { function: Box::new(function), arguments }
        },
        Expression::Array(elements) => Expression::Array(elements.into_iter()
            .map(|e| modify_expression(e, modifier))
            .collect::<Result<_, E>>()?),
        Expression::Index { left, index } => {
            let left = modify_expression(*left, modifier)?;
            let index = modify_expression(*index, modifier)?;
            Expression::Index { left: Box::new(left), index: Box::new(index) }
        },
        Expression::Hash(pairs) => Expression::Hash(pairs.into_iter()
            .map(|(k, v)| -> Result<(Expression, Expression), E> {
                Ok((modify_expression(k, modifier)?, modify_expression(v, modifier)?))
            })
            .collect::<Result<_, E>>()?),
        leaf @ (Expression::Identifier(_) | Expression::Integer(_) |
                Expression::Boolean(_) | Expression::Str(_)) => leaf,
    })
}

fn modify_statements<F, E>(statements: Vec<Statement>, modifier: &mut F) -> Result<Vec<Statement>, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    let mut modified = Vec::with_capacity(statements.len());
    for stmt in statements {
        modified.push(match modify(Node::Statement(stmt), modifier)? {
            Node::Statement(stmt) => stmt,
            Node::Expression(expr) => Statement::Expression(expr),
            other => return Err(mismatch("statement", &other)),
        });
    }
    Ok(modified)
}

fn modify_expression<F, E>(expr: Expression, modifier: &mut F) -> Result<Expression, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    match modify(Node::Expression(expr), modifier)? {
        Node::Expression(expr) => Ok(expr),
        Node::Statement(Statement::Expression(expr)) => Ok(expr),
        other => Err(mismatch("expression", &other)),
    }
}

fn modify_block<F, E>(block: BlockStatement, modifier: &mut F) -> Result<BlockStatement, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    match modify(Node::Statement(Statement::Block(block)), modifier)? {
        Node::Statement(Statement::Block(block)) => Ok(block),
        other => Err(mismatch("block", &other)),
    }
}

fn modify_parameters<F, E>(parameters: Vec<Identifier>, modifier: &mut F) -> Result<Vec<Identifier>, E>
where F: FnMut(Node) -> Result<Node, E>, E: From<ModifyError> {
    let mut modified = Vec::with_capacity(parameters.len());
    for param in parameters {
        match modify(Node::Expression(Expression::Identifier(param)), modifier)? {
            Node::Expression(Expression::Identifier(param)) => modified.push(param),
            other => return Err(mismatch("identifier", &other)),
        }
    }
    Ok(modified)
}

fn mismatch<E: From<ModifyError>>(expected: &'static str, found: &Node) -> E {
    E::from(ModifyError::mismatch(expected, found))
}
