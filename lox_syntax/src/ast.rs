use crate::syntax_node::*;
use crate::token::{Literal, Token};

#[derive(Debug)]
pub enum Statement {
    Expression(Ptr<statement::Expression>),
    Print(Ptr<statement::Print>),
    VariableDecl(Ptr<statement::VariableDecl>),
    Block(Ptr<statement::Block>),
    If(Ptr<statement::If>),
    While(Ptr<statement::While>),
}

impl Statement {
    pub fn id(&self) -> NodeId {
        match self {
            Statement::Expression(stmt) => stmt.id(),
            Statement::Print(stmt) => stmt.id(),
            Statement::VariableDecl(stmt) => stmt.id(),
            Statement::Block(stmt) => stmt.id(),
            Statement::If(stmt) => stmt.id(),
            Statement::While(stmt) => stmt.id(),
        }
    }
}

pub mod statement {
    use super::*;

    #[syntax_node(Statement::Expression)]
    #[derive(Debug)]
    pub struct Expression {
        pub id: NodeId,
        pub expr: Expr,
    }

    #[syntax_node(Statement::Print)]
    #[derive(Debug)]
    pub struct Print {
        pub id: NodeId,
        pub expr: Expr,
    }

    #[syntax_node(Statement::VariableDecl)]
    #[derive(Debug)]
    pub struct VariableDecl {
        pub id: NodeId,
        pub name: Token,
        pub initializer: Option<Expr>,
    }

    #[syntax_node(Statement::Block)]
    #[derive(Debug)]
    pub struct Block {
        pub id: NodeId,
        pub statements: Vec<Statement>,
    }

    #[syntax_node(Statement::If)]
    #[derive(Debug)]
    pub struct If {
        pub id: NodeId,
        pub condition: Expr,
        pub then_branch: Statement,
        pub else_branch: Option<Statement>,
    }

    #[syntax_node(Statement::While)]
    #[derive(Debug)]
    pub struct While {
        pub id: NodeId,
        pub condition: Expr,
        pub body: Statement,
    }
}

pub mod expr {
    use super::*;

    #[syntax_node(Expr::Binary)]
    #[derive(Debug)]
    pub struct Binary {
        pub id: NodeId,
        pub left: Expr,
        pub operator: Token,
        pub right: Expr,
    }

    #[syntax_node(Expr::Grouping)]
    #[derive(Debug)]
    pub struct Grouping {
        pub id: NodeId,
        pub expr: Expr,
    }

    #[syntax_node(Expr::Literal)]
    #[derive(Debug)]
    pub struct Literal {
        pub id: NodeId,
        pub literal: super::Literal,
    }

    #[syntax_node(Expr::Unary)]
    #[derive(Debug)]
    pub struct Unary {
        pub id: NodeId,
        pub operator: Token,
        pub right: Expr,
    }

    #[syntax_node(Expr::Variable)]
    #[derive(Debug)]
    pub struct Variable {
        pub id: NodeId,
        pub name: Token,
    }

    // Only a bare variable can be assigned to.
    #[syntax_node(Expr::Assign)]
    #[derive(Debug)]
    pub struct Assign {
        pub id: NodeId,
        pub name: Token,
        pub value: Expr,
    }

    #[syntax_node(Expr::Logical)]
    #[derive(Debug)]
    pub struct Logical {
        pub id: NodeId,
        pub left: Expr,
        pub operator: Token,
        pub right: Expr,
    }
}

#[derive(Debug)]
pub enum Expr {
    Binary(Ptr<expr::Binary>),
    Grouping(Ptr<expr::Grouping>),
    Literal(Ptr<expr::Literal>),
    Unary(Ptr<expr::Unary>),
    Variable(Ptr<expr::Variable>),
    Assign(Ptr<expr::Assign>),
    Logical(Ptr<expr::Logical>),
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Binary(expr) => expr.id(),
            Expr::Grouping(expr) => expr.id(),
            Expr::Literal(expr) => expr.id(),
            Expr::Unary(expr) => expr.id(),
            Expr::Variable(expr) => expr.id(),
            Expr::Assign(expr) => expr.id(),
            Expr::Logical(expr) => expr.id(),
        }
    }
}
