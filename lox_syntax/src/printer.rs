//! Parenthesized prefix rendering of the syntax tree.
//!
//! `print (1 + 2) * x;` renders as `(print (* (group (+ 1 2)) x))`. Node ids
//! are left out, so equivalent trees render identically.

use crate::ast::{Expr, Statement};
use crate::token::Literal;
use std::fmt::{Display, Formatter, Result};

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "{s:?}"),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Nil => write!(f, "nil"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Expr::Binary(expr) => {
                write!(f, "({} {} {})", expr.operator.lexeme, expr.left, expr.right)
            }
            Expr::Grouping(expr) => write!(f, "(group {})", expr.expr),
            Expr::Literal(expr) => write!(f, "{}", expr.literal),
            Expr::Unary(expr) => write!(f, "({} {})", expr.operator.lexeme, expr.right),
            Expr::Variable(expr) => write!(f, "{}", expr.name.lexeme),
            Expr::Assign(expr) => write!(f, "(= {} {})", expr.name.lexeme, expr.value),
            Expr::Logical(expr) => {
                write!(f, "({} {} {})", expr.operator.lexeme, expr.left, expr.right)
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Statement::Expression(stmt) => write!(f, "(; {})", stmt.expr),
            Statement::Print(stmt) => write!(f, "(print {})", stmt.expr),
            Statement::VariableDecl(stmt) => match &stmt.initializer {
                Some(initializer) => write!(f, "(var {} {})", stmt.name.lexeme, initializer),
                None => write!(f, "(var {})", stmt.name.lexeme),
            },
            Statement::Block(stmt) => {
                write!(f, "(block")?;
                for s in &stmt.statements {
                    write!(f, " {s}")?;
                }
                write!(f, ")")
            }
            Statement::If(stmt) => {
                write!(f, "(if {} {}", stmt.condition, stmt.then_branch)?;
                if let Some(else_branch) = &stmt.else_branch {
                    write!(f, " {else_branch}")?;
                }
                write!(f, ")")
            }
            Statement::While(stmt) => write!(f, "(while {} {})", stmt.condition, stmt.body),
        }
    }
}

/// Renders a whole program, one top-level statement per line.
pub fn print_program(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
