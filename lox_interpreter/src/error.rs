use lox_syntax::Token;
use thiserror::Error;

/// Fault raised while executing a program. Execution stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.\n[line {}]", .name.lexeme, .name.line)]
    UndefinedVariable { name: Token },

    #[error("Already a variable with this name in this scope: '{}'.\n[line {}]", .name.lexeme, .name.line)]
    DuplicateVariableName { name: Token },

    #[error("Operand must be a number for '{}'.\n[line {}]", .operator.lexeme, .operator.line)]
    OperandMustBeANumber { operator: Token },

    #[error("Operands of '{}' must be numbers or strings.\n[line {}]", .operator.lexeme, .operator.line)]
    OperandMustBeANumberOrString { operator: Token },
}

impl RuntimeError {
    /// Source line of the offending token.
    pub fn line(&self) -> usize {
        match self {
            RuntimeError::UndefinedVariable { name }
            | RuntimeError::DuplicateVariableName { name } => name.line,
            RuntimeError::OperandMustBeANumber { operator }
            | RuntimeError::OperandMustBeANumberOrString { operator } => operator.line,
        }
    }
}
