use crate::environment::{Environment, EnvironmentPtr};
use crate::error::RuntimeError;
use crate::value::Value;
use lox_syntax::{Expr, Statement, Token, TokenKind};
use tracing::trace;

type EvalResult<T> = Result<T, RuntimeError>;

pub struct Interpreter<'p> {
    printer: &'p mut dyn Printer,
    environment: EnvironmentPtr,
}

impl<'p> Interpreter<'p> {
    pub fn new(printer: &'p mut dyn Printer) -> Self {
        Self {
            printer,
            environment: Environment::new_globals_ptr(),
        }
    }

    /// The current frame: the global frame unless a block is executing.
    pub fn environment(&self) -> &EnvironmentPtr {
        &self.environment
    }

    #[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
    pub fn interpret(&mut self, statements: &[Statement]) -> EvalResult<()> {
        for s in statements {
            self.execute(s)?;
        }
        Ok(())
    }

    pub fn execute(&mut self, stmt: &Statement) -> EvalResult<()> {
        match stmt {
            Statement::Expression(stmt) => {
                self.evaluate(&stmt.expr)?;
            }
            Statement::Print(stmt) => {
                let value = self.evaluate(&stmt.expr)?;
                self.printer.print(&value.to_string());
            }
            Statement::VariableDecl(stmt) => {
                let value = match &stmt.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(&stmt.name, value)?;
            }
            Statement::Block(stmt) => {
                let environment = Environment::new_ptr(self.environment.clone());
                self.execute_block(&stmt.statements, environment)?;
            }
            Statement::If(stmt) => {
                if self.evaluate(&stmt.condition)?.is_truthy() {
                    self.execute(&stmt.then_branch)?;
                } else if let Some(else_branch) = &stmt.else_branch {
                    self.execute(else_branch)?;
                }
            }
            Statement::While(stmt) => {
                while self.evaluate(&stmt.condition)?.is_truthy() {
                    self.execute(&stmt.body)?;
                }
            }
        }
        Ok(())
    }

    /// Runs `statements` with `environment` as the current frame. The previous
    /// frame is restored on every exit, including a fault.
    pub fn execute_block(
        &mut self,
        statements: &[Statement],
        environment: EnvironmentPtr,
    ) -> EvalResult<()> {
        let previous = std::mem::replace(&mut self.environment, environment);
        trace!(depth = self.environment.borrow().depth(), "enter block");

        let result = statements.iter().try_for_each(|s| self.execute(s));

        self.environment = previous;
        trace!(ok = result.is_ok(), "exit block");
        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        let result = match expr {
            Expr::Binary(expr) => {
                let lval = self.evaluate(&expr.left)?;
                let rval = self.evaluate(&expr.right)?;
                Self::binary(lval, &expr.operator, rval)?
            }
            Expr::Grouping(expr) => self.evaluate(&expr.expr)?,
            Expr::Literal(expr) => expr.literal.clone().into(),
            Expr::Unary(expr) => {
                let rval = self.evaluate(&expr.right)?;
                match (expr.operator.kind, rval) {
                    (TokenKind::Minus, Value::Number(n)) => Value::Number(-n),
                    (TokenKind::Bang, rval) => Value::Boolean(!rval.is_truthy()),
                    _ => {
                        return Err(RuntimeError::OperandMustBeANumber {
                            operator: expr.operator.clone(),
                        })
                    }
                }
            }
            Expr::Variable(expr) => self.environment.borrow().get(&expr.name)?,
            Expr::Assign(expr) => {
                let value = self.evaluate(&expr.value)?;
                self.environment
                    .borrow_mut()
                    .assign(&expr.name, value.clone())?;
                value
            }
            Expr::Logical(expr) => {
                let left = self.evaluate(&expr.left)?;
                // The operand itself is the result, not its truthiness.
                match expr.operator.kind {
                    TokenKind::Or if left.is_truthy() => left,
                    TokenKind::And if !left.is_truthy() => left,
                    _ => self.evaluate(&expr.right)?,
                }
            }
        };

        Ok(result)
    }

    fn binary(lval: Value, operator: &Token, rval: Value) -> EvalResult<Value> {
        let value = match (lval, operator.kind, rval) {
            (Value::Number(l), TokenKind::Plus, Value::Number(r)) => Value::Number(l + r),
            (Value::String(mut l), TokenKind::Plus, Value::String(r)) => {
                l.push_str(&r);
                Value::String(l)
            }
            (Value::String(l), TokenKind::Plus, r @ Value::Number(_)) => {
                Value::String(format!("{l}{r}"))
            }
            (l @ Value::Number(_), TokenKind::Plus, Value::String(r)) => {
                Value::String(format!("{l}{r}"))
            }
            (_, TokenKind::Plus, _) => {
                return Err(RuntimeError::OperandMustBeANumberOrString {
                    operator: operator.clone(),
                })
            }

            (lval, TokenKind::EqualEqual, rval) => Value::Boolean(lval == rval),
            (lval, TokenKind::BangEqual, rval) => Value::Boolean(lval != rval),

            (Value::Number(l), TokenKind::Minus, Value::Number(r)) => Value::Number(l - r),
            (Value::Number(l), TokenKind::Star, Value::Number(r)) => Value::Number(l * r),
            // IEEE division: x / 0 is infinite or NaN, not a fault.
            (Value::Number(l), TokenKind::Slash, Value::Number(r)) => Value::Number(l / r),

            (Value::Number(l), TokenKind::Greater, Value::Number(r)) => Value::Boolean(l > r),
            (Value::Number(l), TokenKind::GreaterEqual, Value::Number(r)) => {
                Value::Boolean(l >= r)
            }
            (Value::Number(l), TokenKind::Less, Value::Number(r)) => Value::Boolean(l < r),
            (Value::Number(l), TokenKind::LessEqual, Value::Number(r)) => {
                Value::Boolean(l <= r)
            }

            _ => {
                return Err(RuntimeError::OperandMustBeANumber {
                    operator: operator.clone(),
                })
            }
        };

        Ok(value)
    }
}

/// Output sink for `print`. One call per executed `print` statement.
pub trait Printer {
    fn print(&mut self, message: &str);
}

pub struct StdOutPrinter;

impl Printer for StdOutPrinter {
    fn print(&mut self, message: &str) {
        println!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_syntax::{expr, statement, Literal};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct TestPrinter {
        messages: Vec<String>,
    }

    impl Printer for TestPrinter {
        fn print(&mut self, message: &str) {
            self.messages.push(message.to_owned());
        }
    }

    fn literal(literal: Literal) -> Expr {
        expr::Literal::new_wrapped(literal)
    }

    fn token(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, 1)
    }

    fn variable(name: &str) -> Expr {
        expr::Variable::new_wrapped(Token::identifier(name, 1))
    }

    fn declare(name: &str, value: f64) -> Statement {
        statement::VariableDecl::new_wrapped(
            Token::identifier(name, 1),
            Some(literal(Literal::Number(value))),
        )
    }

    #[test]
    fn test_or_returns_left_operand_without_evaluating_right() {
        let mut printer = TestPrinter::default();
        let mut interpreter = Interpreter::new(&mut printer);
        // `nil or undefined` is nil: nil is truthy.
        let expr = expr::Logical::new_wrapped(
            literal(Literal::Nil),
            token(TokenKind::Or, "or"),
            variable("undefined"),
        );
        assert_eq!(interpreter.evaluate(&expr), Ok(Value::Nil));
    }

    #[test]
    fn test_and_returns_operand_values() {
        let mut printer = TestPrinter::default();
        let mut interpreter = Interpreter::new(&mut printer);
        let expr = expr::Logical::new_wrapped(
            literal(Literal::Number(0.0)),
            token(TokenKind::And, "and"),
            literal(Literal::String("right".to_owned())),
        );
        assert_eq!(
            interpreter.evaluate(&expr),
            Ok(Value::String("right".to_owned()))
        );

        let expr = expr::Logical::new_wrapped(
            literal(Literal::Boolean(false)),
            token(TokenKind::And, "and"),
            variable("undefined"),
        );
        assert_eq!(interpreter.evaluate(&expr), Ok(Value::Boolean(false)));
    }

    #[test]
    fn test_unary() {
        let mut printer = TestPrinter::default();
        let mut interpreter = Interpreter::new(&mut printer);
        let negate = expr::Unary::new_wrapped(
            token(TokenKind::Minus, "-"),
            literal(Literal::Number(2.0)),
        );
        assert_eq!(interpreter.evaluate(&negate), Ok(Value::Number(-2.0)));

        let not_nil =
            expr::Unary::new_wrapped(token(TokenKind::Bang, "!"), literal(Literal::Nil));
        assert_eq!(interpreter.evaluate(&not_nil), Ok(Value::Boolean(false)));

        let negate_string = expr::Unary::new_wrapped(
            token(TokenKind::Minus, "-"),
            literal(Literal::String("a".to_owned())),
        );
        assert_eq!(
            interpreter.evaluate(&negate_string),
            Err(RuntimeError::OperandMustBeANumber {
                operator: token(TokenKind::Minus, "-")
            })
        );
    }

    #[test]
    fn test_block_restores_environment_after_fault() {
        let mut printer = TestPrinter::default();
        let mut interpreter = Interpreter::new(&mut printer);
        let program = vec![
            declare("outer", 1.0),
            statement::Block::new_wrapped(vec![
                declare("inner", 2.0),
                statement::Print::new_wrapped(variable("missing")),
            ]),
        ];

        let result = interpreter.interpret(&program);
        assert!(matches!(
            result,
            Err(RuntimeError::UndefinedVariable { .. })
        ));

        let environment = interpreter.environment().borrow();
        assert_eq!(environment.depth(), 0);
        assert!(environment.contains("outer"));
        assert!(!environment.contains("inner"));
    }

    #[test]
    fn test_print_nil() {
        let mut printer = TestPrinter::default();
        {
            let mut interpreter = Interpreter::new(&mut printer);
            let program = vec![
                statement::VariableDecl::new_wrapped(Token::identifier("a", 1), None),
                statement::Print::new_wrapped(variable("a")),
            ];
            interpreter.interpret(&program).unwrap();
        }
        assert_eq!(printer.messages, vec!["nil"]);
    }

    #[test]
    fn test_binary_faults() {
        let plus = token(TokenKind::Plus, "+");
        assert_eq!(
            Interpreter::binary(Value::Boolean(true), &plus, Value::Number(1.0)),
            Err(RuntimeError::OperandMustBeANumberOrString {
                operator: plus.clone()
            })
        );
        assert_eq!(
            Interpreter::binary(Value::Nil, &plus, Value::String("a".to_owned())),
            Err(RuntimeError::OperandMustBeANumberOrString { operator: plus })
        );

        let less = token(TokenKind::Less, "<");
        assert_eq!(
            Interpreter::binary(Value::String("a".to_owned()), &less, Value::String("b".to_owned())),
            Err(RuntimeError::OperandMustBeANumber { operator: less })
        );
    }

    #[test]
    fn test_concatenation() {
        let plus = token(TokenKind::Plus, "+");
        assert_eq!(
            Interpreter::binary(Value::Number(2.5), &plus, Value::String("x".to_owned())),
            Ok(Value::String("2.5x".to_owned()))
        );
        assert_eq!(
            Interpreter::binary(Value::String("n=".to_owned()), &plus, Value::Number(10.0)),
            Ok(Value::String("n=10".to_owned()))
        );
    }

    #[test]
    fn test_equality() {
        let equal = token(TokenKind::EqualEqual, "==");
        assert_eq!(
            Interpreter::binary(Value::Nil, &equal, Value::Nil),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            Interpreter::binary(Value::Number(1.0), &equal, Value::String("1".to_owned())),
            Ok(Value::Boolean(false))
        );
        let not_equal = token(TokenKind::BangEqual, "!=");
        assert_eq!(
            Interpreter::binary(Value::Boolean(false), &not_equal, Value::Nil),
            Ok(Value::Boolean(true))
        );
    }
}
