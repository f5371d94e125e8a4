use crate::error::SyntaxError;
use lox_syntax::{expr, statement, Expr, Literal, Statement, Token, TokenKind};
use tracing::{debug, trace};

type ParseExprResult = Result<Expr, SyntaxError>;
type ParseStmtResult = Result<Statement, SyntaxError>;

/*
Each method for parsing a grammar rule produces a syntax tree
for that rule and returns it to the caller. There is no
synchronization: the first SyntaxError aborts the whole parse.

program        → declaration* EOF ;

declaration    → varDecl
               | statement ;

varDecl        → "var" IDENTIFIER ( "=" expression )? ";" ;

statement      → exprStmt
               | forStmt
               | ifStmt
               | printStmt
               | whileStmt
               | block ;

exprStmt       → expression ";" ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";"
                 expression? ")" statement ;
ifStmt         → "if" "(" expression ")" statement
                 ( "else" statement )? ;
printStmt      → "print" expression ";" ;
whileStmt      → "while" "(" expression ")" statement ;
block          → "{" declaration* "}" ;

expression     → assignment ;
assignment     → IDENTIFIER "=" assignment
               | logic_or ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary
               | primary ;
primary        → NUMBER | STRING | "true" | "false" | "nil"
               | "(" expression ")"
               | IDENTIFIER ;
*/

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0 }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            let statement = self.parse_declaration()?;
            trace!(node = %statement.id(), line = self.previous().line, "parsed declaration");
            statements.push(statement);
        }
        debug!(count = statements.len(), "parsed program");
        Ok(statements)
    }

    fn parse_declaration(&mut self) -> ParseStmtResult {
        if self.match_(&[TokenKind::Var]) {
            self.parse_variable_decl()
        } else {
            self.parse_statement()
        }
    }

    fn parse_variable_decl(&mut self) -> ParseStmtResult {
        let name = self
            .consume(TokenKind::Identifier, |token| {
                SyntaxError::MissingIdentifier { token }
            })?
            .clone();
        let initializer = if self.match_(&[TokenKind::Equal]) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        self.consume_semicolon("variable declaration")?;
        Ok(statement::VariableDecl::new_wrapped(name, initializer))
    }

    fn parse_statement(&mut self) -> ParseStmtResult {
        if self.match_(&[TokenKind::For]) {
            self.parse_for_statement()
        } else if self.match_(&[TokenKind::If]) {
            self.parse_if_statement()
        } else if self.match_(&[TokenKind::Print]) {
            self.parse_print_statement()
        } else if self.match_(&[TokenKind::While]) {
            self.parse_while_statement()
        } else if self.match_(&[TokenKind::LeftBrace]) {
            Ok(statement::Block::new_wrapped(self.parse_block()?))
        } else {
            self.parse_expression_statement()
        }
    }

    /// Desugars into `{ initializer; while (condition) { body; increment; } }`.
    fn parse_for_statement(&mut self) -> ParseStmtResult {
        self.consume_left_paren("'for'")?;

        let initializer = if self.match_(&[TokenKind::Semicolon]) {
            None
        } else if self.match_(&[TokenKind::Var]) {
            Some(self.parse_variable_decl()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon("loop condition")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_right_paren("for clauses")?;

        let mut body = self.parse_statement()?;

        if let Some(increment) = increment {
            body = statement::Block::new_wrapped(vec![
                body,
                statement::Expression::new_wrapped(increment),
            ]);
        }

        let condition =
            condition.unwrap_or_else(|| expr::Literal::new_wrapped(Literal::Boolean(true)));
        body = statement::While::new_wrapped(condition, body);

        if let Some(initializer) = initializer {
            body = statement::Block::new_wrapped(vec![initializer, body]);
        }

        Ok(body)
    }

    fn parse_if_statement(&mut self) -> ParseStmtResult {
        self.consume_left_paren("'if'")?;
        let condition = self.parse_expression()?;
        self.consume_right_paren("if condition")?;

        let then_branch = self.parse_statement()?;
        let else_branch = if self.match_(&[TokenKind::Else]) {
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(statement::If::new_wrapped(
            condition,
            then_branch,
            else_branch,
        ))
    }

    fn parse_print_statement(&mut self) -> ParseStmtResult {
        let value = self.parse_expression()?;
        self.consume_semicolon("value")?;
        Ok(statement::Print::new_wrapped(value))
    }

    fn parse_while_statement(&mut self) -> ParseStmtResult {
        self.consume_left_paren("'while'")?;
        let condition = self.parse_expression()?;
        self.consume_right_paren("condition")?;
        let body = self.parse_statement()?;
        Ok(statement::While::new_wrapped(condition, body))
    }

    fn parse_expression_statement(&mut self) -> ParseStmtResult {
        let value = self.parse_expression()?;
        self.consume_semicolon("expression")?;
        Ok(statement::Expression::new_wrapped(value))
    }

    fn parse_block(&mut self) -> Result<Vec<Statement>, SyntaxError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_declaration()?);
        }
        self.consume(TokenKind::RightBrace, |token| {
            SyntaxError::MissingRightBrace { token }
        })?;
        Ok(statements)
    }

    /// expression     → assignment ;
    fn parse_expression(&mut self) -> ParseExprResult {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseExprResult {
        let expr = self.parse_or()?;

        if self.match_(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            // Assign operator is right-associative
            let value = self.parse_assignment()?;

            return match expr {
                Expr::Variable(variable) => Ok(expr::Assign::new_wrapped(variable.name, value)),
                _ => Err(SyntaxError::InvalidAssignmentTarget { token: equals }),
            };
        }

        Ok(expr)
    }

    /// logic_or       → logic_and ( "or" logic_and )* ;
    fn parse_or(&mut self) -> ParseExprResult {
        let mut expr = self.parse_and()?;

        while self.match_(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.parse_and()?;
            expr = expr::Logical::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// logic_and      → equality ( "and" equality )* ;
    fn parse_and(&mut self) -> ParseExprResult {
        let mut expr = self.parse_equality()?;

        while self.match_(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.parse_equality()?;
            expr = expr::Logical::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// equality       → comparison ( ( "!=" | "==" ) comparison )* ;
    fn parse_equality(&mut self) -> ParseExprResult {
        let mut expr = self.parse_comparison()?;

        while self.match_(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.parse_comparison()?;
            expr = expr::Binary::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
    fn parse_comparison(&mut self) -> ParseExprResult {
        let mut expr = self.parse_term()?;

        while self.match_(&[
            TokenKind::Less,
            TokenKind::LessEqual,
            TokenKind::Greater,
            TokenKind::GreaterEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.parse_term()?;
            expr = expr::Binary::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// term           → factor ( ( "-" | "+" ) factor )* ;
    fn parse_term(&mut self) -> ParseExprResult {
        let mut expr = self.parse_factor()?;

        while self.match_(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.parse_factor()?;
            expr = expr::Binary::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// factor         → unary ( ( "/" | "*" ) unary )* ;
    fn parse_factor(&mut self) -> ParseExprResult {
        let mut expr = self.parse_unary()?;

        while self.match_(&[TokenKind::Slash, TokenKind::Star]) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            expr = expr::Binary::new_wrapped(expr, operator, right);
        }

        Ok(expr)
    }

    /// unary          → ( "!" | "-" ) unary
    //                 | primary ;
    fn parse_unary(&mut self) -> ParseExprResult {
        if self.match_(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.parse_unary()?;
            Ok(expr::Unary::new_wrapped(operator, right))
        } else {
            self.parse_primary()
        }
    }

    /// primary        → NUMBER | STRING | "true" | "false" | "nil"
    //                 | "(" expression ")" | IDENTIFIER ;
    fn parse_primary(&mut self) -> ParseExprResult {
        if self.match_(&[TokenKind::Number, TokenKind::String]) {
            let token = self.previous();
            return match &token.literal {
                Some(literal) => Ok(expr::Literal::new_wrapped(literal.clone())),
                // A literal token without a value cannot start an expression.
                None => Err(SyntaxError::UnrecognizedExpression {
                    token: token.clone(),
                }),
            };
        }

        let expr = if self.match_(&[TokenKind::True]) {
            expr::Literal::new_wrapped(Literal::Boolean(true))
        } else if self.match_(&[TokenKind::False]) {
            expr::Literal::new_wrapped(Literal::Boolean(false))
        } else if self.match_(&[TokenKind::Nil]) {
            expr::Literal::new_wrapped(Literal::Nil)
        } else if self.match_(&[TokenKind::LeftParen]) {
            let expr = self.parse_expression()?;
            self.consume_right_paren("expression")?;
            expr::Grouping::new_wrapped(expr)
        } else if self.match_(&[TokenKind::Identifier]) {
            expr::Variable::new_wrapped(self.previous().clone())
        } else {
            return Err(SyntaxError::UnrecognizedExpression {
                token: self.peek().clone(),
            });
        };

        Ok(expr)
    }

    fn consume_semicolon(&mut self, context: &'static str) -> Result<(), SyntaxError> {
        self.consume(TokenKind::Semicolon, |token| {
            SyntaxError::MissingSemicolon { token, context }
        })?;
        Ok(())
    }

    fn consume_left_paren(&mut self, context: &'static str) -> Result<(), SyntaxError> {
        self.consume(TokenKind::LeftParen, |token| {
            SyntaxError::MissingLeftParen { token, context }
        })?;
        Ok(())
    }

    fn consume_right_paren(&mut self, context: &'static str) -> Result<(), SyntaxError> {
        self.consume(TokenKind::RightParen, |token| {
            SyntaxError::MissingRightParen { token, context }
        })?;
        Ok(())
    }

    fn match_(&mut self, kinds: &[TokenKind]) -> bool {
        for k in kinds {
            if self.check(*k) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(
        &mut self,
        kind: TokenKind,
        error: impl FnOnce(Token) -> SyntaxError,
    ) -> Result<&Token, SyntaxError> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(error(self.peek().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use lox_syntax::print_program;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Vec<Statement>, SyntaxError> {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        Parser::new(tokens).parse()
    }

    fn printed(source: &str) -> String {
        print_program(&parse(source).unwrap())
    }

    #[test]
    fn test_precedence() {
        assert_eq!(printed("1 + 2 * 3 - 4 / 5;"), "(; (- (+ 1 (* 2 3)) (/ 4 5)))");
        assert_eq!(printed("-!x == 1 < 2;"), "(; (== (- (! x)) (< 1 2)))");
        assert_eq!(printed("(1 + 2) * 3;"), "(; (* (group (+ 1 2)) 3))");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(printed("1 - 2 - 3;"), "(; (- (- 1 2) 3))");
    }

    #[test]
    fn test_logical_precedence() {
        assert_eq!(
            printed("a or b and c == d;"),
            "(; (or a (and b (== c d))))"
        );
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(printed("a = b = 1 + 2;"), "(; (= a (= b (+ 1 2))))");
        assert_eq!(printed("a = b or c;"), "(; (= a (or b c)))");
    }

    #[test]
    fn test_invalid_assignment_target() {
        let error = parse("a + b = c;").unwrap_err();
        match error {
            SyntaxError::InvalidAssignmentTarget { token } => {
                assert_eq!(token.kind, TokenKind::Equal);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            parse("(a) = 1;"),
            Err(SyntaxError::InvalidAssignmentTarget { .. })
        ));
    }

    #[test]
    fn test_declarations() {
        assert_eq!(printed("var a; var b = nil;"), "(var a)\n(var b nil)");
    }

    #[test]
    fn test_if_else_binds_to_nearest_if() {
        assert_eq!(
            printed("if (a) if (b) print 1; else print 2;"),
            "(if a (if b (print 1) (print 2)))"
        );
    }

    #[test]
    fn test_while_and_block() {
        assert_eq!(
            printed("while (x) { print x; x = false; }"),
            "(while x (block (print x) (; (= x false))))"
        );
    }

    #[test]
    fn test_for_desugars_to_while() {
        assert_eq!(
            printed("for (var i = 0; i < 3; i = i + 1) print i;"),
            "(block (var i 0) (while (< i 3) (block (print i) (; (= i (+ i 1))))))"
        );
    }

    #[test]
    fn test_for_without_clauses() {
        assert_eq!(printed("for (;;) print 1;"), "(while true (print 1))");
        assert_eq!(
            printed("for (i = 0; ; ) print i;"),
            "(block (; (= i 0)) (while true (print i)))"
        );
    }

    #[test]
    fn test_for_matches_hand_written_while() {
        let desugared = printed("for (var i = 0; i < 10; i = i + 1) { print i; }");
        let expanded = printed("{ var i = 0; while (i < 10) { { print i; } i = i + 1; } }");
        assert_eq!(desugared, expanded);
    }

    #[test]
    fn test_missing_semicolon() {
        let error = parse("print 1").unwrap_err();
        assert_eq!(
            error,
            SyntaxError::MissingSemicolon {
                token: Token::eof(1),
                context: "value",
            }
        );
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect ';' after value.");
    }

    #[test]
    fn test_missing_parens() {
        assert!(matches!(
            parse("if x) print 1;"),
            Err(SyntaxError::MissingLeftParen { context: "'if'", .. })
        ));
        assert!(matches!(
            parse("while (x print 1;"),
            Err(SyntaxError::MissingRightParen { context: "condition", .. })
        ));
        assert!(matches!(
            parse("print (1 + 2;"),
            Err(SyntaxError::MissingRightParen { context: "expression", .. })
        ));
        assert!(matches!(
            parse("for (;; print 1;"),
            Err(SyntaxError::UnrecognizedExpression { .. })
        ));
        assert!(matches!(
            parse("for (;; x print 1;"),
            Err(SyntaxError::MissingRightParen { context: "for clauses", .. })
        ));
    }

    #[test]
    fn test_missing_right_brace() {
        let error = parse("{ print 1;").unwrap_err();
        assert!(matches!(error, SyntaxError::MissingRightBrace { .. }));
        assert_eq!(error.token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_missing_identifier() {
        let error = parse("var 1 = 2;").unwrap_err();
        assert_eq!(
            error,
            SyntaxError::MissingIdentifier {
                token: Token::new(TokenKind::Number, "1", 1).with_literal(Literal::Number(1.0)),
            }
        );
    }

    #[test]
    fn test_unrecognized_expression() {
        let error = parse("print ;").unwrap_err();
        assert_eq!(error.token().lexeme, ";");
        assert!(matches!(error, SyntaxError::UnrecognizedExpression { .. }));
        // Reserved words have no grammar rule.
        assert!(matches!(
            parse("return 1;"),
            Err(SyntaxError::UnrecognizedExpression { .. })
        ));
    }

    #[test]
    fn test_first_error_aborts() {
        let error = parse("print 1\nprint ;").unwrap_err();
        assert_eq!(error.token().line, 2);
        assert!(matches!(error, SyntaxError::MissingSemicolon { .. }));
    }

    #[test]
    fn test_unterminated_token_stream() {
        let tokens = vec![
            Token::new(TokenKind::Print, "print", 1),
            Token::new(TokenKind::Number, "1", 1).with_literal(Literal::Number(1.0)),
            Token::new(TokenKind::Semicolon, ";", 1),
        ];
        let statements = Parser::new(tokens).parse().unwrap();
        assert_eq!(print_program(&statements), "(print 1)");
        assert!(Parser::new(vec![]).parse().unwrap().is_empty());
    }
}
