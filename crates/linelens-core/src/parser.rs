//! Recursive-descent parser for lens scripts.
//!
//! The grammar is deliberately small. At the top level a script is a
//! sequence of `def` blocks and nothing else. Inside a function body the
//! statements are assignment to a plain name, a bare expression, `if`/
//! `elif`/`else`, `while`, `return`, `pass`, `break`, and `continue`, one
//! per line. Expression precedence, loosest first:
//!
//! ```text
//! or  <  and  <  not  <  comparison  <  + -  <  * / %  <  unary -  <  [index] / call
//! ```
//!
//! Comparisons do not chain (`a < b < c` is a syntax error). Calls apply
//! to bare names only, and parameter defaults are restricted to literals
//! so a function's callable surface can be read off statically.

use indexmap::IndexMap;

use crate::ast::{BinOp, Block, Expr, IfBranch, Stmt, UnaryOp};
use crate::error::ParseError;
use crate::function::{FunctionDef, Parameter};
use crate::literal::Literal;
use crate::script::Script;
use crate::token::{tokenize, Token, TokenKind};

/// Parses a complete script source into a [`Script`].
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse_script()
}

/// Token-stream cursor shared by the script grammar and the call-expression
/// grammar in `callspec`.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Number of `while` bodies the cursor is inside, for `break`/
    /// `continue` placement checks.
    loop_depth: usize,
}

impl Parser {
    /// `tokens` must end in [`TokenKind::Eof`], which [`tokenize`]
    /// guarantees.
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            loop_depth: 0,
        }
    }

    // ---- cursor primitives ----

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn nth_kind(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn line(&self) -> u32 {
        self.peek().line
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            line: self.peek().line,
            expected: expected.to_string(),
            found: self.peek().kind.to_string(),
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        if let TokenKind::Ident(_) = self.peek().kind {
            if let TokenKind::Ident(name) = self.bump().kind {
                return Ok(name);
            }
        }
        Err(self.unexpected(what))
    }

    // ---- script structure ----

    pub(crate) fn parse_script(&mut self) -> Result<Script, ParseError> {
        let mut functions: IndexMap<String, FunctionDef> = IndexMap::new();
        loop {
            match self.peek().kind {
                TokenKind::Eof => break,
                TokenKind::Def => {
                    let def = self.parse_function()?;
                    if functions.contains_key(&def.name) {
                        return Err(ParseError::DuplicateFunction {
                            line: def.def_line,
                            name: def.name,
                        });
                    }
                    functions.insert(def.name.clone(), def);
                }
                TokenKind::Indent => {
                    return Err(ParseError::UnexpectedIndent { line: self.line() })
                }
                _ => return Err(ParseError::TopLevelStatement { line: self.line() }),
            }
        }
        Ok(Script { functions })
    }

    fn parse_function(&mut self) -> Result<FunctionDef, ParseError> {
        let def_line = self.expect(&TokenKind::Def, "'def'")?.line;
        let name = self.expect_ident("function name")?;
        self.expect(&TokenKind::LParen, "'('")?;
        let params = self.parse_params(def_line)?;
        self.expect(&TokenKind::RParen, "')'")?;
        let body = self.parse_suite()?;
        Ok(FunctionDef {
            name,
            params,
            body,
            def_line,
        })
    }

    fn parse_params(&mut self, line: u32) -> Result<Vec<Parameter>, ParseError> {
        let mut params: Vec<Parameter> = Vec::new();
        let mut seen_default = false;
        while !self.check(&TokenKind::RParen) {
            let name = self.expect_ident("parameter name")?;
            if params.iter().any(|p| p.name == name) {
                return Err(ParseError::DuplicateParameter { line, name });
            }
            let default = if self.eat(&TokenKind::Assign) {
                Some(self.parse_literal()?)
            } else {
                None
            };
            if default.is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(ParseError::RequiredAfterDefault { line, name });
            }
            params.push(Parameter { name, default });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(params)
    }

    /// `":" NEWLINE INDENT stmt+ DEDENT`. An inline body after the colon is
    /// rejected; every block is an indented block.
    fn parse_suite(&mut self) -> Result<Block, ParseError> {
        self.expect(&TokenKind::Colon, "':'")?;
        self.expect(&TokenKind::Newline, "end of line")?;
        self.expect(&TokenKind::Indent, "an indented block")?;
        let mut block = Vec::new();
        while !self.check(&TokenKind::Dedent) && !self.check(&TokenKind::Eof) {
            block.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::Dedent, "end of block")?;
        Ok(block)
    }

    // ---- statements ----

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        match self.peek().kind {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => {
                self.bump();
                let value = if self.check(&TokenKind::Newline) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.expect(&TokenKind::Newline, "end of line")?;
                Ok(Stmt::Return { value, line })
            }
            TokenKind::Pass => {
                self.bump();
                self.expect(&TokenKind::Newline, "end of line")?;
                Ok(Stmt::Pass { line })
            }
            TokenKind::Break => {
                if self.loop_depth == 0 {
                    return Err(ParseError::OutsideLoop {
                        line,
                        keyword: "break",
                    });
                }
                self.bump();
                self.expect(&TokenKind::Newline, "end of line")?;
                Ok(Stmt::Break { line })
            }
            TokenKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(ParseError::OutsideLoop {
                        line,
                        keyword: "continue",
                    });
                }
                self.bump();
                self.expect(&TokenKind::Newline, "end of line")?;
                Ok(Stmt::Continue { line })
            }
            TokenKind::Indent => Err(ParseError::UnexpectedIndent { line }),
            TokenKind::Def => Err(self.unexpected("a statement")),
            _ => self.parse_simple_stmt(line),
        }
    }

    fn parse_simple_stmt(&mut self, line: u32) -> Result<Stmt, ParseError> {
        // `name = expr` assignment; the two-token lookahead keeps `x == y`
        // an expression.
        if matches!(self.peek().kind, TokenKind::Ident(_))
            && matches!(self.nth_kind(1), Some(TokenKind::Assign))
        {
            let target = self.expect_ident("name")?;
            self.bump();
            let value = self.parse_expr()?;
            self.expect(&TokenKind::Newline, "end of line")?;
            return Ok(Stmt::Assign {
                target,
                value,
                line,
            });
        }
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            return Err(ParseError::InvalidAssignTarget { line });
        }
        self.expect(&TokenKind::Newline, "end of line")?;
        Ok(Stmt::Expr { expr, line })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::If, "'if'")?.line;
        let condition = self.parse_expr()?;
        let body = self.parse_suite()?;
        let mut branches = vec![IfBranch {
            condition,
            body,
            line,
        }];
        let mut else_body = None;
        loop {
            if self.check(&TokenKind::Elif) {
                let line = self.bump().line;
                let condition = self.parse_expr()?;
                let body = self.parse_suite()?;
                branches.push(IfBranch {
                    condition,
                    body,
                    line,
                });
            } else if self.check(&TokenKind::Else) {
                self.bump();
                else_body = Some(self.parse_suite()?);
                break;
            } else {
                break;
            }
        }
        Ok(Stmt::If {
            branches,
            else_body,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let line = self.expect(&TokenKind::While, "'while'")?.line;
        let condition = self.parse_expr()?;
        self.loop_depth += 1;
        let body = self.parse_suite()?;
        self.loop_depth -= 1;
        Ok(Stmt::While {
            condition,
            body,
            line,
        })
    }

    // ---- expressions ----

    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_not()?;
            left = Expr::Binary {
                op: BinOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Not) {
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    /// One optional comparison; chaining is not part of the grammar, so a
    /// second comparison operator falls out as an unexpected-token error at
    /// the caller.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_arith()?;
        let op = match self.peek().kind {
            TokenKind::Eq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::NotEq),
            TokenKind::Lt => Some(BinOp::Lt),
            TokenKind::LtEq => Some(BinOp::LtEq),
            TokenKind::Gt => Some(BinOp::Gt),
            TokenKind::GtEq => Some(BinOp::GtEq),
            _ => None,
        };
        match op {
            Some(op) => {
                self.bump();
                let right = self.parse_arith()?;
                Ok(Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            None => Ok(left),
        }
    }

    fn parse_arith(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_term()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.bump();
            let right = self.parse_factor()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.parse_factor()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_atom()?;
        while self.eat(&TokenKind::LBracket) {
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket, "']'")?;
            expr = Expr::Index {
                object: Box::new(expr),
                index: Box::new(index),
            };
        }
        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Int(v) => {
                self.bump();
                Ok(Expr::Literal(Literal::Int(v)))
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(Expr::Literal(Literal::Float(v)))
            }
            TokenKind::Str(s) => {
                self.bump();
                Ok(Expr::Literal(Literal::Str(s)))
            }
            TokenKind::True => {
                self.bump();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.bump();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::None => {
                self.bump();
                Ok(Expr::Literal(Literal::None))
            }
            TokenKind::Ident(name) => {
                self.bump();
                if self.eat(&TokenKind::LParen) {
                    let (args, keywords) = self.parse_call_args()?;
                    self.expect(&TokenKind::RParen, "')'")?;
                    Ok(Expr::Call {
                        function: name,
                        args,
                        keywords,
                    })
                } else {
                    Ok(Expr::Name(name))
                }
            }
            TokenKind::LParen => {
                self.bump();
                self.parse_paren_rest()
            }
            TokenKind::LBracket => {
                self.bump();
                self.parse_list_rest()
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// After a consumed `(`: `()` is the empty tuple, `(x)` is `x`, and a
    /// comma makes a tuple.
    fn parse_paren_rest(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&TokenKind::RParen) {
            return Ok(Expr::Tuple(vec![]));
        }
        let first = self.parse_expr()?;
        if !self.check(&TokenKind::Comma) {
            self.expect(&TokenKind::RParen, "')'")?;
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::RParen) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(Expr::Tuple(items))
    }

    fn parse_list_rest(&mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket, "']'")?;
        Ok(Expr::List(items))
    }

    pub(crate) fn parse_call_args(
        &mut self,
    ) -> Result<(Vec<Expr>, Vec<(String, Expr)>), ParseError> {
        let mut args = Vec::new();
        let mut keywords: Vec<(String, Expr)> = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let line = self.line();
            if matches!(self.peek().kind, TokenKind::Ident(_))
                && matches!(self.nth_kind(1), Some(TokenKind::Assign))
            {
                let name = self.expect_ident("argument name")?;
                self.bump();
                let value = self.parse_expr()?;
                if keywords.iter().any(|(k, _)| *k == name) {
                    return Err(ParseError::DuplicateKeyword { line, name });
                }
                keywords.push((name, value));
            } else {
                if !keywords.is_empty() {
                    return Err(ParseError::PositionalAfterKeyword { line });
                }
                args.push(self.parse_expr()?);
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok((args, keywords))
    }

    // ---- literals ----

    /// Restricted literal grammar used for parameter defaults and call
    /// specifications: scalars with an optional leading minus, plus list
    /// and tuple displays of literals. No names, no operators, no calls.
    pub(crate) fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Minus => {
                self.bump();
                match self.peek().kind.clone() {
                    TokenKind::Int(v) => {
                        self.bump();
                        Ok(Literal::Int(-v))
                    }
                    TokenKind::Float(v) => {
                        self.bump();
                        Ok(Literal::Float(-v))
                    }
                    _ => Err(self.unexpected("a number")),
                }
            }
            TokenKind::Int(v) => {
                self.bump();
                Ok(Literal::Int(v))
            }
            TokenKind::Float(v) => {
                self.bump();
                Ok(Literal::Float(v))
            }
            TokenKind::Str(s) => {
                self.bump();
                Ok(Literal::Str(s))
            }
            TokenKind::True => {
                self.bump();
                Ok(Literal::Bool(true))
            }
            TokenKind::False => {
                self.bump();
                Ok(Literal::Bool(false))
            }
            TokenKind::None => {
                self.bump();
                Ok(Literal::None)
            }
            TokenKind::LBracket => {
                self.bump();
                let mut items = Vec::new();
                while !self.check(&TokenKind::RBracket) {
                    items.push(self.parse_literal()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RBracket, "']'")?;
                Ok(Literal::List(items))
            }
            TokenKind::LParen => {
                self.bump();
                if self.eat(&TokenKind::RParen) {
                    return Ok(Literal::Tuple(vec![]));
                }
                let first = self.parse_literal()?;
                if !self.check(&TokenKind::Comma) {
                    self.expect(&TokenKind::RParen, "')'")?;
                    return Ok(first);
                }
                let mut items = vec![first];
                while self.eat(&TokenKind::Comma) {
                    if self.check(&TokenKind::RParen) {
                        break;
                    }
                    items.push(self.parse_literal()?);
                }
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Literal::Tuple(items))
            }
            _ => Err(self.unexpected("a literal")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> FunctionDef {
        let script = parse(source).unwrap();
        script.functions.values().next().unwrap().clone()
    }

    fn parse_body(stmts: &str) -> Block {
        let source = format!("def t():\n{stmts}");
        parse_one(&source).body
    }

    #[test]
    fn function_header_with_defaults() {
        let def = parse_one("def foo(a, b, c = None, d = 5):\n    pass\n");
        assert_eq!(def.name, "foo");
        assert_eq!(def.def_line, 1);
        assert_eq!(def.params.len(), 4);
        assert_eq!(def.params[0].default, None);
        assert_eq!(def.params[2].default, Some(Literal::None));
        assert_eq!(def.params[3].default, Some(Literal::Int(5)));
    }

    #[test]
    fn negative_and_nested_defaults() {
        let def = parse_one("def f(x = -2, y = [1, (2,)], z = \"s\"):\n    pass\n");
        assert_eq!(def.params[0].default, Some(Literal::Int(-2)));
        assert_eq!(
            def.params[1].default,
            Some(Literal::List(vec![
                Literal::Int(1),
                Literal::Tuple(vec![Literal::Int(2)]),
            ]))
        );
        assert_eq!(def.params[2].default, Some(Literal::Str("s".into())));
    }

    #[test]
    fn statements_carry_their_lines() {
        let source = "def f(x):\n    y = x + 1\n    y = y * 2\n    return y\n";
        let def = parse_one(source);
        let lines: Vec<u32> = def.body.iter().map(|s| s.line()).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn assignment_versus_comparison() {
        let body = parse_body("    x = 1\n    x == 1\n");
        assert!(matches!(&body[0], Stmt::Assign { target, .. } if target == "x"));
        assert!(matches!(
            &body[1],
            Stmt::Expr {
                expr: Expr::Binary { op: BinOp::Eq, .. },
                ..
            }
        ));
    }

    #[test]
    fn if_elif_else_branch_lines() {
        let source = "def f(x):\n    if x > 0:\n        return 1\n    elif x < 0:\n        return -1\n    else:\n        return 0\n";
        let def = parse_one(source);
        match &def.body[0] {
            Stmt::If {
                branches,
                else_body,
            } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].line, 2);
                assert_eq!(branches[1].line, 4);
                assert!(else_body.is_some());
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn while_with_break_and_continue() {
        let body = parse_body("    while True:\n        continue\n        break\n");
        match &body[0] {
            Stmt::While { body, line, .. } => {
                assert_eq!(*line, 2);
                assert!(matches!(body[0], Stmt::Continue { line: 3 }));
                assert!(matches!(body[1], Stmt::Break { line: 4 }));
            }
            other => panic!("expected while, got {other:?}"),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        let body = parse_body("    x = 1 + 2 * 3\n");
        match &body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op: BinOp::Add, right, .. } => {
                    assert!(matches!(**right, Expr::Binary { op: BinOp::Mul, .. }));
                }
                other => panic!("expected add at the top, got {other:?}"),
            },
            other => panic!("expected assign, got {other:?}"),
        }
    }

    #[test]
    fn boolean_precedence() {
        // `not a or b` groups as `(not a) or b`.
        let body = parse_body("    x = not a or b\n");
        match &body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op: BinOp::Or, left, .. } => {
                    assert!(matches!(
                        **left,
                        Expr::Unary {
                            op: UnaryOp::Not,
                            ..
                        }
                    ));
                }
                other => panic!("expected or at the top, got {other:?}"),
            },
            other => panic!("expected assign, got {other:?}"),
        }
    }

    #[test]
    fn unary_minus_binds_tighter_than_mul() {
        let body = parse_body("    x = -2 * 3\n");
        match &body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op: BinOp::Mul, left, .. } => {
                    assert!(matches!(
                        **left,
                        Expr::Unary {
                            op: UnaryOp::Neg,
                            ..
                        }
                    ));
                }
                other => panic!("expected mul at the top, got {other:?}"),
            },
            other => panic!("expected assign, got {other:?}"),
        }
    }

    #[test]
    fn comparison_does_not_chain() {
        let err = parse("def f(a, b, c):\n    return a < b < c\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 2, .. }));
    }

    #[test]
    fn chained_indexing() {
        let body = parse_body("    x = xs[0][1]\n");
        match &body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Index { object, .. } => {
                    assert!(matches!(**object, Expr::Index { .. }));
                }
                other => panic!("expected index, got {other:?}"),
            },
            other => panic!("expected assign, got {other:?}"),
        }
    }

    #[test]
    fn call_with_positional_and_keyword_args() {
        let body = parse_body("    helper(1, x, k = 2)\n");
        match &body[0] {
            Stmt::Expr { expr, .. } => match expr {
                Expr::Call {
                    function,
                    args,
                    keywords,
                } => {
                    assert_eq!(function, "helper");
                    assert_eq!(args.len(), 2);
                    assert_eq!(keywords.len(), 1);
                    assert_eq!(keywords[0].0, "k");
                }
                other => panic!("expected call, got {other:?}"),
            },
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn positional_after_keyword_rejected() {
        let err = parse("def f():\n    g(a = 1, 2)\n").unwrap_err();
        assert_eq!(err, ParseError::PositionalAfterKeyword { line: 2 });
    }

    #[test]
    fn duplicate_keyword_rejected() {
        let err = parse("def f():\n    g(a = 1, a = 2)\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateKeyword {
                line: 2,
                name: "a".into()
            }
        );
    }

    #[test]
    fn indexed_assignment_target_rejected() {
        let err = parse("def f(xs):\n    xs[0] = 5\n").unwrap_err();
        assert_eq!(err, ParseError::InvalidAssignTarget { line: 2 });
    }

    #[test]
    fn top_level_statement_rejected() {
        let err = parse("x = 1\n").unwrap_err();
        assert_eq!(err, ParseError::TopLevelStatement { line: 1 });
    }

    #[test]
    fn nested_def_rejected() {
        let err = parse("def f():\n    def g():\n        pass\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 2, .. }));
    }

    #[test]
    fn required_after_default_rejected() {
        let err = parse("def f(a = 1, b):\n    pass\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::RequiredAfterDefault {
                line: 1,
                name: "b".into()
            }
        );
    }

    #[test]
    fn duplicate_parameter_rejected() {
        let err = parse("def f(a, a):\n    pass\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateParameter {
                line: 1,
                name: "a".into()
            }
        );
    }

    #[test]
    fn duplicate_function_rejected() {
        let err = parse("def f():\n    pass\ndef f():\n    pass\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::DuplicateFunction {
                line: 3,
                name: "f".into()
            }
        );
    }

    #[test]
    fn group_versus_tuple() {
        let body = parse_body("    a = (1)\n    b = (1,)\n    c = (1, 2)\n    d = ()\n");
        assert!(matches!(
            &body[0],
            Stmt::Assign {
                value: Expr::Literal(Literal::Int(1)),
                ..
            }
        ));
        match &body[1] {
            Stmt::Assign { value: Expr::Tuple(items), .. } => assert_eq!(items.len(), 1),
            other => panic!("expected one-element tuple, got {other:?}"),
        }
        match &body[2] {
            Stmt::Assign { value: Expr::Tuple(items), .. } => assert_eq!(items.len(), 2),
            other => panic!("expected tuple, got {other:?}"),
        }
        match &body[3] {
            Stmt::Assign { value: Expr::Tuple(items), .. } => assert!(items.is_empty()),
            other => panic!("expected empty tuple, got {other:?}"),
        }
    }

    #[test]
    fn break_outside_loop_rejected() {
        let err = parse("def f():\n    break\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::OutsideLoop {
                line: 2,
                keyword: "break"
            }
        );
        // Inside an if that is itself inside a while is fine.
        assert!(parse("def f():\n    while True:\n        if True:\n            break\n").is_ok());
    }

    #[test]
    fn return_without_value() {
        let body = parse_body("    return\n");
        assert!(matches!(&body[0], Stmt::Return { value: None, line: 2 }));
    }

    #[test]
    fn empty_body_rejected() {
        let err = parse("def f():\ndef g():\n    pass\n").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { line: 2, .. }));
    }

    #[test]
    fn list_with_expressions_and_trailing_comma() {
        let body = parse_body("    xs = [x + 1, f(2), ]\n");
        match &body[0] {
            Stmt::Assign { value: Expr::List(items), .. } => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn script_function_order() {
        let script = parse("def b():\n    pass\ndef a():\n    pass\n").unwrap();
        let names: Vec<&str> = script.names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
