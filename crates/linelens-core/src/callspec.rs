//! The call-specification codec.
//!
//! A call specification is the text a user edits to choose the concrete
//! arguments for one traced run, e.g. `foo(1, 2, c = 3)`. The encode
//! direction is [`FunctionDef::describe`], which renders a function's
//! callable surface with required parameters bare and defaulted parameters
//! as `name = default`. The decode direction is [`parse_call`], which turns
//! edited text back into positional and keyword argument values.
//!
//! The decode grammar is deliberately restricted: arguments must be
//! literals (scalars, optionally negated numbers, and list/tuple displays
//! of literals) or `name = literal` keyword forms. Names, operators, and
//! calls are rejected, so parsing a specification can never execute
//! anything. A bare required-parameter name left in place from
//! [`FunctionDef::describe`] output is therefore an error that tells the
//! user which argument still needs a value.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ParseError;
use crate::function::FunctionDef;
use crate::literal::Literal;
use crate::parser::Parser;
use crate::token::{tokenize, TokenKind};

/// Concrete arguments for one invocation: positional values in order plus
/// keyword values in the order the user wrote them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSpec {
    pub function: String,
    pub positional: Vec<Literal>,
    pub keyword: IndexMap<String, Literal>,
}

impl fmt::Display for CallSpec {
    /// Renders the specification back to call-expression text. The output
    /// re-parses to an equal `CallSpec`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        let mut first = true;
        for value in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{value}")?;
        }
        for (name, value) in &self.keyword {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{name} = {value}")?;
        }
        write!(f, ")")
    }
}

/// Ways call-expression text can fail to decode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallSpecError {
    /// The text failed to lex, or an argument is not in the restricted
    /// literal grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The text is not shaped like `name(arguments)` at all.
    #[error("not a call expression: expected `name(arguments)`")]
    NotACall,

    /// Leftover input after the call's closing parenthesis.
    #[error("line {line}: unexpected input after the closing ')'")]
    TrailingInput { line: u32 },
}

/// Decodes call-expression text into a [`CallSpec`].
///
/// Accepts exactly one call of the form `name(lit, ..., kw = lit, ...)`,
/// with positional arguments before keyword arguments and no duplicate
/// keywords. Whether the named function exists, and whether the arguments
/// fit its parameter list, is checked later at binding time.
pub fn parse_call(input: &str) -> Result<CallSpec, CallSpecError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);

    let function = match parser.nth_kind(0) {
        Some(TokenKind::Ident(_)) => parser.expect_ident("function name")?,
        _ => return Err(CallSpecError::NotACall),
    };
    if !parser.eat(&TokenKind::LParen) {
        return Err(CallSpecError::NotACall);
    }

    let mut positional = Vec::new();
    let mut keyword: IndexMap<String, Literal> = IndexMap::new();
    while !parser.check(&TokenKind::RParen) {
        let line = parser.line();
        if matches!(parser.nth_kind(0), Some(TokenKind::Ident(_)))
            && matches!(parser.nth_kind(1), Some(TokenKind::Assign))
        {
            let name = parser.expect_ident("argument name")?;
            parser.eat(&TokenKind::Assign);
            let value = parser.parse_literal()?;
            if keyword.contains_key(&name) {
                return Err(ParseError::DuplicateKeyword { line, name }.into());
            }
            keyword.insert(name, value);
        } else {
            if !keyword.is_empty() {
                return Err(ParseError::PositionalAfterKeyword { line }.into());
            }
            positional.push(parser.parse_literal()?);
        }
        if !parser.eat(&TokenKind::Comma) {
            break;
        }
    }
    parser.expect(&TokenKind::RParen, "')'")?;

    parser.eat(&TokenKind::Newline);
    if !parser.check(&TokenKind::Eof) {
        return Err(CallSpecError::TrailingInput {
            line: parser.line(),
        });
    }
    Ok(CallSpec {
        function,
        positional,
        keyword,
    })
}

/// Keyword mapping equal to `def`'s declared defaults, in declaration
/// order. This is what [`parse_call`] hands back when a user edits a
/// [`FunctionDef::describe`] prompt and leaves every default untouched.
pub fn declared_defaults(def: &FunctionDef) -> IndexMap<String, Literal> {
    def.params
        .iter()
        .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
        .collect()
}
