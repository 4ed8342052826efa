//! Line-oriented lexer for lens scripts.
//!
//! The lexer works one physical line at a time, which is what makes line
//! attribution in the tracer well-defined: every token knows the 1-based
//! line it came from, blocks are expressed through synthetic
//! [`TokenKind::Indent`]/[`TokenKind::Dedent`] tokens driven by a stack of
//! leading-space counts, and each non-blank line ends in a
//! [`TokenKind::Newline`]. Blank lines and `#` comment lines produce no
//! tokens at all.
//!
//! Indentation is measured in spaces; a tab in leading whitespace is an
//! error. An expression cannot span lines (there are no continuations),
//! which also keeps call-expression text single-line by construction.

use std::fmt;

use crate::error::ParseError;

/// One lexed token plus its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: u32,
    /// 1-based column (in characters) of the token's first character.
    pub column: u32,
}

/// Every kind of token a lens script can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords.
    Def,
    If,
    Elif,
    Else,
    While,
    Return,
    Pass,
    Break,
    Continue,
    And,
    Or,
    Not,
    True,
    False,
    None,

    // Literals and names.
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Operators and punctuation.
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,

    // Layout.
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Def => write!(f, "'def'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Elif => write!(f, "'elif'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Pass => write!(f, "'pass'"),
            TokenKind::Break => write!(f, "'break'"),
            TokenKind::Continue => write!(f, "'continue'"),
            TokenKind::And => write!(f, "'and'"),
            TokenKind::Or => write!(f, "'or'"),
            TokenKind::Not => write!(f, "'not'"),
            TokenKind::True => write!(f, "'True'"),
            TokenKind::False => write!(f, "'False'"),
            TokenKind::None => write!(f, "'None'"),
            TokenKind::Ident(name) => write!(f, "name '{name}'"),
            TokenKind::Int(v) => write!(f, "integer {v}"),
            TokenKind::Float(v) => write!(f, "float {v:?}"),
            TokenKind::Str(_) => write!(f, "string literal"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::Eq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Indent => write!(f, "indent"),
            TokenKind::Dedent => write!(f, "end of block"),
            TokenKind::Eof => write!(f, "end of script"),
        }
    }
}

/// Lexes a complete source text into a token stream ending in
/// [`TokenKind::Eof`], with any still-open blocks closed by trailing
/// dedents.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut indents: Vec<usize> = vec![0];
    let mut last_line = 0u32;

    for (idx, raw) in source.lines().enumerate() {
        let line = (idx + 1) as u32;

        // Measure leading indentation in spaces.
        let mut indent = 0usize;
        for c in raw.chars() {
            match c {
                ' ' => indent += 1,
                '\t' => return Err(ParseError::TabIndent { line }),
                _ => break,
            }
        }
        let rest: Vec<char> = raw.chars().skip(indent).collect();

        // Blank and comment-only lines carry no tokens and do not affect
        // block structure.
        if rest.is_empty() || rest[0] == '#' {
            continue;
        }
        last_line = line;

        let current = *indents.last().unwrap_or(&0);
        if indent > current {
            indents.push(indent);
            tokens.push(Token {
                kind: TokenKind::Indent,
                line,
                column: 1,
            });
        } else if indent < current {
            while indent < *indents.last().unwrap_or(&0) {
                indents.pop();
                tokens.push(Token {
                    kind: TokenKind::Dedent,
                    line,
                    column: 1,
                });
            }
            if indent != *indents.last().unwrap_or(&0) {
                return Err(ParseError::InconsistentDedent { line });
            }
        }

        scan_line(&rest, indent, line, &mut tokens)?;
        tokens.push(Token {
            kind: TokenKind::Newline,
            line,
            column: (indent + rest.len() + 1) as u32,
        });
    }

    let eof_line = last_line + 1;
    while indents.len() > 1 {
        indents.pop();
        tokens.push(Token {
            kind: TokenKind::Dedent,
            line: eof_line,
            column: 1,
        });
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        line: eof_line,
        column: 1,
    });
    Ok(tokens)
}

/// Scans the content of one line (indentation already consumed) and appends
/// its tokens.
fn scan_line(
    chars: &[char],
    indent: usize,
    line: u32,
    tokens: &mut Vec<Token>,
) -> Result<(), ParseError> {
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let column = (indent + i + 1) as u32;

        match c {
            ' ' => {
                i += 1;
            }
            // Trailing comment: the rest of the line is ignored.
            '#' => break,
            '0'..='9' => {
                let (kind, consumed) = scan_number(chars, i, line, column)?;
                tokens.push(Token { kind, line, column });
                i += consumed;
            }
            c if is_name_start(c) => {
                let start = i;
                while i < chars.len() && is_name_continue(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push(Token {
                    kind: keyword_or_ident(name),
                    line,
                    column,
                });
            }
            '"' | '\'' => {
                let (text, consumed) = scan_string(chars, i, line, column)?;
                tokens.push(Token {
                    kind: TokenKind::Str(text),
                    line,
                    column,
                });
                i += consumed;
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token {
                        kind: TokenKind::Eq,
                        line,
                        column,
                    });
                    i += 2;
                } else {
                    tokens.push(Token {
                        kind: TokenKind::Assign,
                        line,
                        column,
                    });
                    i += 1;
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token {
                        kind: TokenKind::NotEq,
                        line,
                        column,
                    });
                    i += 2;
                } else {
                    return Err(ParseError::UnexpectedCharacter {
                        line,
                        column,
                        found: '!',
                    });
                }
            }
            '<' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token {
                        kind: TokenKind::LtEq,
                        line,
                        column,
                    });
                    i += 2;
                } else {
                    tokens.push(Token {
                        kind: TokenKind::Lt,
                        line,
                        column,
                    });
                    i += 1;
                }
            }
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token {
                        kind: TokenKind::GtEq,
                        line,
                        column,
                    });
                    i += 2;
                } else {
                    tokens.push(Token {
                        kind: TokenKind::Gt,
                        line,
                        column,
                    });
                    i += 1;
                }
            }
            _ => {
                let kind = match c {
                    '+' => Some(TokenKind::Plus),
                    '-' => Some(TokenKind::Minus),
                    '*' => Some(TokenKind::Star),
                    '/' => Some(TokenKind::Slash),
                    '%' => Some(TokenKind::Percent),
                    '(' => Some(TokenKind::LParen),
                    ')' => Some(TokenKind::RParen),
                    '[' => Some(TokenKind::LBracket),
                    ']' => Some(TokenKind::RBracket),
                    ',' => Some(TokenKind::Comma),
                    ':' => Some(TokenKind::Colon),
                    _ => None,
                };
                match kind {
                    Some(kind) => {
                        tokens.push(Token { kind, line, column });
                        i += 1;
                    }
                    None => {
                        return Err(ParseError::UnexpectedCharacter {
                            line,
                            column,
                            found: c,
                        })
                    }
                }
            }
        }
    }
    Ok(())
}

/// Scans an integer or float starting at `chars[start]`. Returns the token
/// kind and the number of characters consumed.
fn scan_number(
    chars: &[char],
    start: usize,
    line: u32,
    column: u32,
) -> Result<(TokenKind, usize), ParseError> {
    let mut i = start;
    let mut is_float = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    // Fractional part: a '.' must be followed by at least one digit.
    if i < chars.len() && chars[i] == '.' {
        if i + 1 < chars.len() && chars[i + 1].is_ascii_digit() {
            is_float = true;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else {
            let text: String = chars[start..=i].iter().collect();
            return Err(ParseError::InvalidNumber { line, column, text });
        }
    }
    // Exponent part.
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            is_float = true;
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        } else {
            let text: String = chars[start..j.min(chars.len())].iter().collect();
            return Err(ParseError::InvalidNumber { line, column, text });
        }
    }
    // A number must not run straight into a name.
    if i < chars.len() && is_name_start(chars[i]) {
        let text: String = chars[start..=i].iter().collect();
        return Err(ParseError::InvalidNumber { line, column, text });
    }

    let text: String = chars[start..i].iter().collect();
    let kind = if is_float {
        match text.parse::<f64>() {
            Ok(v) => TokenKind::Float(v),
            Err(_) => return Err(ParseError::InvalidNumber { line, column, text }),
        }
    } else {
        match text.parse::<i64>() {
            Ok(v) => TokenKind::Int(v),
            Err(_) => return Err(ParseError::InvalidNumber { line, column, text }),
        }
    };
    Ok((kind, i - start))
}

/// Scans a quoted string starting at the opening quote. Returns the decoded
/// text and the number of characters consumed (including both quotes).
///
/// Recognized escapes: `\n`, `\t`, `\r`, `\\`, `\'`, `\"`. An unknown
/// escape keeps the backslash and the character as written.
fn scan_string(
    chars: &[char],
    start: usize,
    line: u32,
    column: u32,
) -> Result<(String, usize), ParseError> {
    let quote = chars[start];
    let mut text = String::new();
    let mut i = start + 1;

    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            return Ok((text, i + 1 - start));
        }
        if c == '\\' {
            match chars.get(i + 1) {
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some('r') => text.push('\r'),
                Some('\\') => text.push('\\'),
                Some('\'') => text.push('\''),
                Some('"') => text.push('"'),
                Some(other) => {
                    text.push('\\');
                    text.push(*other);
                }
                Option::None => break,
            }
            i += 2;
        } else {
            text.push(c);
            i += 1;
        }
    }
    Err(ParseError::UnterminatedString { line, column })
}

fn keyword_or_ident(name: String) -> TokenKind {
    match name.as_str() {
        "def" => TokenKind::Def,
        "if" => TokenKind::If,
        "elif" => TokenKind::Elif,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        "pass" => TokenKind::Pass,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "True" => TokenKind::True,
        "False" => TokenKind::False,
        "None" => TokenKind::None,
        _ => TokenKind::Ident(name),
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn flat_line() {
        assert_eq!(
            kinds("x = 1 + 2"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Plus,
                TokenKind::Int(2),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn indent_and_dedent_pair_up() {
        let source = "def f():\n    return 1\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Def,
                TokenKind::Ident("f".into()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                TokenKind::Return,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Dedent,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_blocks_emit_multiple_dedents_at_eof() {
        let source = "def f(x):\n    if x:\n        return 1\n";
        let ks = kinds(source);
        let dedents = ks.iter().filter(|k| **k == TokenKind::Dedent).count();
        assert_eq!(dedents, 2);
        assert_eq!(ks.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn blank_and_comment_lines_are_invisible() {
        let source = "def f():\n\n    # setup\n    return 1\n";
        let ks = kinds(source);
        // Same stream as without the blank/comment lines.
        assert_eq!(ks, kinds("def f():\n    return 1\n"));
        // But line numbers still point at the real source.
        let toks = tokenize(source).unwrap();
        let ret = toks
            .iter()
            .find(|t| t.kind == TokenKind::Return)
            .unwrap();
        assert_eq!(ret.line, 4);
    }

    #[test]
    fn trailing_comment_is_dropped() {
        assert_eq!(
            kinds("x = 1  # the answer"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Int(1),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hash_inside_string_is_not_a_comment() {
        assert_eq!(
            kinds("x = \"a # b\""),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Assign,
                TokenKind::Str("a # b".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#"s = "a\nb\t\"c\"""#),
            vec![
                TokenKind::Ident("s".into()),
                TokenKind::Assign,
                TokenKind::Str("a\nb\t\"c\"".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(
            kinds("s = 'hi'"),
            vec![
                TokenKind::Ident("s".into()),
                TokenKind::Assign,
                TokenKind::Str("hi".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_reports_position() {
        let err = tokenize("s = \"oops").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedString { line: 1, column: 5 }
        );
    }

    #[test]
    fn float_forms() {
        assert_eq!(kinds("1.5")[0], TokenKind::Float(1.5));
        assert_eq!(kinds("2e3")[0], TokenKind::Float(2000.0));
        assert_eq!(kinds("2.5e-1")[0], TokenKind::Float(0.25));
    }

    #[test]
    fn dangling_dot_is_invalid() {
        let err = tokenize("x = 5.").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn int_out_of_range_is_invalid() {
        let err = tokenize("x = 99999999999999999999").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn number_running_into_name_is_invalid() {
        let err = tokenize("x = 12ab").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn tab_indentation_rejected() {
        let err = tokenize("def f():\n\treturn 1\n").unwrap_err();
        assert_eq!(err, ParseError::TabIndent { line: 2 });
    }

    #[test]
    fn inconsistent_dedent_rejected() {
        let source = "def f():\n        x = 1\n    y = 2\n";
        let err = tokenize(source).unwrap_err();
        assert_eq!(err, ParseError::InconsistentDedent { line: 3 });
    }

    #[test]
    fn bare_bang_rejected() {
        let err = tokenize("x ! y").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedCharacter {
                line: 1,
                column: 3,
                found: '!'
            }
        );
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            kinds("a <= b >= c != d == e"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::LtEq,
                TokenKind::Ident("b".into()),
                TokenKind::GtEq,
                TokenKind::Ident("c".into()),
                TokenKind::NotEq,
                TokenKind::Ident("d".into()),
                TokenKind::Eq,
                TokenKind::Ident("e".into()),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_not_idents() {
        assert_eq!(kinds("None")[0], TokenKind::None);
        assert_eq!(kinds("True")[0], TokenKind::True);
        assert_eq!(kinds("nonette")[0], TokenKind::Ident("nonette".into()));
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("\n\n# only comments\n"), vec![TokenKind::Eof]);
    }
}
