//! Tokenizer for Issue QL text.
//!
//! Produces a flat token stream; keywords (`and`, `or`, `in`, `not`, `is`,
//! `empty`) are left as identifiers and recognized case-insensitively by the
//! parser, so field names and keywords share one token kind.

use crate::error::ParseError;

/// A single token with its byte offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word: field name or keyword.
    Ident(String),
    /// A quoted string literal (quotes stripped).
    Str(String),
    LParen,
    RParen,
    Bang,
    Eq,
    NotEq,
    Comma,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(word) => format!("`{word}`"),
            Self::Str(text) => format!("\"{text}\""),
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
            Self::Bang => "`!`".to_string(),
            Self::Eq => "`=`".to_string(),
            Self::NotEq => "`!=`".to_string(),
            Self::Comma => "`,`".to_string(),
        }
    }
}

/// Split query text into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let offset = i;
        let kind = match b {
            b'(' => {
                i += 1;
                TokenKind::LParen
            }
            b')' => {
                i += 1;
                TokenKind::RParen
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b'=' => {
                i += 1;
                TokenKind::Eq
            }
            b'!' => {
                if bytes.get(i + 1) == Some(&b'=') {
                    i += 2;
                    TokenKind::NotEq
                } else {
                    i += 1;
                    TokenKind::Bang
                }
            }
            b'"' | b'\'' => {
                let quote = b;
                let start = i + 1;
                let mut end = start;
                while end < len && bytes[end] != quote {
                    end += 1;
                }
                if end >= len {
                    return Err(ParseError::new("unterminated string literal", offset));
                }
                i = end + 1;
                TokenKind::Str(input[start..end].to_string())
            }
            _ if is_ident_start(b) => {
                let start = i;
                let mut end = i;
                while end < len && is_ident_continue(bytes[end]) {
                    end += 1;
                }
                i = end;
                TokenKind::Ident(input[start..end].to_string())
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(ParseError::new(format!("unexpected character `{ch}`"), offset));
            }
        };

        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_factor() {
        assert_eq!(
            kinds("assignee = \"bob\""),
            vec![
                TokenKind::Ident("assignee".to_string()),
                TokenKind::Eq,
                TokenKind::Str("bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_not_equals() {
        assert_eq!(
            kinds("labels != 'L1'"),
            vec![
                TokenKind::Ident("labels".to_string()),
                TokenKind::NotEq,
                TokenKind::Str("L1".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_bang_and_parens() {
        assert_eq!(
            kinds("!(a)"),
            vec![
                TokenKind::Bang,
                TokenKind::LParen,
                TokenKind::Ident("a".to_string()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_in_list() {
        assert_eq!(
            kinds("component in (\"C1\", \"C2\")"),
            vec![
                TokenKind::Ident("component".to_string()),
                TokenKind::Ident("in".to_string()),
                TokenKind::LParen,
                TokenKind::Str("C1".to_string()),
                TokenKind::Comma,
                TokenKind::Str("C2".to_string()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_offsets() {
        let tokens = tokenize("a = \"b\"").expect("tokenize");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].offset, 2);
        assert_eq!(tokens[2].offset, 4);
    }

    #[test]
    fn test_tokenize_unterminated_string() {
        let err = tokenize("assignee = \"bob").expect_err("should fail");
        assert_eq!(err.offset, 11);
    }

    #[test]
    fn test_tokenize_unexpected_character() {
        let err = tokenize("assignee ~ \"bob\"").expect_err("should fail");
        assert_eq!(err.offset, 9);
    }
}
