//! Recursive-descent parser for Issue QL.
//!
//! Precedence, loosest to tightest: OR, AND, then `!( … )` / parentheses.
//! `field IN ("a","b")` desugars to an OR-node of equality factors;
//! `NOT IN` yields the same node with its negation flag set.

use crate::ast::{BoolOp, CmpOp, Expr, Field};
use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};

/// Parse query text into an expression tree.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::new(
            format!("unexpected {} after expression", token.kind.describe()),
            token.offset,
        )),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Byte length of the source, used as the offset of end-of-input errors.
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.end, |t| t.offset)
    }

    /// Consume the next token if it is the given keyword (case-insensitive).
    fn take_keyword(&mut self, keyword: &str) -> bool {
        if let Some(Token {
            kind: TokenKind::Ident(word),
            ..
        }) = self.peek()
        {
            if word.eq_ignore_ascii_case(keyword) {
                self.pos += 1;
                return true;
            }
        }
        false
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) if token.kind == *kind => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(ParseError::new(
                format!("expected {what}, found {}", token.kind.describe()),
                token.offset,
            )),
            None => Err(ParseError::new(format!("expected {what}"), self.end)),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut operands = vec![self.parse_and()?];
        while self.take_keyword("or") {
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::AndOr {
                op: BoolOp::Or,
                operands,
                negated: false,
            }
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut operands = vec![self.parse_primary()?];
        while self.take_keyword("and") {
            operands.push(self.parse_primary()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::AndOr {
                op: BoolOp::And,
                operands,
                negated: false,
            }
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Bang) => {
                self.pos += 1;
                self.expect(&TokenKind::LParen, "`(` after `!`")?;
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner.negated())
            }
            Some(TokenKind::LParen) => {
                self.pos += 1;
                let inner = self.parse_or()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            Some(TokenKind::Ident(word)) => {
                self.pos += 1;
                self.parse_comparison(Field::parse(&word))
            }
            Some(kind) => Err(ParseError::new(
                format!("expected expression, found {}", kind.describe()),
                self.offset(),
            )),
            None => Err(ParseError::new("expected expression", self.end)),
        }
    }

    /// Parse the comparison following a field identifier.
    fn parse_comparison(&mut self, field: Field) -> Result<Expr, ParseError> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Eq) => {
                self.pos += 1;
                let value = self.parse_value()?;
                Ok(Expr::Factor {
                    field,
                    op: CmpOp::Eq,
                    value,
                })
            }
            Some(TokenKind::NotEq) => {
                self.pos += 1;
                let value = self.parse_value()?;
                Ok(Expr::Factor {
                    field,
                    op: CmpOp::Ne,
                    value,
                })
            }
            _ if self.take_keyword("in") => self.parse_in_list(field, false),
            _ if self.take_keyword("not") => {
                if !self.take_keyword("in") {
                    return Err(ParseError::new("expected `in` after `not`", self.offset()));
                }
                self.parse_in_list(field, true)
            }
            _ if self.take_keyword("is") => {
                let negated = self.take_keyword("not");
                if !self.take_keyword("empty") {
                    return Err(ParseError::new("expected `empty` after `is`", self.offset()));
                }
                Ok(Expr::Empty { field, negated })
            }
            _ => Err(ParseError::new(
                format!("expected comparison after field `{}`", field.name()),
                self.offset(),
            )),
        }
    }

    fn parse_value(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Some(Token {
                kind: TokenKind::Str(value),
                ..
            }) => Ok(value),
            Some(token) => Err(ParseError::new(
                format!("expected quoted value, found {}", token.kind.describe()),
                token.offset,
            )),
            None => Err(ParseError::new("expected quoted value", self.end)),
        }
    }

    /// Parse `("v1", "v2", …)` and desugar to an OR of equality factors.
    fn parse_in_list(&mut self, field: Field, negated: bool) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut operands = vec![Expr::Factor {
            field: field.clone(),
            op: CmpOp::Eq,
            value: self.parse_value()?,
        }];
        while self.peek().map(|t| &t.kind) == Some(&TokenKind::Comma) {
            self.pos += 1;
            operands.push(Expr::Factor {
                field: field.clone(),
                op: CmpOp::Eq,
                value: self.parse_value()?,
            });
        }
        self.expect(&TokenKind::RParen, "`)`")?;
        Ok(Expr::AndOr {
            op: BoolOp::Or,
            operands,
            negated,
        })
    }
}
