//! Tokenizer for type expressions.

use super::{TypeExprError, TypeExprErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Equals,
    End,
}

impl TokenKind {
    /// Short human description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Ident(name) => format!("`{name}`"),
            Self::LParen => "`(`".to_string(),
            Self::RParen => "`)`".to_string(),
            Self::LBrace => "`{`".to_string(),
            Self::RBrace => "`}`".to_string(),
            Self::Comma => "`,`".to_string(),
            Self::Equals => "`=`".to_string(),
            Self::End => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the first character of the token.
    pub offset: usize,
}

pub struct TypeExprLexer;

impl TypeExprLexer {
    /// Splits `input` into tokens, always terminated by [`TokenKind::End`].
    pub fn tokenize(input: &str) -> Result<Vec<Token>, TypeExprError> {
        let mut tokens = Vec::new();
        let mut chars = input.chars().enumerate().peekable();
        let mut end = 0;

        while let Some((offset, ch)) = chars.next() {
            end = offset + 1;
            let kind = match ch {
                c if c.is_whitespace() => continue,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '=' => TokenKind::Equals,
                c if c.is_ascii_alphabetic() => {
                    let mut name = String::from(c);
                    while let Some(&(next_offset, next)) = chars.peek() {
                        if !is_ident_continue(next) {
                            break;
                        }
                        name.push(next);
                        end = next_offset + 1;
                        chars.next();
                    }
                    TokenKind::Ident(name)
                }
                other => {
                    return Err(TypeExprError::new(
                        TypeExprErrorKind::UnexpectedChar(other),
                        offset,
                    ));
                }
            };
            tokens.push(Token { kind, offset });
        }

        tokens.push(Token {
            kind: TokenKind::End,
            offset: end,
        });
        Ok(tokens)
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
