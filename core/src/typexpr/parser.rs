//! Recursive-descent parser over type expression tokens.

use crate::types::{Attribute, ObjectType, TypeDescriptor};

use super::lexer::{Token, TokenKind};
use super::{ParseOptions, TypeExprError, TypeExprErrorKind};

type Result<T> = std::result::Result<T, TypeExprError>;

pub struct TypeExprParser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    options: &'a ParseOptions,
}

impl<'a> TypeExprParser<'a> {
    /// `tokens` must end with [`TokenKind::End`], as produced by the lexer.
    pub fn new(tokens: Vec<Token>, options: &'a ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            options,
        }
    }

    pub fn parse(mut self) -> Result<TypeDescriptor> {
        if self.peek().kind == TokenKind::End {
            return Err(self.error_here(TypeExprErrorKind::Empty));
        }

        let ty = self.parse_type()?;

        let next = self.peek();
        match next.kind {
            TokenKind::End => Ok(ty),
            TokenKind::RParen => Err(self.error_here(TypeExprErrorKind::UnmatchedDelimiter(')'))),
            TokenKind::RBrace => Err(self.error_here(TypeExprErrorKind::UnmatchedDelimiter('}'))),
            _ => Err(self.error_here(TypeExprErrorKind::TrailingInput)),
        }
    }

    fn parse_type(&mut self) -> Result<TypeDescriptor> {
        let token = self.advance();
        self.enter(token.offset)?;

        let ty = match &token.kind {
            TokenKind::Ident(name) => match name.to_ascii_lowercase().as_str() {
                "string" => TypeDescriptor::String,
                "number" => TypeDescriptor::Number,
                "bool" => TypeDescriptor::Bool,
                "any" => TypeDescriptor::Dynamic,
                "list" => TypeDescriptor::list(self.parse_parenthesized()?),
                "map" => TypeDescriptor::map(self.parse_parenthesized()?),
                "object" => TypeDescriptor::object(self.parse_object_body()?),
                "optional" => {
                    return Err(TypeExprError::new(
                        TypeExprErrorKind::MisplacedOptional,
                        token.offset,
                    ));
                }
                _ => {
                    return Err(TypeExprError::new(
                        TypeExprErrorKind::UnknownType(name.clone()),
                        token.offset,
                    ));
                }
            },
            TokenKind::End => {
                return Err(TypeExprError::new(
                    TypeExprErrorKind::UnexpectedEnd,
                    token.offset,
                ));
            }
            other => {
                return Err(TypeExprError::new(
                    TypeExprErrorKind::Expected {
                        expected: "a type",
                        found: other.describe(),
                    },
                    token.offset,
                ));
            }
        };

        self.depth -= 1;
        Ok(ty)
    }

    /// Parses `( type )` following a `list`, `map` or `optional` keyword.
    fn parse_parenthesized(&mut self) -> Result<TypeDescriptor> {
        let open = self.expect_open(TokenKind::LParen, "`(`")?;
        let inner = self.parse_type()?;
        self.expect_close(TokenKind::RParen, ')', open)?;
        Ok(inner)
    }

    /// Parses `( { attr, ... } )` following the `object` keyword.
    fn parse_object_body(&mut self) -> Result<ObjectType> {
        let paren = self.expect_open(TokenKind::LParen, "`(`")?;
        let brace = self.expect_open(TokenKind::LBrace, "`{`")?;

        let mut object = ObjectType::new();
        loop {
            let token = self.peek().clone();
            match token.kind {
                TokenKind::RBrace => break,
                TokenKind::End => {
                    return Err(TypeExprError::new(
                        TypeExprErrorKind::UnclosedDelimiter('{'),
                        brace,
                    ));
                }
                TokenKind::Comma => {
                    return Err(self.error_here(TypeExprErrorKind::EmptyAttribute));
                }
                TokenKind::Equals => {
                    return Err(self.error_here(TypeExprErrorKind::MissingAttributeName));
                }
                TokenKind::Ident(name) => {
                    self.advance();
                    let attribute = self.parse_attribute(&name, token.offset)?;
                    if object.insert(name.clone(), attribute).is_some() {
                        return Err(TypeExprError::new(
                            TypeExprErrorKind::DuplicateAttribute(name),
                            token.offset,
                        ));
                    }
                }
                other => {
                    return Err(self.error_here(TypeExprErrorKind::Expected {
                        expected: "an attribute name",
                        found: other.describe(),
                    }));
                }
            }

            let next = self.peek().kind.clone();
            match next {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RBrace => break,
                TokenKind::End => {
                    return Err(TypeExprError::new(
                        TypeExprErrorKind::UnclosedDelimiter('{'),
                        brace,
                    ));
                }
                TokenKind::RParen => {
                    return Err(self.error_here(TypeExprErrorKind::UnmatchedDelimiter(')')));
                }
                other => {
                    return Err(self.error_here(TypeExprErrorKind::Expected {
                        expected: "`,` or `}`",
                        found: other.describe(),
                    }));
                }
            }
        }

        self.expect_close(TokenKind::RBrace, '}', brace)?;
        self.expect_close(TokenKind::RParen, ')', paren)?;
        Ok(object)
    }

    /// Parses `= type` or `= optional(type)` after an attribute name.
    fn parse_attribute(&mut self, name: &str, name_offset: usize) -> Result<Attribute> {
        let next = self.peek().kind.clone();
        match next {
            TokenKind::Equals => {
                self.advance();
            }
            // a bare type where `name=type` was expected
            TokenKind::LParen | TokenKind::Comma | TokenKind::RBrace if is_type_keyword(name) => {
                return Err(TypeExprError::new(
                    TypeExprErrorKind::MissingAttributeName,
                    name_offset,
                ));
            }
            other => {
                return Err(self.error_here(TypeExprErrorKind::Expected {
                    expected: "`=`",
                    found: other.describe(),
                }));
            }
        }

        let next = self.peek().kind.clone();
        match next {
            TokenKind::Comma | TokenKind::RBrace | TokenKind::End => Err(self.error_here(
                TypeExprErrorKind::MissingAttributeType(name.to_string()),
            )),
            TokenKind::Ident(keyword)
                if keyword.eq_ignore_ascii_case("optional")
                    && self.peek_nth(1).kind == TokenKind::LParen =>
            {
                let token = self.advance();
                self.enter(token.offset)?;
                let ty = self.parse_parenthesized()?;
                self.depth -= 1;
                Ok(Attribute::optional(ty))
            }
            _ => Ok(Attribute::required(self.parse_type()?)),
        }
    }

    /// Consumes an opening delimiter, returning its offset.
    fn expect_open(&mut self, kind: TokenKind, expected: &'static str) -> Result<usize> {
        let token = self.peek();
        if token.kind == kind {
            let offset = token.offset;
            self.advance();
            return Ok(offset);
        }
        if token.kind == TokenKind::End {
            return Err(self.error_here(TypeExprErrorKind::UnexpectedEnd));
        }
        Err(self.error_here(TypeExprErrorKind::Expected {
            expected,
            found: token.kind.describe(),
        }))
    }

    /// Consumes a closing delimiter matching the opener at `open_offset`.
    fn expect_close(&mut self, kind: TokenKind, close: char, open_offset: usize) -> Result<()> {
        let token = self.peek();
        if token.kind == kind {
            self.advance();
            return Ok(());
        }
        if token.kind == TokenKind::End {
            let open = if close == ')' { '(' } else { '{' };
            return Err(TypeExprError::new(
                TypeExprErrorKind::UnclosedDelimiter(open),
                open_offset,
            ));
        }
        // the other closer cannot close anything here
        match token.kind {
            TokenKind::RParen => {
                return Err(self.error_here(TypeExprErrorKind::UnmatchedDelimiter(')')));
            }
            TokenKind::RBrace => {
                return Err(self.error_here(TypeExprErrorKind::UnmatchedDelimiter('}')));
            }
            _ => {}
        }
        let expected = if close == ')' { "`)`" } else { "`}`" };
        Err(self.error_here(TypeExprErrorKind::Expected {
            expected,
            found: token.kind.describe(),
        }))
    }

    fn enter(&mut self, offset: usize) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(TypeExprError::new(
                TypeExprErrorKind::NestingTooDeep {
                    limit: self.options.max_depth,
                },
                offset,
            ));
        }
        Ok(())
    }

    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Returns the current token and moves past it; stays on `End`.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::End {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, kind: TypeExprErrorKind) -> TypeExprError {
        TypeExprError::new(kind, self.peek().offset)
    }
}

fn is_type_keyword(name: &str) -> bool {
    ["string", "number", "bool", "any", "list", "map", "object"]
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}
