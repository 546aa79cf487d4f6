//! Parser for Go-syntax type expressions.
//!
//! Supported forms: `*T`, `[]T`, `[N]T`, `map[K]V`, `interface{}`, `any`,
//! predeclared names, `chan T`, `func(...)`, `unsafe.Pointer`, qualified names
//! (`path/to/pkg.Name`), generic instantiations (`pkg.Set[string]`) and inline
//! anonymous structs (`struct { Name string "json:\"name\"" }`).

use std::fmt;

use crate::types::Kind;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Basic(Kind),
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array(usize, Box<TypeExpr>),
    Map(Box<TypeExpr>, Box<TypeExpr>),
    Struct(Vec<FieldExpr>),
    /// A reference to a named type. `package` is `None` for unqualified names.
    Named {
        package: Option<String>,
        name: String,
    },
}

/// A field of an inline struct expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldExpr {
    /// `None` for embedded fields.
    pub name: Option<String>,
    pub ty: TypeExpr,
    pub tag: String,
}

/// Syntax error in a type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ExprError {}

/// Parse a complete type expression.
pub fn parse_type(src: &str) -> Result<TypeExpr, ExprError> {
    let mut parser = Parser { src, pos: 0 };
    let expr = parser.parse_type()?;
    parser.skip_ws();
    if parser.pos < src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> ExprError {
        ExprError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ExprError> {
        self.skip_ws();
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{c}`")))
        }
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Skip spaces and tabs but not line breaks.
    fn skip_inline_ws(&mut self) {
        let trimmed = self.rest().trim_start_matches([' ', '\t']);
        self.pos = self.src.len() - trimmed.len();
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '.' | '/' | '-' | '~') {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }

    /// Consume a bracketed group verbatim, brackets included.
    fn balanced(&mut self, open: char, close: char) -> Result<&'a str, ExprError> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(&self.src[start..self.pos]);
                }
            }
        }
        Err(ExprError {
            offset: start,
            message: format!("unclosed `{open}`"),
        })
    }

    fn keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        let Some(after) = rest.strip_prefix(word) else {
            return false;
        };
        let boundary = after
            .chars()
            .next()
            .map_or(true, |c| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '/')));
        if boundary {
            self.pos += word.len();
        }
        boundary
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ExprError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("expected a type")),
            Some('*') => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Some('[') => {
                self.bump();
                self.skip_ws();
                if self.eat(']') {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                let len = self.src[start..self.pos]
                    .parse::<usize>()
                    .map_err(|_| self.error("expected an array length"))?;
                self.expect(']')?;
                Ok(TypeExpr::Array(len, Box::new(self.parse_type()?)))
            }
            Some(_) if self.keyword("map") => {
                self.expect('[')?;
                let key = self.parse_type()?;
                self.expect(']')?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map(Box::new(key), Box::new(value)))
            }
            Some(_) if self.keyword("interface") => {
                self.expect('{')?;
                self.expect('}')?;
                Ok(TypeExpr::Basic(Kind::Interface))
            }
            Some(_) if self.keyword("struct") => {
                self.expect('{')?;
                self.parse_struct_body()
            }
            Some(_) if self.keyword("chan") => {
                self.skip_inline_ws();
                self.eat_str("<-");
                self.parse_type()?;
                Ok(TypeExpr::Basic(Kind::Chan))
            }
            Some('<') if self.eat_str("<-chan") => {
                self.parse_type()?;
                Ok(TypeExpr::Basic(Kind::Chan))
            }
            Some(_) if self.keyword("func") => {
                self.skip_ws();
                if self.peek() != Some('(') {
                    return Err(self.error("expected `(`"));
                }
                self.balanced('(', ')')?;
                self.skip_func_result()?;
                Ok(TypeExpr::Basic(Kind::Func))
            }
            Some(_) => self.parse_name(),
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_func_result(&mut self) -> Result<(), ExprError> {
        self.skip_inline_ws();
        match self.peek() {
            Some('(') => {
                self.balanced('(', ')')?;
            }
            Some(c) if c.is_alphabetic() || c == '_' || c == '*' || c == '[' => {
                self.parse_type()?;
            }
            _ => {}
        }
        Ok(())
    }

    fn parse_name(&mut self) -> Result<TypeExpr, ExprError> {
        let start = self.pos;
        let ident = self.ident();
        if ident.is_empty() {
            return Err(self.error(format!(
                "unexpected `{}`",
                self.peek().map(String::from).unwrap_or_default()
            )));
        }
        let generic = if self.peek() == Some('[') {
            self.balanced('[', ']')?
        } else {
            ""
        };

        if generic.is_empty() {
            if ident == "unsafe.Pointer" {
                return Ok(TypeExpr::Basic(Kind::UnsafePointer));
            }
            if let Some(kind) = Kind::from_basic_name(ident) {
                return Ok(TypeExpr::Basic(kind));
            }
        }

        let (package, name) = match ident.rsplit_once('.') {
            Some((package, name)) => (Some(package.to_string()), name),
            None => (None, ident),
        };
        if name.is_empty() || package.as_deref() == Some("") {
            return Err(ExprError {
                offset: start,
                message: format!("malformed type name `{ident}`"),
            });
        }
        Ok(TypeExpr::Named {
            package,
            name: format!("{name}{generic}"),
        })
    }

    fn parse_struct_body(&mut self) -> Result<TypeExpr, ExprError> {
        let mut fields = Vec::new();
        loop {
            self.skip_separators();
            match self.peek() {
                None => return Err(self.error("unclosed struct")),
                Some('}') => {
                    self.bump();
                    return Ok(TypeExpr::Struct(fields));
                }
                Some(_) => fields.push(self.parse_field()?),
            }
        }
    }

    fn skip_separators(&mut self) {
        loop {
            self.skip_ws();
            if !self.eat(';') {
                break;
            }
        }
    }

    fn parse_field(&mut self) -> Result<FieldExpr, ExprError> {
        let checkpoint = self.pos;
        let is_embedded = if self.peek() == Some('*') {
            true
        } else {
            let ident = self.ident();
            // `Set[string]` embeds a generic type, `Items []string` names a field.
            let generic = self.peek() == Some('[');
            self.skip_inline_ws();
            generic
                || ident.contains(['.', '/'])
                || matches!(self.peek(), None | Some(';' | '}' | '`' | '"' | '\n' | '\r'))
        };

        let name = if is_embedded {
            self.pos = checkpoint;
            None
        } else {
            self.pos = checkpoint;
            let ident = self.ident().to_string();
            if ident.is_empty() {
                return Err(self.error("expected a field name"));
            }
            Some(ident)
        };

        let ty = self.parse_type()?;
        self.skip_inline_ws();
        let tag = match self.peek() {
            Some('`') => self.raw_string()?,
            Some('"') => self.quoted_string()?,
            _ => String::new(),
        };
        Ok(FieldExpr { name, ty, tag })
    }

    fn raw_string(&mut self) -> Result<String, ExprError> {
        let start = self.pos;
        self.bump();
        let body_start = self.pos;
        while let Some(c) = self.bump() {
            if c == '`' {
                return Ok(self.src[body_start..self.pos - 1].to_string());
            }
        }
        Err(ExprError {
            offset: start,
            message: "unterminated raw string".to_string(),
        })
    }

    fn quoted_string(&mut self) -> Result<String, ExprError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '"' => return Ok(out),
                '\\' => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => {
                        return Err(self.error(format!("unknown escape `\\{other}`")));
                    }
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(ExprError {
            offset: start,
            message: "unterminated string".to_string(),
        })
    }
}
