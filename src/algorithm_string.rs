//! Parser and AST for the algorithm-string configuration grammar (spec
//! §6):
//!
//! ```text
//! Value ::= IDENT ['(' [Arg (',' Arg)*] ')'] | '"' STRING '"'
//! Arg   ::= [IDENT [':' ['static'] IDENT] '='] Value
//! ```
//!
//! Grounded on `tudocomp_driver/AlgorithmStringParser2.hpp`'s `ast::Value`
//! / `ast::Arg` pair and its recursive-descent parser, but resolved
//! entirely dynamically: the static/dynamic distinction in the type
//! annotation (`[':' ['static'] IDENT]`) is accepted by the grammar for
//! compatibility but carries no meaning here — see spec §9, "a rewrite
//! may resolve everything dynamically via a registry keyed by
//! `(type, name)`".

use crate::Error;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Invocation { name: String, args: Vec<Arg> },
    Str(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub value: Value,
}

impl Value {
    pub fn is_invocation(&self) -> bool {
        matches!(self, Value::Invocation { .. })
    }

    pub fn invocation_name(&self) -> Option<&str> {
        match self {
            Value::Invocation { name, .. } => Some(name),
            Value::Str(_) => None,
        }
    }

    pub fn invocation_args(&self) -> &[Arg] {
        match self {
            Value::Invocation { args, .. } => args,
            Value::Str(_) => &[],
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Invocation { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Arg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}")?;
            if let Some(ty) = &self.type_name {
                write!(f, ": {ty}")?;
            }
            write!(f, " = ")?;
        }
        write!(f, "{}", self.value)
    }
}

/// Parses a complete algorithm string, rejecting trailing garbage.
pub fn parse(input: &str) -> Result<Value, Error> {
    let mut p = Parser::new(input);
    let v = p.parse_value()?;
    p.skip_ws();
    if p.pos != p.chars.len() {
        return Err(p.error("trailing characters after algorithm string"));
    }
    Ok(v)
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { chars: src.chars().collect(), pos: 0, src }
    }

    fn error(&self, reason: &str) -> Error {
        Error::Configuration {
            reason: format!("algorithm string {:?}: at position {}: {reason}", self.src, self.pos),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn expect(&mut self, c: char) -> Result<(), Error> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{c}'")))
        }
    }

    fn parse_ident(&mut self) -> Result<String, Error> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.bump();
            }
            _ => return Err(self.error("expected identifier")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Numeric literals (e.g. `5`) aren't IDENTs by the grammar's own
    /// definition, but every primitive parameter in spec §6 (threshold,
    /// flatten) is written as one; extend token recognition to accept a
    /// bare run of digits as a name too, so `threshold = 5` parses the
    /// way every example in spec §6/§8 needs it to.
    fn parse_ident_or_number(&mut self) -> Result<String, Error> {
        self.skip_ws();
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            return Ok(self.chars[start..self.pos].iter().collect());
        }
        self.parse_ident()
    }

    fn parse_value(&mut self) -> Result<Value, Error> {
        self.skip_ws();
        if self.peek() == Some('"') {
            self.bump();
            let start = self.pos;
            while self.peek().is_some_and(|c| c != '"') {
                self.bump();
            }
            if self.peek() != Some('"') {
                return Err(self.error("unterminated string literal"));
            }
            let s: String = self.chars[start..self.pos].iter().collect();
            self.bump();
            return Ok(Value::Str(s));
        }

        let name = self.parse_ident_or_number()?;
        self.skip_ws();
        let mut args = Vec::new();
        if self.peek() == Some('(') {
            self.bump();
            self.skip_ws();
            if self.peek() != Some(')') {
                loop {
                    args.push(self.parse_arg()?);
                    self.skip_ws();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                        }
                        Some(')') => break,
                        _ => return Err(self.error("expected ',' or ')'")),
                    }
                }
            }
            self.expect(')')?;
        }
        Ok(Value::Invocation { name, args })
    }

    /// An argument starts with `IDENT [':' ['static'] IDENT] '='`
    /// lookahead; on failure to match that prefix, backtrack and parse
    /// a bare positional value instead.
    fn parse_arg(&mut self) -> Result<Arg, Error> {
        let checkpoint = self.pos;
        if let Ok(name) = self.parse_ident() {
            self.skip_ws();
            let mut type_name = None;
            if self.peek() == Some(':') {
                self.bump();
                self.skip_ws();
                if self.matches_keyword("static") {
                    self.pos += "static".chars().count();
                    self.skip_ws();
                }
                type_name = Some(self.parse_ident()?);
                self.skip_ws();
            }
            if self.peek() == Some('=') {
                self.bump();
                let value = self.parse_value()?;
                return Ok(Arg { name: Some(name), type_name, value });
            }
        }
        self.pos = checkpoint;
        let value = self.parse_value()?;
        Ok(Arg { name: None, type_name: None, value })
    }

    fn matches_keyword(&self, kw: &str) -> bool {
        let kw_chars: Vec<char> = kw.chars().collect();
        if self.pos + kw_chars.len() > self.chars.len() {
            return false;
        }
        if self.chars[self.pos..self.pos + kw_chars.len()] != kw_chars[..] {
            return false;
        }
        // must not be a prefix of a longer identifier
        matches!(
            self.chars.get(self.pos + kw_chars.len()),
            None | Some(' ') | Some('\t') | Some('\n') | Some('=') | Some(':')
        )
    }
}
