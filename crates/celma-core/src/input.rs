// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Input File Options
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reader for the solver input file (`BOUT.inp`) and a small evaluator
//! for the numeric expressions it may contain.
//!
//! Format:
//! ```text
//! # comment
//! nout = 100          # global section
//! [geom]
//! offset = 2*pi/10
//! ```
//! Section and key lookups are case-insensitive. Keys before the first
//! header belong to the global section `""`.

use celma_types::error::{CelmaError, CelmaResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputOptions {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl InputOptions {
    pub fn parse(text: &str) -> CelmaResult<Self> {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current = String::new();

        for (lineno, raw) in text.lines().enumerate() {
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| {
                    CelmaError::ConfigError(format!(
                        "input line {}: unterminated section header '{line}'",
                        lineno + 1
                    ))
                })?;
                current = name.trim().to_lowercase();
                sections.entry(current.clone()).or_default();
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                CelmaError::ConfigError(format!(
                    "input line {}: expected 'key = value', got '{line}'",
                    lineno + 1
                ))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CelmaError::ConfigError(format!(
                    "input line {}: empty key",
                    lineno + 1
                )));
            }
            sections
                .entry(current.clone())
                .or_default()
                .insert(key.to_lowercase(), value.trim().to_string());
        }

        Ok(InputOptions { sections })
    }

    pub fn from_file(path: &str) -> CelmaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Raw option string, `None` when the section or key is absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())
            .and_then(|s| s.get(&key.to_lowercase()))
            .map(String::as_str)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.sections
            .entry(section.to_lowercase())
            .or_default()
            .insert(key.to_lowercase(), value.to_string());
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Evaluate a numeric expression such as `2*pi/10` or `1.5e-2 + 3^2`.
///
/// Grammar: `+ - * /`, `^` or `**` (right-associative), unary minus,
/// parentheses, the constant `pi`, and `sqrt sin cos exp log abs`.
pub fn evaluate_expression(text: &str) -> CelmaResult<f64> {
    let tokens = tokenize(text)?;
    let mut parser = Parser { tokens, pos: 0 };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(CelmaError::Expression(format!(
            "trailing input in '{text}'"
        )));
    }
    if !value.is_finite() {
        return Err(CelmaError::Expression(format!(
            "'{text}' evaluates to {value}"
        )));
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

fn tokenize(text: &str) -> CelmaResult<Vec<Token>> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Exponent part: e.g. 1.5e-3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|e| {
                    CelmaError::Expression(format!("bad number '{literal}': {e}"))
                })?;
                tokens.push(Token::Num(value));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => {
                return Err(CelmaError::Expression(format!(
                    "unexpected character '{c}' in '{text}'"
                )))
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expr(&mut self) -> CelmaResult<f64> {
        let mut value = self.term()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> CelmaResult<f64> {
        let mut value = self.unary()?;
        while let Some(tok) = self.peek() {
            match tok {
                Token::Star => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> CelmaResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> CelmaResult<f64> {
        let base = self.atom()?;
        if let Some(Token::Caret) = self.peek() {
            self.pos += 1;
            // Right-associative, binds tighter than unary minus on the left
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> CelmaResult<f64> {
        match self.next() {
            Some(Token::Num(v)) => Ok(v),
            Some(Token::LParen) => {
                let v = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(v),
                    _ => Err(CelmaError::Expression("missing ')'".into())),
                }
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    let arg = self.expr()?;
                    if self.next() != Some(Token::RParen) {
                        return Err(CelmaError::Expression(format!(
                            "missing ')' after {name}("
                        )));
                    }
                    apply_function(&name, arg)
                } else {
                    match name.to_lowercase().as_str() {
                        "pi" => Ok(std::f64::consts::PI),
                        _ => Err(CelmaError::Expression(format!(
                            "unknown symbol '{name}'"
                        ))),
                    }
                }
            }
            Some(tok) => Err(CelmaError::Expression(format!(
                "unexpected token {tok:?}"
            ))),
            None => Err(CelmaError::Expression("unexpected end of input".into())),
        }
    }
}

fn apply_function(name: &str, arg: f64) -> CelmaResult<f64> {
    match name {
        "sqrt" => Ok(arg.sqrt()),
        "sin" => Ok(arg.sin()),
        "cos" => Ok(arg.cos()),
        "exp" => Ok(arg.exp()),
        "log" => Ok(arg.ln()),
        "abs" => Ok(arg.abs()),
        _ => Err(CelmaError::Expression(format!(
            "unknown function '{name}'"
        ))),
    }
}
