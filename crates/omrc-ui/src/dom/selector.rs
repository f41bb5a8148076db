// File: omrc-ui/src/dom/selector.rs
// Purpose: Parse and match the CSS selector subset the site uses

//! Supported grammar:
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (combinator compound)*
//! combinator:= whitespace | ">"
//! compound  := (tag | "*")? ("#" ident | "." ident | attr)*
//! attr      := "[" ident (("=" | "^=") value)? "]"
//! value     := ident | '"' ... '"' | "'" ... "'"
//! ```
//!
//! That covers `.nav-menu a`, `a[href^="#"]`, `input[name="financing"]`,
//! `[required]` and comma lists such as `input, select, textarea`.

use crate::error::{DomError, Result};

/// Read-only view of an element used for matching
pub trait Matchable: Sized {
    fn tag_name(&self) -> String;
    fn attr(&self, name: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn parent_element(&self) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttrSelector {
    pub name: String,
    pub op: AttrOp,
}

/// Simple selectors that must all hold for one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<AttrSelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// Compounds joined by combinators, stored left to right. The combinator
/// attached to a part relates it to the part before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    pub parts: Vec<(Combinator, Compound)>,
}

/// A parsed comma-separated selector list
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<Complex>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        let mut parser = Parser::new(input);
        let mut selectors = vec![parser.complex()?];
        loop {
            parser.skip_ws();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                    selectors.push(parser.complex()?);
                }
                Some(c) => return Err(parser.error(format!("unexpected `{}`", c))),
            }
        }
        Ok(Self { selectors })
    }

    pub fn matches<E: Matchable>(&self, element: &E) -> bool {
        self.selectors.iter().any(|complex| complex.matches(element))
    }
}

impl Complex {
    pub fn matches<E: Matchable>(&self, element: &E) -> bool {
        match self.parts.len() {
            0 => false,
            n => matches_from(&self.parts, n - 1, element),
        }
    }
}

fn matches_from<E: Matchable>(parts: &[(Combinator, Compound)], index: usize, element: &E) -> bool {
    let (combinator, compound) = &parts[index];
    if !compound.matches(element) {
        return false;
    }
    if index == 0 {
        return true;
    }

    match combinator {
        Combinator::Child => element
            .parent_element()
            .map(|parent| matches_from(parts, index - 1, &parent))
            .unwrap_or(false),
        Combinator::Descendant => {
            let mut ancestor = element.parent_element();
            while let Some(current) = ancestor {
                if matches_from(parts, index - 1, &current) {
                    return true;
                }
                ancestor = current.parent_element();
            }
            false
        }
    }
}

impl Compound {
    pub fn matches<E: Matchable>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if !element.tag_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attr("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attrs.iter().all(|attr| {
            let value = element.attr(&attr.name);
            match (&attr.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(actual)) => actual == *expected,
                (AttrOp::Prefix(prefix), Some(actual)) => {
                    !prefix.is_empty() && actual.starts_with(prefix.as_str())
                }
            }
        })
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
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

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().map_or(false, char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn error(&self, reason: impl Into<String>) -> DomError {
        DomError::selector(self.source, reason)
    }

    fn complex(&mut self) -> Result<Complex> {
        self.skip_ws();
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected `{}`", c))),
            };
            parts.push((combinator, self.compound()?));
        }

        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();

        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.bump();
                universal = true;
            }
            Some(c) if is_ident_char(c) => compound.tag = Some(self.ident()?),
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    compound.id = Some(self.ident()?);
                }
                Some('.') => {
                    self.bump();
                    compound.classes.push(self.ident()?);
                }
                Some('[') => {
                    self.bump();
                    compound.attrs.push(self.attr()?);
                }
                _ => break,
            }
            universal = false;
        }

        if compound.is_empty() && !universal {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected a selector, found `{}`", c)),
                None => self.error("expected a selector"),
            });
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String> {
        let start = self.pos;
        while self.peek().map_or(false, is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attr(&mut self) -> Result<AttrSelector> {
        self.skip_ws();
        let name = self.ident()?;
        self.skip_ws();

        let op = match self.bump() {
            Some(']') => return Ok(AttrSelector { name, op: AttrOp::Exists }),
            Some('=') => AttrOp::Equals(self.attr_value()?),
            Some('^') if self.peek() == Some('=') => {
                self.bump();
                AttrOp::Prefix(self.attr_value()?)
            }
            Some(c) => return Err(self.error(format!("unsupported attribute operator at `{}`", c))),
            None => return Err(self.error("unterminated attribute selector")),
        };

        self.skip_ws();
        match self.bump() {
            Some(']') => Ok(AttrSelector { name, op }),
            _ => Err(self.error("expected `]`")),
        }
    }

    fn attr_value(&mut self) -> Result<String> {
        self.skip_ws();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.bump() {
                    if c == quote {
                        return Ok(self.chars[start..self.pos - 1].iter().collect());
                    }
                }
                Err(self.error("unterminated string"))
            }
            _ => self.ident(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
