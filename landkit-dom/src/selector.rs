//! CSS selector subset used by the page modules.
//!
//! Supported grammar:
//! - type selectors (`nav`, `*`), `#id`, `.class`
//! - attribute selectors `[attr]`, `[attr=v]`, `[attr^=v]`, `[attr$=v]`,
//!   `[attr*=v]`, `[attr~=v]` with quoted or bare values
//! - descendant (whitespace) and child (`>`) combinators
//! - comma-separated selector lists
//!
//! Pseudo-classes and sibling combinators are rejected with
//! [`DomError::InvalidSelector`].

use crate::{Document, DomError, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Contains(String),
    Includes(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
}

impl AttrMatcher {
    fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(v) => value == v,
            AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
            AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
            AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
            AttrOp::Includes(v) => value.split_whitespace().any(|token| token == v),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag_name(node) else {
            return false;
        };
        if let Some(expected) = &self.tag
            && expected != "*"
            && !expected.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && doc.attr(node, "id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| doc.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|a| a.matches(doc.attr(node, &a.name)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// One compound selector plus its relation to the step on its left.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    combinator: Combinator,
    compound: Compound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    steps: Vec<Step>,
}

impl Complex {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        Self::matches_steps(doc, node, &self.steps)
    }

    fn matches_steps(doc: &Document, node: NodeId, steps: &[Step]) -> bool {
        let Some((last, rest)) = steps.split_last() else {
            return false;
        };
        if !last.compound.matches(doc, node) {
            return false;
        }
        if rest.is_empty() {
            return true;
        }
        match last.combinator {
            Combinator::Child => doc
                .parent_element(node)
                .is_some_and(|parent| Self::matches_steps(doc, parent, rest)),
            Combinator::Descendant => {
                let mut current = doc.parent_element(node);
                while let Some(ancestor) = current {
                    if Self::matches_steps(doc, ancestor, rest) {
                        return true;
                    }
                    current = doc.parent_element(ancestor);
                }
                false
            }
        }
    }
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parse a selector list.
    ///
    /// # Errors
    /// Returns [`DomError::InvalidSelector`] for empty input, unsupported syntax
    /// or unterminated attribute selectors.
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: selector.to_owned(),
            reason: reason.to_owned(),
        };

        let mut selectors = Vec::new();
        for part in split_top_level(selector) {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                return Err(invalid("empty selector in list"));
            }
            selectors.push(parse_complex(trimmed).map_err(|reason| invalid(&reason))?);
        }
        if selectors.is_empty() {
            return Err(invalid("empty selector"));
        }
        Ok(Self { selectors })
    }

    /// Whether `node` matches any selector in the list.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.selectors.iter().any(|s| s.matches(doc, node))
    }
}

/// Split on commas that are not inside brackets or quotes.
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in input.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(input: &str) -> Result<Complex, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut steps = Vec::new();
    let mut pending: Option<Combinator> = None;

    while pos < chars.len() {
        let ch = chars[pos];
        if ch.is_whitespace() {
            if !steps.is_empty() && pending.is_none() {
                pending = Some(Combinator::Descendant);
            }
            pos += 1;
            continue;
        }
        if ch == '>' {
            if steps.is_empty() {
                return Err("selector cannot start with a combinator".to_owned());
            }
            if pending == Some(Combinator::Child) {
                return Err("repeated '>' combinator".to_owned());
            }
            pending = Some(Combinator::Child);
            pos += 1;
            continue;
        }
        if matches!(ch, '+' | '~') {
            return Err(format!("sibling combinator '{ch}' is not supported"));
        }

        let compound = parse_compound(&chars, &mut pos)?;
        let combinator = pending.take().unwrap_or(Combinator::Descendant);
        steps.push(Step {
            combinator,
            compound,
        });
    }

    if pending == Some(Combinator::Child) {
        return Err("selector cannot end with a combinator".to_owned());
    }
    if steps.is_empty() {
        return Err("empty selector".to_owned());
    }
    Ok(Complex { steps })
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn parse_compound(chars: &[char], pos: &mut usize) -> Result<Compound, String> {
    let mut compound = Compound::default();

    if chars[*pos] == '*' {
        compound.tag = Some("*".to_owned());
        *pos += 1;
    } else if is_ident_char(chars[*pos]) {
        compound.tag = Some(read_ident(chars, pos).to_ascii_lowercase());
    }

    while *pos < chars.len() {
        match chars[*pos] {
            '#' => {
                *pos += 1;
                let ident = read_ident(chars, pos);
                if ident.is_empty() {
                    return Err("expected identifier after '#'".to_owned());
                }
                compound.id = Some(ident);
            }
            '.' => {
                *pos += 1;
                let ident = read_ident(chars, pos);
                if ident.is_empty() {
                    return Err("expected class name after '.'".to_owned());
                }
                compound.classes.push(ident);
            }
            '[' => {
                *pos += 1;
                compound.attrs.push(parse_attr(chars, pos)?);
            }
            ':' => return Err("pseudo-classes are not supported".to_owned()),
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => break,
            c => return Err(format!("unexpected character '{c}'")),
        }
    }

    if compound.is_empty() {
        return Err("expected a compound selector".to_owned());
    }
    Ok(compound)
}

fn skip_ws(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn parse_attr(chars: &[char], pos: &mut usize) -> Result<AttrMatcher, String> {
    skip_ws(chars, pos);
    let name = read_ident(chars, pos);
    if name.is_empty() {
        return Err("expected attribute name after '['".to_owned());
    }
    skip_ws(chars, pos);

    let Some(&next) = chars.get(*pos) else {
        return Err("unterminated attribute selector".to_owned());
    };
    if next == ']' {
        *pos += 1;
        return Ok(AttrMatcher {
            name,
            op: AttrOp::Exists,
        });
    }

    let op_prefix = match next {
        '=' => None,
        '^' | '$' | '*' | '~' => {
            *pos += 1;
            if chars.get(*pos) != Some(&'=') {
                return Err(format!("expected '=' after '{next}'"));
            }
            Some(next)
        }
        c => return Err(format!("unexpected character '{c}' in attribute selector")),
    };
    *pos += 1;
    skip_ws(chars, pos);

    let value = match chars.get(*pos) {
        Some(&q) if q == '"' || q == '\'' => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != q {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return Err("unterminated quoted value".to_owned());
            }
            let value: String = chars[start..*pos].iter().collect();
            *pos += 1;
            value
        }
        Some(_) => read_ident(chars, pos),
        None => return Err("unterminated attribute selector".to_owned()),
    };
    skip_ws(chars, pos);
    if chars.get(*pos) != Some(&']') {
        return Err("unterminated attribute selector".to_owned());
    }
    *pos += 1;

    let op = match op_prefix {
        None => AttrOp::Equals(value),
        Some('^') => AttrOp::Prefix(value),
        Some('$') => AttrOp::Suffix(value),
        Some('*') => AttrOp::Contains(value),
        Some(_) => AttrOp::Includes(value),
    };
    Ok(AttrMatcher { name, op })
}
