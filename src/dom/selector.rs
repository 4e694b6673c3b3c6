//! A small CSS selector engine for matching against DOM snapshots.
//!
//! Supports type, universal, `#id`, `.class` and attribute selectors
//! (`[a]`, `[a=v]`, `[a*=v]`, `[a^=v]`, `[a$=v]`, `[a~=v]`), descendant and
//! child combinators, and comma-separated selector lists. Pseudo-classes are
//! rejected at parse time.

use crate::dom::element::ElementNode;
use crate::error::{CustomizerError, Result};
use std::fmt;

/// A parsed selector list (`a, b, c`)
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<ComplexSelector>,
}

#[derive(Debug, Clone, PartialEq)]
struct ComplexSelector {
    /// Compounds left to right; `combinator` on each compound links it to the previous one
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
struct Part {
    combinator: Combinator,
    compound: Compound,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

#[derive(Debug, Clone, PartialEq)]
struct AttributeMatch {
    name: String,
    op: AttributeOp,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AttributeOp {
    Exists,
    Equals,
    Contains,
    Prefix,
    Suffix,
    Word,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> Result<Self> {
        let mut alternatives = Vec::new();
        for alternative in source.split(',') {
            alternatives.push(parse_complex(source, alternative.trim())?);
        }

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The selector text this was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `node` matches, given its ancestors ordered root first
    pub fn matches(&self, ancestors: &[&ElementNode], node: &ElementNode) -> bool {
        let mut chain: Vec<&ElementNode> = ancestors.to_vec();
        chain.push(node);
        self.alternatives
            .iter()
            .any(|complex| matches_chain(&complex.parts, complex.parts.len() - 1, &chain))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn matches_chain(parts: &[Part], index: usize, chain: &[&ElementNode]) -> bool {
    let Some((node, rest)) = chain.split_last() else {
        return false;
    };

    if !parts[index].compound.matches(node) {
        return false;
    }

    if index == 0 {
        return true;
    }

    match parts[index].combinator {
        Combinator::Child => matches_chain(parts, index - 1, rest),
        Combinator::Descendant => (1..=rest.len())
            .rev()
            .any(|end| matches_chain(parts, index - 1, &rest[..end])),
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty()
    }

    fn matches(&self, node: &ElementNode) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && !node.is_tag(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if node.id() != Some(id) {
                return false;
            }
        }

        if !self.classes.iter().all(|class| node.has_class(class)) {
            return false;
        }

        self.attributes.iter().all(|attr| attr.matches(node))
    }
}

impl AttributeMatch {
    fn matches(&self, node: &ElementNode) -> bool {
        let Some(actual) = node.get_attribute(&self.name) else {
            return false;
        };

        match self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals => actual == &self.value,
            AttributeOp::Contains => !self.value.is_empty() && actual.contains(&self.value),
            AttributeOp::Prefix => !self.value.is_empty() && actual.starts_with(&self.value),
            AttributeOp::Suffix => !self.value.is_empty() && actual.ends_with(&self.value),
            AttributeOp::Word => actual.split_whitespace().any(|w| w == self.value),
        }
    }
}

fn invalid(selector: &str, reason: impl Into<String>) -> CustomizerError {
    CustomizerError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_complex(full: &str, text: &str) -> Result<ComplexSelector> {
    if text.is_empty() {
        return Err(invalid(full, "empty selector"));
    }

    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    let mut parts = Vec::new();
    let mut current = Compound::default();
    let mut pending = Combinator::Descendant;

    let read_ident = |pos: &mut usize| -> String {
        let start = *pos;
        while *pos < chars.len() && is_ident_char(chars[*pos]) {
            *pos += 1;
        }
        chars[start..*pos].iter().collect()
    };

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            ' ' | '\t' | '\n' | '>' => {
                let mut combinator = Combinator::Descendant;
                while pos < chars.len() && (chars[pos].is_whitespace() || chars[pos] == '>') {
                    if chars[pos] == '>' {
                        combinator = Combinator::Child;
                    }
                    pos += 1;
                }
                if current.is_empty() {
                    return Err(invalid(full, "combinator without a preceding compound"));
                }
                if pos >= chars.len() {
                    return Err(invalid(full, "dangling combinator"));
                }
                parts.push(Part {
                    combinator: pending,
                    compound: std::mem::take(&mut current),
                });
                pending = combinator;
            }
            '.' => {
                pos += 1;
                let class = read_ident(&mut pos);
                if class.is_empty() {
                    return Err(invalid(full, "empty class name"));
                }
                current.classes.push(class);
            }
            '#' => {
                pos += 1;
                let id = read_ident(&mut pos);
                if id.is_empty() {
                    return Err(invalid(full, "empty id"));
                }
                current.id = Some(id);
            }
            '*' => {
                pos += 1;
                current.tag = Some("*".to_string());
            }
            '[' => {
                let close = chars[pos..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or_else(|| invalid(full, "unterminated attribute selector"))?;
                let body: String = chars[pos + 1..pos + close].iter().collect();
                current.attributes.push(parse_attribute(full, &body)?);
                pos += close + 1;
            }
            ':' => return Err(invalid(full, "pseudo-classes are not supported")),
            c if is_ident_char(c) => {
                if current.tag.is_some() || !current.is_empty() {
                    return Err(invalid(full, "type selector must come first in a compound"));
                }
                current.tag = Some(read_ident(&mut pos).to_ascii_lowercase());
            }
            other => return Err(invalid(full, format!("unexpected character '{}'", other))),
        }
    }

    if current.is_empty() {
        return Err(invalid(full, "selector ends without a compound"));
    }
    parts.push(Part {
        combinator: pending,
        compound: current,
    });

    Ok(ComplexSelector { parts })
}

fn parse_attribute(full: &str, body: &str) -> Result<AttributeMatch> {
    let body = body.trim();
    let operators = [
        ("*=", AttributeOp::Contains),
        ("^=", AttributeOp::Prefix),
        ("$=", AttributeOp::Suffix),
        ("~=", AttributeOp::Word),
        ("=", AttributeOp::Equals),
    ];

    for (token, op) in operators {
        if let Some(idx) = body.find(token) {
            let name = body[..idx].trim();
            let raw = body[idx + token.len()..].trim();
            if name.is_empty() {
                return Err(invalid(full, "attribute selector without a name"));
            }
            let value = raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(raw);
            return Ok(AttributeMatch {
                name: name.to_string(),
                op,
                value: value.to_string(),
            });
        }
    }

    if body.is_empty() || !body.chars().all(is_ident_char) {
        return Err(invalid(full, format!("bad attribute name '{}'", body)));
    }

    Ok(AttributeMatch {
        name: body.to_string(),
        op: AttributeOp::Exists,
        value: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn div(class: &str) -> ElementNode {
        ElementNode::new("div").with_attribute("class", class)
    }

    #[test]
    fn test_class_selector() {
        let selector = Selector::parse(".profile-background-image").unwrap();
        assert!(selector.matches(&[], &div("profile-background-image")));
        assert!(!selector.matches(&[], &div("profile-background-image--default")));
    }

    #[test]
    fn test_compound_selector() {
        let selector = Selector::parse("h1.text-heading-xlarge").unwrap();
        let h1 = ElementNode::new("h1").with_attribute("class", "text-heading-xlarge inline");
        assert!(selector.matches(&[], &h1));
        assert!(!selector.matches(&[], &div("text-heading-xlarge")));

        let multi = Selector::parse(".artdeco-card.ember-view.pv-top-card").unwrap();
        assert!(multi.matches(&[], &div("pv-top-card artdeco-card ember-view")));
        assert!(!multi.matches(&[], &div("artdeco-card ember-view")));
    }

    #[test]
    fn test_id_selector() {
        let selector = Selector::parse("#profile-customizer-banner").unwrap();
        let node = ElementNode::new("div").with_attribute("id", "profile-customizer-banner");
        assert!(selector.matches(&[], &node));
    }

    #[test]
    fn test_attribute_selectors() {
        let node = ElementNode::new("div").with_attribute("data-test-id", "profile-cover-photo");

        assert!(Selector::parse("[data-test-id]").unwrap().matches(&[], &node));
        assert!(Selector::parse("[data-test-id*=\"cover\"]").unwrap().matches(&[], &node));
        assert!(Selector::parse("[data-test-id^='profile']").unwrap().matches(&[], &node));
        assert!(Selector::parse("[data-test-id$=photo]").unwrap().matches(&[], &node));
        assert!(!Selector::parse("[data-test-id=cover]").unwrap().matches(&[], &node));
        assert!(!Selector::parse("[class*=banner]").unwrap().matches(&[], &node));
    }

    #[test]
    fn test_descendant_and_child_combinators() {
        let panel = div("pv-text-details__left-panel");
        let wrapper = div("wrapper");
        let text = div("text-body-medium");

        let descendant = Selector::parse(".pv-text-details__left-panel .text-body-medium").unwrap();
        assert!(descendant.matches(&[&panel, &wrapper], &text));
        assert!(!descendant.matches(&[&wrapper], &text));

        let child = Selector::parse(".pv-text-details__left-panel > .text-body-medium").unwrap();
        assert!(child.matches(&[&panel], &text));
        assert!(!child.matches(&[&panel, &wrapper], &text));
    }

    #[test]
    fn test_selector_list() {
        let selector = Selector::parse("[class*=\"banner\"], [class*=\"cover\"]").unwrap();
        assert!(selector.matches(&[], &div("top-cover-image")));
        assert!(selector.matches(&[], &div("banner")));
        assert!(!selector.matches(&[], &div("header")));
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("div:first-child").is_err());
        assert!(Selector::parse("div >").is_err());
        assert!(Selector::parse("[unterminated").is_err());
        assert!(Selector::parse(".").is_err());
    }
}
