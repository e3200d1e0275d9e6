//! JSONPath evaluation for wait conditions
//!
//! Supports the subset used by `kubectl wait --for=jsonpath=...`:
//! - optional `{...}` template braces and leading `$`
//! - dotted fields: `.status.phase`
//! - list indices, negative from the end: `.spec.ports[0]`, `[-1]`
//! - quoted keys for names with dots: `.metadata.labels['app.kubernetes.io/name']`
//! - wildcards: `[*]`, `.*`
//! - equality filters: `.status.conditions[?(@.type=="Ready")].status`
//!
//! Recursive descent (`..`) and slices are rejected at parse time.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ProviderError, Result};

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Field(String),
    Index(i64),
    Wildcard,
    Filter(Filter),
}

#[derive(Debug, Clone, PartialEq)]
struct Filter {
    path: Vec<String>,
    negate: bool,
    literal: Value,
}

impl Filter {
    fn matches(&self, item: &Value) -> bool {
        let mut current = Some(item);
        for key in &self.path {
            current = current.and_then(|v| v.get(key.as_str()));
        }
        let equal = match current {
            Some(value) => value == &self.literal || render(value) == render(&self.literal),
            None => false,
        };
        equal != self.negate
    }
}

/// A parsed JSONPath expression
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    expression: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Parse an expression
    pub fn parse(expression: &str) -> Result<Self> {
        let error = |message: &str| ProviderError::InvalidJsonPath {
            expression: expression.to_string(),
            message: message.to_string(),
        };

        let mut body = expression.trim();
        match (body.starts_with('{'), body.ends_with('}')) {
            (true, true) => body = body[1..body.len() - 1].trim(),
            (true, false) => return Err(error("unterminated '{'")),
            (false, true) => return Err(error("unexpected '}'")),
            (false, false) => {}
        }
        if let Some(rest) = body.strip_prefix('$') {
            body = rest;
        }
        if body.is_empty() {
            return Err(error("expression is empty"));
        }

        let chars: Vec<char> = body.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    i += 1;
                    match chars.get(i) {
                        Some('.') => return Err(error("recursive descent is not supported")),
                        Some('*') => {
                            segments.push(Segment::Wildcard);
                            i += 1;
                        }
                        _ => {
                            let (name, next) = read_identifier(&chars, i);
                            if name.is_empty() {
                                return Err(error("empty field name"));
                            }
                            segments.push(Segment::Field(name));
                            i = next;
                        }
                    }
                }
                '[' => {
                    let end = find_closing_bracket(&chars, i)
                        .ok_or_else(|| error("unterminated '['"))?;
                    let content: String = chars[i + 1..end].iter().collect();
                    segments.push(parse_bracket(content.trim()).map_err(|m| error(&m))?);
                    i = end + 1;
                }
                c if i == 0 && is_identifier_char(c) => {
                    // `status.phase` without the leading dot
                    let (name, next) = read_identifier(&chars, i);
                    segments.push(Segment::Field(name));
                    i = next;
                }
                c => return Err(error(&format!("unexpected character '{}'", c))),
            }
        }

        Ok(Self {
            expression: expression.to_string(),
            segments,
        })
    }

    /// Evaluate against a document, returning every match in document order
    pub fn query<'a>(&self, root: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![root];

        for segment in &self.segments {
            let mut next = Vec::new();
            for value in current {
                match segment {
                    Segment::Field(name) => {
                        if let Some(child) = value.get(name.as_str()) {
                            next.push(child);
                        }
                    }
                    Segment::Index(index) => {
                        if let Some(items) = value.as_array() {
                            let len = items.len() as i64;
                            let resolved = if *index < 0 { len + index } else { *index };
                            if (0..len).contains(&resolved) {
                                next.push(&items[resolved as usize]);
                            }
                        }
                    }
                    Segment::Wildcard => match value {
                        Value::Array(items) => next.extend(items.iter()),
                        Value::Object(map) => next.extend(map.values()),
                        _ => {}
                    },
                    Segment::Filter(filter) => {
                        if let Some(items) = value.as_array() {
                            next.extend(items.iter().filter(|item| filter.matches(item)));
                        }
                    }
                }
            }
            current = next;
        }

        current
    }

    /// True when the first match renders to `expected`
    pub fn matches(&self, root: &Value, expected: &str) -> bool {
        self.query(root)
            .first()
            .is_some_and(|value| render(value) == expected)
    }
}

impl FromStr for JsonPath {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Render a value the way `kubectl get -o jsonpath` prints it
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '.' | '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '"')
}

fn read_identifier(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && is_identifier_char(chars[end]) {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn find_closing_bracket(chars: &[char], open: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut depth = 0usize;

    for (offset, &c) in chars[open + 1..].iter().enumerate() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ']') if depth == 0 => return Some(open + 1 + offset),
            _ => {}
        }
    }
    None
}

fn parse_bracket(content: &str) -> std::result::Result<Segment, String> {
    if content == "*" {
        return Ok(Segment::Wildcard);
    }
    if let Some(key) = unquote(content) {
        return Ok(Segment::Field(key.to_string()));
    }
    if let Some(inner) = content
        .strip_prefix("?(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_filter(inner.trim()).map(Segment::Filter);
    }
    if content.contains(':') {
        return Err("slices are not supported".to_string());
    }
    content
        .parse::<i64>()
        .map(Segment::Index)
        .map_err(|_| format!("invalid index '{}'", content))
}

fn parse_filter(inner: &str) -> std::result::Result<Filter, String> {
    let (left, right, negate) = if let Some((l, r)) = inner.split_once("==") {
        (l, r, false)
    } else if let Some((l, r)) = inner.split_once("!=") {
        (l, r, true)
    } else {
        return Err(format!("unsupported filter '{}', expected == or !=", inner));
    };

    let path = left
        .trim()
        .strip_prefix('@')
        .ok_or_else(|| format!("filter must start with '@', got '{}'", left.trim()))?;
    let path: Vec<String> = path
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let right = right.trim();
    let literal = match unquote(right) {
        Some(s) => Value::String(s.to_string()),
        None => serde_json::from_str(right)
            .map_err(|_| format!("invalid filter literal '{}'", right))?,
    };

    Ok(Filter {
        path,
        negate,
        literal,
    })
}

fn unquote(s: &str) -> Option<&str> {
    if s.len() >= 2
        && ((s.starts_with('\'') && s.ends_with('\'')) || (s.starts_with('"') && s.ends_with('"')))
    {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}
