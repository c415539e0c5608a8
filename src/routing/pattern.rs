//! Route template compilation.
//!
//! # Responsibilities
//! - Split a template into segments
//! - Normalize literals (trimmed, lower-cased)
//! - Replace `{name}` segments by a single placeholder and record bindings
//!
//! # Design Decisions
//! - Pure: the same template always compiles to the same pattern
//! - A leading and a trailing slash are ignored; empty interior segments
//!   are rejected
//! - Variable names are normalized like literals

use std::fmt;

use super::error::RouteError;

/// Placeholder token standing for a variable segment in canonical patterns.
pub const PLACEHOLDER: &str = "{v}";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Literal(String),
    Variable,
}

impl Segment {
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Literal(literal) => literal,
            Segment::Variable => PLACEHOLDER,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }
}

/// Where a variable sits in the pattern and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableBinding {
    /// Zero-based segment index.
    pub position: usize,
    pub name: String,
}

/// A compiled route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    canonical: String,
    segments: Vec<Segment>,
    bindings: Vec<VariableBinding>,
}

impl CompiledPattern {
    /// Canonical form, e.g. `/items/{v}/parts`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn bindings(&self) -> &[VariableBinding] {
        &self.bindings
    }

    /// Variable names in segment order.
    pub fn variable_names(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.name.clone()).collect()
    }

    pub fn literal_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_literal()).count()
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Splits a path on `/`, dropping one leading and one trailing empty part.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split('/').collect();
    if parts.first() == Some(&"") {
        parts.remove(0);
    }
    if parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

/// Compiles a route template such as `/items/{id}/parts`.
pub fn compile(template: &str) -> Result<CompiledPattern, RouteError> {
    if template.is_empty() {
        return Err(RouteError::EmptyRoute);
    }

    let mut segments = Vec::new();
    let mut bindings: Vec<VariableBinding> = Vec::new();

    for (position, raw) in split_path(template).into_iter().enumerate() {
        let part = raw.trim().to_lowercase();

        if !part.contains('{') {
            if part.is_empty() {
                return Err(RouteError::EmptySegment {
                    template: template.to_string(),
                });
            }
            segments.push(Segment::Literal(part));
            continue;
        }

        let name = variable_name(template, &part)?;
        if bindings.iter().any(|b| b.name == name) {
            return Err(RouteError::DuplicateVariableName {
                template: template.to_string(),
                name,
            });
        }
        bindings.push(VariableBinding { position, name });
        segments.push(Segment::Variable);
    }

    let canonical = format!(
        "/{}",
        segments
            .iter()
            .map(Segment::as_str)
            .collect::<Vec<_>>()
            .join("/")
    );

    Ok(CompiledPattern {
        canonical,
        segments,
        bindings,
    })
}

fn variable_name(template: &str, part: &str) -> Result<String, RouteError> {
    if part == "{}" {
        return Err(RouteError::MissingVariableName {
            template: template.to_string(),
        });
    }
    if !part.contains('}') {
        return Err(RouteError::UnterminatedVariable {
            template: template.to_string(),
            segment: part.to_string(),
        });
    }

    let name = part
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.contains(['{', '}']))
        .ok_or_else(|| RouteError::MalformedVariable {
            template: template.to_string(),
            segment: part.to_string(),
        })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(RouteError::MissingVariableName {
            template: template.to_string(),
        });
    }
    Ok(name.to_string())
}
