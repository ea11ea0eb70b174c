//! Legacy declaration extraction.
//!
//! Finds every `DECLARE_CLASS(Class, Parent)` in raw header text. The text
//! is never parsed: a whitespace-tolerant pattern is enough because both
//! arguments must be plain identifiers. Anything else (qualified names,
//! template arguments, a leading digit) simply does not match and is left
//! alone.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ReflmigResult;
use crate::rules::RewriteRules;

/// Identifier grammar shared by every pattern in the engine.
pub(crate) const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";

/// One legacy declaration: the class and the parent it names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationInfo {
    pub class_name: String,
    pub parent_class: String,
}

impl DeclarationInfo {
    pub fn new(class_name: impl Into<String>, parent_class: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            parent_class: parent_class.into(),
        }
    }
}

impl fmt::Display for DeclarationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.class_name, self.parent_class)
    }
}

/// Compile the pattern matching any two-argument legacy declaration.
///
/// Capture 1 is the class, capture 2 the parent.
pub(crate) fn declaration_pattern(rules: &RewriteRules) -> ReflmigResult<Regex> {
    let pattern = format!(
        r"\b{}\s*\(\s*({IDENT})\s*,\s*({IDENT})\s*\)",
        regex::escape(&rules.legacy)
    );
    Ok(Regex::new(&pattern)?)
}

/// Run a compiled declaration pattern over `text`, in first-occurrence order.
pub(crate) fn extract_with(pattern: &Regex, text: &str) -> Vec<DeclarationInfo> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let class_name = caps.get(1)?.as_str();
            let parent_class = caps.get(2)?.as_str();
            Some(DeclarationInfo::new(class_name, parent_class))
        })
        .collect()
}

/// Extract every legacy declaration in `text`.
///
/// Duplicated declarations are reported once per occurrence.
pub fn extract_declarations(
    text: &str,
    rules: &RewriteRules,
) -> ReflmigResult<Vec<DeclarationInfo>> {
    let pattern = declaration_pattern(rules)?;
    Ok(extract_with(&pattern, text))
}
