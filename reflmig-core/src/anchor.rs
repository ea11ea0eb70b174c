//! Class-definition anchor location.
//!
//! The anchor is the start of `class Name [final] : public Parent`. It is a
//! structural landmark, not a declaration parser: single public inheritance
//! is assumed and anything else (export macros between `class` and the
//! name, `virtual` bases) is reported as "not found" so the caller can
//! skip the edit instead of guessing.

use regex::Regex;

use crate::error::ReflmigResult;
use crate::extract::IDENT;

/// Compiled anchor pattern for one class name.
///
/// Built once per declaration and re-run after every mutation, so offsets
/// are never cached across edits.
#[derive(Debug, Clone)]
pub struct ClassAnchor {
    pattern: Regex,
}

impl ClassAnchor {
    pub fn for_class(class_name: &str) -> ReflmigResult<Self> {
        let pattern = format!(
            r"\bclass\s+{}(?:\s+final)?\s*:\s*public\s+{IDENT}",
            regex::escape(class_name)
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Byte offset where the first matching class header starts.
    pub fn find(&self, text: &str) -> Option<usize> {
        self.pattern.find(text).map(|m| m.start())
    }
}

/// One-shot helper: locate the definition header of `class_name` in `text`.
pub fn find_class_anchor(text: &str, class_name: &str) -> ReflmigResult<Option<usize>> {
    Ok(ClassAnchor::for_class(class_name)?.find(text))
}
