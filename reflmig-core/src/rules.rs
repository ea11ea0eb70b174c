//! Macro vocabulary of the migration.
//!
//! Every token the engine searches for or emits lives in [`RewriteRules`].
//! The defaults describe the engine project this tool was written for; a
//! `[macros]` table in `reflmig.toml` can rename any of them.

use serde::{Deserialize, Serialize};

use crate::error::{ReflmigError, ReflmigResult};

pub const DEFAULT_LEGACY_MACRO: &str = "DECLARE_CLASS";
pub const DEFAULT_DUPLICATE_MACRO: &str = "DECLARE_DUPLICATE";
pub const DEFAULT_BODY_MACRO: &str = "GENERATED_REFLECTION_BODY";
pub const DEFAULT_ANNOTATION_MACRO: &str = "UCLASS";
pub const DEFAULT_GENERATED_SUFFIX: &str = ".generated.h";

/// Names of the macros involved in one migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteRules {
    /// Two-argument legacy declaration, `DECLARE_CLASS(Class, Parent)`.
    pub legacy: String,
    /// Single-argument companion removed with the legacy macro.
    pub duplicate: String,
    /// Zero-argument replacement. Its bare name is the idempotence marker.
    pub body: String,
    /// Zero-argument annotation placed above the class header.
    pub annotation: String,
    /// Appended to the class name to form the generated header file name.
    pub generated_suffix: String,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            legacy: DEFAULT_LEGACY_MACRO.to_string(),
            duplicate: DEFAULT_DUPLICATE_MACRO.to_string(),
            body: DEFAULT_BODY_MACRO.to_string(),
            annotation: DEFAULT_ANNOTATION_MACRO.to_string(),
            generated_suffix: DEFAULT_GENERATED_SUFFIX.to_string(),
        }
    }
}

impl RewriteRules {
    /// Reject names that would not be valid C++ macro identifiers.
    ///
    /// The suffix must stay inside a quoted include, so quotes, angle
    /// brackets and line breaks are refused.
    pub fn validate(&self) -> ReflmigResult<()> {
        for (field, value) in [
            ("legacy", &self.legacy),
            ("duplicate", &self.duplicate),
            ("body", &self.body),
            ("annotation", &self.annotation),
        ] {
            if !is_identifier(value) {
                return Err(ReflmigError::invalid_argument(format!(
                    "macros.{} must be an identifier, got {:?}",
                    field, value
                )));
            }
        }

        if self.generated_suffix.is_empty()
            || self
                .generated_suffix
                .chars()
                .any(|c| matches!(c, '"' | '<' | '>' | '\n' | '\r'))
        {
            return Err(ReflmigError::invalid_argument(format!(
                "macros.generated_suffix is not usable in an include: {:?}",
                self.generated_suffix
            )));
        }

        Ok(())
    }

    /// The token whose presence anywhere marks a file as already migrated.
    pub fn marker(&self) -> &str {
        &self.body
    }

    /// `GENERATED_REFLECTION_BODY()`
    pub fn body_invocation(&self) -> String {
        format!("{}()", self.body)
    }

    /// `UCLASS()`
    pub fn annotation_invocation(&self) -> String {
        format!("{}()", self.annotation)
    }

    /// `#include "Foo.generated.h"`
    pub fn generated_include(&self, class_name: &str) -> String {
        format!("#include \"{}{}\"", class_name, self.generated_suffix)
    }
}

/// Conventional identifier: ASCII letter or underscore, then letters, digits, underscores.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
