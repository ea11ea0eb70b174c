//! The rewrite engine.
//!
//! Given the text of one header, converts every legacy declaration:
//!
//! 1. `#include "Class.generated.h"` after the last existing include
//! 2. `UCLASS()` on its own line above `class Class : public Parent`
//! 3. `DECLARE_CLASS(Class, Parent)` → `GENERATED_REFLECTION_BODY()`
//! 4. `DECLARE_DUPLICATE(Class)` removed
//!
//! Every step is an independent span finder over the current buffer and
//! re-resolves its offsets after each mutation. Steps that cannot find
//! their landmark do nothing and leave a [`RewriteWarning`] behind; they
//! never guess a position.
//!
//! The engine is pure: text in, text out. Reading, writing and policy
//! (exclusion lists, missing files) live in [`crate::migrate`].

use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::anchor::ClassAnchor;
use crate::error::ReflmigResult;
use crate::extract::{declaration_pattern, extract_with, DeclarationInfo};
use crate::rules::RewriteRules;

/// A conservative skip that produced a converted file with a gap in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewriteWarning {
    /// No `class X : public Y` header found: neither the include nor the
    /// annotation was inserted for this class.
    AnchorNotFound { class_name: String },
    /// The file has no include directive to follow, so the generated
    /// header include was not inserted.
    NoIncludeDirective { class_name: String },
}

impl std::fmt::Display for RewriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AnchorNotFound { class_name } => write!(
                f,
                "class header for {} not found; annotation and generated include not inserted",
                class_name
            ),
            Self::NoIncludeDirective { class_name } => write!(
                f,
                "no #include directive in file; generated include for {} not inserted",
                class_name
            ),
        }
    }
}

/// New text produced for a file, with what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenSource {
    pub text: String,
    pub declarations: Vec<DeclarationInfo>,
    pub warnings: Vec<RewriteWarning>,
}

/// What the engine decided for one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The marker is already present; nothing was attempted.
    AlreadyConverted,
    /// No legacy declaration found.
    NoDeclarations,
    /// Declarations were found but every step was a no-op.
    Unchanged { declarations: Vec<DeclarationInfo> },
    /// The text changed.
    Changed(RewrittenSource),
}

/// Per-declaration patterns, compiled once per `(Class, Parent)` pair.
struct DeclarationPatterns {
    anchor: ClassAnchor,
    legacy: Regex,
    duplicate: Regex,
}

impl DeclarationPatterns {
    fn for_declaration(rules: &RewriteRules, decl: &DeclarationInfo) -> ReflmigResult<Self> {
        let class = regex::escape(&decl.class_name);
        let parent = regex::escape(&decl.parent_class);
        Ok(Self {
            anchor: ClassAnchor::for_class(&decl.class_name)?,
            legacy: Regex::new(&format!(
                r"\b{}\s*\(\s*{}\s*,\s*{}\s*\)",
                regex::escape(&rules.legacy),
                class,
                parent
            ))?,
            // Surrounding whitespace belongs to the span; capture 1 keeps
            // the trailing part so the next line's indentation survives.
            duplicate: Regex::new(&format!(
                r"\s*\b{}\s*\(\s*{}\s*\)(\s*)",
                regex::escape(&rules.duplicate),
                class
            ))?,
        })
    }
}

/// Compiled rewrite engine for one set of [`RewriteRules`].
#[derive(Debug, Clone)]
pub struct Rewriter {
    rules: RewriteRules,
    declaration: Regex,
    include: Regex,
}

impl Rewriter {
    pub fn new(rules: RewriteRules) -> ReflmigResult<Self> {
        rules.validate()?;
        let declaration = declaration_pattern(&rules)?;
        let include = Regex::new(r#"#include[ \t]+[<"][^\n]*?[>"]"#)?;
        Ok(Self {
            rules,
            declaration,
            include,
        })
    }

    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// True if `text` already carries the generated-body marker anywhere.
    pub fn is_converted(&self, text: &str) -> bool {
        text.contains(self.rules.marker())
    }

    /// Legacy declarations in `text`, in first-occurrence order.
    pub fn extract(&self, text: &str) -> Vec<DeclarationInfo> {
        extract_with(&self.declaration, text)
    }

    /// Rewrite one file's text.
    pub fn rewrite(&self, text: &str) -> ReflmigResult<RewriteOutcome> {
        if self.is_converted(text) {
            return Ok(RewriteOutcome::AlreadyConverted);
        }

        let declarations = self.extract(text);
        if declarations.is_empty() {
            return Ok(RewriteOutcome::NoDeclarations);
        }

        let eol = line_ending(text);
        let mut content = text.to_string();
        let mut warnings = Vec::new();

        for decl in &declarations {
            content = self.apply_declaration(content, decl, eol, &mut warnings)?;
        }

        if content == text {
            return Ok(RewriteOutcome::Unchanged { declarations });
        }

        Ok(RewriteOutcome::Changed(RewrittenSource {
            text: content,
            declarations,
            warnings,
        }))
    }

    fn apply_declaration(
        &self,
        mut content: String,
        decl: &DeclarationInfo,
        eol: &str,
        warnings: &mut Vec<RewriteWarning>,
    ) -> ReflmigResult<String> {
        let patterns = DeclarationPatterns::for_declaration(&self.rules, decl)?;
        let class_name = &decl.class_name;

        // 1 + 2. Include and annotation travel together: an existing
        // generated include means the class was already annotated.
        let directive = self.rules.generated_include(class_name);
        if !content.contains(&directive) {
            if patterns.anchor.find(&content).is_some() {
                if self.insert_after_last_include(&mut content, &directive, eol) {
                    debug!(class = %class_name, "inserted generated include");
                } else {
                    warnings.push(RewriteWarning::NoIncludeDirective {
                        class_name: class_name.clone(),
                    });
                }

                match patterns.anchor.find(&content) {
                    Some(start) => {
                        self.insert_annotation(&mut content, start, eol);
                        debug!(class = %class_name, "inserted annotation");
                    }
                    None => warnings.push(RewriteWarning::AnchorNotFound {
                        class_name: class_name.clone(),
                    }),
                }
            } else {
                warnings.push(RewriteWarning::AnchorNotFound {
                    class_name: class_name.clone(),
                });
            }
        }

        // 3. Exact (Class, Parent) substitution.
        let body = self.rules.body_invocation();
        content = patterns
            .legacy
            .replace_all(&content, NoExpand(&body))
            .into_owned();

        // 4. Duplicate removal, collapsing the span to one line break.
        content = patterns
            .duplicate
            .replace_all(&content, |caps: &Captures| {
                let trailing = caps.get(1).map_or("", |m| m.as_str());
                let indent = trailing.rfind('\n').map_or("", |i| &trailing[i + 1..]);
                format!("{}{}", eol, indent)
            })
            .into_owned();

        debug!(class = %class_name, parent = %decl.parent_class, "declaration rewritten");
        Ok(content)
    }

    /// Insert `directive` on a new line after the last include.
    /// Returns false if the file has no include at all.
    ///
    /// The new line follows the whole include line only when the rest of
    /// that line is blank or a `//` comment. Anything else (a `/*` that may
    /// run on) gets the directive right after the include itself.
    fn insert_after_last_include(&self, content: &mut String, directive: &str, eol: &str) -> bool {
        let Some(after) = self.include.find_iter(content).last().map(|m| m.end()) else {
            return false;
        };

        let line_end = content[after..]
            .find('\n')
            .map_or(content.len(), |i| after + i);
        let text_end = if line_end > after && content.as_bytes()[line_end - 1] == b'\r' {
            line_end - 1
        } else {
            line_end
        };

        let rest = content[after..text_end].trim_start();
        let pos = if rest.is_empty() || rest.starts_with("//") {
            text_end
        } else {
            after
        };

        content.insert_str(pos, &format!("{}{}", eol, directive));
        true
    }

    /// Put the annotation on its own line directly above the class header.
    ///
    /// When the header is only indented, the annotation takes the same
    /// indentation; otherwise it goes right before `class`.
    fn insert_annotation(&self, content: &mut String, anchor: usize, eol: &str) {
        let line_start = content[..anchor].rfind('\n').map_or(0, |i| i + 1);
        let indent = &content[line_start..anchor];
        let annotation = self.rules.annotation_invocation();

        if indent.chars().all(|c| c == ' ' || c == '\t') {
            let line = format!("{}{}{}", indent, annotation, eol);
            content.insert_str(line_start, &line);
        } else {
            content.insert_str(anchor, &format!("{}{}", annotation, eol));
        }
    }
}

/// Line ending to use for inserted lines: CRLF if the file uses any.
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Rewrite `text` with the default rules.
pub fn rewrite_source(text: &str) -> ReflmigResult<RewriteOutcome> {
    Rewriter::new(RewriteRules::default())?.rewrite(text)
}
