//! Unified diff preview for dry runs, using the `similar` crate.

use similar::{ChangeTag, TextDiff};

/// Generate a unified diff between the original and rewritten header.
///
/// Output has `---`/`+++` headers naming `path`, then hunks with three
/// lines of context and `+`, `-`, ` ` prefixes. Identical inputs give an
/// empty string.
pub fn generate_unified_diff(path: &str, original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let groups = diff.grouped_ops(3);
    if groups.is_empty() {
        return String::new();
    }

    let mut output = format!("--- a/{}\n+++ b/{}\n", path, path);

    for group in &groups {
        if let (Some(first), Some(last)) = (group.first(), group.last()) {
            let old = first.old_range().start..last.old_range().end;
            let new = first.new_range().start..last.new_range().end;
            output.push_str(&format!(
                "@@ -{},{} +{},{} @@\n",
                old.start + 1,
                old.len(),
                new.start + 1,
                new.len()
            ));
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value().trim_end_matches(&['\r', '\n'][..]));
                output.push('\n');
            }
        }
    }

    output
}
