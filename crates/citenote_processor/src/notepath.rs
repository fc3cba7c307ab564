/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Rules for turning rendered text into vault paths.
//!
//! A title can contain anything an author or journal name contains, so it is
//! made safe as a single file-name segment before the path template sees it.
//! The rendered path is then normalized to a relative, slash-separated path
//! that cannot leave the vault.

use crate::error::NoteError;
use citenote_core::options::DEFAULT_PATH_REPLACEMENT;
use std::fmt;
use std::path::Path;

/// Characters that are not allowed in a file name on at least one of the
/// platforms notes are synced between.
pub const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

fn all_dots(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '.')
}

/// Replace forbidden and control characters in a title.
///
/// A title made only of dots would name the current or parent directory, so
/// each of its dots is replaced too.
pub fn sanitize_title(title: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if FORBIDDEN_FILENAME_CHARS.contains(&c) || c.is_control() {
            out.push_str(replacement);
        } else {
            out.push(c);
        }
    }

    let out = out.trim();
    if !all_dots(out) {
        return out.to_string();
    }
    let replacement = if replacement.is_empty() || all_dots(replacement) {
        DEFAULT_PATH_REPLACEMENT
    } else {
        replacement
    };
    replacement.repeat(out.len())
}

/// A normalized, vault-relative note path such as `Reading notes/@doe2020.md`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotePath(String);

impl NotePath {
    /// Normalize a rendered path.
    ///
    /// Backslashes count as separators; empty and `.` segments are dropped,
    /// which also drops a leading `/`. `..` segments, control characters and
    /// paths that end up empty are rejected.
    pub fn parse(raw: &str) -> Result<Self, NoteError> {
        let invalid = |reason: &str| NoteError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.chars().any(char::is_control) {
            return Err(invalid("contains control characters"));
        }

        let normalized = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment.trim() {
                "" | "." => continue,
                ".." => return Err(invalid("'..' would leave the vault")),
                _ => segments.push(segment),
            }
        }

        if segments.is_empty() {
            return Err(invalid("path is empty"));
        }
        Ok(NotePath(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// File name without directory or extension, which is what a wiki link
    /// to this note resolves by.
    pub fn file_stem(&self) -> &str {
        let name = self.0.rsplit('/').next().unwrap_or(&self.0);
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }
}

impl fmt::Display for NotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<Path> for NotePath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Smith, J. (2019)", "_"), "Smith, J. (2019)");
        assert_eq!(sanitize_title("AC/DC: a history?", "_"), "AC_DC_ a history_");
        assert_eq!(sanitize_title("a\tb\n", "-"), "a-b-");
        assert_eq!(sanitize_title("  padded  ", "_"), "padded");
        assert_eq!(sanitize_title("<x>", ""), "x");
    }

    #[test]
    fn test_dot_titles_cannot_name_directories() {
        assert_eq!(sanitize_title(".", "_"), "_");
        assert_eq!(sanitize_title(" .. ", "-"), "--");
        assert_eq!(sanitize_title("..", ""), "__");
        assert_eq!(sanitize_title("/", "."), "_");
        assert_eq!(sanitize_title("...and more", "_"), "...and more");
    }

    #[test]
    fn test_parse_normalizes() {
        assert_eq!(
            NotePath::parse("Literature/Smith, J. (2019).md").unwrap().as_str(),
            "Literature/Smith, J. (2019).md"
        );
        assert_eq!(NotePath::parse("/a//./b.md").unwrap().as_str(), "a/b.md");
        assert_eq!(NotePath::parse(r"a\b.md").unwrap().as_str(), "a/b.md");
    }

    #[test]
    fn test_parse_rejects() {
        assert!(matches!(
            NotePath::parse("../outside.md"),
            Err(NoteError::InvalidPath { .. })
        ));
        assert!(NotePath::parse("a/../../b.md").is_err());
        assert!(NotePath::parse("").is_err());
        assert!(NotePath::parse(" / ").is_err());
        assert!(NotePath::parse("a\nb.md").is_err());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(NotePath::parse("Notes/@doe2020.md").unwrap().file_stem(), "@doe2020");
        assert_eq!(NotePath::parse("Notes/Smith, J. (2019).md").unwrap().file_stem(), "Smith, J. (2019)");
        assert_eq!(NotePath::parse("plain").unwrap().file_stem(), "plain");
        assert_eq!(NotePath::parse(".hidden").unwrap().file_stem(), ".hidden");
    }
}
