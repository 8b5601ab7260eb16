//! Exec-root matcher derived from the action's working directory.
//!
//! Findings that come from another target's outputs can name that target's
//! sandbox, e.g. `.../darwin-sandbox/32/execroot/ws/...` while this action
//! runs in `.../darwin-sandbox/33/execroot/ws`. The matcher therefore
//! replaces the sandbox instance id with a single-segment wildcard.

use std::fmt;

const SANDBOX_SUFFIX: &str = "-sandbox";
const OUTPUT_ROOT_MARKER: &str = "_bazel_root";
const EXECROOT: &str = "execroot";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    /// Exactly one non-empty path segment.
    AnySegment,
}

/// Structural matcher for `<working dir>/`, leading `/` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRootPattern {
    pieces: Vec<Piece>,
}

impl ExecRootPattern {
    /// Build the matcher for `working_dir`.
    ///
    /// Markers, in priority order:
    /// - `*-sandbox/<digits>/execroot/<current>`: the digits become a wildcard
    /// - `_bazel_root/<hash>/execroot/<current>`: the hash becomes a wildcard
    ///
    /// `<current>` is the last segment of `working_dir`. Without a marker the
    /// working directory is matched literally. An empty working directory
    /// yields a matcher that never matches.
    pub fn derive(working_dir: &str) -> Self {
        let trimmed = working_dir.trim_start_matches('/').trim_end_matches('/');
        if trimmed.is_empty() {
            return Self { pieces: Vec::new() };
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        let wildcard = find_marker(&segments);

        let mut pieces = Vec::new();
        let mut literal = String::new();
        for (index, segment) in segments.iter().enumerate() {
            if Some(index) == wildcard {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                pieces.push(Piece::AnySegment);
            } else {
                literal.push_str(segment);
            }
            literal.push('/');
        }
        pieces.push(Piece::Literal(literal));
        pieces.retain(|p| !matches!(p, Piece::Literal(l) if l.is_empty()));

        Self { pieces }
    }

    /// Whether a sandbox or output-root marker was found.
    pub fn is_wildcarded(&self) -> bool {
        self.pieces.contains(&Piece::AnySegment)
    }

    /// Remove every match from `text`, repeating until nothing matches so
    /// the result is stable under re-application.
    pub fn strip_all(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.strip_once(&current);
            if next.len() == current.len() {
                return next;
            }
            current = next;
        }
    }

    fn strip_once(&self, text: &str) -> String {
        if self.pieces.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut index = 0;
        while index < text.len() {
            if text.is_char_boundary(index) {
                if let Some(end) = self.match_at(text, index).filter(|&end| end > index) {
                    out.push_str(&text[copied..index]);
                    copied = end;
                    index = end;
                    continue;
                }
            }
            index += 1;
        }
        out.push_str(&text[copied..]);
        out
    }

    fn match_at(&self, text: &str, start: usize) -> Option<usize> {
        let mut pos = start;
        for piece in &self.pieces {
            let rest = &text[pos..];
            match piece {
                Piece::Literal(literal) => {
                    if !rest.starts_with(literal.as_str()) {
                        return None;
                    }
                    pos += literal.len();
                }
                Piece::AnySegment => {
                    let len = rest.find('/').unwrap_or(rest.len());
                    if len == 0 {
                        return None;
                    }
                    pos += len;
                }
            }
        }
        Some(pos)
    }
}

impl fmt::Display for ExecRootPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            match piece {
                Piece::Literal(l) => f.write_str(l)?,
                Piece::AnySegment => f.write_str("*")?,
            }
        }
        Ok(())
    }
}

/// Index of the segment to generalize, if any marker is present.
fn find_marker(segments: &[&str]) -> Option<usize> {
    let current = *segments.last()?;
    let anchored = |i: usize| {
        segments.get(i + 2) == Some(&EXECROOT) && segments.get(i + 3) == Some(&current)
    };

    let sandbox = (0..segments.len()).find(|&i| {
        segments[i].ends_with(SANDBOX_SUFFIX)
            && segments
                .get(i + 1)
                .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            && anchored(i)
    });

    sandbox
        .or_else(|| {
            (0..segments.len()).find(|&i| {
                segments[i] == OUTPUT_ROOT_MARKER
                    && segments.get(i + 1).is_some_and(|hash| !hash.is_empty())
                    && anchored(i)
            })
        })
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SANDBOXED: &str =
        "/private/var/tmp/_bazel_root/db23b8d1/sandbox/darwin-sandbox/33/execroot/grazel";

    #[test]
    fn sandbox_id_becomes_wildcard() {
        let pattern = ExecRootPattern::derive(SANDBOXED);

        assert!(pattern.is_wildcarded());
        assert_eq!(
            pattern.to_string(),
            "private/var/tmp/_bazel_root/db23b8d1/sandbox/darwin-sandbox/*/execroot/grazel/"
        );
    }

    #[test]
    fn wildcard_matches_other_sandbox_instances() {
        let pattern = ExecRootPattern::derive(SANDBOXED);

        let other = "private/var/tmp/_bazel_root/db23b8d1/sandbox/darwin-sandbox/32/execroot/grazel/app/A.kt";
        assert_eq!(pattern.strip_all(other), "app/A.kt");

        let same = "private/var/tmp/_bazel_root/db23b8d1/sandbox/darwin-sandbox/33/execroot/grazel/app/A.kt";
        assert_eq!(pattern.strip_all(same), "app/A.kt");
    }

    #[test]
    fn wildcard_spans_exactly_one_segment() {
        let pattern = ExecRootPattern::derive(SANDBOXED);
        let nested = "private/var/tmp/_bazel_root/db23b8d1/sandbox/darwin-sandbox/1/2/execroot/grazel/x";
        assert_eq!(pattern.strip_all(nested), nested);
    }

    #[test]
    fn output_root_hash_is_generalized_without_sandbox() {
        let pattern = ExecRootPattern::derive("/home/u/.cache/bazel/_bazel_root/abc123/execroot/ws");
        assert!(pattern.is_wildcarded());
        assert_eq!(
            pattern.strip_all("home/u/.cache/bazel/_bazel_root/fff999/execroot/ws/lib/B.kt"),
            "lib/B.kt"
        );
    }

    #[test]
    fn marker_must_name_current_directory() {
        let pattern = ExecRootPattern::derive("/b/linux-sandbox/4/execroot/other/ws");
        assert!(!pattern.is_wildcarded());
        assert_eq!(pattern.to_string(), "b/linux-sandbox/4/execroot/other/ws/");
    }

    #[test]
    fn non_numeric_sandbox_id_falls_back_to_literal() {
        let pattern = ExecRootPattern::derive("/b/linux-sandbox/abc/execroot/ws");
        assert!(!pattern.is_wildcarded());
    }

    #[test]
    fn literal_fallback_matches_exactly() {
        let pattern = ExecRootPattern::derive("/work/repo");
        assert_eq!(pattern.strip_all("work/repo/src/A.kt"), "src/A.kt");
        assert_eq!(pattern.strip_all("work/repository/A.kt"), "work/repository/A.kt");
    }

    #[test]
    fn removes_matches_anywhere_in_text() {
        let pattern = ExecRootPattern::derive("/work/repo");
        assert_eq!(
            pattern.strip_all("listed in (work/repo/baseline.xml) and work/repo/b.xml"),
            "listed in (baseline.xml) and b.xml"
        );
    }

    #[test]
    fn empty_working_directory_never_matches() {
        let pattern = ExecRootPattern::derive("/");
        assert_eq!(pattern.strip_all("a/b/c"), "a/b/c");
        assert_eq!(ExecRootPattern::derive("").strip_all("/x/"), "/x/");
    }

    #[test]
    fn stripping_is_idempotent() {
        let pattern = ExecRootPattern::derive("/wd");
        let once = pattern.strip_all("wwd/d/file");
        assert_eq!(pattern.strip_all(&once), once);
    }
}
