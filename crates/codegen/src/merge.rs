//! Content-preserving file merge
//!
//! Generated files carry a pair of marker regions delimiting the space where
//! hand-written code lives. On regeneration, everything outside the two
//! regions is replaced with freshly generated text while the regions
//! themselves — and the user code between the markers — survive verbatim.
//!
//! A file with any marker count other than exactly two is treated as
//! unmergeable: in the default mode its custom content is discarded with a
//! warning, in strict mode regeneration fails.

use forge_core::{ForgeError, ForgeResult};
use regex::Regex;
use std::sync::OnceLock;

/// Opening marker line of a protected region.
pub const BEGIN_MARKER: &str = "# begin #";

/// Closing marker line of a protected region.
pub const END_MARKER: &str = "# end #";

/// The protected region emitted into brand-new files.
pub const PLACEHOLDER_REGION: &str = "# begin #\n# ---write your code here--- #\n# end #";

/// How to handle an existing file whose markers cannot be paired up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Replace the file wholesale, discarding custom content with a warning.
    #[default]
    Preserve,

    /// Fail the write instead of discarding custom content.
    Strict,
}

fn region_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // (?s) lets `.` span lines; lazy repetition keeps regions minimal so
        // two regions never merge into one match.
        Regex::new(r"(?s)#\s+begin\s+#.*?#\s+end\s+#").expect("marker pattern is valid")
    })
}

/// Extract the protected regions of an existing file.
pub fn protected_regions(existing: &str) -> Vec<&str> {
    region_pattern()
        .find_iter(existing)
        .map(|m| m.as_str())
        .collect()
}

/// Render a file body, carrying over the protected regions of `existing`
/// when it holds exactly two. `body` is the generated middle section, without
/// markers.
///
/// With no existing file (or an unpaired marker count in [`MergeMode::Preserve`])
/// the output wraps `body` in fresh placeholder regions. In
/// [`MergeMode::Strict`] an unpaired marker count is a
/// [`ForgeError::MergeAmbiguity`].
pub fn merge_with_existing(
    existing: Option<&str>,
    body: &str,
    path: &str,
    mode: MergeMode,
) -> ForgeResult<String> {
    let Some(existing) = existing else {
        return Ok(fresh_file(body));
    };

    let regions = protected_regions(existing);
    match regions.as_slice() {
        [top, bottom] => Ok(format!("{top}\n\n{body}\n\n{bottom}\n")),
        other => match mode {
            MergeMode::Strict => Err(ForgeError::MergeAmbiguity {
                path: path.into(),
                regions: other.len(),
            }),
            MergeMode::Preserve => {
                tracing::warn!(
                    path = %path,
                    regions = other.len(),
                    "marker regions unpaired, regenerating file and discarding custom content",
                );
                Ok(fresh_file(body))
            }
        },
    }
}

fn fresh_file(body: &str) -> String {
    format!("{PLACEHOLDER_REGION}\n\n{body}\n\n{PLACEHOLDER_REGION}\n")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_file_has_two_placeholder_regions() {
        let out = merge_with_existing(None, "x = 1", "a.py", MergeMode::Preserve).unwrap();

        assert_eq!(protected_regions(&out).len(), 2);
        assert!(out.contains("x = 1"));
        assert!(out.contains("# ---write your code here--- #"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_merge_preserves_custom_regions() {
        let existing = "\
# begin #
import custom_helpers
# end #

old generated text

# begin #
def my_hook():
    pass
# end #
";
        let out =
            merge_with_existing(Some(existing), "new generated text", "a.py", MergeMode::Preserve)
                .unwrap();

        assert!(out.contains("import custom_helpers"));
        assert!(out.contains("def my_hook():"));
        assert!(out.contains("new generated text"));
        assert!(!out.contains("old generated text"));

        // Top region stays on top
        let top_pos = out.find("import custom_helpers").unwrap();
        let body_pos = out.find("new generated text").unwrap();
        let bottom_pos = out.find("def my_hook():").unwrap();
        assert!(top_pos < body_pos && body_pos < bottom_pos);
    }

    #[test]
    fn test_merge_is_idempotent_for_untouched_files() {
        let first = merge_with_existing(None, "body", "a.py", MergeMode::Preserve).unwrap();
        let second =
            merge_with_existing(Some(&first), "body", "a.py", MergeMode::Preserve).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unpaired_markers_discard_with_preserve_mode() {
        let existing = "# begin #\nonly one region\n# end #\n";
        let out =
            merge_with_existing(Some(existing), "body", "a.py", MergeMode::Preserve).unwrap();

        assert!(!out.contains("only one region"));
        assert!(out.contains("# ---write your code here--- #"));
    }

    #[test]
    fn test_unpaired_markers_fail_in_strict_mode() {
        let existing = "# begin #\nonly one region\n# end #\n";
        let err =
            merge_with_existing(Some(existing), "body", "a.py", MergeMode::Strict).unwrap_err();

        match err {
            ForgeError::MergeAmbiguity { path, regions } => {
                assert_eq!(path, std::path::PathBuf::from("a.py"));
                assert_eq!(regions, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_three_regions_are_unpaired() {
        let existing = "\
# begin #
a
# end #
# begin #
b
# end #
# begin #
c
# end #
";
        assert_eq!(protected_regions(existing).len(), 3);

        let err =
            merge_with_existing(Some(existing), "body", "a.py", MergeMode::Strict).unwrap_err();
        assert!(matches!(err, ForgeError::MergeAmbiguity { regions: 3, .. }));
    }

    #[test]
    fn test_no_markers_at_all() {
        let out = merge_with_existing(Some("plain file"), "body", "a.py", MergeMode::Preserve)
            .unwrap();
        assert!(!out.contains("plain file"));
        assert_eq!(protected_regions(&out).len(), 2);
    }

    #[test]
    fn test_marker_pattern_tolerates_extra_whitespace() {
        let existing = "#  begin  #\ntop\n#  end  #\nmid\n#   begin #\nbottom\n# end   #\n";
        let regions = protected_regions(existing);
        assert_eq!(regions.len(), 2);
        assert!(regions[0].contains("top"));
        assert!(regions[1].contains("bottom"));
    }
}
