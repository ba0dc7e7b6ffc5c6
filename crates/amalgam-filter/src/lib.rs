//! Line classifier for merged source files.
//!
//! Decides, line by line, whether a source line is a local directive that
//! must be dropped when files are concatenated, or content that is copied
//! through unchanged.

mod lines;
mod result;

pub use lines::{split_lines, SplitLines};
pub use result::{DirectiveKind, FilterOutcome, LineClass};

/// Directive prefixes in match order. Matching is a byte prefix test against
/// the raw line, so leading whitespace defeats a match.
const DIRECTIVE_PREFIXES: &[(&[u8], DirectiveKind)] = &[
    (b"#include\"", DirectiveKind::QuotedIncludeNoSpace),
    (b"#include \"", DirectiveKind::QuotedInclude),
    (b"#pragma once", DirectiveKind::PragmaOnce),
];

/// Classify a single line (terminator included or not).
pub fn classify_line(line: &[u8]) -> LineClass {
    DIRECTIVE_PREFIXES
        .iter()
        .find(|(prefix, _)| line.starts_with(prefix))
        .map(|(_, kind)| LineClass::Directive(*kind))
        .unwrap_or(LineClass::Content)
}

/// Filter a whole source buffer.
///
/// Content lines are copied byte-for-byte, terminators included; directive
/// lines are dropped and recorded with their 1-based line number.
pub fn filter_source(source: &[u8]) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        content: Vec::with_capacity(source.len()),
        ..Default::default()
    };

    for (idx, line) in split_lines(source).enumerate() {
        match classify_line(line) {
            LineClass::Content => {
                outcome.content.extend_from_slice(line);
                outcome.lines_kept += 1;
            }
            LineClass::Directive(kind) => outcome.directives.push((idx + 1, kind)),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_include_without_space() {
        assert_eq!(
            classify_line(b"#include\"Color.h\"\n"),
            LineClass::Directive(DirectiveKind::QuotedIncludeNoSpace)
        );
    }

    #[test]
    fn test_quoted_include_with_space() {
        assert_eq!(
            classify_line(b"#include \"Color.h\"\n"),
            LineClass::Directive(DirectiveKind::QuotedInclude)
        );
    }

    #[test]
    fn test_pragma_once_prefix() {
        assert!(classify_line(b"#pragma once\n").is_directive());
        assert!(classify_line(b"#pragma once // guard\r\n").is_directive());
        assert!(classify_line(b"#pragma once").is_directive());
    }

    #[test]
    fn test_rule_table_matches_kind_prefixes() {
        for (kind, (prefix, table_kind)) in DirectiveKind::ALL.iter().zip(DIRECTIVE_PREFIXES) {
            assert_eq!(kind, table_kind);
            assert_eq!(kind.prefix().as_bytes(), *prefix);
        }
    }

    #[test]
    fn test_angle_include_is_content() {
        assert_eq!(classify_line(b"#include <vector>\n"), LineClass::Content);
    }

    #[test]
    fn test_two_spaces_before_quote_is_content() {
        assert_eq!(classify_line(b"#include  \"x.h\"\n"), LineClass::Content);
    }

    #[test]
    fn test_leading_whitespace_is_content() {
        assert_eq!(classify_line(b"  #pragma once\n"), LineClass::Content);
        assert_eq!(classify_line(b"\t#include \"x.h\"\n"), LineClass::Content);
    }

    #[test]
    fn test_other_pragmas_are_content() {
        assert_eq!(classify_line(b"#pragma pack(1)\n"), LineClass::Content);
        assert_eq!(classify_line(b"#pragma\n"), LineClass::Content);
    }

    #[test]
    fn test_filter_source_drops_directives() {
        let source = b"#pragma once\n#include \"a.h\"\n#include <map>\nint x;\n";
        let outcome = filter_source(source);

        assert_eq!(outcome.content, b"#include <map>\nint x;\n");
        assert_eq!(outcome.lines_kept, 2);
        assert_eq!(
            outcome.directives,
            vec![(1, DirectiveKind::PragmaOnce), (2, DirectiveKind::QuotedInclude)]
        );
    }

    #[test]
    fn test_filter_source_preserves_crlf_and_missing_final_newline() {
        let source = b"int a;\r\n#include\"b.h\"\r\nint c;";
        let outcome = filter_source(source);
        assert_eq!(outcome.content, b"int a;\r\nint c;");
        assert_eq!(outcome.directives_removed(), 1);
    }

    #[test]
    fn test_filter_source_splits_on_lone_cr() {
        let outcome = filter_source(b"#pragma once\rint x;\r");
        assert_eq!(outcome.content, b"int x;\r");
        assert_eq!(outcome.directives, vec![(1, DirectiveKind::PragmaOnce)]);

        let outcome = filter_source(b"int a;\r#include \"b.h\"\r");
        assert_eq!(outcome.content, b"int a;\r");
        assert_eq!(outcome.directives, vec![(2, DirectiveKind::QuotedInclude)]);
    }

    #[test]
    fn test_filter_source_without_directives_is_identity() {
        let source = b"namespace svg {\n\nstruct Point { double x, y; };\n}\n";
        let outcome = filter_source(source);
        assert_eq!(outcome.content, source.to_vec());
        assert!(outcome.directives.is_empty());
    }

    #[test]
    fn test_filter_empty_source() {
        let outcome = filter_source(b"");
        assert!(outcome.content.is_empty());
        assert_eq!(outcome.lines_kept, 0);
    }
}
