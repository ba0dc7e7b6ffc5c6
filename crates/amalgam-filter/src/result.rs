//! Classification result types.

use serde::{Deserialize, Serialize};

/// Which directive rule matched a line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// `#include"file"` with no space before the quote.
    #[serde(rename = "INCLUDE_QUOTED_NO_SPACE")]
    QuotedIncludeNoSpace,

    /// `#include "file"` with exactly one space before the quote.
    #[serde(rename = "INCLUDE_QUOTED")]
    QuotedInclude,

    /// `#pragma once`, with or without trailing text.
    #[serde(rename = "PRAGMA_ONCE")]
    PragmaOnce,
}

impl DirectiveKind {
    /// All rules, in match order.
    pub const ALL: [DirectiveKind; 3] = [
        DirectiveKind::QuotedIncludeNoSpace,
        DirectiveKind::QuotedInclude,
        DirectiveKind::PragmaOnce,
    ];

    /// Machine-readable code.
    pub fn to_code(&self) -> &'static str {
        match self {
            DirectiveKind::QuotedIncludeNoSpace => "INCLUDE_QUOTED_NO_SPACE",
            DirectiveKind::QuotedInclude => "INCLUDE_QUOTED",
            DirectiveKind::PragmaOnce => "PRAGMA_ONCE",
        }
    }

    /// The literal prefix this rule matches.
    pub fn prefix(&self) -> &'static str {
        match self {
            DirectiveKind::QuotedIncludeNoSpace => "#include\"",
            DirectiveKind::QuotedInclude => "#include \"",
            DirectiveKind::PragmaOnce => "#pragma once",
        }
    }
}

/// Classification of one source line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "class", content = "rule", rename_all = "snake_case")]
pub enum LineClass {
    /// Copied verbatim.
    Content,
    /// Dropped from the merged output.
    Directive(DirectiveKind),
}

impl LineClass {
    pub fn is_directive(&self) -> bool {
        matches!(self, LineClass::Directive(_))
    }
}

/// Result of filtering one source buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Kept lines, concatenated, terminators preserved.
    pub content: Vec<u8>,

    /// Number of content lines kept.
    pub lines_kept: usize,

    /// Dropped directives as (1-based line number, rule).
    pub directives: Vec<(usize, DirectiveKind)>,
}

impl FilterOutcome {
    pub fn directives_removed(&self) -> usize {
        self.directives.len()
    }
}
