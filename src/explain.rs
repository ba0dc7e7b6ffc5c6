//! Explain output for line classification
//!
//! Shows, for one source file, which lines a merge would drop and which
//! rule matched, without writing any output file.

use serde::{Deserialize, Serialize};

use amalgam_filter::{classify_line, split_lines, DirectiveKind, LineClass};

/// A dropped line with the rule that matched it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DroppedLine {
    /// 1-based line number
    pub line: usize,

    pub rule: DirectiveKind,

    /// Line text without its terminator
    pub text: String,
}

/// Explanation of how a file would be filtered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainOutput {
    pub file: String,

    pub total_lines: usize,

    pub lines_kept: usize,

    pub dropped: Vec<DroppedLine>,

    /// The prefixes checked, in match order
    pub rules: Vec<String>,
}

impl ExplainOutput {
    /// Classify every line of `source`
    pub fn from_source(file: &str, source: &str) -> Self {
        let mut total_lines = 0;
        let mut dropped = Vec::new();

        for (idx, line) in split_lines(source.as_bytes()).enumerate() {
            total_lines += 1;
            if let LineClass::Directive(rule) = classify_line(line) {
                let text = String::from_utf8_lossy(line);
                dropped.push(DroppedLine {
                    line: idx + 1,
                    rule,
                    text: text.trim_end_matches(['\r', '\n']).to_string(),
                });
            }
        }

        Self {
            file: file.to_string(),
            total_lines,
            lines_kept: total_lines - dropped.len(),
            dropped,
            rules: DirectiveKind::ALL
                .iter()
                .map(|k| format!("{} ({})", k.prefix(), k.to_code()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut lines = vec![format!("File: {}", self.file), String::new()];

        lines.push(format!(
            "Lines: {} total, {} kept, {} dropped",
            self.total_lines,
            self.lines_kept,
            self.dropped.len()
        ));

        if !self.dropped.is_empty() {
            lines.push(String::new());
            lines.push("Dropped:".to_string());
            for d in &self.dropped {
                lines.push(format!("  {:>5}  {:<24} {}", d.line, d.rule.to_code(), d.text));
            }
        }

        lines.push(String::new());
        lines.push("--- Rules ---".to_string());
        lines.extend(self.rules.iter().map(|r| format!("  {}", r)));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "#pragma once\n#include <string>\n#include \"Rgb.h\"\nstruct Color {};\n";

    #[test]
    fn test_explain_counts() {
        let output = ExplainOutput::from_source("Color.h", SOURCE);

        assert_eq!(output.total_lines, 4);
        assert_eq!(output.lines_kept, 2);
        assert_eq!(output.dropped.len(), 2);
        assert_eq!(output.dropped[0].line, 1);
        assert_eq!(output.dropped[0].rule, DirectiveKind::PragmaOnce);
        assert_eq!(output.dropped[1].text, "#include \"Rgb.h\"");
    }

    #[test]
    fn test_explain_no_directives() {
        let output = ExplainOutput::from_source("a.cpp", "int main() {}\n");
        assert!(output.dropped.is_empty());
        assert_eq!(output.lines_kept, 1);
    }

    #[test]
    fn test_human_lists_rules_and_drops() {
        let human = ExplainOutput::from_source("Color.h", SOURCE).to_human();

        assert!(human.contains("File: Color.h"));
        assert!(human.contains("4 total, 2 kept, 2 dropped"));
        assert!(human.contains("PRAGMA_ONCE"));
        assert!(human.contains("#include\" (INCLUDE_QUOTED_NO_SPACE)"));
    }

    #[test]
    fn test_json_output() {
        let json = ExplainOutput::from_source("Color.h", SOURCE).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dropped"][0]["rule"], "PRAGMA_ONCE");
        assert_eq!(value["rules"].as_array().unwrap().len(), 3);
    }
}
