//! Parse-failure classification.
//!
//! A raw parser diagnostic is mapped to one `ErrorPattern` by walking an
//! ordered rule table; the first matching rule wins. Specific substrings
//! must stay ahead of the generic "while parsing ..." context rules, so
//! reordering `RULES` changes behavior.

use serde::{Serialize, Serializer};
use std::fmt;

/// Canonical classification tag for a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorPattern {
    MappingValueNotAllowed,
    AliasScanIssue,
    BlockEndVsSequenceStart,
    BlockEndVsScalar,
    MissingColon,
    GenericBlockCollectionIssue,
    GenericBlockMappingIssue,
    SimpleKeyScanIssue,
    /// Catch-all keyed by the trimmed first line of the message.
    Unclassified(String),
}

impl ErrorPattern {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorPattern::MappingValueNotAllowed => "MAPPING_VALUE_NOT_ALLOWED",
            ErrorPattern::AliasScanIssue => "ALIAS_SCAN_ISSUE",
            ErrorPattern::BlockEndVsSequenceStart => "BLOCK_END_VS_SEQUENCE_START",
            ErrorPattern::BlockEndVsScalar => "BLOCK_END_VS_SCALAR",
            ErrorPattern::MissingColon => "MISSING_COLON",
            ErrorPattern::GenericBlockCollectionIssue => "GENERIC_BLOCK_COLLECTION_ISSUE",
            ErrorPattern::GenericBlockMappingIssue => "GENERIC_BLOCK_MAPPING_ISSUE",
            ErrorPattern::SimpleKeyScanIssue => "SIMPLE_KEY_SCAN_ISSUE",
            ErrorPattern::Unclassified(line) => line.as_str(),
        }
    }

    pub fn is_unclassified(&self) -> bool {
        matches!(self, ErrorPattern::Unclassified(_))
    }
}

impl fmt::Display for ErrorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Which part of the message a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Message,
    FirstLine,
}

struct Rule {
    scope: Scope,
    /// Any of these substrings triggers the rule.
    needles: &'static [&'static str],
    pattern: ErrorPattern,
}

const RULES: &[Rule] = &[
    Rule {
        scope: Scope::Message,
        // second wording is what libyaml reports
        needles: &[
            "mapping values are not allowed here",
            "mapping values are not allowed in this context",
        ],
        pattern: ErrorPattern::MappingValueNotAllowed,
    },
    Rule {
        scope: Scope::Message,
        needles: &["while scanning an alias"],
        pattern: ErrorPattern::AliasScanIssue,
    },
    Rule {
        scope: Scope::Message,
        needles: &["expected <block end>, but found '<block sequence start>'"],
        pattern: ErrorPattern::BlockEndVsSequenceStart,
    },
    Rule {
        scope: Scope::Message,
        needles: &["expected <block end>, but found '<scalar>'"],
        pattern: ErrorPattern::BlockEndVsScalar,
    },
    Rule {
        scope: Scope::Message,
        needles: &["could not find expected ':'"],
        pattern: ErrorPattern::MissingColon,
    },
    Rule {
        scope: Scope::FirstLine,
        needles: &["while parsing a block collection"],
        pattern: ErrorPattern::GenericBlockCollectionIssue,
    },
    Rule {
        scope: Scope::FirstLine,
        needles: &["while parsing a block mapping"],
        pattern: ErrorPattern::GenericBlockMappingIssue,
    },
    Rule {
        scope: Scope::FirstLine,
        needles: &["while scanning a simple key"],
        pattern: ErrorPattern::SimpleKeyScanIssue,
    },
];

/// Tag used when a message has no non-blank first line.
const EMPTY_MESSAGE_TAG: &str = "UNCLASSIFIED";

/// Classify a raw parser diagnostic.
pub fn classify(message: &str) -> ErrorPattern {
    let first_line = message.lines().next().unwrap_or("");
    for rule in RULES {
        let haystack = match rule.scope {
            Scope::Message => message,
            Scope::FirstLine => first_line,
        };
        if rule.needles.iter().any(|n| haystack.contains(n)) {
            return rule.pattern.clone();
        }
    }
    let tag = first_line.trim();
    if tag.is_empty() {
        ErrorPattern::Unclassified(EMPTY_MESSAGE_TAG.to_string())
    } else {
        ErrorPattern::Unclassified(tag.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_rules() {
        assert_eq!(
            classify("mapping values are not allowed here\n  in \"<unicode string>\", line 3"),
            ErrorPattern::MappingValueNotAllowed
        );
        assert_eq!(
            classify("mapping values are not allowed in this context at line 2 column 9"),
            ErrorPattern::MappingValueNotAllowed
        );
        assert_eq!(
            classify(
                "did not find expected alphabetic or numeric character at line 2 column 8, while scanning an alias at line 2 column 7"
            ),
            ErrorPattern::AliasScanIssue
        );
        assert_eq!(
            classify("while parsing a block mapping\nexpected <block end>, but found '<block sequence start>'"),
            ErrorPattern::BlockEndVsSequenceStart
        );
        assert_eq!(
            classify("while parsing a block mapping\nexpected <block end>, but found '<scalar>'"),
            ErrorPattern::BlockEndVsScalar
        );
        assert_eq!(
            classify("could not find expected ':' at line 3 column 1, while scanning a simple key at line 2 column 1"),
            ErrorPattern::MissingColon
        );
    }

    #[test]
    fn test_first_line_rules() {
        assert_eq!(
            classify("did not find expected '-' indicator at line 4 column 3, while parsing a block collection at line 2 column 3"),
            ErrorPattern::GenericBlockCollectionIssue
        );
        assert_eq!(
            classify("did not find expected key at line 3 column 1, while parsing a block mapping at line 1 column 1"),
            ErrorPattern::GenericBlockMappingIssue
        );
        assert_eq!(
            classify("while scanning a simple key\nsomething else"),
            ErrorPattern::SimpleKeyScanIssue
        );
        // only the first line is inspected by the fallback rules
        assert_eq!(
            classify("unexpected end of stream\nwhile parsing a block mapping"),
            ErrorPattern::Unclassified("unexpected end of stream".into())
        );
    }

    #[test]
    fn test_mapping_value_wins_over_block_mapping_context() {
        let msg = "while parsing a block mapping at line 1 column 1\nmapping values are not allowed here";
        assert_eq!(classify(msg), ErrorPattern::MappingValueNotAllowed);
    }

    #[test]
    fn test_fallthrough_uses_trimmed_first_line() {
        let p = classify("  'id' is missing  \nsecond line");
        assert_eq!(p, ErrorPattern::Unclassified("'id' is missing".into()));
        assert_eq!(p.as_str(), "'id' is missing");
        assert!(p.is_unclassified());
        assert_eq!(classify(""), ErrorPattern::Unclassified("UNCLASSIFIED".into()));
    }

    #[test]
    fn test_classification_is_deterministic() {
        for msg in [
            "Content is not a dictionary",
            "could not find expected ':'",
            "found character that cannot start any token at line 1 column 5",
        ] {
            assert_eq!(classify(msg), classify(msg));
        }
    }

    #[test]
    fn test_serializes_as_tag() {
        let v = serde_json::to_value(ErrorPattern::MissingColon).unwrap();
        assert_eq!(v, serde_json::json!("MISSING_COLON"));
    }
}
