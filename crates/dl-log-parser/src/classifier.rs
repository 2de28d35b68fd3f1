//! Message prefix classification.

use crate::types::RecordType;

/// Classify a message by its leading type label.
///
/// Labels are compared as case-sensitive literal prefixes in
/// `RecordType::ALL` order; the first match wins. No match is `Other`.
pub fn classify(message: &str) -> RecordType {
    split_label(message).0
}

/// Classify a message and strip the matched label.
///
/// The label is removed together with the `:` that follows it and any
/// whitespace after that (PHP pads the separator with two spaces). An
/// unclassified message is returned unchanged.
pub fn split_label(message: &str) -> (RecordType, &str) {
    for record_type in RecordType::ALL {
        if record_type == RecordType::Other {
            continue;
        }
        if let Some(rest) = message.strip_prefix(record_type.label()) {
            let rest = rest.strip_prefix(':').unwrap_or(rest);
            return (record_type, rest.trim_start());
        }
    }
    (RecordType::Other, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_labels() {
        assert_eq!(classify("PHP Fatal error: X"), RecordType::FatalError);
        assert_eq!(classify("PHP Notice: X"), RecordType::Notice);
        assert_eq!(classify("PHP Parse error: X"), RecordType::ParseError);
        assert_eq!(classify("PHP Warning: X"), RecordType::Warning);
        assert_eq!(classify("Log Parser error: X"), RecordType::ParserError);
    }

    #[test]
    fn fatal_error_label_is_stripped() {
        let (record_type, message) = split_label("PHP Fatal error: X");
        assert_eq!(record_type, RecordType::FatalError);
        assert_eq!(message, "X");
    }

    #[test]
    fn double_space_separator_is_stripped() {
        let (_, message) = split_label("PHP Warning:  Undefined variable $foo");
        assert_eq!(message, "Undefined variable $foo");
    }

    #[test]
    fn unrecognized_message_is_unchanged() {
        let (record_type, message) = split_label("WordPress database error Table missing");
        assert_eq!(record_type, RecordType::Other);
        assert_eq!(message, "WordPress database error Table missing");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert_eq!(classify("php warning: x"), RecordType::Other);
        assert_eq!(classify("PHP WARNING: x"), RecordType::Other);
    }

    #[test]
    fn label_must_be_a_prefix() {
        assert_eq!(classify("Caught PHP Warning: x"), RecordType::Other);
    }

    #[test]
    fn no_label_is_a_prefix_of_another() {
        for a in RecordType::ALL {
            for b in RecordType::ALL {
                if a != b {
                    assert!(!b.label().starts_with(a.label()), "{a:?} prefixes {b:?}");
                }
            }
        }
    }
}
