//! Property-based tests for rosetta_logger using proptest

use proptest::prelude::*;
use rosetta_logger::prelude::*;
use std::collections::BTreeMap;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

fn field_map() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,7}", any::<i64>(), 0..12)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level; other spellings are rejected
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
        prop_assert!(level.to_lowercase_str().parse::<LogLevel>().is_err());
    }

    /// Ordering follows the declared severity
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 < level2, val1 < val2);
    }

    /// An entry reaches the appender exactly when its level is at or above the threshold
    #[test]
    fn test_threshold_filtering(threshold in any_level(), level in any_level()) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder()
            .min_level(threshold)
            .stack_trace(None)
            .exit_on_fatal(false)
            .appender(memory.clone())
            .build();

        logger.log(level, "threshold check");
        prop_assert_eq!(memory.len(), usize::from(level >= threshold));
    }

    /// Unknown names are rejected without touching the threshold
    #[test]
    fn test_set_level_rejects_garbage(name in "[a-z]{3,10}") {
        prop_assume!(name.parse::<LogLevel>().is_err());

        let logger = Logger::builder().min_level(LogLevel::Warn).build();
        prop_assert!(logger.set_level(&name).is_err());
        prop_assert_eq!(logger.get_level(), LogLevel::Warn);
    }
}

// ============================================================================
// FieldSet Tests
// ============================================================================

proptest! {
    /// Serialized keys are always ascending, whatever the insertion order
    #[test]
    fn test_serialized_keys_are_sorted(pairs in field_map()) {
        let mut reversed: Vec<(String, i64)> = pairs.clone().into_iter().collect();
        reversed.reverse();
        let fields: FieldSet = reversed.into_iter().collect();

        let keys: Vec<String> = fields.serialize().into_iter().map(|(k, _)| k).collect();
        let expected: Vec<String> = pairs.keys().cloned().collect();
        prop_assert_eq!(keys, expected);
    }

    /// Serializing the same set twice gives the same text
    #[test]
    fn test_serialization_is_deterministic(pairs in field_map()) {
        let fields: FieldSet = pairs.into_iter().collect();
        prop_assert_eq!(fields.format_fields(), fields.clone().format_fields());
    }

    /// Merging copies; neither input changes and the right side wins
    #[test]
    fn test_merge_is_a_copy(left in field_map(), right in field_map()) {
        let a: FieldSet = left.clone().into_iter().collect();
        let b: FieldSet = right.clone().into_iter().collect();

        let merged = a.merge(&b);

        prop_assert_eq!(a.len(), left.len());
        prop_assert_eq!(b.len(), right.len());
        for (key, value) in &right {
            prop_assert_eq!(merged.get(key), Some(&FieldValue::Int(*value)));
        }
        for (key, value) in &left {
            if !right.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(&FieldValue::Int(*value)));
            }
        }
    }

    /// Plain strings are quoted and never break the line
    #[test]
    fn test_string_values_stay_on_one_line(value in "\\PC*[\n\r\t]?\\PC*") {
        let plain = FieldValue::from(value.as_str()).to_plain();
        prop_assert!(plain.starts_with('"') && plain.ends_with('"'));
        prop_assert!(!plain.contains(['\n', '\r', '\t']));
    }
}

// ============================================================================
// LogRecord Tests
// ============================================================================

proptest! {
    /// Zero-valued attributes are never written
    #[test]
    fn test_zero_attributes_are_suppressed(message in "\\PC*") {
        let record = LogRecord::with_message(message);
        prop_assert_eq!(record.serialize_fields(None), "");
        prop_assert!(record.to_structured_fields(None).is_empty());
    }

    /// The status attribute appears exactly when non-zero
    #[test]
    fn test_status_attribute(status in any::<u16>()) {
        let mut record = LogRecord::new();
        record.status_code = status;

        let rendered = record.serialize_fields(None);
        if status == 0 {
            prop_assert_eq!(rendered, "");
        } else {
            prop_assert_eq!(rendered, format!("status={}", status));
        }
    }

    /// Attributes precede extra fields, which precede global tags
    #[test]
    fn test_section_order(pairs in field_map(), method in "[A-Z]{3,6}") {
        let mut record = LogRecord::new();
        record.method = method;
        for (key, value) in &pairs {
            record.fields.set(key.clone(), *value);
        }
        let tags = GlobalTags::new("astra", "props");

        let keys: Vec<String> = record
            .to_structured_fields(Some(&tags))
            .into_iter()
            .map(|(k, _)| k)
            .collect();

        prop_assert_eq!(keys.first().map(String::as_str), Some("method"));
        prop_assert_eq!(
            &keys[keys.len() - 2..],
            &["application".to_string(), "component".to_string()]
        );
        prop_assert_eq!(keys.len(), pairs.len() + 3);
    }
}
