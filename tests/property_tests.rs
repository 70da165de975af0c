//! Property-based tests for log_bridge using proptest

use log_bridge::core::{format_brace, sprintf};
use log_bridge::prelude::*;
use log_bridge::LevelConfig;
use proptest::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// A level filter enables exactly the levels at or above it
    #[test]
    fn test_filter_enables_at_or_above(threshold in any_level(), level in any_level()) {
        prop_assert_eq!(LevelFilter::Level(threshold).enables(level), level >= threshold);
        prop_assert!(!LevelFilter::Off.enables(level));
    }
}

// ============================================================================
// Level Resolution Tests
// ============================================================================

proptest! {
    /// An override applies to its whole subtree and nothing outside it
    #[test]
    fn test_override_covers_subtree(
        prefix in "[a-z]{1,6}(\\.[a-z]{1,6}){0,2}",
        suffix in "(\\.[a-z]{1,6}){0,3}",
        sibling in "[a-z]{1,4}",
        root in any_level(),
        custom in any_level(),
    ) {
        let levels = LevelConfig::new(LevelFilter::Level(root))
            .with_override(prefix.clone(), LevelFilter::Level(custom));

        let descendant = format!("{}{}", prefix, suffix);
        prop_assert_eq!(levels.effective_level(&descendant), LevelFilter::Level(custom));

        // Shares the textual prefix but is not a descendant
        let lookalike = format!("{}{}", prefix, sibling);
        prop_assert_eq!(levels.effective_level(&lookalike), LevelFilter::Level(root));
    }
}

// ============================================================================
// Message Rendering Tests
// ============================================================================

proptest! {
    /// Templates without placeholders render unchanged
    #[test]
    fn test_brace_without_placeholders_is_identity(
        template in "[^{}\\\\]*",
        args in prop::collection::vec(any::<i64>(), 0..4),
    ) {
        let args: Vec<LogArg> = args.into_iter().map(LogArg::from).collect();
        prop_assert_eq!(format_brace(&template, &args), template);
    }

    /// Each placeholder takes the next argument; missing ones stay literal
    #[test]
    fn test_brace_positional_substitution(
        values in prop::collection::vec("[a-z0-9]{0,8}", 0..5),
        placeholders in 0usize..6,
    ) {
        let template = vec!["{}"; placeholders].join(" ");
        let args: Vec<LogArg> = values.iter().map(|v| LogArg::from(v.as_str())).collect();

        let expected: Vec<String> = (0..placeholders)
            .map(|i| values.get(i).cloned().unwrap_or_else(|| "{}".to_string()))
            .collect();
        prop_assert_eq!(format_brace(&template, &args), expected.join(" "));
    }

    /// %s and %d agree with Display for plain values
    #[test]
    fn test_printf_matches_display(text in "[^%]{0,20}", number in any::<i64>()) {
        let rendered = sprintf("%s=%d", &[text.as_str().into(), number.into()]).unwrap();
        prop_assert_eq!(rendered, format!("{}={}", text, number));
    }

    /// printf never panics, whatever the template
    #[test]
    fn test_printf_never_panics(template in "\\PC{0,30}", arg in any::<i32>()) {
        let _ = sprintf(&template, &[arg.into(), "s".into()]);
    }
}

// ============================================================================
// Pattern Layout Tests
// ============================================================================

proptest! {
    /// Arbitrary patterns (including malformed ones) never panic
    #[test]
    fn test_pattern_never_panics(pattern in "\\PC{0,40}", message in "\\PC{0,20}") {
        let layout = PatternLayout::new(pattern);
        let event = LogEvent::new("prop.test", LogLevel::Info, message);
        let _ = layout.format(&event);
    }

    /// The message converter reproduces the rendered message verbatim
    #[test]
    fn test_pattern_message_verbatim(message in "[^\\n]{0,40}", level in any_level()) {
        let layout = PatternLayout::new("%c [%p] %m%n");
        let event = LogEvent::new("a.b", level, message.clone());
        prop_assert_eq!(layout.format(&event), format!("a.b [{}] {}\n", level, message));
    }
}

// ============================================================================
// Properties Parsing Tests
// ============================================================================

proptest! {
    /// Simple key=value lines parse back to the same entries
    #[test]
    fn test_properties_simple_lines(
        entries in prop::collection::btree_map("[a-zA-Z][a-zA-Z0-9.]{0,15}", "[a-zA-Z0-9%{}\\[\\] ]{0,20}", 0..8)
    ) {
        let text: String = entries
            .iter()
            .map(|(k, v)| format!("{} = {}\n", k, v))
            .collect();
        let props = Properties::parse(&text);

        for (k, v) in &entries {
            prop_assert_eq!(props.get(k), Some(v.trim_start()));
        }
    }
}
