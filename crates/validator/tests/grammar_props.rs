//! Property tests over the rule-text parser: it must accept arbitrary
//! input without panicking and preserve the documented token shapes.

use proptest::prelude::*;
use veto_validator::prelude::*;

proptest! {
    #[test]
    fn parsing_never_panics(text in ".*") {
        let _ = parse_field_spec(&text);
    }

    #[test]
    fn rule_count_is_bounded_by_pipe_segments(text in ".*") {
        let segments = text.split('|').count();
        prop_assert!(parse_field_spec(&text).len() <= segments);
    }

    #[test]
    fn names_come_out_lowercase_and_nonempty(text in "[a-zA-Z_|:,0-9]{0,40}") {
        for rule in parse_field_spec(&text) {
            prop_assert!(!rule.name.is_empty());
            prop_assert_eq!(rule.name.to_lowercase(), rule.name);
        }
    }

    #[test]
    fn quoted_commas_stay_inside_one_token(inner in "[a-z]{1,5},[a-z]{1,5}") {
        let text = format!("starts_with:\"{inner}\",tail");
        let rules = parse_field_spec(&text);
        prop_assert_eq!(rules.len(), 1);
        prop_assert_eq!(rules[0].params.len(), 2);
        prop_assert_eq!(rules[0].params[0].as_str(), inner.as_str());
        prop_assert_eq!(rules[0].params[1].as_str(), "tail");
    }

    #[test]
    fn pattern_params_survive_verbatim(body in "[a-z0-9\\^\\$\\{\\},]{0,20}") {
        let text = format!("regex:{body}");
        let rules = parse_field_spec(&text);
        prop_assert_eq!(rules.len(), 1);
        prop_assert_eq!(rules[0].params.len(), 1);
        prop_assert_eq!(rules[0].params[0].as_str(), body.as_str());
    }
}
