//! Property-based tests for delimiter escaping.
//!
//! The emitted grammar embeds literal delimiters inside regular expressions;
//! the round-trip property below is what makes that sound: an escaped
//! literal, compiled as a regex, matches exactly the original string.

use proptest::prelude::*;
use regex::Regex;
use xshd2tm::textmate::escape::escape_literal;

proptest! {
    #[test]
    fn escaped_literal_compiles_and_matches_itself(
        s in r"[a-zA-Z0-9.?*+^$\[\]\\(){}|\-]{1,16}"
    ) {
        let escaped = escape_literal(&s);
        let re = Regex::new(&format!("^{}$", escaped)).expect("escaped literal must compile");
        prop_assert!(re.is_match(&s));
    }

    #[test]
    fn escaped_literal_matches_nothing_longer(
        s in r"[a-z.?*+^$\[\]\\(){}|\-]{1,8}"
    ) {
        let escaped = escape_literal(&s);
        let re = Regex::new(&format!("^{}$", escaped)).unwrap();
        let longer = format!("{s}x");
        prop_assert!(!re.is_match(&longer));
    }

    #[test]
    fn escaping_never_changes_plain_text(s in "[a-zA-Z0-9_:;<>=!#%&@/]{0,16}") {
        prop_assert_eq!(escape_literal(&s), s);
    }
}
