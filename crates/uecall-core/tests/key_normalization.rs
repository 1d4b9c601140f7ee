//! Property tests for dispatch key ↔ accessor name normalization.

use proptest::prelude::*;
use uecall_core::DispatchKey;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,8}"
}

fn dotted_key() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn accessor_round_trips_to_same_key(raw in dotted_key()) {
        let key = DispatchKey::new(raw.clone()).unwrap();
        let accessor = key.accessor_name();
        prop_assert!(!accessor.contains('.'));
        let back = DispatchKey::from_accessor(&accessor).unwrap();
        prop_assert_eq!(back.as_str(), raw.as_str());
    }

    #[test]
    fn distinct_keys_have_distinct_accessors(a in dotted_key(), b in dotted_key()) {
        prop_assume!(a != b);
        let ka = DispatchKey::new(a).unwrap();
        let kb = DispatchKey::new(b).unwrap();
        prop_assert_ne!(ka.accessor_name(), kb.accessor_name());
    }

    #[test]
    fn keys_with_other_characters_are_rejected(
        prefix in segment(),
        bad in "[^A-Za-z0-9._]",
    ) {
        let input = format!("{prefix}{bad}");
        prop_assert!(DispatchKey::new(input.clone()).is_err());
        prop_assert!(DispatchKey::from_accessor(&input).is_err());
    }
}
