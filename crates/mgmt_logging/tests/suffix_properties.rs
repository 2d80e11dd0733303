//! Property tests for rotation periods.

use mgmt_logging::prelude::*;
use proptest::prelude::*;

const UNITS: [(&str, RotationPeriod); 7] = [
    ("yyyy", RotationPeriod::Year),
    ("MM", RotationPeriod::Month),
    ("ww", RotationPeriod::Week),
    ("dd", RotationPeriod::Day),
    ("a", RotationPeriod::HalfDay),
    ("HH", RotationPeriod::Hour),
    ("mm", RotationPeriod::Minute),
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// The period is the smallest unit in the pattern, in any order.
    #[test]
    fn smallest_unit_wins(picks in prop::collection::vec(0..UNITS.len(), 1..5)) {
        let suffix: String = picks.iter().map(|&i| format!(".{}", UNITS[i].0)).collect();
        let expected = picks.iter().map(|&i| UNITS[i].1).min().unwrap();
        prop_assert_eq!(RotationPeriod::from_suffix(&suffix).unwrap(), expected);
    }

    /// Quoted text never changes the period.
    #[test]
    fn quoted_text_is_literal(unit in 0..UNITS.len(), literal in "[a-zA-Z.-]{0,8}") {
        let (pattern, period) = UNITS[unit];
        let suffix = format!(".{pattern}'{literal}'");
        prop_assert_eq!(RotationPeriod::from_suffix(&suffix).unwrap(), period);
    }
}
