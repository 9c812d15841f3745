//! Floored merge of a delta into a stored ledger.

use crate::fixed::FixedPoint2;
use crate::ledger::AttributeLedger;

/// Adds `delta` into `stored`, flooring every touched entry at zero.
///
/// Only keys already present in `stored` are touched. Returns the realized
/// change: `new - old` for each entry whose value actually moved.
pub(crate) fn merge_floored(stored: &mut AttributeLedger, delta: &AttributeLedger) -> AttributeLedger {
    let mut realized = AttributeLedger::new();

    for (id, change) in delta.iter() {
        let Ok(old) = stored.try_get(id) else {
            continue;
        };

        let new = (old + change).max(FixedPoint2::ZERO);
        if new == old {
            continue;
        }

        stored.insert(id, new);
        realized.insert(id, new - old);
    }

    realized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, i64)]) -> AttributeLedger {
        entries
            .iter()
            .map(|&(id, v)| (id, FixedPoint2::from_int(v)))
            .collect()
    }

    #[test]
    fn floors_at_zero_and_reports_realized_change() {
        let mut stored = ledger(&[("Strength", 10), ("Dexterity", 5)]);
        let realized = merge_floored(&mut stored, &ledger(&[("Strength", -15)]));

        assert_eq!(realized, ledger(&[("Strength", -10)]));
        assert_eq!(stored, ledger(&[("Strength", 0), ("Dexterity", 5)]));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let mut stored = ledger(&[("A", 0), ("B", 0)]);
        let realized = merge_floored(&mut stored, &ledger(&[("A", 5), ("C", 5)]));

        assert_eq!(realized, ledger(&[("A", 5)]));
        assert!(!stored.contains("C"));
    }

    #[test]
    fn saturated_damage_stays_an_increase() {
        let mut stored = ledger(&[("Body", 1)]);
        let hit = AttributeLedger::with_value("Body", FixedPoint2::MAX);
        let realized = merge_floored(&mut stored, &hit);

        assert_eq!(stored.get("Body"), FixedPoint2::MAX);
        assert_eq!(realized.get("Body"), FixedPoint2::MAX - FixedPoint2::ONE);
        assert!(realized.get("Body").is_positive());
    }

    #[test]
    fn saturated_healing_floors_at_zero() {
        let mut stored = ledger(&[("Body", 1)]);
        let heal = AttributeLedger::with_value("Body", FixedPoint2::MIN);
        let realized = merge_floored(&mut stored, &heal);

        assert_eq!(stored.get("Body"), FixedPoint2::ZERO);
        assert_eq!(realized, ledger(&[("Body", -1)]));
    }

    #[test]
    fn no_op_entries_are_omitted() {
        let mut stored = ledger(&[("Body", 0), ("Wisdom", 3)]);
        let realized = merge_floored(&mut stored, &ledger(&[("Body", -4), ("Wisdom", 0)]));

        assert!(realized.is_empty());
        assert_eq!(stored, ledger(&[("Body", 0), ("Wisdom", 3)]));
    }
}
