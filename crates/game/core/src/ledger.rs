//! Attribute ledger: a sparse map of attribute ids to fixed-point values.
//!
//! The same type is used both for the values stored on an entity and for the
//! deltas flowing through the engine. Arithmetic operators always produce new
//! ledgers and never touch their inputs.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

use crate::error::LedgerError;
use crate::fixed::FixedPoint2;

/// Mapping of attribute id → value.
///
/// Keys are unique and iteration order is deterministic (sorted by id), but
/// nothing in the contract depends on order. Two ledgers are equal iff they
/// hold the same keys with exactly equal values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AttributeLedger {
    entries: BTreeMap<String, FixedPoint2>,
}

impl AttributeLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger holding a single entry.
    pub fn with_value(id: impl Into<String>, value: FixedPoint2) -> Self {
        let mut ledger = Self::new();
        ledger.insert(id, value);
        ledger
    }

    /// Returns the stored value, or zero when the attribute is absent.
    pub fn get(&self, id: &str) -> FixedPoint2 {
        self.entries.get(id).copied().unwrap_or(FixedPoint2::ZERO)
    }

    /// Strict lookup that reports absent attributes.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::KeyNotFound`] if the ledger has no entry for `id`.
    pub fn try_get(&self, id: &str) -> Result<FixedPoint2, LedgerError> {
        self.entries
            .get(id)
            .copied()
            .ok_or_else(|| LedgerError::KeyNotFound(id.to_owned()))
    }

    /// Inserts or overwrites an entry, returning the previous value.
    pub fn insert(&mut self, id: impl Into<String>, value: FixedPoint2) -> Option<FixedPoint2> {
        self.entries.insert(id.into(), value)
    }

    /// Inserts `value` only if the attribute is not present yet.
    ///
    /// Returns `true` if the entry was added.
    pub fn try_insert(&mut self, id: impl Into<String>, value: FixedPoint2) -> bool {
        match self.entries.entry(id.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<FixedPoint2> {
        self.entries.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries at all.
    ///
    /// A ledger whose entries are all zero is *not* empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FixedPoint2)> + '_ {
        self.entries.iter().map(|(id, value)| (id.as_str(), *value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = FixedPoint2> + '_ {
        self.entries.values().copied()
    }

    /// Borrows the underlying map (used for replication).
    pub fn as_map(&self) -> &BTreeMap<String, FixedPoint2> {
        &self.entries
    }

    pub fn into_map(self) -> BTreeMap<String, FixedPoint2> {
        self.entries
    }

    /// Sum of every stored value.
    ///
    /// A zero total does not mean "no effect": healing in one attribute may
    /// cancel damage in another. Prefer [`any_positive`](Self::any_positive)
    /// or [`is_empty`](Self::is_empty) for that question.
    pub fn total(&self) -> FixedPoint2 {
        self.entries.values().sum()
    }

    /// Returns true if at least one entry is strictly positive.
    ///
    /// Differs from `!is_empty()`: a ledger holding only zero or negative
    /// entries returns false.
    pub fn any_positive(&self) -> bool {
        self.entries.values().any(|value| value.is_positive())
    }

    /// Removes every entry whose value is exactly zero.
    pub fn trim_zeros(&mut self) {
        self.entries.retain(|_, value| !value.is_zero());
    }

    /// Clamps every present entry into `[min, max]`.
    ///
    /// # Panics
    ///
    /// Panics if `min >= max`; inverted bounds are a caller bug.
    pub fn clamp(&mut self, min: FixedPoint2, max: FixedPoint2) {
        assert!(min < max, "clamp bounds inverted: min {min} >= max {max}");
        self.clamp_max(max);
        self.clamp_min(min);
    }

    /// Raises every present entry to at least `min`. Never adds entries.
    pub fn clamp_min(&mut self, min: FixedPoint2) {
        for value in self.entries.values_mut() {
            if *value < min {
                *value = min;
            }
        }
    }

    /// Lowers every present entry to at most `max`. Never adds entries.
    pub fn clamp_max(&mut self, max: FixedPoint2) {
        for value in self.entries.values_mut() {
            if *value > max {
                *value = max;
            }
        }
    }

    /// Adds `other` into `self` without introducing new attribute types.
    ///
    /// Entries of `other` whose id is absent from `self` are dropped. This is
    /// what keeps an entity's ledger within its declared support set; use `+`
    /// for a plain union.
    pub fn exclusive_add(&mut self, other: &AttributeLedger) {
        for (id, value) in &other.entries {
            if let Some(existing) = self.entries.get_mut(id) {
                *existing += *value;
            }
        }
    }

    fn map_values(&self, f: impl Fn(FixedPoint2) -> FixedPoint2) -> Self {
        self.entries
            .iter()
            .map(|(id, value)| (id.clone(), f(*value)))
            .collect()
    }

    fn add_in_place(&mut self, other: &AttributeLedger) {
        for (id, value) in &other.entries {
            *self.entries.entry(id.clone()).or_default() += *value;
        }
    }

    fn sub_in_place(&mut self, other: &AttributeLedger) {
        for (id, value) in &other.entries {
            *self.entries.entry(id.clone()).or_default() -= *value;
        }
    }
}

impl<K: Into<String>> FromIterator<(K, FixedPoint2)> for AttributeLedger {
    fn from_iter<I: IntoIterator<Item = (K, FixedPoint2)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(id, value)| (id.into(), value)).collect(),
        }
    }
}

impl<K: Into<String>> Extend<(K, FixedPoint2)> for AttributeLedger {
    fn extend<I: IntoIterator<Item = (K, FixedPoint2)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(id, value)| (id.into(), value)));
    }
}

impl From<BTreeMap<String, FixedPoint2>> for AttributeLedger {
    fn from(entries: BTreeMap<String, FixedPoint2>) -> Self {
        Self { entries }
    }
}

impl IntoIterator for AttributeLedger {
    type Item = (String, FixedPoint2);
    type IntoIter = btree_map::IntoIter<String, FixedPoint2>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeLedger {
    type Item = (&'a String, &'a FixedPoint2);
    type IntoIter = btree_map::Iter<'a, String, FixedPoint2>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Strict indexed access.
///
/// # Panics
///
/// Panics if the attribute is absent. Use [`AttributeLedger::get`] for a
/// zero default or [`AttributeLedger::try_get`] for a `Result`.
impl Index<&str> for AttributeLedger {
    type Output = FixedPoint2;

    fn index(&self, id: &str) -> &FixedPoint2 {
        match self.entries.get(id) {
            Some(value) => value,
            None => panic!("{}", LedgerError::KeyNotFound(id.to_owned())),
        }
    }
}

// ============================================================================
// Operators
// ============================================================================

impl Add for &AttributeLedger {
    type Output = AttributeLedger;

    fn add(self, rhs: &AttributeLedger) -> AttributeLedger {
        let mut sum = self.clone();
        sum.add_in_place(rhs);
        sum
    }
}

impl Add for AttributeLedger {
    type Output = AttributeLedger;

    fn add(mut self, rhs: AttributeLedger) -> AttributeLedger {
        self.add_in_place(&rhs);
        self
    }
}

// Subtraction is spelled out instead of `a + (-1 * b)` to skip the multiply.
impl Sub for &AttributeLedger {
    type Output = AttributeLedger;

    fn sub(self, rhs: &AttributeLedger) -> AttributeLedger {
        let mut difference = self.clone();
        difference.sub_in_place(rhs);
        difference
    }
}

impl Sub for AttributeLedger {
    type Output = AttributeLedger;

    fn sub(mut self, rhs: AttributeLedger) -> AttributeLedger {
        self.sub_in_place(&rhs);
        self
    }
}

impl Neg for &AttributeLedger {
    type Output = AttributeLedger;

    fn neg(self) -> AttributeLedger {
        self.map_values(|value| -value)
    }
}

impl Neg for AttributeLedger {
    type Output = AttributeLedger;

    fn neg(self) -> AttributeLedger {
        -&self
    }
}

impl Mul<FixedPoint2> for &AttributeLedger {
    type Output = AttributeLedger;

    fn mul(self, factor: FixedPoint2) -> AttributeLedger {
        self.map_values(|value| value * factor)
    }
}

impl Mul<FixedPoint2> for AttributeLedger {
    type Output = AttributeLedger;

    fn mul(self, factor: FixedPoint2) -> AttributeLedger {
        &self * factor
    }
}

impl Mul<f32> for &AttributeLedger {
    type Output = AttributeLedger;

    fn mul(self, factor: f32) -> AttributeLedger {
        self.map_values(|value| value.mul_f32(factor))
    }
}

impl Mul<f32> for AttributeLedger {
    type Output = AttributeLedger;

    fn mul(self, factor: f32) -> AttributeLedger {
        &self * factor
    }
}

impl Mul<AttributeLedger> for FixedPoint2 {
    type Output = AttributeLedger;

    fn mul(self, ledger: AttributeLedger) -> AttributeLedger {
        ledger * self
    }
}

impl Mul<AttributeLedger> for f32 {
    type Output = AttributeLedger;

    fn mul(self, ledger: AttributeLedger) -> AttributeLedger {
        ledger * self
    }
}

impl Div<FixedPoint2> for &AttributeLedger {
    type Output = AttributeLedger;

    fn div(self, factor: FixedPoint2) -> AttributeLedger {
        self.map_values(|value| value / factor)
    }
}

impl Div<FixedPoint2> for AttributeLedger {
    type Output = AttributeLedger;

    fn div(self, factor: FixedPoint2) -> AttributeLedger {
        &self / factor
    }
}

impl Div<f32> for &AttributeLedger {
    type Output = AttributeLedger;

    fn div(self, factor: f32) -> AttributeLedger {
        self.map_values(|value| value.div_f32(factor))
    }
}

impl Div<f32> for AttributeLedger {
    type Output = AttributeLedger;

    fn div(self, factor: f32) -> AttributeLedger {
        &self / factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(v: i64) -> FixedPoint2 {
        FixedPoint2::from_int(v)
    }

    fn ledger(entries: &[(&str, i64)]) -> AttributeLedger {
        entries.iter().map(|(id, v)| (*id, fp(*v))).collect()
    }

    #[test]
    fn get_defaults_to_zero() {
        let l = ledger(&[("Strength", 10)]);
        assert_eq!(l.get("Strength"), fp(10));
        assert_eq!(l.get("Wisdom"), FixedPoint2::ZERO);
    }

    #[test]
    fn try_get_reports_missing_key() {
        let l = ledger(&[("Strength", 10)]);
        assert_eq!(l.try_get("Strength"), Ok(fp(10)));
        assert_eq!(
            l.try_get("Wisdom"),
            Err(LedgerError::KeyNotFound("Wisdom".into()))
        );
    }

    #[test]
    #[should_panic(expected = "not present in ledger")]
    fn index_panics_on_missing_key() {
        let l = ledger(&[("Strength", 10)]);
        let _ = l["Wisdom"];
    }

    #[test]
    fn index_returns_present_value() {
        let l = ledger(&[("Strength", 10)]);
        assert_eq!(l["Strength"], fp(10));
    }

    #[test]
    fn total_sums_all_entries() {
        let l = ledger(&[("A", 10), ("B", -4), ("C", 1)]);
        assert_eq!(l.total(), fp(7));
        assert_eq!(AttributeLedger::new().total(), FixedPoint2::ZERO);
    }

    #[test]
    fn any_positive_differs_from_non_empty() {
        assert!(!ledger(&[("A", 0), ("B", -3)]).any_positive());
        assert!(ledger(&[("A", 0), ("B", 1)]).any_positive());
        assert!(!AttributeLedger::new().any_positive());
    }

    #[test]
    fn empty_is_about_keys_not_values() {
        assert!(AttributeLedger::new().is_empty());
        assert!(!ledger(&[("A", 0)]).is_empty());
    }

    #[test]
    fn trim_zeros_removes_only_exact_zeros() {
        let mut l = ledger(&[("A", 0), ("B", 2), ("C", 0)]);
        l.insert("D", FixedPoint2::EPSILON);
        l.trim_zeros();
        assert_eq!(l.len(), 2);
        assert!(l.contains("B"));
        assert!(l.contains("D"));
    }

    #[test]
    fn clamp_rewrites_present_keys_only() {
        let mut l = ledger(&[("A", -5), ("B", 50), ("C", 3)]);
        l.clamp(fp(0), fp(10));
        assert_eq!(l, ledger(&[("A", 0), ("B", 10), ("C", 3)]));
        assert!(!l.contains("D"));
    }

    #[test]
    fn clamp_min_and_max_individually() {
        let mut l = ledger(&[("A", -5), ("B", 50)]);
        l.clamp_min(fp(-1));
        assert_eq!(l, ledger(&[("A", -1), ("B", 50)]));
        l.clamp_max(fp(20));
        assert_eq!(l, ledger(&[("A", -1), ("B", 20)]));
    }

    #[test]
    #[should_panic(expected = "clamp bounds inverted")]
    fn clamp_rejects_inverted_bounds() {
        let mut l = ledger(&[("A", 1)]);
        l.clamp(fp(10), fp(10));
    }

    #[test]
    fn exclusive_add_never_introduces_keys() {
        let mut l = ledger(&[("A", 1), ("B", 2)]);
        l.exclusive_add(&ledger(&[("A", 5), ("C", 5)]));
        assert_eq!(l, ledger(&[("A", 6), ("B", 2)]));
    }

    #[test]
    fn plus_operator_takes_the_union() {
        let a = ledger(&[("A", 1), ("B", 2)]);
        let b = ledger(&[("A", 5), ("C", 5)]);
        assert_eq!(&a + &b, ledger(&[("A", 6), ("B", 2), ("C", 5)]));
        // Inputs untouched.
        assert_eq!(a, ledger(&[("A", 1), ("B", 2)]));
    }

    #[test]
    fn subtract_negates_keys_only_in_rhs() {
        let a = ledger(&[("A", 1)]);
        let b = ledger(&[("A", 3), ("B", 2)]);
        assert_eq!(a - b, ledger(&[("A", -2), ("B", -2)]));
    }

    #[test]
    fn scale_and_divide() {
        let a = ledger(&[("A", 4), ("B", -2)]);
        assert_eq!(&a * fp(3), ledger(&[("A", 12), ("B", -6)]));
        assert_eq!(0.5f32 * a.clone(), ledger(&[("A", 2), ("B", -1)]));
        assert_eq!(&a / fp(2), ledger(&[("A", 2), ("B", -1)]));

        let mut quarter = ledger(&[("A", 1)]);
        quarter.insert("B", FixedPoint2::from_raw(-50));
        assert_eq!(&a / 4.0f32, quarter);
    }

    #[test]
    fn negate_matches_scale_by_minus_one() {
        let a = ledger(&[("A", 4), ("B", -2), ("C", 0)]);
        assert_eq!(-&a, &a * fp(-1));
        assert_eq!(-a.clone(), a * -1.0f32);
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = AttributeLedger::new();
        a.insert("A", fp(1));
        a.insert("B", fp(2));
        let mut b = AttributeLedger::new();
        b.insert("B", fp(2));
        b.insert("A", fp(1));
        assert_eq!(a, b);

        b.insert("C", FixedPoint2::ZERO);
        assert_ne!(a, b);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_ledger() -> impl Strategy<Value = AttributeLedger> {
            proptest::collection::btree_map("[A-F]", -100_000..100_000i64, 0..6).prop_map(|m| {
                m.into_iter()
                    .map(|(k, v)| (k, FixedPoint2::from_raw(v)))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn add_is_commutative(a in arb_ledger(), b in arb_ledger()) {
                prop_assert_eq!(&a + &b, &b + &a);
            }

            #[test]
            fn subtract_is_add_of_negation(a in arb_ledger(), b in arb_ledger()) {
                prop_assert_eq!(&a - &b, &a + &(-&b));
            }

            #[test]
            fn empty_ledger_is_additive_identity(a in arb_ledger()) {
                prop_assert_eq!(&a + &AttributeLedger::new(), a);
            }

            #[test]
            fn scale_then_unscale_recovers(a in arb_ledger(), k in prop_oneof![-50..=-1i64, 1..=50i64]) {
                let factor = FixedPoint2::from_int(k);
                let restored = &(&a * factor) / factor;
                for (id, value) in a.iter() {
                    let diff = (restored.get(id) - value).abs();
                    prop_assert!(diff <= FixedPoint2::EPSILON, "{id}: diff {diff}");
                }
                prop_assert_eq!(restored.len(), a.len());
            }

            /// Float factors round twice (after `* k` and `* 1/k`), so magnitudes
            /// are kept in 0.5..50 where the combined error stays within one step.
            #[test]
            fn float_scale_then_inverse_recovers(
                a in arb_ledger(),
                k in prop_oneof![-50.0f32..-0.5, 0.5f32..50.0],
            ) {
                let restored = &(&a * k) * (1.0 / k);
                for (id, value) in a.iter() {
                    let diff = (restored.get(id) - value).abs();
                    prop_assert!(diff <= FixedPoint2::EPSILON, "{id} x {k}: diff {diff}");
                }
                prop_assert_eq!(restored.len(), a.len());
            }

            #[test]
            fn trim_zeros_is_idempotent(
                m in proptest::collection::btree_map("[A-F]", -2..2i64, 0..6)
            ) {
                let mut once: AttributeLedger =
                    m.into_iter().map(|(k, v)| (k, FixedPoint2::from_int(v))).collect();
                once.trim_zeros();
                let mut twice = once.clone();
                twice.trim_zeros();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
