//! Resistance sets applied to incoming attribute deltas.
//!
//! A [`ModifierSet`] is applied to damage only. Healing (negative entries)
//! always passes through untouched, and a modifier never turns damage into
//! healing.
//!
//! # Order
//!
//! ```text
//! v' = max(0, v - flat_reduction)   (if configured)
//! v'' = v' × max(0, coefficient)    (if configured)
//! ```

use std::collections::BTreeMap;

use crate::fixed::FixedPoint2;
use crate::ledger::AttributeLedger;

/// Flat reductions and multiplicative coefficients keyed by attribute id.
///
/// Immutable once loaded; entities reference a set by registry id.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierSet {
    /// Multipliers applied after the flat reduction.
    #[cfg_attr(feature = "serde", serde(default))]
    pub coefficients: BTreeMap<String, f32>,

    /// Amounts subtracted from incoming damage before coefficients.
    #[cfg_attr(feature = "serde", serde(default))]
    pub flat_reductions: BTreeMap<String, f32>,
}

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coefficient (builder pattern)
    pub fn with_coefficient(mut self, id: impl Into<String>, coefficient: f32) -> Self {
        self.coefficients.insert(id.into(), coefficient);
        self
    }

    /// Add a flat reduction (builder pattern)
    pub fn with_flat_reduction(mut self, id: impl Into<String>, reduction: f32) -> Self {
        self.flat_reductions.insert(id.into(), reduction);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty() && self.flat_reductions.is_empty()
    }

    /// Shorthand for [`apply_modifier_set`].
    pub fn apply(&self, delta: &AttributeLedger) -> AttributeLedger {
        apply_modifier_set(delta, self)
    }

    fn modify_damage(&self, id: &str, value: FixedPoint2) -> FixedPoint2 {
        let mut modified = value;

        if let Some(&reduction) = self.flat_reductions.get(id) {
            // Flat reductions cannot heal.
            modified = (modified - FixedPoint2::from_f32(reduction)).max(FixedPoint2::ZERO);
        }

        if let Some(&coefficient) = self.coefficients.get(id) {
            // A negative coefficient would flip damage into healing.
            modified = modified.mul_f32(coefficient.max(0.0));
        }

        modified
    }
}

/// Applies a modifier set to `delta`, returning a new ledger.
///
/// - zero entries are dropped
/// - negative entries (healing) are copied unchanged
/// - positive entries are reduced, scaled, and dropped if they reach zero
pub fn apply_modifier_set(delta: &AttributeLedger, set: &ModifierSet) -> AttributeLedger {
    let mut modified = AttributeLedger::new();

    for (id, value) in delta.iter() {
        if value.is_zero() {
            continue;
        }

        if value.is_negative() {
            modified.insert(id, value);
            continue;
        }

        let damage = set.modify_damage(id, value);
        if !damage.is_zero() {
            modified.insert(id, damage);
        }
    }

    modified
}

/// Applies several modifier sets in order.
///
/// With no sets the result is a copy of `delta`, so callers can always treat
/// the return value as their own.
pub fn apply_modifier_sets<'a>(
    delta: &AttributeLedger,
    sets: impl IntoIterator<Item = &'a ModifierSet>,
) -> AttributeLedger {
    sets.into_iter()
        .fold(delta.clone(), |acc, set| apply_modifier_set(&acc, set))
}
