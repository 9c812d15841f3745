//! Canonical attribute identifiers shipped with the default content.
//!
//! Ledgers are keyed by plain strings so content can introduce new attribute
//! types freely; these are the ones the stock data set defines.

/// Attribute types defined by the default content pack.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum KnownAttribute {
    /// Raw physical power.
    Strength,
    /// Agility and fine motor control.
    Dexterity,
    Nevpot,
    /// Physical constitution.
    Body,
    /// Trained skill.
    Mastery,
    Wisdom,
}

impl KnownAttribute {
    /// Ledger key for this attribute.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Localisation key for the display name.
    pub fn name_key(self) -> String {
        format!("attribute-{}-name", self.as_ref().to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn ids_match_variant_names() {
        assert_eq!(KnownAttribute::Strength.id(), "Strength");
        assert_eq!("dexterity".parse::<KnownAttribute>(), Ok(KnownAttribute::Dexterity));
        assert_eq!(KnownAttribute::iter().count(), 6);
        assert_eq!(KnownAttribute::Body.name_key(), "attribute-body-name");
    }
}
