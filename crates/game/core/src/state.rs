//! Per-entity attachment and its replicated form.

use std::collections::BTreeMap;
use std::fmt;

use crate::fixed::FixedPoint2;
use crate::ledger::AttributeLedger;

/// Opaque handle of an entity owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry references used when attaching a ledger to an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributableSpec {
    /// Container restricting which attribute types the ledger holds.
    /// `None` means every known attribute type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub container_id: Option<String>,

    /// Modifier set applied to incoming deltas.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifier_set_id: Option<String>,
}

impl AttributableSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container id (builder pattern)
    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    /// Set the modifier set id (builder pattern)
    pub fn with_modifier_set(mut self, id: impl Into<String>) -> Self {
        self.modifier_set_id = Some(id.into());
        self
    }
}

/// Ledger plus registry references owned by one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributable {
    pub container_id: Option<String>,
    pub modifier_set_id: Option<String>,
    pub attributes: AttributeLedger,
}

impl Attributable {
    /// Snapshot suitable for sending to remote observers.
    pub fn to_state(&self) -> AttributableState {
        AttributableState {
            attributes: self.attributes.as_map().clone(),
            modifier_set_id: self.modifier_set_id.clone(),
        }
    }
}

/// Replicated form of an [`Attributable`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributableState {
    pub attributes: BTreeMap<String, FixedPoint2>,
    pub modifier_set_id: Option<String>,
}

impl AttributableState {
    pub fn ledger(&self) -> AttributeLedger {
        AttributeLedger::from(self.attributes.clone())
    }
}

#[cfg(feature = "serde")]
pub use codec::StateCodecError;

#[cfg(feature = "serde")]
mod codec {
    use super::AttributableState;
    use crate::error::{AttributeError, ErrorSeverity};

    /// Failure to encode or decode a replicated state payload.
    #[derive(Debug, thiserror::Error)]
    pub enum StateCodecError {
        #[error("failed to encode attributable state: {0}")]
        Encode(#[source] bincode::Error),

        #[error("failed to decode attributable state: {0}")]
        Decode(#[source] bincode::Error),
    }

    impl AttributeError for StateCodecError {
        fn severity(&self) -> ErrorSeverity {
            ErrorSeverity::Internal
        }

        fn error_code(&self) -> &'static str {
            match self {
                Self::Encode(_) => "STATE_ENCODE_FAILED",
                Self::Decode(_) => "STATE_DECODE_FAILED",
            }
        }
    }

    impl AttributableState {
        /// Encodes the state with bincode.
        ///
        /// # Errors
        ///
        /// Returns [`StateCodecError::Encode`] if serialization fails.
        pub fn to_bytes(&self) -> Result<Vec<u8>, StateCodecError> {
            bincode::serialize(self).map_err(StateCodecError::Encode)
        }

        /// Decodes a state previously produced by [`to_bytes`](Self::to_bytes).
        ///
        /// # Errors
        ///
        /// Returns [`StateCodecError::Decode`] on malformed input.
        pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateCodecError> {
            bincode::deserialize(bytes).map_err(StateCodecError::Decode)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::fixed::FixedPoint2;

        #[test]
        fn payload_is_stable_across_reencode() {
            let state = AttributableState {
                attributes: [
                    ("Body".to_owned(), FixedPoint2::from_raw(350)),
                    ("Strength".to_owned(), FixedPoint2::from_int(10)),
                    ("Wisdom".to_owned(), FixedPoint2::from_raw((1 << 53) + 1)),
                    ("Mastery".to_owned(), FixedPoint2::MIN),
                ]
                .into_iter()
                .collect(),
                modifier_set_id: Some("Armored".into()),
            };

            let bytes = state.to_bytes().expect("encode");
            let decoded = AttributableState::from_bytes(&bytes).expect("decode");
            assert_eq!(decoded, state);
            assert_eq!(decoded.to_bytes().expect("re-encode"), bytes);
        }

        #[test]
        fn garbage_fails_to_decode() {
            let err = AttributableState::from_bytes(&[0xff; 3]).unwrap_err();
            assert_eq!(err.error_code(), "STATE_DECODE_FAILED");
            assert!(err.severity().is_internal());
        }
    }
}
