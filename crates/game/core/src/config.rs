/// Engine tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// How many `try_change_attribute` calls may be active at once when hooks
    /// re-enter the engine. Calls beyond this depth are refused.
    pub max_nesting_depth: u32,
}

impl EngineConfig {
    pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 8;

    pub fn new() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_nesting_depth(max_nesting_depth: u32) -> Self {
        Self { max_nesting_depth }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
