//! Builder tuning knobs.

/// Configuration for one grove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroveConfig {
    /// Chunks between forced location-origin stamps, bounding the
    /// backwards search when resolving a chunk's location.
    pub loc_origin_restamp: u32,
    /// Structural events between routine pulses to waiting readers.
    pub pulse_interval: u32,
    /// Record only messages and declarations; skip the document instance.
    pub validate_only: bool,
}

impl Default for GroveConfig {
    fn default() -> Self {
        Self {
            loc_origin_restamp: 100,
            pulse_interval: 16,
            validate_only: false,
        }
    }
}

impl GroveConfig {
    pub fn with_loc_origin_restamp(mut self, chunks: u32) -> Self {
        self.loc_origin_restamp = chunks.max(1);
        self
    }

    pub fn with_pulse_interval(mut self, events: u32) -> Self {
        self.pulse_interval = events.max(1);
        self
    }

    pub fn with_validate_only(mut self, validate_only: bool) -> Self {
        self.validate_only = validate_only;
        self
    }
}
