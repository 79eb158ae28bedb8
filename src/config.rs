// src/config.rs

/// Options recognized by the analyzer.
///
/// None of these change what is decoded; they only change which segments are
/// emitted and which diagnostics are logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Emit framing bytes (list/set/map headers, field headers, struct stop
    /// markers) as explicit child segments instead of leaving them to gap filling.
    pub show_list_headers: bool,
    /// Emit zero-length markers for schema fields that were absent on the wire.
    pub show_undefined_optional: bool,
    /// Log one diagnostic event per decoded boundary.
    pub debug: bool,
    /// Fill uncovered bytes with synthetic `list_header`/`padding`/`unknown` segments.
    pub fill_gaps: bool,
    /// Filler value recognized as padding.
    pub padding_byte: u8,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            show_list_headers: false,
            show_undefined_optional: false,
            debug: false,
            fill_gaps: true,
            padding_byte: 0x00,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list_headers(mut self, show: bool) -> Self {
        self.show_list_headers = show;
        self
    }

    pub fn with_undefined_optional(mut self, show: bool) -> Self {
        self.show_undefined_optional = show;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_gap_filling(mut self, fill: bool) -> Self {
        self.fill_gaps = fill;
        self
    }

    pub fn with_padding_byte(mut self, byte: u8) -> Self {
        self.padding_byte = byte;
        self
    }
}
