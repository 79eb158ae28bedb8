// src/segment/gaps.rs
use crate::config::AnalyzerConfig;
use crate::protocol::{ByteWindow, FramingKind};
use crate::segment::{sort_segments, Segment, SegmentKind};
use crate::types::ByteRange;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Source of raw bytes for the padding check.
pub trait FillerProbe {
    /// True when every byte of `range` is available and equals `byte`.
    fn all_equal(&mut self, range: ByteRange, byte: u8) -> bool;
}

impl FillerProbe for ByteWindow {
    fn all_equal(&mut self, range: ByteRange, byte: u8) -> bool {
        self.slice(range)
            .map(|bytes| bytes.iter().all(|b| *b == byte))
            .unwrap_or(false)
    }
}

/// Probe for callers without access to the bytes; nothing is padding.
pub struct NoProbe;

impl FillerProbe for NoProbe {
    fn all_equal(&mut self, _range: ByteRange, _byte: u8) -> bool {
        false
    }
}

/// A recorded framing range that gaps are matched against.
#[derive(Debug, Clone, PartialEq)]
pub struct Framing {
    pub range: ByteRange,
    pub kind: FramingKind,
    pub metadata: BTreeMap<String, JsonValue>,
}

impl Framing {
    pub fn new(range: ByteRange, kind: FramingKind) -> Self {
        Framing {
            range,
            kind,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn segment_kind(&self) -> SegmentKind {
        match self.kind {
            FramingKind::FieldHeader => SegmentKind::FieldHeader,
            FramingKind::ListHeader => SegmentKind::ListHeader,
            FramingKind::StructStop => SegmentKind::FieldStop,
        }
    }

    pub fn to_segment(&self) -> Segment {
        let mut segment = Segment::new(self.range, self.segment_kind());
        segment.metadata = self.metadata.clone();
        segment
    }
}

/// Sub-ranges of `parent` not covered by any non-empty child. `children`
/// must be sorted by start.
pub fn uncovered(parent: ByteRange, children: &[Segment]) -> Vec<ByteRange> {
    let mut gaps = Vec::new();
    let mut cursor = parent.start;
    for child in children.iter().filter(|c| !c.is_empty()) {
        let start = child.start().min(parent.end);
        if start > cursor {
            gaps.push(ByteRange::new(cursor, start));
        }
        cursor = cursor.max(child.end());
    }
    if cursor < parent.end {
        gaps.push(ByteRange::new(cursor, parent.end));
    }
    gaps
}

/// Classify one uncovered interval: recorded framing first, then filler
/// bytes, then unknown. Framing ranges strictly inside the gap split it.
pub fn classify_gap(gap: ByteRange, framing: &[Framing], probe: &mut dyn FillerProbe, padding_byte: u8) -> Vec<Segment> {
    let mut inside: Vec<&Framing> = framing
        .iter()
        .filter(|f| !f.range.is_empty() && gap.contains(&f.range))
        .collect();
    inside.sort_by_key(|f| f.range.start);

    let mut out = Vec::new();
    let mut cursor = gap.start;
    for f in inside {
        if f.range.start < cursor {
            continue;
        }
        if f.range.start > cursor {
            out.push(classify_filler(ByteRange::new(cursor, f.range.start), probe, padding_byte));
        }
        out.push(f.to_segment().with_meta("gap", true));
        cursor = f.range.end;
    }
    if cursor < gap.end {
        out.push(classify_filler(ByteRange::new(cursor, gap.end), probe, padding_byte));
    }
    out
}

fn classify_filler(range: ByteRange, probe: &mut dyn FillerProbe, padding_byte: u8) -> Segment {
    if probe.all_equal(range, padding_byte) {
        Segment::new(range, SegmentKind::Padding)
            .with_meta("gap", true)
            .with_meta("byte", padding_byte)
    } else {
        Segment::new(range, SegmentKind::Unknown).with_meta("gap", true)
    }
}

/// Sort `children` and interleave classified segments for every uncovered
/// byte of `parent`. With gap filling disabled the children come back sorted
/// and nothing is added.
pub fn fill_gaps(
    parent: ByteRange,
    mut children: Vec<Segment>,
    framing: &[Framing],
    probe: &mut dyn FillerProbe,
    config: &AnalyzerConfig,
) -> Vec<Segment> {
    sort_segments(&mut children);
    if !config.fill_gaps {
        return children;
    }
    let gaps = uncovered(parent, &children);
    if gaps.is_empty() {
        return children;
    }
    for gap in gaps {
        children.extend(classify_gap(gap, framing, probe, config.padding_byte));
    }
    sort_segments(&mut children);
    children
}
