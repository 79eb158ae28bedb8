// src/protocol/tracked_reader.rs
use crate::types::ByteRange;
use bytes::Bytes;
use std::cell::RefCell;
use std::io::{self, Read};
use std::rc::Rc;

#[derive(Debug)]
struct TrackState {
    base: u64,
    position: u64,
    captured: Vec<u8>,
}

/// Shared view of how far a [`TrackedReader`] has advanced.
///
/// The protocol owns the reader, so the session keeps this handle to read the
/// absolute cursor between protocol calls.
#[derive(Debug, Clone)]
pub struct PositionHandle(Rc<RefCell<TrackState>>);

impl PositionHandle {
    pub fn position(&self) -> u64 {
        self.0.borrow().position
    }

    /// Every byte consumed so far, anchored at the starting offset.
    pub fn window(&self) -> ByteWindow {
        let state = self.0.borrow();
        ByteWindow::new(state.base, Bytes::copy_from_slice(&state.captured))
    }
}

/// Reader adapter that counts and captures the bytes its consumer pulls.
pub struct TrackedReader<R> {
    inner: R,
    state: Rc<RefCell<TrackState>>,
}

impl<R: Read> TrackedReader<R> {
    pub fn new(inner: R, base: u64) -> (Self, PositionHandle) {
        let state = Rc::new(RefCell::new(TrackState {
            base,
            position: base,
            captured: Vec::new(),
        }));
        let handle = PositionHandle(Rc::clone(&state));
        (TrackedReader { inner, state }, handle)
    }
}

impl<R: Read> Read for TrackedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        let mut state = self.state.borrow_mut();
        state.position += n as u64;
        state.captured.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// A contiguous run of file bytes starting at `base`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteWindow {
    base: u64,
    bytes: Bytes,
}

impl ByteWindow {
    pub fn new(base: u64, bytes: Bytes) -> Self {
        ByteWindow { base, bytes }
    }

    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.base, self.base + self.bytes.len() as u64)
    }

    /// Bytes of `range`, if the window covers all of it.
    pub fn slice(&self, range: ByteRange) -> Option<Bytes> {
        if !self.range().contains(&range) {
            return None;
        }
        let from = (range.start - self.base) as usize;
        let to = (range.end - self.base) as usize;
        Some(self.bytes.slice(from..to))
    }
}
