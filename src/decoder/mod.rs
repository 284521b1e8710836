//! Somfy RTS decode pipeline
//!
//! Packed OOK samples go in, decode events come out:
//!
//! ```text
//! bytes -> samples -> edges -> state machine -> frames
//! ```
//!
//! [RtsDecoder] is the per-stream context holding the edge detector, the
//! protocol state and the frame accumulator. It is fed bytes or samples
//! and returns [DecodeEvent]s; rendering is someone else's job.

pub mod edge;
pub mod frame;
pub mod state;

pub use edge::{Edge, EdgeDetector, FilterMode};
pub use frame::{control_name, FrameFields, RtsFrame, FRAME_BITS};
pub use state::{frame_action, next_state, FrameAction, FrameAssembler, ProtocolState};

use std::io::Read;

use tracing::{debug, info, trace};

use crate::common::error::DecodeResult;

/// Stream read chunk size in bytes
const READ_CHUNK: usize = 4096;

/// Observable pipeline output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeEvent {
    /// Software sync seen, the accumulator was reset
    FrameStarted,
    /// One data bit accepted into the accumulator
    BitAccepted(u8),
    /// Left the data states; `raw` is whatever the accumulator held
    FrameFlushed { bits: u8, raw: u64 },
    /// A flush with exactly 56 bits, de-obfuscated and checksummed
    FrameCompleted(RtsFrame),
}

/// Decoder context: edge detection, protocol state and the accumulator
///
/// One instance per input stream. Feed it packed bytes (or single
/// samples) and call [RtsDecoder::finish] once at end of stream so the
/// closing edge flushes a pending frame.
#[derive(Debug)]
pub struct RtsDecoder {
    edge: EdgeDetector,
    state: ProtocolState,
    assembler: FrameAssembler,
    edges_seen: u64,
}

impl RtsDecoder {
    /// Create a decoder with the given edge detection strategy
    pub fn new(filter: FilterMode) -> Self {
        Self {
            edge: EdgeDetector::new(filter),
            state: ProtocolState::Idle,
            assembler: FrameAssembler::default(),
            edges_seen: 0,
        }
    }

    /// Create a decoder with default settings (raw edge detection)
    pub fn with_defaults() -> Self {
        Self::new(FilterMode::default())
    }

    /// Current protocol state
    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Edges handed to the state machine so far
    pub fn edges_seen(&self) -> u64 {
        self.edges_seen
    }

    /// Run one edge event through the state machine
    pub fn feed_edge(&mut self, edge: Edge, events: &mut Vec<DecodeEvent>) {
        self.edges_seen += 1;
        let next = next_state(self.state, edge.level, edge.length);
        trace!(
            from = ?self.state,
            to = ?next,
            level = edge.level,
            length = edge.length,
            "edge"
        );

        match frame_action(self.state, next, edge.level) {
            FrameAction::Flush => {
                let bits = self.assembler.len();
                let raw = self.assembler.value();
                events.push(DecodeEvent::FrameFlushed { bits, raw });
                if bits == FRAME_BITS {
                    let frame = RtsFrame::from_raw(raw);
                    debug!("frame {:014x} valid={}", frame.plaintext(), frame.is_valid());
                    events.push(DecodeEvent::FrameCompleted(frame));
                }
                self.assembler.reset();
            }
            FrameAction::Start => {
                self.assembler.reset();
                events.push(DecodeEvent::FrameStarted);
            }
            FrameAction::AppendBit(bit) => {
                self.assembler.push(bit);
                events.push(DecodeEvent::BitAccepted(bit));
            }
            FrameAction::None => {}
        }
        self.state = next;
    }

    /// Feed one sample bit
    pub fn feed_sample(&mut self, sample: u8, events: &mut Vec<DecodeEvent>) {
        if let Some(edge) = self.edge.feed(sample) {
            self.feed_edge(edge, events);
        }
    }

    /// Feed packed sample bytes, most significant bit first
    pub fn feed_packed(&mut self, bytes: &[u8]) -> Vec<DecodeEvent> {
        let mut events = Vec::new();
        for &byte in bytes {
            for shift in (0..8).rev() {
                self.feed_sample((byte >> shift) & 1, &mut events);
            }
        }
        events
    }

    /// Close the stream: one synthetic inverted edge flushes pending state
    pub fn finish(&mut self) -> Vec<DecodeEvent> {
        let mut events = Vec::new();
        let edge = self.edge.finish();
        self.feed_edge(edge, &mut events);
        events
    }
}

impl Default for RtsDecoder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Per run counters, logged when the stream ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Bytes read from the input
    pub bytes: u64,
    /// Samples fed to the edge detector
    pub samples: u64,
    /// Edges handed to the state machine
    pub edges: u64,
    /// Complete 56 bit frames
    pub frames: u64,
    /// Frames whose checksum did not fold to zero
    pub checksum_failures: u64,
    /// Accumulators flushed with a partial bit count
    pub aborted: u64,
}

impl StreamStats {
    fn count(&mut self, event: &DecodeEvent) {
        match event {
            DecodeEvent::FrameCompleted(frame) => {
                self.frames += 1;
                if !frame.is_valid() {
                    self.checksum_failures += 1;
                }
            }
            DecodeEvent::FrameFlushed { bits, .. } => {
                if *bits > 0 && *bits != FRAME_BITS {
                    self.aborted += 1;
                }
            }
            _ => {}
        }
    }
}

/// Drive a whole stream through `decoder`, handing every event to `sink`
///
/// Reads `input` in fixed chunks until EOF, then applies the synthetic
/// closing edge. Returns the run counters.
pub fn run_stream<R, F>(
    mut input: R,
    decoder: &mut RtsDecoder,
    mut sink: F,
) -> DecodeResult<StreamStats>
where
    R: Read,
    F: FnMut(&DecodeEvent) -> DecodeResult<()>,
{
    let mut stats = StreamStats::default();
    let mut buf = [0u8; READ_CHUNK];

    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        stats.bytes += n as u64;
        stats.samples += 8 * n as u64;

        for event in decoder.feed_packed(&buf[..n]) {
            stats.count(&event);
            sink(&event)?;
        }
    }

    for event in decoder.finish() {
        stats.count(&event);
        sink(&event)?;
    }
    stats.edges = decoder.edges_seen();

    info!(
        bytes = stats.bytes,
        samples = stats.samples,
        edges = stats.edges,
        frames = stats.frames,
        checksum_failures = stats.checksum_failures,
        aborted = stats.aborted,
        "stream done"
    );
    Ok(stats)
}
