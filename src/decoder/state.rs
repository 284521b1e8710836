//! Protocol state machine for the RTS pulse train
//!
//! A frame on the air is a run of hardware sync pulses (about 2.4 ms
//! high/low pairs), one long software sync high (about 4.7 ms), then 56
//! Manchester coded data symbols of about 1.2 ms each. The machine walks
//! edge events through that structure; a rising mid-symbol edge decodes
//! as 1, a falling one as 0.
//!
//! `next_state` is a pure function of (state, level, length) and
//! `frame_action` derives the accumulator side effect from the
//! transition, so both are testable without any stream plumbing.

/// Timing windows in 36 us samples, bounds inclusive
mod timing {
    /// Hardware sync pulse, nominal 68 samples
    pub const HW_SYNC_MIN: u64 = 64;
    pub const HW_SYNC_MAX: u64 = 72;
    /// Software sync high before the first data symbol, nominal 130
    pub const SOFT_SYNC_MIN: u64 = 127;
    pub const SOFT_SYNC_MAX: u64 = 133;
    /// Half data symbol, nominal 17
    pub const HALF_SYMBOL_MIN: u64 = 10;
    pub const HALF_SYMBOL_MAX: u64 = 25;
    /// Full data symbol, nominal 34
    pub const FULL_SYMBOL_MIN: u64 = 30;
    pub const FULL_SYMBOL_MAX: u64 = 40;
}

/// Position within the RTS pulse train
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolState {
    /// Waiting for the first hardware sync pulse
    #[default]
    Idle,
    /// Inside the hardware sync pulse train
    Preamble,
    /// At a decoded symbol edge, a full symbol length from the next one
    Data0,
    /// Half a symbol in, between two half-symbol edges
    Data1,
}

impl ProtocolState {
    /// Whether the machine is collecting data bits in this state
    pub fn in_data(&self) -> bool {
        matches!(self, ProtocolState::Data0 | ProtocolState::Data1)
    }
}

#[inline]
fn in_window(length: u64, min: u64, max: u64) -> bool {
    length >= min && length <= max
}

/// Classify one edge event: the state the machine moves to
pub fn next_state(state: ProtocolState, level: u8, length: u64) -> ProtocolState {
    use timing::*;
    use ProtocolState::*;

    match state {
        Idle => {
            if level == 0 && in_window(length, HW_SYNC_MIN, HW_SYNC_MAX) {
                Preamble
            } else {
                Idle
            }
        }
        Preamble => {
            if level == 0 && in_window(length, SOFT_SYNC_MIN, SOFT_SYNC_MAX) {
                Data0
            } else if in_window(length, HW_SYNC_MIN, HW_SYNC_MAX) {
                Preamble
            } else {
                Idle
            }
        }
        Data0 => {
            if in_window(length, FULL_SYMBOL_MIN, FULL_SYMBOL_MAX) {
                Data0
            } else if in_window(length, HALF_SYMBOL_MIN, HALF_SYMBOL_MAX) {
                Data1
            } else {
                Idle
            }
        }
        Data1 => {
            if in_window(length, HALF_SYMBOL_MIN, HALF_SYMBOL_MAX) {
                Data0
            } else {
                Idle
            }
        }
    }
}

/// Accumulator side effect implied by one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Nothing to do
    None,
    /// Software sync seen; reset the accumulator
    Start,
    /// Decoded symbol edge; append the edge level as the next bit
    AppendBit(u8),
    /// Left the data states; flush whatever was collected
    Flush,
}

/// Derive the accumulator action for the transition `from` -> `to`
///
/// At most one action applies per transition: a flush can only happen on
/// the way out of the data states, a start only on the way in from the
/// preamble, and an append only while moving between them.
pub fn frame_action(from: ProtocolState, to: ProtocolState, level: u8) -> FrameAction {
    if from.in_data() && !to.in_data() {
        FrameAction::Flush
    } else if from == ProtocolState::Preamble && to == ProtocolState::Data0 {
        FrameAction::Start
    } else if from.in_data() && to == ProtocolState::Data0 {
        FrameAction::AppendBit(level)
    } else {
        FrameAction::None
    }
}

/// MSB-first accumulator for the 56 frame bits
///
/// The first bit on the air is the most significant bit of the frame.
/// Collecting more than 64 bits silently drops the oldest ones; the
/// flush logic rejects any count other than 56 anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameAssembler {
    bits: u64,
    count: u8,
}

impl FrameAssembler {
    /// Drop everything collected so far
    pub fn reset(&mut self) {
        self.bits = 0;
        self.count = 0;
    }

    /// Shift one bit in at the bottom
    pub fn push(&mut self, bit: u8) {
        self.bits = (self.bits << 1) | u64::from(bit & 1);
        self.count = self.count.saturating_add(1);
    }

    /// Number of bits collected
    pub fn len(&self) -> u8 {
        self.count
    }

    /// True when nothing has been collected
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Accumulated value, first bit in the highest collected position
    pub fn value(&self) -> u64 {
        self.bits
    }
}
