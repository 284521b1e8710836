//! Edge detection over the demodulated sample stream
//!
//! Samples arrive as single bits (36 us per sample). This module turns
//! them into level change events carrying the run length of the level
//! that just ended, which is all the protocol state machine looks at.
//!
//! Two level sources are available:
//! - `Raw`: the sample bit itself
//! - `Windowed`: a majority vote with hysteresis over the last eight
//!   samples, for noisy captures
//!
//! Both feed the same run length accounting.

use serde::Deserialize;

mod constants {
    /// Majority window depth in samples
    pub const WINDOW_DEPTH: u8 = 8;
    /// Window bits required to flip the output high
    pub const RISE_COUNT: u8 = 6;
    /// Window bits at or below which the output flips low
    pub const FALL_COUNT: u8 = 2;
}

/// A level transition on the (possibly filtered) sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Level the signal changed to (0 or 1)
    pub level: u8,
    /// Number of samples the previous level persisted
    pub length: u64,
}

/// Level source selection for the edge detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Compare raw sample bits directly
    #[default]
    Raw,
    /// Majority vote with hysteresis over the last eight samples
    Windowed,
}

/// Sliding majority vote over the last eight raw samples
///
/// The output flips high only when at least six window bits are set and
/// low only when at most two are, so isolated glitches in either
/// direction never produce an edge.
#[derive(Debug, Clone, Default)]
struct MajorityFilter {
    window: u8,
    ones: u8,
    level: u8,
}

impl MajorityFilter {
    fn update(&mut self, bit: u8) -> u8 {
        if self.window & (1 << (constants::WINDOW_DEPTH - 1)) != 0 {
            self.ones -= 1;
        }
        self.window <<= 1;
        if bit != 0 {
            self.window |= 1;
            self.ones += 1;
        }

        if self.level != 0 && self.ones <= constants::FALL_COUNT {
            self.level = 0;
        } else if self.level == 0 && self.ones >= constants::RISE_COUNT {
            self.level = 1;
        }
        self.level
    }
}

#[derive(Debug, Clone)]
enum LevelFilter {
    Raw,
    Windowed(MajorityFilter),
}

/// Turns sample bits into [Edge] events
///
/// The stream is assumed to start at level 0. A stream whose very first
/// sample is 1 therefore yields one edge of length 0; no timing window
/// accepts it, so the state machine simply stays in Idle.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    filter: LevelFilter,
    level: u8,
    run: u64,
}

impl EdgeDetector {
    /// Create a detector with the given level source
    pub fn new(mode: FilterMode) -> Self {
        let filter = match mode {
            FilterMode::Raw => LevelFilter::Raw,
            FilterMode::Windowed => LevelFilter::Windowed(MajorityFilter::default()),
        };
        Self {
            filter,
            level: 0,
            run: 0,
        }
    }

    /// Feed one sample bit, returning the edge it completes, if any
    pub fn feed(&mut self, sample: u8) -> Option<Edge> {
        let bit = u8::from(sample != 0);
        let new_level = match &mut self.filter {
            LevelFilter::Raw => bit,
            LevelFilter::Windowed(filter) => filter.update(bit),
        };

        if new_level != self.level {
            let edge = Edge {
                level: new_level,
                length: self.run,
            };
            self.level = new_level;
            self.run = 1;
            Some(edge)
        } else {
            self.run += 1;
            None
        }
    }

    /// Synthetic closing edge for the end of the stream
    ///
    /// Inverts the current level so that whatever run is still open gets
    /// handed to the state machine and a pending frame can be flushed.
    pub fn finish(&mut self) -> Edge {
        let edge = Edge {
            level: self.level ^ 1,
            length: self.run,
        };
        self.level ^= 1;
        self.run = 0;
        edge
    }

    /// Current (filtered) signal level
    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(FilterMode::Raw)
    }
}
