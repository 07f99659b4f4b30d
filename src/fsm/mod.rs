//! Contact state and edge detection.
//!
//! The monitor has exactly two stable states:
//!
//! ```text
//!            sample == OPEN
//!   ┌───────────────┐ ───────────────▶ ┌────────────────┐
//!   │ WaitingOpen   │                  │ WaitingClosed  │
//!   │ (last CLOSED) │ ◀─────────────── │ (last OPEN)    │
//!   └───────────────┘  sample == CLOSED└────────────────┘
//! ```
//!
//! Every state change is reported exactly once as a [`Transition`].  The
//! detector updates its remembered state *before* the caller acts on the
//! edge, so a failed notification is never re-fired by a later sample of
//! the same level.  There is no intermediate debounce state; filtering
//! belongs to the input driver.

use core::fmt;

use log::debug;

// ---------------------------------------------------------------------------
// Sampled state
// ---------------------------------------------------------------------------

/// Level of the alarm contact, already mapped through the pin polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    /// Contact open: the freezer is reporting a problem.
    Open,
    /// Contact closed: normal operation.
    Closed,
}

impl SignalState {
    /// Map a raw pin level through the configured polarity.
    pub const fn from_level(high: bool, active_high: bool) -> Self {
        if high == active_high {
            Self::Open
        } else {
            Self::Closed
        }
    }

    /// Whether this level means the freezer needs attention.
    pub const fn is_alarm(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// A detected change between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SignalState,
    pub to: SignalState,
}

impl Transition {
    /// The edge into `to`, whatever the opposite level is.
    pub const fn into_state(to: SignalState) -> Self {
        let from = match to {
            SignalState::Open => SignalState::Closed,
            SignalState::Closed => SignalState::Open,
        };
        Self { from, to }
    }

    /// `true` for CLOSED → OPEN (alarm), `false` for OPEN → CLOSED (all-clear).
    pub const fn is_alarm(&self) -> bool {
        self.to.is_alarm()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{2192} {}", self.from, self.to)
    }
}

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Which edge the detector is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateId {
    /// Last sample was CLOSED; the next edge is an alarm.
    WaitingOpen,
    /// Last sample was OPEN; the next edge is an all-clear.
    WaitingClosed,
}

impl From<SignalState> for StateId {
    fn from(last: SignalState) -> Self {
        match last {
            SignalState::Closed => Self::WaitingOpen,
            SignalState::Open => Self::WaitingClosed,
        }
    }
}

// ---------------------------------------------------------------------------
// Edge detector
// ---------------------------------------------------------------------------

/// Edge-triggered detector over a stream of samples.
///
/// Seeded with the startup sample, which never yields a transition.
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    last: SignalState,
    edges: u64,
}

impl EdgeDetector {
    pub fn new(initial: SignalState) -> Self {
        Self {
            last: initial,
            edges: 0,
        }
    }

    /// Feed one sample.  Returns the transition if it differs from the
    /// previous sample; the new level is remembered either way.
    pub fn observe(&mut self, sample: SignalState) -> Option<Transition> {
        if sample == self.last {
            return None;
        }
        let transition = Transition {
            from: self.last,
            to: sample,
        };
        self.last = sample;
        self.edges += 1;
        debug!("edge #{}: {}", self.edges, transition);
        Some(transition)
    }

    /// Last sampled level.
    pub fn last(&self) -> SignalState {
        self.last
    }

    /// Current machine state.
    pub fn state(&self) -> StateId {
        StateId::from(self.last)
    }

    /// Number of edges detected since startup.
    pub fn edge_count(&self) -> u64 {
        self.edges
    }
}
