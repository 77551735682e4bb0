//! The session state machine (spec §4.6 "State machine").

/// Where a [`super::Session`] sits in its lifecycle. `Open` and
/// `Streaming` are both "ready for the next frame call"; the engine
/// distinguishes them only to mirror the spec's diagram and to log the
/// first frame transition at TRACE level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	/// Constructed, no frame call issued yet.
	Open,
	/// At least one frame call has succeeded.
	Streaming,
	/// Decode source exhausted (`NO_MORE_FRAMES`). `stop` is still legal.
	Exhausted,
	/// A frame call failed for a reason other than exhaustion. `stop` is
	/// still legal; no further frame calls are.
	Failed,
	/// Terminal: `stop` has completed. No further calls are legal.
	Closed,
}

impl Phase {
	/// Whether a frame call (`next_frame`/`write_next_frame`) is legal
	/// from this phase.
	pub fn accepts_frame_call(self) -> bool {
		matches!(self, Phase::Open | Phase::Streaming)
	}

	/// Whether `stop` is legal from this phase (spec §4.6: "From OPEN,
	/// EXHAUSTED, or FAILED the only legal transition is `stop`").
	pub fn accepts_stop(self) -> bool {
		!matches!(self, Phase::Closed)
	}
}
