//! Ratchet - discrete-step reactive signals for Rust
//!
//! This library provides a small runtime for values that advance one
//! discrete step at a time: each input sample is threaded through a pure
//! step function that returns the output for this step and the automaton to
//! use for the next one. On top of that core sits an occurrence algebra for
//! "may-or-may-not-have-happened" values, with combinators for holding,
//! windowing, switching and combining event streams.
//!
//! The two building blocks:
//!
//! - [`Automaton`]: a self-replacing step function. Stepping consumes the
//!   automaton and yields `(output, next_automaton)`, so internal state is
//!   threaded by ownership and a consumed automaton can never be reused.
//! - [`Occurrence`]: a per-step value that either carries data or carries
//!   nothing this step. An `Automaton<In, Occurrence<T>>` is an event
//!   stream.
//!
//! The host loop that produces samples (frames, ticks, time deltas) is
//! external to this crate; it owns exactly one top-level automaton between
//! steps and drives it with [`Automaton::step`].
//!
//! # Example
//!
//! ```
//! use ratchet::{Automaton, Occurrence};
//! use ratchet::Occurrence::{Absent, Occurred};
//!
//! // Key presses arrive as occurrences; hold the latest one as the
//! // current selection, starting from a default.
//! let keys = Automaton::stateless(|occ: Occurrence<char>| occ);
//! let selection = keys.hold('-');
//!
//! let outputs = selection
//!     .run([Absent, Occurred('a'), Absent, Occurred('b')])
//!     .unwrap();
//! assert_eq!(outputs, vec!['-', 'a', 'a', 'b']);
//! ```

pub mod automaton;
pub mod occurrence;
pub mod stream;

// Re-export commonly used types at the crate root
pub use automaton::{Automaton, BoxError, StepError, Stepped};
pub use occurrence::Occurrence;
pub use stream::{always, between, never, starting_with, switch_by_mode};
