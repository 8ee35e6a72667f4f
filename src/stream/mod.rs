//! Combinators over event streams.
//!
//! An event stream is an `Automaton<In, Occurrence<T>>`: an automaton whose
//! per-step output may or may not carry a value. This module layers four
//! families of combinators over that shape:
//!
//! - holding/folding ([`hold`](crate::Automaton::hold),
//!   [`fold_stream`](crate::Automaton::fold_stream), ...) turn a stream into
//!   a continuously defined value;
//! - temporal windowing ([`before`](crate::Automaton::before),
//!   [`take`](crate::Automaton::take), [`between`], ...) bound or gate
//!   occurrence production;
//! - switching ([`and_then`](crate::Automaton::and_then),
//!   [`switch_by_mode`], ...) replace one automaton with another when a
//!   stream fires or falls silent;
//! - combining ([`combine`](crate::Automaton::combine),
//!   [`merge`](crate::Automaton::merge), ...) join two streams sampled on
//!   the same step.
//!
//! Every combinator documents which of its operands are stepped on which
//! steps. Unless a contract says otherwise (the `only_when` family starves
//! its gated operand on purpose), operands are stepped unconditionally on
//! every call so that their internal state tracks elapsed time even while
//! their output is unused.

mod combine;
mod hold;
mod switch;
mod window;

pub use hold::starting_with;
pub use switch::switch_by_mode;
pub use window::{always, between, never};
