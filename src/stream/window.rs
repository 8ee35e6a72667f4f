//! Temporal windowing combinators: bounding occurrence production by
//! position in the sequence or by another stream.
//!
//! Operands are stepped unconditionally on every call while a combinator is
//! alive, so their state reflects elapsed time; a combinator that has
//! permanently closed switches to [`never`] and drops its operands.

use log::trace;

use crate::automaton::{Automaton, Step, Stepped};
use crate::occurrence::Occurrence;

/// The stream that never occurs.
///
/// Stateless and input-ignoring; it is its own continuation forever.
pub fn never<In: 'static, T: 'static>() -> Automaton<In, Occurrence<T>> {
    Automaton::stateless(|_input| Occurrence::Absent)
}

/// The stream that occurs with `value` on every step.
pub fn always<In: 'static, T: Clone + 'static>(value: T) -> Automaton<In, Occurrence<T>> {
    Automaton::constant(Occurrence::Occurred(value))
}

/// An infinitely repeating window between two streams.
///
/// Emits `Occurred(())` from the step `opens` occurs (inclusive) until the
/// step `closes` occurs (exclusive), then stays silent until `opens` occurs
/// again, re-arming forever. If both occur on the same step while the window
/// is closed, the window is empty and nothing is emitted.
///
/// The cycle is a two-state loop over the same pair of streams, so memory
/// stays bounded no matter how many times the window repeats.
///
/// # Examples
///
/// ```
/// use ratchet::{between, Automaton, Occurrence};
/// use ratchet::Occurrence::{Absent, Occurred};
///
/// type Pair = (Occurrence<()>, Occurrence<()>);
/// let opens = Automaton::stateless(|(open, _): Pair| open);
/// let closes = Automaton::stateless(|(_, close): Pair| close);
///
/// let window = between(opens, closes);
/// let outputs = window
///     .run([
///         (Absent, Absent),
///         (Occurred(()), Absent),
///         (Absent, Absent),
///         (Absent, Occurred(())),
///         (Occurred(()), Absent),
///     ])
///     .unwrap();
/// assert_eq!(
///     outputs,
///     vec![Absent, Occurred(()), Occurred(()), Absent, Occurred(())]
/// );
/// ```
pub fn between<In, B, C>(
    opens: Automaton<In, Occurrence<B>>,
    closes: Automaton<In, Occurrence<C>>,
) -> Automaton<In, Occurrence<()>>
where
    In: Clone + 'static,
    B: 'static,
    C: 'static,
{
    Automaton::from_step(Between {
        opens,
        closes,
        open: false,
    })
}

impl<In: 'static, Out: 'static> Automaton<In, Out> {
    /// Emits this automaton's value as an occurrence on every step until
    /// `trigger` first occurs, then is permanently silent.
    ///
    /// The triggering step itself already emits nothing; from that step the
    /// combinator switches to [`never`] and both operands are dropped. Until
    /// then, both are stepped every call.
    pub fn before<S>(self, trigger: Automaton<In, Occurrence<S>>) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
        S: 'static,
    {
        Automaton::from_step(Before {
            value: self,
            trigger,
        })
    }

    /// Like [`before`](Automaton::before), but the triggering step emits the
    /// trigger's own payload once before going permanently silent.
    pub fn before_one(
        self,
        trigger: Automaton<In, Occurrence<Out>>,
    ) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
    {
        Automaton::from_step(BeforeOne {
            value: self,
            trigger,
        })
    }

    /// Like [`before`](Automaton::before), but on trigger builds a successor
    /// stream from the trigger's payload and steps it immediately on the
    /// same sample, continuing with it from then on.
    pub fn before_with<S, F>(
        self,
        trigger: Automaton<In, Occurrence<S>>,
        make_next: F,
    ) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
        S: 'static,
        F: FnOnce(S) -> Automaton<In, Occurrence<Out>> + 'static,
    {
        Automaton::from_step(BeforeWith {
            value: self,
            trigger,
            make_next,
        })
    }

    /// Emits nothing until `trigger` first occurs (the triggering step
    /// included), then emits this automaton's value as an occurrence on
    /// every subsequent step.
    ///
    /// The value automaton is stepped throughout the silent prefix, so its
    /// state reflects elapsed time when the window opens.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let counter = Automaton::scan(0, |n: &mut i32, _: Occurrence<()>| {
    ///     *n += 1;
    ///     *n
    /// });
    /// let trigger = Automaton::stateless(|occ: Occurrence<()>| occ);
    ///
    /// let outputs = counter
    ///     .after(trigger)
    ///     .run([Absent, Occurred(()), Absent, Absent])
    ///     .unwrap();
    /// assert_eq!(outputs, vec![Absent, Absent, Occurred(3), Occurred(4)]);
    /// ```
    pub fn after<S>(self, trigger: Automaton<In, Occurrence<S>>) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
        S: 'static,
    {
        Automaton::from_step(After {
            value: self,
            trigger,
        })
    }
}

impl<In: 'static, T: 'static> Automaton<In, Occurrence<T>> {
    /// Passes through the first `n` occurrences, then is permanently silent.
    ///
    /// `take(0)` is [`never`] from the first step and never steps the
    /// underlying stream. Once the budget is spent, the stream is dropped.
    pub fn take(self, n: usize) -> Automaton<In, Occurrence<T>> {
        if n == 0 {
            return never();
        }
        Automaton::from_step(Take {
            stream: self,
            remaining: n,
        })
    }

    /// Suppresses the first `n` occurrences, then passes the rest through
    /// unchanged.
    pub fn skip(self, n: usize) -> Automaton<In, Occurrence<T>> {
        Automaton::from_step(Skip {
            stream: self,
            remaining: n,
        })
    }

    /// Rewrites occurrences whose payload fails `pred` to absent; absent
    /// steps pass through unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let events = Automaton::stateless(|occ: Occurrence<i32>| occ);
    /// let evens = events.filter(|x| x % 2 == 0);
    ///
    /// let outputs = evens.run([Occurred(1), Occurred(2)]).unwrap();
    /// assert_eq!(outputs, vec![Absent, Occurred(2)]);
    /// ```
    pub fn filter<P>(self, pred: P) -> Automaton<In, Occurrence<T>>
    where
        P: FnMut(&T) -> bool + 'static,
    {
        Automaton::from_step(Filter { stream: self, pred })
    }
}

struct Before<In, Out, S> {
    value: Automaton<In, Out>,
    trigger: Automaton<In, Occurrence<S>>,
}

impl<In, Out, S> Step<In, Occurrence<Out>> for Before<In, Out, S>
where
    In: Clone + 'static,
    Out: 'static,
    S: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        let Before { value, trigger } = *self;
        let (output, value) = value.step(input.clone())?;
        let (occurrence, trigger) = trigger.step(input)?;
        if occurrence.is_occurred() {
            trace!("before: trigger fired, closing window permanently");
            Ok((Occurrence::Absent, never()))
        } else {
            Ok((
                Occurrence::Occurred(output),
                Automaton::from_step(Before { value, trigger }),
            ))
        }
    }
}

struct BeforeOne<In, Out> {
    value: Automaton<In, Out>,
    trigger: Automaton<In, Occurrence<Out>>,
}

impl<In, Out> Step<In, Occurrence<Out>> for BeforeOne<In, Out>
where
    In: Clone + 'static,
    Out: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        let BeforeOne { value, trigger } = *self;
        let (output, value) = value.step(input.clone())?;
        let (occurrence, trigger) = trigger.step(input)?;
        match occurrence {
            Occurrence::Occurred(last) => {
                trace!("before_one: trigger fired, emitting its payload and closing");
                Ok((Occurrence::Occurred(last), never()))
            }
            Occurrence::Absent => Ok((
                Occurrence::Occurred(output),
                Automaton::from_step(BeforeOne { value, trigger }),
            )),
        }
    }
}

struct BeforeWith<In, Out, S, F> {
    value: Automaton<In, Out>,
    trigger: Automaton<In, Occurrence<S>>,
    make_next: F,
}

impl<In, Out, S, F> Step<In, Occurrence<Out>> for BeforeWith<In, Out, S, F>
where
    In: Clone + 'static,
    Out: 'static,
    S: 'static,
    F: FnOnce(S) -> Automaton<In, Occurrence<Out>> + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        let BeforeWith {
            value,
            trigger,
            make_next,
        } = *self;
        let (output, value) = value.step(input.clone())?;
        let (occurrence, trigger) = trigger.step(input.clone())?;
        match occurrence {
            Occurrence::Occurred(seed) => {
                trace!("before_with: trigger fired, building successor");
                // The successor sees the same sample the trigger fired on.
                make_next(seed).step(input)
            }
            Occurrence::Absent => Ok((
                Occurrence::Occurred(output),
                Automaton::from_step(BeforeWith {
                    value,
                    trigger,
                    make_next,
                }),
            )),
        }
    }
}

struct After<In, Out, S> {
    value: Automaton<In, Out>,
    trigger: Automaton<In, Occurrence<S>>,
}

impl<In, Out, S> Step<In, Occurrence<Out>> for After<In, Out, S>
where
    In: Clone + 'static,
    Out: 'static,
    S: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        let After { value, trigger } = *self;
        let (_, value) = value.step(input.clone())?;
        let (occurrence, trigger) = trigger.step(input)?;
        if occurrence.is_occurred() {
            trace!("after: trigger fired, opening window from next step");
            // Emission starts on the step after the trigger; the trigger is
            // no longer needed once the window is open.
            Ok((Occurrence::Absent, value.map(Occurrence::Occurred)))
        } else {
            Ok((
                Occurrence::Absent,
                Automaton::from_step(After { value, trigger }),
            ))
        }
    }
}

struct Between<In, B, C> {
    opens: Automaton<In, Occurrence<B>>,
    closes: Automaton<In, Occurrence<C>>,
    open: bool,
}

impl<In, B, C> Step<In, Occurrence<()>> for Between<In, B, C>
where
    In: Clone + 'static,
    B: 'static,
    C: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<()>> {
        let Between {
            opens,
            closes,
            mut open,
        } = *self;
        let (opened, opens) = opens.step(input.clone())?;
        let (closed, closes) = closes.step(input)?;

        if !open {
            open = opened.is_occurred();
        }
        let output = if open && closed.is_occurred() {
            // The closing step is outside the window; the cycle re-arms.
            open = false;
            Occurrence::Absent
        } else if open {
            Occurrence::Occurred(())
        } else {
            Occurrence::Absent
        };
        Ok((
            output,
            Automaton::from_step(Between {
                opens,
                closes,
                open,
            }),
        ))
    }
}

struct Take<In, T> {
    stream: Automaton<In, Occurrence<T>>,
    // Invariant: always at least 1; a spent budget switches to `never`.
    remaining: usize,
}

impl<In, T> Step<In, Occurrence<T>> for Take<In, T>
where
    In: 'static,
    T: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<T>> {
        let Take {
            stream,
            mut remaining,
        } = *self;
        let (occurrence, stream) = stream.step(input)?;
        match occurrence {
            Occurrence::Occurred(value) => {
                remaining -= 1;
                let next = if remaining == 0 {
                    never()
                } else {
                    Automaton::from_step(Take { stream, remaining })
                };
                Ok((Occurrence::Occurred(value), next))
            }
            Occurrence::Absent => Ok((
                Occurrence::Absent,
                Automaton::from_step(Take { stream, remaining }),
            )),
        }
    }
}

struct Skip<In, T> {
    stream: Automaton<In, Occurrence<T>>,
    remaining: usize,
}

impl<In, T> Step<In, Occurrence<T>> for Skip<In, T>
where
    In: 'static,
    T: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<T>> {
        let Skip {
            stream,
            mut remaining,
        } = *self;
        let (occurrence, stream) = stream.step(input)?;
        let output = match occurrence {
            Occurrence::Occurred(_) if remaining > 0 => {
                remaining -= 1;
                Occurrence::Absent
            }
            other => other,
        };
        Ok((output, Automaton::from_step(Skip { stream, remaining })))
    }
}

struct Filter<In, T, P> {
    stream: Automaton<In, Occurrence<T>>,
    pred: P,
}

impl<In, T, P> Step<In, Occurrence<T>> for Filter<In, T, P>
where
    In: 'static,
    T: 'static,
    P: FnMut(&T) -> bool + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<T>> {
        let Filter { stream, mut pred } = *self;
        let (occurrence, stream) = stream.step(input)?;
        let output = match occurrence {
            Occurrence::Occurred(value) if pred(&value) => Occurrence::Occurred(value),
            _ => Occurrence::Absent,
        };
        Ok((output, Automaton::from_step(Filter { stream, pred })))
    }
}
