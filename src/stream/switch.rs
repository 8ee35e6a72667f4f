//! Switching combinators: replacing one automaton with another, triggered
//! by occurrences or by a sampled mode value.

use log::trace;

use crate::automaton::{Automaton, Step, Stepped};
use crate::occurrence::Occurrence;

/// Samples a discrete mode value every step and keeps exactly one live
/// automaton for the current distinct mode.
///
/// When the sampled mode changes to a new distinct value, the old
/// automaton's continuation is discarded and a fresh one is built via
/// `make`, stepped from that same sample onward. Mode equality drives the
/// switch, so every change resets the selected automaton's internal state
/// (unless `make` itself returns something capturing prior state).
///
/// The zeroth mode sample is consumed exactly once: it selects the initial
/// automaton and seeds the comparison for the next step, with no double
/// sampling.
///
/// # Examples
///
/// ```
/// use ratchet::{switch_by_mode, Automaton};
///
/// let modes = Automaton::stateless(|m: char| m);
/// let switched = switch_by_mode(modes, |mode| {
///     if *mode == 'A' {
///         Automaton::constant(10)
///     } else {
///         Automaton::constant(20)
///     }
/// });
///
/// let outputs = switched.run(['A', 'A', 'B', 'B', 'A']).unwrap();
/// assert_eq!(outputs, vec![10, 10, 20, 20, 10]);
/// ```
pub fn switch_by_mode<In, M, T, F>(mode: Automaton<In, M>, make: F) -> Automaton<In, T>
where
    In: Clone + 'static,
    M: PartialEq + 'static,
    T: 'static,
    F: FnMut(&M) -> Automaton<In, T> + 'static,
{
    Automaton::from_step(SwitchByMode {
        mode,
        make,
        live: None,
    })
}

impl<In: 'static, T: 'static> Automaton<In, Occurrence<T>> {
    /// Emits this stream's payloads, unwrapped, while it occurs; on the
    /// first absent step, switches irrevocably to `next`.
    ///
    /// The successor is stepped on the very sample that triggered the
    /// switch, and is the continuation from then on; there is no return to
    /// the stream. While the stream is occurring, `next` is cold and is not
    /// stepped.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let events = Automaton::stateless(|occ: Occurrence<i32>| occ);
    /// let chained = events.and_then(Automaton::constant(99));
    ///
    /// let outputs = chained
    ///     .run([Occurred(1), Occurred(2), Absent, Occurred(3)])
    ///     .unwrap();
    /// // The fourth input is ignored: the switch is permanent.
    /// assert_eq!(outputs, vec![1, 2, 99, 99]);
    /// ```
    pub fn and_then(self, next: Automaton<In, T>) -> Automaton<In, T>
    where
        In: Clone,
    {
        Automaton::from_step(AndThen { stream: self, next })
    }

    /// Like [`and_then`](Automaton::and_then), but the successor is built
    /// lazily from the last payload this stream was observed to emit
    /// (`None` if it never occurred).
    pub fn and_then_with<F>(self, make: F) -> Automaton<In, T>
    where
        In: Clone,
        T: Clone,
        F: FnOnce(Option<T>) -> Automaton<In, T> + 'static,
    {
        Automaton::from_step(AndThenWith {
            stream: self,
            make,
            last: None,
        })
    }

    /// Occurrence-typed variant of [`and_then`](Automaton::and_then): the
    /// successor is itself an event stream, switched to on the first absent
    /// step.
    pub fn and_then_event(
        self,
        next: Automaton<In, Occurrence<T>>,
    ) -> Automaton<In, Occurrence<T>>
    where
        In: Clone,
    {
        Automaton::from_step(AndThenEvent { stream: self, next })
    }
}

impl<In: 'static, Out: 'static> Automaton<In, Out> {
    /// Emits this automaton's value as an occurrence only on steps where
    /// `pred` holds for the input.
    ///
    /// On gated-out steps the value automaton is **not** stepped: its
    /// internal state is frozen while inactive. The starvation is the point
    /// of this combinator; use [`after`](Automaton::after) or
    /// [`or_else`](Automaton::or_else) when state must keep advancing.
    pub fn only_when<P>(self, pred: P) -> Automaton<In, Occurrence<Out>>
    where
        P: FnMut(&In) -> bool + 'static,
    {
        Automaton::from_step(OnlyWhen { value: self, pred })
    }

    /// Like [`only_when`](Automaton::only_when), gated by another stream's
    /// occurrences instead of a predicate on the input.
    ///
    /// The gate is stepped on every call; the value automaton only on open
    /// steps.
    pub fn only_when_event<G>(
        self,
        gate: Automaton<In, Occurrence<G>>,
    ) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
        G: 'static,
    {
        Automaton::from_step(OnlyWhenEvent { value: self, gate })
    }
}

struct AndThen<In, T> {
    stream: Automaton<In, Occurrence<T>>,
    next: Automaton<In, T>,
}

impl<In, T> Step<In, T> for AndThen<In, T>
where
    In: Clone + 'static,
    T: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, T> {
        let AndThen { stream, next } = *self;
        let (occurrence, stream) = stream.step(input.clone())?;
        match occurrence {
            Occurrence::Occurred(value) => {
                Ok((value, Automaton::from_step(AndThen { stream, next })))
            }
            Occurrence::Absent => {
                trace!("and_then: stream fell silent, switching to successor");
                next.step(input)
            }
        }
    }
}

struct AndThenWith<In, T, F> {
    stream: Automaton<In, Occurrence<T>>,
    make: F,
    last: Option<T>,
}

impl<In, T, F> Step<In, T> for AndThenWith<In, T, F>
where
    In: Clone + 'static,
    T: Clone + 'static,
    F: FnOnce(Option<T>) -> Automaton<In, T> + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, T> {
        let AndThenWith {
            stream,
            make,
            mut last,
        } = *self;
        let (occurrence, stream) = stream.step(input.clone())?;
        match occurrence {
            Occurrence::Occurred(value) => {
                last = Some(value.clone());
                Ok((
                    value,
                    Automaton::from_step(AndThenWith { stream, make, last }),
                ))
            }
            Occurrence::Absent => {
                trace!("and_then_with: stream fell silent, building successor");
                make(last).step(input)
            }
        }
    }
}

struct AndThenEvent<In, T> {
    stream: Automaton<In, Occurrence<T>>,
    next: Automaton<In, Occurrence<T>>,
}

impl<In, T> Step<In, Occurrence<T>> for AndThenEvent<In, T>
where
    In: Clone + 'static,
    T: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<T>> {
        let AndThenEvent { stream, next } = *self;
        let (occurrence, stream) = stream.step(input.clone())?;
        match occurrence {
            Occurrence::Occurred(value) => Ok((
                Occurrence::Occurred(value),
                Automaton::from_step(AndThenEvent { stream, next }),
            )),
            Occurrence::Absent => next.step(input),
        }
    }
}

struct SwitchByMode<In, M, T, F> {
    mode: Automaton<In, M>,
    make: F,
    live: Option<(M, Automaton<In, T>)>,
}

impl<In, M, T, F> Step<In, T> for SwitchByMode<In, M, T, F>
where
    In: Clone + 'static,
    M: PartialEq + 'static,
    T: 'static,
    F: FnMut(&M) -> Automaton<In, T> + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, T> {
        let SwitchByMode {
            mode,
            mut make,
            live,
        } = *self;
        let (current, mode) = mode.step(input.clone())?;
        let selected = match live {
            Some((previous, selected)) if previous == current => selected,
            Some(_) => {
                trace!("switch_by_mode: mode changed, discarding old continuation");
                make(&current)
            }
            None => make(&current),
        };
        let (output, selected) = selected.step(input)?;
        Ok((
            output,
            Automaton::from_step(SwitchByMode {
                mode,
                make,
                live: Some((current, selected)),
            }),
        ))
    }
}

struct OnlyWhen<In, Out, P> {
    value: Automaton<In, Out>,
    pred: P,
}

impl<In, Out, P> Step<In, Occurrence<Out>> for OnlyWhen<In, Out, P>
where
    In: 'static,
    Out: 'static,
    P: FnMut(&In) -> bool + 'static,
{
    fn step(mut self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        if (self.pred)(&input) {
            let OnlyWhen { value, pred } = *self;
            let (output, value) = value.step(input)?;
            Ok((
                Occurrence::Occurred(output),
                Automaton::from_step(OnlyWhen { value, pred }),
            ))
        } else {
            // Intentional starvation: the gated automaton keeps its state.
            Ok((Occurrence::Absent, Automaton { inner: self }))
        }
    }
}

struct OnlyWhenEvent<In, Out, G> {
    value: Automaton<In, Out>,
    gate: Automaton<In, Occurrence<G>>,
}

impl<In, Out, G> Step<In, Occurrence<Out>> for OnlyWhenEvent<In, Out, G>
where
    In: Clone + 'static,
    Out: 'static,
    G: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<Out>> {
        let OnlyWhenEvent { value, gate } = *self;
        let (occurrence, gate) = gate.step(input.clone())?;
        match occurrence {
            Occurrence::Occurred(_) => {
                let (output, value) = value.step(input)?;
                Ok((
                    Occurrence::Occurred(output),
                    Automaton::from_step(OnlyWhenEvent { value, gate }),
                ))
            }
            Occurrence::Absent => Ok((
                Occurrence::Absent,
                Automaton::from_step(OnlyWhenEvent { value, gate }),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence::{Absent, Occurred};

    fn events<T: 'static>() -> Automaton<Occurrence<T>, Occurrence<T>> {
        Automaton::stateless(|occurrence| occurrence)
    }

    fn counter<In: 'static>() -> Automaton<In, i32> {
        Automaton::scan(0, |n, _| {
            *n += 1;
            *n
        })
    }

    #[test]
    fn test_and_then_switch_is_irrevocable() {
        let chained = events().and_then(Automaton::constant(99));
        let outputs = chained
            .run([Occurred(1), Occurred(2), Absent, Occurred(3)])
            .unwrap();
        assert_eq!(outputs, vec![1, 2, 99, 99]);
    }

    #[test]
    fn test_and_then_successor_is_cold_until_switch() {
        // If the counter were stepped while the stream was occurring, the
        // first output after the switch would be greater than 1.
        let chained = events().and_then(counter());
        let outputs = chained.run([Occurred(10), Occurred(20), Absent]).unwrap();
        assert_eq!(outputs, vec![10, 20, 1]);
    }

    #[test]
    fn test_and_then_with_sees_last_payload() {
        let chained = events().and_then_with(|last| Automaton::constant(last.unwrap() * 10));
        let outputs = chained.run([Occurred(1), Occurred(2), Absent, Absent]).unwrap();
        assert_eq!(outputs, vec![1, 2, 20, 20]);
    }

    #[test]
    fn test_and_then_with_none_when_never_occurred() {
        let chained =
            events().and_then_with(|last: Option<i32>| Automaton::constant(last.unwrap_or(-1)));
        let outputs = chained.run([Absent, Absent]).unwrap();
        assert_eq!(outputs, vec![-1, -1]);
    }

    #[test]
    fn test_and_then_event_switches_to_stream() {
        let chained = events().and_then_event(events());
        let outputs = chained.run([Occurred(1), Absent, Occurred(5)]).unwrap();
        // The second input is the switching sample; the successor stream is
        // already consulted on it.
        assert_eq!(outputs, vec![Occurred(1), Absent, Occurred(5)]);
    }

    #[test]
    fn test_switch_by_mode_scenario() {
        let modes = Automaton::stateless(|m: char| m);
        let switched = switch_by_mode(modes, |mode| {
            if *mode == 'A' {
                Automaton::constant(10)
            } else {
                Automaton::constant(20)
            }
        });
        let outputs = switched.run(['A', 'A', 'B', 'B', 'A']).unwrap();
        assert_eq!(outputs, vec![10, 10, 20, 20, 10]);
    }

    #[test]
    fn test_switch_by_mode_resets_state_on_reentry() {
        let modes = Automaton::stateless(|m: char| m);
        let switched = switch_by_mode(modes, |_| counter());
        let outputs = switched.run(['A', 'A', 'B', 'A']).unwrap();
        // Re-entering mode A builds a fresh counter; step-2 state from the
        // first A run is gone.
        assert_eq!(outputs, vec![1, 2, 1, 1]);
    }

    #[test]
    fn test_only_when_starves_gated_automaton() {
        let gated = counter().only_when(|x: &i32| *x > 0);
        let outputs = gated.run([1, -1, 2]).unwrap();
        // The counter does not advance on the gated-out step.
        assert_eq!(outputs, vec![Occurred(1), Absent, Occurred(2)]);
    }

    #[test]
    fn test_only_when_event_steps_gate_every_call() {
        let gated = counter().only_when_event(events());
        let outputs = gated
            .run([Occurred(()), Absent, Occurred(()), Occurred(())])
            .unwrap();
        assert_eq!(outputs, vec![Occurred(1), Absent, Occurred(2), Occurred(3)]);
    }
}
