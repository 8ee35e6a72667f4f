//! Combinators joining two streams, or a stream and a plain automaton,
//! sampled on the same step.
//!
//! Everything here steps both operands on every call; most of the module is
//! a thin layer over the applicative core
//! ([`zip_with`](crate::Automaton::zip_with)) plus the occurrence algebra.

use crate::automaton::{Automaton, BoxError, Step, StepError, Stepped};
use crate::occurrence::Occurrence;

impl<In: 'static, T: 'static> Automaton<In, Occurrence<T>> {
    /// Occurs with the pair of payloads only on steps where *both* streams
    /// occur simultaneously.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{never, Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let events = Automaton::stateless(|occ: Occurrence<i32>| occ);
    /// let paired = events.combine(never::<_, char>());
    ///
    /// // One silent operand silences the whole combination.
    /// let outputs = paired.run([Occurred(1), Absent]).unwrap();
    /// assert_eq!(outputs, vec![Absent, Absent]);
    /// ```
    pub fn combine<U>(
        self,
        other: Automaton<In, Occurrence<U>>,
    ) -> Automaton<In, Occurrence<(T, U)>>
    where
        In: Clone,
        U: 'static,
    {
        self.combine_with(other, |left, right| (left, right))
    }

    /// Like [`combine`](Automaton::combine), with the payloads merged by `f`
    /// instead of paired.
    pub fn combine_with<U, V, F>(
        self,
        other: Automaton<In, Occurrence<U>>,
        mut f: F,
    ) -> Automaton<In, Occurrence<V>>
    where
        In: Clone,
        U: 'static,
        V: 'static,
        F: FnMut(T, U) -> V + 'static,
    {
        self.zip_with(other, move |left, right| match (left, right) {
            (Occurrence::Occurred(l), Occurrence::Occurred(r)) => Occurrence::Occurred(f(l, r)),
            _ => Occurrence::Absent,
        })
    }

    /// Merges two streams of the same payload type: either firing produces
    /// an occurrence, collapsed by the left-biased
    /// [`Occurrence::or`](crate::Occurrence::or) rule on simultaneous steps.
    pub fn merge(self, other: Automaton<In, Occurrence<T>>) -> Automaton<In, Occurrence<T>>
    where
        In: Clone,
    {
        self.zip_with(other, Occurrence::or)
    }

    /// On occurrence, runs `effect` on the payload inside the execution
    /// context and rewraps its result; absent steps pass through with no
    /// effect invoked.
    ///
    /// An effect error becomes [`StepError::Effect`] and aborts the step
    /// whole, leaving no continuation.
    pub fn tag_effect<U, F>(self, effect: F) -> Automaton<In, Occurrence<U>>
    where
        U: 'static,
        F: FnMut(T) -> Result<U, BoxError> + 'static,
    {
        Automaton::from_step(TagEffect {
            stream: self,
            effect,
        })
    }
}

impl<In: 'static, Out: 'static> Automaton<In, Out> {
    /// Emits the stream's payload when it occurs, falling back to this
    /// automaton's raw output otherwise.
    ///
    /// Both operands are stepped on every call; the fallback value is
    /// computed (and its state advanced) even on steps where the stream
    /// wins.
    pub fn or_else(self, occurrences: Automaton<In, Occurrence<Out>>) -> Automaton<In, Out>
    where
        In: Clone,
    {
        self.zip_with(occurrences, |value, occurrence| occurrence.unwrap_or(value))
    }

    /// Replaces each occurrence's payload with this automaton's value,
    /// sampled on the same step.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let frame = Automaton::scan(0, |n: &mut i32, _: Occurrence<char>| {
    ///     *n += 1;
    ///     *n
    /// });
    /// let keys = Automaton::stateless(|occ: Occurrence<char>| occ);
    ///
    /// let stamped = frame.tag_on(keys);
    /// let outputs = stamped
    ///     .run([Absent, Occurred('x'), Absent, Occurred('y')])
    ///     .unwrap();
    /// assert_eq!(outputs, vec![Absent, Occurred(2), Absent, Occurred(4)]);
    /// ```
    pub fn tag_on<S>(self, occurrences: Automaton<In, Occurrence<S>>) -> Automaton<In, Occurrence<Out>>
    where
        In: Clone,
        S: 'static,
    {
        self.zip_with(occurrences, |value, occurrence| {
            occurrence.map(|_| value)
        })
    }
}

struct TagEffect<In, T, F> {
    stream: Automaton<In, Occurrence<T>>,
    effect: F,
}

impl<In, T, U, F> Step<In, Occurrence<U>> for TagEffect<In, T, F>
where
    In: 'static,
    T: 'static,
    U: 'static,
    F: FnMut(T) -> Result<U, BoxError> + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<U>> {
        let TagEffect { stream, mut effect } = *self;
        let (occurrence, stream) = stream.step(input)?;
        let output = match occurrence {
            Occurrence::Occurred(value) => match effect(value) {
                Ok(tagged) => Occurrence::Occurred(tagged),
                Err(source) => return Err(StepError::Effect(source)),
            },
            Occurrence::Absent => Occurrence::Absent,
        };
        Ok((output, Automaton::from_step(TagEffect { stream, effect })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence::{Absent, Occurred};
    use crate::stream::never;
    use std::cell::Cell;
    use std::rc::Rc;

    fn events<T: 'static>() -> Automaton<Occurrence<T>, Occurrence<T>> {
        Automaton::stateless(|occurrence| occurrence)
    }

    fn counter<In: 'static>() -> Automaton<In, i32> {
        Automaton::scan(0, |n, _| {
            *n += 1;
            *n
        })
    }

    type Pair = (Occurrence<i32>, Occurrence<i32>);

    fn firsts() -> Automaton<Pair, Occurrence<i32>> {
        Automaton::stateless(|(a, _)| a)
    }

    fn seconds() -> Automaton<Pair, Occurrence<i32>> {
        Automaton::stateless(|(_, b)| b)
    }

    #[test]
    fn test_combine_with_never_is_silent() {
        let paired = events().combine(never::<_, ()>());
        let outputs = paired.run([Occurred(1), Absent, Occurred(2)]).unwrap();
        assert_eq!(outputs, vec![Absent, Absent, Absent]);
    }

    #[test]
    fn test_combine_requires_simultaneity() {
        let paired = firsts().combine(seconds());
        let outputs = paired
            .run([
                (Occurred(1), Absent),
                (Occurred(2), Occurred(20)),
                (Absent, Occurred(30)),
            ])
            .unwrap();
        assert_eq!(outputs, vec![Absent, Occurred((2, 20)), Absent]);
    }

    #[test]
    fn test_combine_with_applies_function() {
        let summed = firsts().combine_with(seconds(), |a, b| a + b);
        let outputs = summed
            .run([(Occurred(1), Occurred(2)), (Occurred(3), Absent)])
            .unwrap();
        assert_eq!(outputs, vec![Occurred(3), Absent]);
    }

    #[test]
    fn test_merge_is_left_biased() {
        let merged = firsts().merge(seconds());
        let outputs = merged
            .run([
                (Occurred(1), Occurred(2)),
                (Absent, Occurred(2)),
                (Occurred(1), Absent),
                (Absent, Absent),
            ])
            .unwrap();
        assert_eq!(outputs, vec![Occurred(1), Occurred(2), Occurred(1), Absent]);
    }

    #[test]
    fn test_or_else_advances_fallback_during_override() {
        let combined = counter().or_else(events());
        let outputs = combined.run([Absent, Occurred(50), Absent]).unwrap();
        // Third output is 3, not 2: the counter was stepped on the
        // overridden step too.
        assert_eq!(outputs, vec![1, 50, 3]);
    }

    #[test]
    fn test_tag_on_samples_same_step() {
        let stamped = counter().tag_on(events());
        let outputs = stamped
            .run([Absent, Occurred('x'), Absent, Occurred('y')])
            .unwrap();
        assert_eq!(outputs, vec![Absent, Occurred(2), Absent, Occurred(4)]);
    }

    #[test]
    fn test_tag_effect_runs_only_on_occurrences() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let tagged = events().tag_effect(move |x: i32| {
            seen.set(seen.get() + 1);
            Ok(x * 2)
        });

        let outputs = tagged.run([Absent, Occurred(3), Absent]).unwrap();
        assert_eq!(outputs, vec![Absent, Occurred(6), Absent]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_tag_effect_error_aborts_step() {
        let tagged = events().tag_effect(|x: i32| {
            if x < 0 {
                Err("negative payload".into())
            } else {
                Ok(x)
            }
        });
        let err = tagged.run([Occurred(1), Occurred(-1)]).unwrap_err();
        assert!(matches!(err, StepError::Effect(_)));
    }
}
