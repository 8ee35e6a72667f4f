//! Holding and folding combinators: turning streams into continuously
//! defined values or running accumulations.

use crate::automaton::{Automaton, Step, Stepped};
use crate::occurrence::Occurrence;

impl<In: 'static, T: 'static> Automaton<In, Occurrence<T>> {
    /// Produces `initial` until the stream first occurs, then holds the most
    /// recent occurred value until it occurs again.
    ///
    /// The stream is re-stepped on every call, even while a stale value is
    /// being held, so its internal state keeps tracking elapsed steps.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let events = Automaton::stateless(|occ: Occurrence<i32>| occ);
    /// let held = events.hold(0);
    ///
    /// let outputs = held.run([Absent, Occurred(5), Absent, Occurred(9)]).unwrap();
    /// assert_eq!(outputs, vec![0, 5, 5, 9]);
    /// ```
    pub fn hold(self, initial: T) -> Automaton<In, T>
    where
        T: Clone,
    {
        Automaton::from_step(Hold {
            stream: self,
            value: initial,
        })
    }

    /// Latches the last occurrence of each of two streams independently.
    ///
    /// Before both streams have fired at least once (possibly on different
    /// steps), emits nothing. From the first step where both latches are
    /// filled, emits `combine(&left, &right)` on every step. Neither latch
    /// takes priority over the other; any bias lives in `combine`.
    pub fn latch_with<U, V, F>(
        self,
        other: Automaton<In, Occurrence<U>>,
        combine: F,
    ) -> Automaton<In, Occurrence<V>>
    where
        In: Clone,
        U: 'static,
        V: 'static,
        F: FnMut(&T, &U) -> V + 'static,
    {
        Automaton::from_step(LatchWith {
            left: self,
            right: other,
            last_left: None,
            last_right: None,
            combine,
        })
    }

    /// Folds occurrences into an accumulator with a defined output on every
    /// step.
    ///
    /// On `Occurred(x)` the accumulator becomes `f(&acc, x)` and the new
    /// accumulator is emitted; on an absent step the unchanged accumulator
    /// is re-emitted. Unlike a pure fold, there is no silent step.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::{Automaton, Occurrence};
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// let events = Automaton::stateless(|occ: Occurrence<i32>| occ);
    /// let sums = events.fold_stream(1, |acc, x| acc + x);
    ///
    /// let outputs = sums.run([Absent, Occurred(2), Absent, Occurred(3)]).unwrap();
    /// assert_eq!(outputs, vec![1, 3, 3, 6]);
    /// ```
    pub fn fold_stream<A, F>(self, initial: A, f: F) -> Automaton<In, A>
    where
        A: Clone + 'static,
        F: FnMut(&A, T) -> A + 'static,
    {
        Automaton::from_step(FoldStream {
            stream: self,
            accumulator: initial,
            f,
        })
    }

    /// Accumulates occurrences into a sequence, most recent first.
    ///
    /// The head of the emitted `Vec` is the latest occurrence. Like
    /// [`fold_stream`](Automaton::fold_stream), the current sequence is
    /// emitted on every step, changed or not.
    pub fn collect(self) -> Automaton<In, Vec<T>>
    where
        T: Clone,
    {
        self.collect_with(Vec::new(), |items, value| items.insert(0, value))
    }

    /// Accumulates occurrences into an arbitrary ordered container via
    /// `insert`.
    pub fn collect_with<A, F>(self, initial: A, insert: F) -> Automaton<In, A>
    where
        A: Clone + 'static,
        F: FnMut(&mut A, T) + 'static,
    {
        Automaton::from_step(CollectWith {
            stream: self,
            accumulator: initial,
            insert,
        })
    }
}

/// Converts an occurrence-typed *input* directly into a continuous value.
///
/// Output `initial` until the input occurs, then the occurred value becomes
/// the new resting value. This differs from [`hold`](Automaton::hold) only
/// in that the occurrence arrives as the input sample itself rather than
/// from an automaton this combinator steps.
///
/// # Examples
///
/// ```
/// use ratchet::starting_with;
/// use ratchet::Occurrence::{Absent, Occurred};
///
/// let resting = starting_with(7);
/// let outputs = resting.run([Absent, Occurred(4), Absent]).unwrap();
/// assert_eq!(outputs, vec![7, 4, 4]);
/// ```
pub fn starting_with<T>(initial: T) -> Automaton<Occurrence<T>, T>
where
    T: Clone + 'static,
{
    Automaton::scan(initial, |resting, occurrence| {
        if let Occurrence::Occurred(value) = occurrence {
            *resting = value;
        }
        resting.clone()
    })
}

struct Hold<In, T> {
    stream: Automaton<In, Occurrence<T>>,
    value: T,
}

impl<In, T> Step<In, T> for Hold<In, T>
where
    In: 'static,
    T: Clone + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, T> {
        let Hold { stream, mut value } = *self;
        let (occurrence, stream) = stream.step(input)?;
        if let Occurrence::Occurred(latest) = occurrence {
            value = latest;
        }
        let output = value.clone();
        Ok((output, Automaton::from_step(Hold { stream, value })))
    }
}

struct LatchWith<In, T, U, F> {
    left: Automaton<In, Occurrence<T>>,
    right: Automaton<In, Occurrence<U>>,
    last_left: Option<T>,
    last_right: Option<U>,
    combine: F,
}

impl<In, T, U, V, F> Step<In, Occurrence<V>> for LatchWith<In, T, U, F>
where
    In: Clone + 'static,
    T: 'static,
    U: 'static,
    V: 'static,
    F: FnMut(&T, &U) -> V + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Occurrence<V>> {
        let LatchWith {
            left,
            right,
            mut last_left,
            mut last_right,
            mut combine,
        } = *self;

        let (left_occ, left) = left.step(input.clone())?;
        let (right_occ, right) = right.step(input)?;
        if let Occurrence::Occurred(value) = left_occ {
            last_left = Some(value);
        }
        if let Occurrence::Occurred(value) = right_occ {
            last_right = Some(value);
        }

        let output = match (&last_left, &last_right) {
            (Some(l), Some(r)) => Occurrence::Occurred(combine(l, r)),
            _ => Occurrence::Absent,
        };
        Ok((
            output,
            Automaton::from_step(LatchWith {
                left,
                right,
                last_left,
                last_right,
                combine,
            }),
        ))
    }
}

struct FoldStream<In, T, A, F> {
    stream: Automaton<In, Occurrence<T>>,
    accumulator: A,
    f: F,
}

impl<In, T, A, F> Step<In, A> for FoldStream<In, T, A, F>
where
    In: 'static,
    T: 'static,
    A: Clone + 'static,
    F: FnMut(&A, T) -> A + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, A> {
        let FoldStream {
            stream,
            mut accumulator,
            mut f,
        } = *self;
        let (occurrence, stream) = stream.step(input)?;
        if let Occurrence::Occurred(value) = occurrence {
            accumulator = f(&accumulator, value);
        }
        let output = accumulator.clone();
        Ok((
            output,
            Automaton::from_step(FoldStream {
                stream,
                accumulator,
                f,
            }),
        ))
    }
}

struct CollectWith<In, T, A, F> {
    stream: Automaton<In, Occurrence<T>>,
    accumulator: A,
    insert: F,
}

impl<In, T, A, F> Step<In, A> for CollectWith<In, T, A, F>
where
    In: 'static,
    T: 'static,
    A: Clone + 'static,
    F: FnMut(&mut A, T) + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, A> {
        let CollectWith {
            stream,
            mut accumulator,
            mut insert,
        } = *self;
        let (occurrence, stream) = stream.step(input)?;
        if let Occurrence::Occurred(value) = occurrence {
            insert(&mut accumulator, value);
        }
        let output = accumulator.clone();
        Ok((
            output,
            Automaton::from_step(CollectWith {
                stream,
                accumulator,
                insert,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Occurrence::{Absent, Occurred};

    fn events<T: 'static>() -> Automaton<Occurrence<T>, Occurrence<T>> {
        Automaton::stateless(|occurrence| occurrence)
    }

    #[test]
    fn test_hold_tracks_latest_occurrence() {
        let held = events().hold(0);
        let outputs = held
            .run([Absent, Occurred(5), Absent, Occurred(9), Absent])
            .unwrap();
        assert_eq!(outputs, vec![0, 5, 5, 9, 9]);
    }

    #[test]
    fn test_hold_re_steps_stream_while_holding() {
        // Stream with internal state: occurs with its own step count on
        // inputs that are true. If the stream were frozen while a value is
        // held, the counts would not keep up with elapsed steps.
        let counting = Automaton::scan(0, |count: &mut i32, fire: bool| {
            *count += 1;
            if fire { Occurred(*count) } else { Absent }
        });
        let held = counting.hold(0);
        let outputs = held.run([true, false, false, true]).unwrap();
        assert_eq!(outputs, vec![1, 1, 1, 4]);
    }

    #[test]
    fn test_latch_with_waits_for_both() {
        let left = Automaton::stateless(|(a, _): (Occurrence<i32>, Occurrence<i32>)| a);
        let right = Automaton::stateless(|(_, b): (Occurrence<i32>, Occurrence<i32>)| b);
        let latched = left.latch_with(right, |l, r| l + r);

        let outputs = latched
            .run([
                (Absent, Absent),
                (Occurred(1), Absent),
                (Absent, Absent),
                (Absent, Occurred(10)),
                (Occurred(2), Absent),
            ])
            .unwrap();
        assert_eq!(
            outputs,
            vec![Absent, Absent, Absent, Occurred(11), Occurred(12)]
        );
    }

    #[test]
    fn test_fold_stream_re_emits_on_absent() {
        let sums = events().fold_stream(1, |acc, x| acc + x);
        let outputs = sums.run([Absent, Occurred(2), Absent, Occurred(3)]).unwrap();
        assert_eq!(outputs, vec![1, 3, 3, 6]);
    }

    #[test]
    fn test_collect_latest_first() {
        // Occurrences 1, 2, 3 on steps 2, 5, 9 of a ten step run.
        let mut script = vec![Absent; 10];
        script[1] = Occurred(1);
        script[4] = Occurred(2);
        script[8] = Occurred(3);

        let collected = events().collect();
        let outputs = collected.run(script).unwrap();
        assert_eq!(outputs[9], vec![3, 2, 1]);
        assert_eq!(outputs[0], Vec::<i32>::new());
        assert_eq!(outputs[4], vec![2, 1]);
    }

    #[test]
    fn test_collect_with_custom_insert() {
        // Oldest first instead of the default newest first.
        let collected = events().collect_with(Vec::new(), |items, value| items.push(value));
        let outputs = collected
            .run([Occurred('a'), Absent, Occurred('b')])
            .unwrap();
        assert_eq!(outputs[2], vec!['a', 'b']);
    }

    #[test]
    fn test_starting_with_updates_resting_value() {
        let resting = starting_with(7);
        let outputs = resting
            .run([Absent, Occurred(4), Absent, Occurred(2), Absent])
            .unwrap();
        assert_eq!(outputs, vec![7, 4, 4, 2, 2]);
    }
}
