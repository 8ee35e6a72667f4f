//! The self-replacing step-function automaton.
//!
//! An [`Automaton`] is the core abstraction of the crate: given one input
//! sample it deterministically yields one output sample and a *replacement*
//! automaton carrying the updated internal state. State is threaded through
//! ownership rather than mutation, so a consumed automaton can never be
//! stepped twice and no combinator ever observes shared mutable state.

use std::error::Error;

/// A boxed error returned by an effectful step function.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// The result of advancing an automaton by one step.
pub type Stepped<In, Out> = Result<(Out, Automaton<In, Out>), StepError>;

/// Failure raised while advancing an automaton.
///
/// The automaton itself has no error channel; all failure comes from the
/// execution context an effectful step runs in. A failed step yields no
/// output and no continuation, so the whole chain is terminated for that
/// sample rather than left partially advanced.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The execution context reported a failure while running an effect.
    #[error("effect failed during step: {0}")]
    Effect(#[source] BoxError),
}

/// Internal single-method interface every automaton variant implements.
///
/// Pure closures, stateful scans, constants, effectful closures and all
/// combinators are structs behind this one trait. The receiver is consumed
/// so that stepping is logically destructive: the only way forward is the
/// continuation returned by `step`.
pub(crate) trait Step<In, Out> {
    fn step(self: Box<Self>, input: In) -> Stepped<In, Out>;
}

/// A transformation from input samples to output samples, advanced one
/// discrete step at a time.
///
/// Each call to [`step`](Automaton::step) consumes the automaton and returns
/// the output for this sample together with the automaton to use for the
/// next sample. The caller owns exactly one live automaton between steps;
/// move semantics make reuse of a consumed automaton unrepresentable.
///
/// An `Automaton<In, Occurrence<Out>>` is an *event stream*: it may go
/// arbitrarily long producing [`Absent`](crate::Occurrence::Absent) before
/// producing an occurrence. The stream combinators in [`crate::stream`] are
/// all defined on that shape.
///
/// # Examples
///
/// A stateful counter, threaded through three samples:
///
/// ```
/// use ratchet::Automaton;
///
/// let counter = Automaton::scan(0u32, |total, delta: u32| {
///     *total += delta;
///     *total
/// });
///
/// let (out, counter) = counter.step(2).unwrap();
/// assert_eq!(out, 2);
/// let (out, counter) = counter.step(3).unwrap();
/// assert_eq!(out, 5);
/// let (out, _counter) = counter.step(1).unwrap();
/// assert_eq!(out, 6);
/// ```
pub struct Automaton<In, Out> {
    pub(crate) inner: Box<dyn Step<In, Out>>,
}

impl<In: 'static, Out: 'static> Automaton<In, Out> {
    /// Wraps a concrete step implementation. Crate-internal seam used by
    /// every combinator module.
    pub(crate) fn from_step(step: impl Step<In, Out> + 'static) -> Self {
        Self {
            inner: Box::new(step),
        }
    }

    /// Creates an automaton from the fully general self-replacing form: a
    /// function consumed on its single step, returning the output and the
    /// automaton for the next step.
    ///
    /// Most callers want [`stateless`](Automaton::stateless) or
    /// [`scan`](Automaton::scan); this constructor is the escape hatch for
    /// combinators whose continuation is a different shape than themselves.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(In) -> (Out, Automaton<In, Out>) + 'static,
    {
        Self::from_step(FromFn { f })
    }

    /// Creates an automaton with no internal state: the same function is
    /// applied to every input sample.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::Automaton;
    ///
    /// let doubler = Automaton::stateless(|x: i32| x * 2);
    /// let (out, _doubler) = doubler.step(21).unwrap();
    /// assert_eq!(out, 42);
    /// ```
    pub fn stateless<F>(f: F) -> Self
    where
        F: FnMut(In) -> Out + 'static,
    {
        Self::from_step(Stateless { f })
    }

    /// Creates an automaton threading owned state through a step function.
    ///
    /// The canonical fold-style constructor: `f` receives the state and the
    /// input sample and produces the output, mutating the state in place for
    /// the next step.
    pub fn scan<S, F>(state: S, f: F) -> Self
    where
        S: 'static,
        F: FnMut(&mut S, In) -> Out + 'static,
    {
        Self::from_step(Scan { state, f })
    }

    /// Creates an automaton that ignores its input and emits the same value
    /// on every step, with itself as the continuation.
    pub fn constant(value: Out) -> Self
    where
        Out: Clone,
    {
        Self::from_step(Constant { value })
    }

    /// Creates an automaton whose step runs in a fallible execution context.
    ///
    /// A returned error becomes [`StepError::Effect`] and the step yields
    /// neither output nor continuation: the chain is terminated whole for
    /// that sample, never left partially advanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::Automaton;
    ///
    /// let parser = Automaton::effectful(|text: &'static str| {
    ///     text.parse::<i32>().map_err(Into::into)
    /// });
    ///
    /// let (out, parser) = parser.step("7").unwrap();
    /// assert_eq!(out, 7);
    /// assert!(parser.step("not a number").is_err());
    /// ```
    pub fn effectful<F>(f: F) -> Self
    where
        F: FnMut(In) -> Result<Out, BoxError> + 'static,
    {
        Self::from_step(Effectful { f })
    }

    /// Advances the automaton by exactly one step.
    ///
    /// Consumes the automaton and returns this sample's output together
    /// with the continuation for the next sample. The step function is
    /// executed exactly once per call; automatons never memoize or skip
    /// execution.
    pub fn step(self, input: In) -> Stepped<In, Out> {
        self.inner.step(input)
    }

    /// Post-composes a function on this automaton's outputs.
    pub fn map<U, F>(self, f: F) -> Automaton<In, U>
    where
        U: 'static,
        F: FnMut(Out) -> U + 'static,
    {
        Automaton::from_step(MapOut { source: self, f })
    }

    /// Sequential composition: this automaton's output becomes `next`'s
    /// input for the same sample.
    ///
    /// Both halves are stepped once per call, in order; failure of either
    /// aborts the composite step whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::Automaton;
    ///
    /// let double = Automaton::stateless(|x: i32| x * 2);
    /// let shift = Automaton::stateless(|x: i32| x + 1);
    ///
    /// let (out, _next) = double.pipe(shift).step(10).unwrap();
    /// assert_eq!(out, 21);
    /// ```
    pub fn pipe<U>(self, next: Automaton<Out, U>) -> Automaton<In, U>
    where
        U: 'static,
    {
        Automaton::from_step(Pipe {
            first: self,
            second: next,
        })
    }

    /// Applicative parallel composition: both automatons are driven by the
    /// same input sample and their outputs combined by `f`.
    ///
    /// Both operands are stepped on every call, left first, even when `f`
    /// ignores one side; state must advance in lockstep.
    pub fn zip_with<B, C, F>(self, other: Automaton<In, B>, f: F) -> Automaton<In, C>
    where
        In: Clone,
        B: 'static,
        C: 'static,
        F: FnMut(Out, B) -> C + 'static,
    {
        Automaton::from_step(ZipWith { a: self, b: other, f })
    }

    /// Drives the automaton across a whole input sequence, collecting one
    /// output per input.
    ///
    /// Convenience for tests and demos; the final continuation is dropped.
    /// A failing step aborts the run at that sample.
    pub fn run<I>(self, inputs: I) -> Result<Vec<Out>, StepError>
    where
        I: IntoIterator<Item = In>,
    {
        let mut automaton = self;
        let mut outputs = Vec::new();
        for input in inputs {
            let (output, next) = automaton.step(input)?;
            outputs.push(output);
            automaton = next;
        }
        Ok(outputs)
    }
}

struct FromFn<F> {
    f: F,
}

impl<In, Out, F> Step<In, Out> for FromFn<F>
where
    In: 'static,
    Out: 'static,
    F: FnOnce(In) -> (Out, Automaton<In, Out>) + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Out> {
        Ok((self.f)(input))
    }
}

struct Stateless<F> {
    f: F,
}

impl<In, Out, F> Step<In, Out> for Stateless<F>
where
    In: 'static,
    Out: 'static,
    F: FnMut(In) -> Out + 'static,
{
    fn step(mut self: Box<Self>, input: In) -> Stepped<In, Out> {
        let output = (self.f)(input);
        Ok((output, Automaton { inner: self }))
    }
}

struct Scan<S, F> {
    state: S,
    f: F,
}

impl<In, Out, S, F> Step<In, Out> for Scan<S, F>
where
    In: 'static,
    Out: 'static,
    S: 'static,
    F: FnMut(&mut S, In) -> Out + 'static,
{
    fn step(mut self: Box<Self>, input: In) -> Stepped<In, Out> {
        let output = (self.f)(&mut self.state, input);
        Ok((output, Automaton { inner: self }))
    }
}

struct Constant<T> {
    value: T,
}

impl<In, Out> Step<In, Out> for Constant<Out>
where
    In: 'static,
    Out: Clone + 'static,
{
    fn step(self: Box<Self>, _input: In) -> Stepped<In, Out> {
        let output = self.value.clone();
        Ok((output, Automaton { inner: self }))
    }
}

struct Effectful<F> {
    f: F,
}

impl<In, Out, F> Step<In, Out> for Effectful<F>
where
    In: 'static,
    Out: 'static,
    F: FnMut(In) -> Result<Out, BoxError> + 'static,
{
    fn step(mut self: Box<Self>, input: In) -> Stepped<In, Out> {
        match (self.f)(input) {
            Ok(output) => Ok((output, Automaton { inner: self })),
            Err(source) => Err(StepError::Effect(source)),
        }
    }
}

struct MapOut<In, Out, F> {
    source: Automaton<In, Out>,
    f: F,
}

impl<In, Out, U, F> Step<In, U> for MapOut<In, Out, F>
where
    In: 'static,
    Out: 'static,
    U: 'static,
    F: FnMut(Out) -> U + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, U> {
        let MapOut { source, mut f } = *self;
        let (output, source) = source.step(input)?;
        let mapped = f(output);
        Ok((mapped, Automaton::from_step(MapOut { source, f })))
    }
}

struct Pipe<In, Mid, Out> {
    first: Automaton<In, Mid>,
    second: Automaton<Mid, Out>,
}

impl<In, Mid, Out> Step<In, Out> for Pipe<In, Mid, Out>
where
    In: 'static,
    Mid: 'static,
    Out: 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, Out> {
        let Pipe { first, second } = *self;
        let (mid, first) = first.step(input)?;
        let (output, second) = second.step(mid)?;
        Ok((output, Automaton::from_step(Pipe { first, second })))
    }
}

struct ZipWith<In, A, B, F> {
    a: Automaton<In, A>,
    b: Automaton<In, B>,
    f: F,
}

impl<In, A, B, C, F> Step<In, C> for ZipWith<In, A, B, F>
where
    In: Clone + 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    F: FnMut(A, B) -> C + 'static,
{
    fn step(self: Box<Self>, input: In) -> Stepped<In, C> {
        let ZipWith { a, b, mut f } = *self;
        let (left, a) = a.step(input.clone())?;
        let (right, b) = b.step(input)?;
        let combined = f(left, right);
        Ok((combined, Automaton::from_step(ZipWith { a, b, f })))
    }
}
