//! The per-step occurrence type.
//!
//! An [`Occurrence`] is the value produced by an event stream on a single
//! step: either it carries a payload (something happened this step) or it is
//! absent (nothing happened). The combinators in this module are pure
//! projections with no side effects; they are the algebra every stream
//! combinator in the crate is built from.

/// A value that may or may not have been produced on the current step.
///
/// Exactly one variant is populated per value. There is no notion of
/// multiple simultaneous occurrences: combinators that need to express
/// "both happened" nest or tuple the payload instead.
///
/// This is deliberately a distinct type from [`Option`], so that "no event
/// this step" reads differently from "no value at all" at API boundaries,
/// and so that the absent variant does not shadow `Option::None` under glob
/// imports.
///
/// # Examples
///
/// ```
/// use ratchet::Occurrence;
///
/// let fired: Occurrence<u32> = Occurrence::Occurred(3);
/// let quiet: Occurrence<u32> = Occurrence::Absent;
///
/// assert!(fired.is_occurred());
/// assert!(quiet.is_absent());
/// assert_eq!(fired.into_option(), Some(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occurrence<T> {
    /// A value was produced this step.
    Occurred(T),
    /// Nothing was produced this step.
    #[default]
    Absent,
}

impl<T> Occurrence<T> {
    /// Returns `true` if a value was produced this step.
    pub fn is_occurred(&self) -> bool {
        matches!(self, Occurrence::Occurred(_))
    }

    /// Returns `true` if nothing was produced this step.
    pub fn is_absent(&self) -> bool {
        !self.is_occurred()
    }

    /// Projects the occurrence into an [`Option`].
    pub fn into_option(self) -> Option<T> {
        match self {
            Occurrence::Occurred(value) => Some(value),
            Occurrence::Absent => None,
        }
    }

    /// Converts from `&Occurrence<T>` to `Occurrence<&T>`.
    pub fn as_ref(&self) -> Occurrence<&T> {
        match self {
            Occurrence::Occurred(value) => Occurrence::Occurred(value),
            Occurrence::Absent => Occurrence::Absent,
        }
    }

    /// Applies a function to the payload if it occurred.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::Occurrence;
    ///
    /// let doubled = Occurrence::Occurred(2).map(|x| x * 2);
    /// assert_eq!(doubled, Occurrence::Occurred(4));
    ///
    /// let still_absent: Occurrence<i32> = Occurrence::Absent.map(|x: i32| x * 2);
    /// assert_eq!(still_absent, Occurrence::Absent);
    /// ```
    pub fn map<U, F>(self, f: F) -> Occurrence<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Occurrence::Occurred(value) => Occurrence::Occurred(f(value)),
            Occurrence::Absent => Occurrence::Absent,
        }
    }

    /// Chains an occurrence-producing computation, short-circuiting on
    /// absence.
    ///
    /// An `Absent` at any stage aborts the chain and the overall result is
    /// `Absent`. This mirrors optional-chaining semantics rather than
    /// ordinary function composition.
    pub fn and_then<U, F>(self, f: F) -> Occurrence<U>
    where
        F: FnOnce(T) -> Occurrence<U>,
    {
        match self {
            Occurrence::Occurred(value) => f(value),
            Occurrence::Absent => Occurrence::Absent,
        }
    }

    /// Collapses two same-step occurrences into one: first wins, left-biased.
    ///
    /// Returns `self` if it occurred, otherwise `other`. This is the
    /// canonical rule used wherever "either stream firing" must resolve to a
    /// single occurrence without ambiguity.
    ///
    /// # Examples
    ///
    /// ```
    /// use ratchet::Occurrence::{Absent, Occurred};
    ///
    /// assert_eq!(Occurred(1).or(Occurred(2)), Occurred(1));
    /// assert_eq!(Absent.or(Occurred(2)), Occurred(2));
    /// assert_eq!(Occurred(1).or(Absent), Occurred(1));
    /// ```
    pub fn or(self, other: Occurrence<T>) -> Occurrence<T> {
        match self {
            Occurrence::Occurred(_) => self,
            Occurrence::Absent => other,
        }
    }

    /// Returns the payload if it occurred, or the given default.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Occurrence::Occurred(value) => value,
            Occurrence::Absent => default,
        }
    }
}

impl<T> From<Option<T>> for Occurrence<T> {
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Occurrence::Occurred(value),
            None => Occurrence::Absent,
        }
    }
}

impl<T> From<Occurrence<T>> for Option<T> {
    fn from(occurrence: Occurrence<T>) -> Self {
        occurrence.into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::Occurrence::{self, Absent, Occurred};

    #[test]
    fn test_predicates() {
        assert!(Occurred(1).is_occurred());
        assert!(!Occurred(1).is_absent());
        assert!(Absent::<i32>.is_absent());
        assert!(!Absent::<i32>.is_occurred());
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Occurred("hi").into_option(), Some("hi"));
        assert_eq!(Absent::<&str>.into_option(), None);
    }

    #[test]
    fn test_map_preserves_absence() {
        assert_eq!(Occurred(3).map(|x| x + 1), Occurred(4));
        assert_eq!(Absent.map(|x: i32| x + 1), Absent);
    }

    #[test]
    fn test_and_then_short_circuits() {
        let halve = |x: i32| {
            if x % 2 == 0 {
                Occurred(x / 2)
            } else {
                Absent
            }
        };

        assert_eq!(Occurred(4).and_then(halve), Occurred(2));
        assert_eq!(Occurred(3).and_then(halve), Absent);
        assert_eq!(Absent.and_then(halve), Absent);
    }

    #[test]
    fn test_or_is_left_biased() {
        assert_eq!(Occurred(1).or(Occurred(2)), Occurred(1));
        assert_eq!(Absent.or(Occurred(2)), Occurred(2));
        assert_eq!(Occurred(1).or(Absent), Occurred(1));
        assert_eq!(Absent::<i32>.or(Absent), Absent);
    }

    #[test]
    fn test_unwrap_or() {
        assert_eq!(Occurred(5).unwrap_or(0), 5);
        assert_eq!(Absent.unwrap_or(0), 0);
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Occurrence::from(Some(1)), Occurred(1));
        assert_eq!(Occurrence::<i32>::from(None), Absent);
        assert_eq!(Option::from(Occurred(1)), Some(1));
    }

    #[test]
    fn test_default_is_absent() {
        assert_eq!(Occurrence::<i32>::default(), Absent);
    }
}
