//! Iterator utilities.
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::{Ordering, PartialOrd};
use std::error::Error;
use std::fmt;

/// Maximum of a collection of items where the maximum might not exist.
pub trait PartialMax {
    type Item;

    /// A maximum element of an iterator when one exists.
    ///
    /// If several elements are equally maximum then the last one is returned.
    ///
    /// # Errors
    /// Returns a [`PartialMaxError`] if there are no elements or the elements are not comparable.
    fn partial_max(self) -> Result<Self::Item, PartialMaxError>;
}

impl<T, I> PartialMax for I
where
    T: PartialOrd,
    I: Iterator<Item = T>,
{
    type Item = T;

    fn partial_max(mut self) -> Result<Self::Item, PartialMaxError> {
        match self.try_fold(None, |acc: Option<T>, x| match acc {
            None => Ok(Some(x)),
            Some(a) => match a.partial_cmp(&x) {
                None => Err(()),
                Some(Ordering::Greater) => Ok(Some(a)),
                Some(_) => Ok(Some(x)),
            },
        }) {
            Ok(Some(x)) => Ok(x),
            Ok(None) => Err(PartialMaxError::Empty),
            Err(_) => Err(PartialMaxError::Incomparable),
        }
    }
}

/// The index of a maximal element in a collection, according to a comparison function.
///
/// # Example
/// Get the argmax of an iterator of floats and panic if any are NaN:
///
/// ```
/// use kbandit::utils::iter::ArgMaxBy;
///
/// let v = vec![1.0, 2.5, -3.0];
/// let argmax = v.into_iter().argmax_by(|a: &f64, b: &f64| a.partial_cmp(b).unwrap());
/// assert_eq!(argmax, Some(1));
/// ```
pub trait ArgMaxBy {
    type Item;

    /// The index of an element that gives the maximum value from the specified function.
    ///
    /// If several elements are equally maximum, the last index is returned.
    /// If the iterator is empty, None is returned.
    fn argmax_by<F>(self, compare: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering;
}

impl<I: Iterator> ArgMaxBy for I {
    type Item = <Self as Iterator>::Item;

    fn argmax_by<F>(self, mut compare: F) -> Option<usize>
    where
        F: FnMut(&Self::Item, &Self::Item) -> Ordering,
    {
        self.enumerate()
            .max_by(|(_, x), (_, y)| compare(x, y))
            .map(|(i, _)| i)
    }
}

/// The index of a maximal value, chosen uniformly at random among all tied maxima.
///
/// Ties are exact floating-point equality.
/// Returns `None` if `values` is empty or contains incomparable values (NaN).
///
/// # Example
/// ```
/// use kbandit::utils::iter::rand_argmax;
/// use kbandit::Prng;
/// use rand::SeedableRng;
///
/// let mut rng = Prng::seed_from_u64(0);
/// let i = rand_argmax(&[5.0, 5.0, 1.0], &mut rng).unwrap();
/// assert!(i == 0 || i == 1);
/// ```
pub fn rand_argmax<'a, I, R>(values: I, rng: &mut R) -> Option<usize>
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
    R: Rng + ?Sized,
{
    let values = values.into_iter();
    let max = values.clone().partial_max().ok()?;
    // A lone NaN is accepted by partial_max since no comparison takes place.
    if max.is_nan() {
        return None;
    }
    #[allow(clippy::float_cmp)]
    let ties: Vec<usize> = values
        .enumerate()
        .filter(|(_, v)| *v == max)
        .map(|(i, _)| i)
        .collect();
    ties.choose(rng).copied()
}

/// Reason that the maximum does not exist.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PartialMaxError {
    /// The collection is empty, there is no maximum.
    Empty,
    /// Some pair of elements cannot be compared.
    Incomparable,
}

impl fmt::Display for PartialMaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Empty => "Empty",
                Self::Incomparable => "Incomparable",
            }
        )
    }
}

impl Error for PartialMaxError {}


#[cfg(test)]
mod argmax_by {
    use super::*;

    #[test]
    fn last_of_ties() {
        let v = [1.0, 3.0, 3.0, 2.0];
        assert_eq!(
            v.iter().argmax_by(|a, b| a.partial_cmp(b).unwrap()),
            Some(2)
        );
    }

    #[test]
    fn empty() {
        let v: [f64; 0] = [];
        assert_eq!(v.iter().argmax_by(|a, b| a.partial_cmp(b).unwrap()), None);
    }
}
