//! An iterator adapter that applies a fixed function to every item.

use core::iter::FusedIterator;

/// Yields `transform(item)` for every item of `source`.
///
/// Unlike [`Iterator::map`], the adapter is a nameable public type, so
/// projections such as [`Keys`](crate::hash_map::Keys) can store it with a
/// function-pointer transform. The source is consumed lazily, one item per
/// call to `next`; removal is not supported.
///
/// ```rust
/// # use compact_hash::transform::Transformed;
/// let doubled = Transformed::new([1, 2, 3].into_iter(), |n: i32| n * 2);
/// assert_eq!(doubled.collect::<Vec<_>>(), [2, 4, 6]);
/// ```
#[derive(Clone, Debug)]
pub struct Transformed<I, F> {
    source: I,
    transform: F,
}

impl<I, F> Transformed<I, F> {
    /// Wraps `source`, applying `transform` to each item it yields.
    #[inline]
    pub fn new(source: I, transform: F) -> Self {
        Self { source, transform }
    }

    /// Unwraps the adapter, returning the source iterator.
    pub fn into_inner(self) -> I {
        self.source
    }
}

impl<I, F, U> Iterator for Transformed<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> U,
{
    type Item = U;

    #[inline]
    fn next(&mut self) -> Option<U> {
        self.source.next().map(&mut self.transform)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<I, F, U> DoubleEndedIterator for Transformed<I, F>
where
    I: DoubleEndedIterator,
    F: FnMut(I::Item) -> U,
{
    #[inline]
    fn next_back(&mut self) -> Option<U> {
        self.source.next_back().map(&mut self.transform)
    }
}

impl<I, F, U> ExactSizeIterator for Transformed<I, F>
where
    I: ExactSizeIterator,
    F: FnMut(I::Item) -> U,
{
}

impl<I, F, U> FusedIterator for Transformed<I, F>
where
    I: FusedIterator,
    F: FnMut(I::Item) -> U,
{
}
