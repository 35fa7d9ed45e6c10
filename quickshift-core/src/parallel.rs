//! Per-point fan-out used by density, neighbour, and extension queries.
//!
//! Each point's query is independent, so with the `parallel` feature the work
//! is spread over the Rayon pool. Successful results are always returned in
//! input order. When several points fail, which error is reported is only
//! fixed for the sequential build.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Applies `f` to every index in `0..count`, collecting results in order.
#[cfg(feature = "parallel")]
pub(crate) fn try_map_range<T, E, F>(count: usize, f: F) -> Result<Vec<T>, E>
where
    T: Send,
    E: Send,
    F: Fn(usize) -> Result<T, E> + Sync + Send,
{
    (0..count).into_par_iter().map(f).collect()
}

/// Applies `f` to every index in `0..count`, collecting results in order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn try_map_range<T, E, F>(count: usize, f: F) -> Result<Vec<T>, E>
where
    F: Fn(usize) -> Result<T, E>,
{
    (0..count).map(f).collect()
}

/// Applies `f` to every element of `items`, collecting results in order.
#[cfg(feature = "parallel")]
pub(crate) fn try_map_slice<I, T, E, F>(items: &[I], f: F) -> Result<Vec<T>, E>
where
    I: Sync,
    T: Send,
    E: Send,
    F: Fn(&I) -> Result<T, E> + Sync + Send,
{
    items.par_iter().map(f).collect()
}

/// Applies `f` to every element of `items`, collecting results in order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn try_map_slice<I, T, E, F>(items: &[I], f: F) -> Result<Vec<T>, E>
where
    F: Fn(&I) -> Result<T, E>,
{
    items.iter().map(f).collect()
}
