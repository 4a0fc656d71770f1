//! Stable top-down merge sort driven by an asynchronous comparator.
//!
//! The comparator may suspend (it usually runs script code), so comparisons
//! are awaited one at a time in merge order. The left element is taken
//! unless the comparator puts the right one strictly first, so the sort is
//! stable.

use futures::future::{FutureExt, LocalBoxFuture};

/// Sort `items`. `precedes(a, b)` resolves to `true` when `a` may stay
/// ahead of `b`, ties included; on `false` the right-hand element is taken.
pub fn merge_sort<'a, T, E, F>(items: Vec<T>, precedes: &'a F) -> LocalBoxFuture<'a, Result<Vec<T>, E>>
where
    T: Clone + 'a,
    E: 'a,
    F: Fn(T, T) -> LocalBoxFuture<'a, Result<bool, E>>,
{
    async move {
        if items.len() <= 1 {
            return Ok(items);
        }
        let mut left = items;
        let right = left.split_off(left.len() / 2);
        let left = merge_sort(left, precedes).await?;
        let right = merge_sort(right, precedes).await?;
        merge(left, right, precedes).await
    }
    .boxed_local()
}

async fn merge<'a, T, E, F>(left: Vec<T>, right: Vec<T>, precedes: &'a F) -> Result<Vec<T>, E>
where
    T: Clone + 'a,
    F: Fn(T, T) -> LocalBoxFuture<'a, Result<bool, E>>,
{
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if precedes(left[i].clone(), right[j].clone()).await? {
            out.push(left[i].clone());
            i += 1;
        } else {
            out.push(right[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    Ok(out)
}
