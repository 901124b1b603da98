//! Bounded fan-out / fan-in over independent LLM calls

use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

use crate::error::Result;

/// Run `task` for every item with at most `max_concurrency` in flight.
///
/// Results come back in input order. The first error aborts the batch and
/// drops the calls still in flight.
pub async fn fan_out<I, F, Fut, T>(items: I, max_concurrency: usize, task: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    stream::iter(items.into_iter().map(task))
        .buffered(max_concurrency.max(1))
        .try_collect()
        .await
}
