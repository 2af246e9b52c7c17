// Resolver - First-matching fallback selectors
//
// The same logical affordance may be reachable through several inequivalent
// selectors depending on how the page happened to render. All candidates are
// probed concurrently, so total latency is bounded by the slowest single
// probe, while the answer still honours list order: a candidate only wins once
// every candidate before it has timed out.

use crate::probe::{Condition, Probe};
use crate::target::Locator;
use futures_util::future::join_all;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;

/// Returns the first candidate, in list order, that satisfies `condition`
/// within `timeout`, or `None` if all of them time out.
pub async fn resolve_first_matching(
    probe: &Probe,
    candidates: &[Locator],
    condition: &Condition,
    timeout: Duration,
) -> Option<Locator> {
    let mut pending: FuturesUnordered<_> = candidates
        .iter()
        .enumerate()
        .map(|(index, locator)| async move {
            (index, probe.check(locator, condition, timeout).await.found)
        })
        .collect();

    // None = still probing, Some(found) = settled
    let mut settled: Vec<Option<bool>> = vec![None; candidates.len()];

    while let Some((index, found)) = pending.next().await {
        settled[index] = Some(found);

        for (i, state) in settled.iter().enumerate() {
            match state {
                Some(true) => return Some(candidates[i].clone()),
                Some(false) => continue,
                None => break,
            }
        }
    }

    None
}

/// Returns whichever candidate satisfies `condition` first, in completion
/// order, or `None` if all of them time out.
pub async fn resolve_any(
    probe: &Probe,
    candidates: &[Locator],
    condition: &Condition,
    timeout: Duration,
) -> Option<Locator> {
    let mut pending: FuturesUnordered<_> = candidates
        .iter()
        .map(|locator| async move {
            probe
                .check(locator, condition, timeout)
                .await
                .found
                .then_some(locator)
        })
        .collect();

    while let Some(settled) = pending.next().await {
        if let Some(locator) = settled {
            return Some(locator.clone());
        }
    }
    None
}

/// Probes every locator concurrently; results are in input order.
pub async fn check_all(
    probe: &Probe,
    locators: &[Locator],
    condition: &Condition,
    timeout: Duration,
) -> Vec<bool> {
    join_all(
        locators
            .iter()
            .map(|locator| async move { probe.check(locator, condition, timeout).await.found }),
    )
    .await
}
