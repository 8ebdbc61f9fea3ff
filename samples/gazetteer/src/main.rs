//! Gazetteer Sample Application Entry Point
//!
//! Runs the same founding-year gazetteer workload against both twinmaps
//! containers through the shared `Map` contract. An optional command-line
//! argument repeats the workload, which is handy for quick profiling runs.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use twinmaps::{HashedMap, Map, MapCursor, MapError, OrderedMap};

/// Builds a founding-year gazetteer, queries it, walks it with a cursor
/// and removes an entry. The body only speaks the `Map` contract, so both
/// containers run it unchanged.
fn exercise<M>(label: &str) -> Result<(), MapError>
where
    M: Map<u32, String> + Default,
{
    let mut gazetteer = M::default();

    for (year, city) in [
        (753, "Rome"),
        (1521, "San Juan"),
        (1765, "San Jose"),
        (1776, "Philadelphia"),
        (1867, "Ottawa"),
    ] {
        *gazetteer.access_or_create(year) = city.to_string();
    }
    tracing::info!(container = label, entries = gazetteer.len(), "loaded");

    let rome = gazetteer.value_of(&753)?;
    tracing::info!(container = label, year = 753, city = %rome, "lookup");

    match gazetteer.value_of(&1) {
        Ok(city) => tracing::warn!(container = label, city = %city, "unexpected hit"),
        Err(error) => tracing::info!(container = label, %error, "lookup of year 1 failed as expected"),
    }

    let mut cursor = gazetteer.begin();
    while !cursor.is_end() {
        let (year, city) = cursor.entry()?;
        tracing::debug!(container = label, year, city = %city, "visit");
        cursor.advance()?;
    }

    let removed = gazetteer.remove(&1867)?;
    tracing::info!(container = label, removed = %removed, remaining = gazetteer.len(), "removed");

    Ok(())
}

fn main() -> Result<(), MapError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gazetteer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let repeats: usize = std::env::args()
        .nth(1)
        .and_then(|argument| argument.parse().ok())
        .unwrap_or(1);

    tracing::info!(repeats, "starting gazetteer workload");

    for round in 0..repeats {
        tracing::debug!(round, "round start");
        exercise::<OrderedMap<u32, String>>("OrderedMap")?;
        exercise::<HashedMap<u32, String>>("HashedMap")?;
    }

    tracing::info!("done");
    Ok(())
}
