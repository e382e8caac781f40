use crate::models::{FinalAggregate, MonthYear, PrecipitationPeak};

/// Single-worker reduction to the wettest calendar month.
///
/// Must be handed the complete keyspace; running it over a shard only yields
/// that shard's maximum. Shard maxima can be combined with
/// [`PrecipitationPeak::max`].
pub struct GlobalMaxReducer;

impl GlobalMaxReducer {
    /// Scan every candidate once. Returns `None` when there are no candidates.
    pub fn reduce<I>(candidates: I) -> Option<PrecipitationPeak>
    where
        I: IntoIterator<Item = (MonthYear, FinalAggregate)>,
    {
        candidates
            .into_iter()
            .map(|(key, aggregate)| PrecipitationPeak::new(key, aggregate.total_precipitation()))
            .fold(None, |best: Option<PrecipitationPeak>, candidate| match best {
                Some(incumbent) if !candidate.beats(&incumbent) => Some(incumbent),
                _ => Some(candidate),
            })
    }
}
