//! Ranking core: threshold resolution, per-asset scoring, distance-to-best
//! tie-break, and top-N ordering.

pub mod distance;
pub mod ranker;
pub mod scorer;
pub mod thresholds;

#[cfg(test)]
mod test_properties;
