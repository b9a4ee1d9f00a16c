//! Filter vocabulary: asset types, segment dimensions, closed value sets,
//! recognized metric lists.

pub mod asset;
pub mod filters;
pub mod metrics;
pub mod vocab;
