//! Aggregation dispatcher.
//!
//! Resolves one content identifier against every registered provider,
//! joins the calls under the requested policy and turns the merged output
//! into a per-tier selection.

mod dispatcher;
mod types;

pub use dispatcher::Aggregator;
pub use types::{
    AggregatorError, ExtendedDetails, JoinPolicy, Resolution, ResolveParams, ResolveRequest,
};
