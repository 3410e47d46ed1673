//! Jobboard engine: HTTP fetch pipeline and effect execution.
mod decode;
mod engine;
mod fetch;
mod identity;
mod types;

pub use decode::decode_records;
pub use engine::{EngineError, EngineHandle};
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use identity::assign_ids;
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchGeneration, FetchProgress, ListingRecord,
};
