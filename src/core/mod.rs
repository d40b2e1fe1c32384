pub mod aggregator;
pub mod etl;
pub mod fetcher;
pub mod pipeline;
pub mod writer;

pub use crate::domain::model::{CountryRecord, DestinationKeys, Snapshot, TranslationRecord};
pub use crate::domain::ports::{ConfigProvider, CountrySource, Pipeline, Storage};
pub use crate::utils::error::Result;
