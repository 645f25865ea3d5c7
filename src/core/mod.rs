pub mod aggregator;
pub mod alias_index;
pub mod etl;
pub mod feed_parser;
pub mod matcher;

pub use crate::domain::model::{
    CatalogEntry, ExtractResult, FeedItem, MatchedArticle, ModelRecord, OutputDocument, Source,
    SourceFeed,
};
pub use crate::domain::ports::{ConfigProvider, FeedFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
