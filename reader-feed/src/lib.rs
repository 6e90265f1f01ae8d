//! RSS 2.0 to `FeedSnapshot` converter with fetch and cache support.

mod parse;

#[cfg(feature = "client")]
mod cache;
#[cfg(feature = "client")]
mod client;

pub use parse::parse_feed;

#[cfg(feature = "client")]
pub use cache::FeedCache;
#[cfg(feature = "client")]
pub use client::FeedClient;

pub type Result<T> = std::result::Result<T, reader_core::ReaderError>;
