mod asset;
mod sentiment;
mod timestamp;

pub use asset::{AssetQuery, RawTextItem};
pub use sentiment::{Classification, SentimentLabel, SentimentScore, Signal};
pub use timestamp::UtcDateTime;
