mod config;
mod connector;
mod health;
mod indexes;
mod paging;
mod search;

pub use config::MongoConfig;
pub use connector::{connect, connect_with_retry};
pub use health::ping;
pub use indexes::{duplicate_key_field, ensure_unique_indexes, is_duplicate_key};
pub use paging::find_page;
pub use search::{file_reference_filter, text_search_filter, with_search};
