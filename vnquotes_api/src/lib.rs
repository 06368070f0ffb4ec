mod client;
pub mod config;
pub mod date;
mod errors;
pub mod request;
mod user_agent;
pub use self::client::Client;
pub use self::config::ClientConfig;
pub use self::errors::Error;
pub use self::request::{ExchangeRequest, HnxSearchForm, RequestBody};
