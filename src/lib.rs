pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod delay_manager;
pub mod error;
pub mod extractor;
pub mod followers;
pub mod logger;
pub mod lookup;
pub mod model;
pub mod number;
pub mod profile;
pub mod username;
pub mod web;

pub use client::{Fetch, FetchedPage, RobloxClient};
pub use config::Config;
pub use error::{LookupError, TransportError};
pub use lookup::LookupService;
pub use model::LookupResult;
