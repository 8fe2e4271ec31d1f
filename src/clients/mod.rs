pub mod api_client;
pub mod error_mapping;

pub use api_client::ApiClient;
