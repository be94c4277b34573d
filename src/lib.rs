pub mod config;
pub mod errors;
pub mod menu;
pub mod models;
pub mod schema;
pub mod service;
pub mod test_utils;

pub use config::ConnectionConfig;
pub use errors::StudentError;
pub use service::StudentRecordService;
