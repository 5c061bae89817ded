pub mod error;
pub mod models;
pub mod provider;
pub mod report;
