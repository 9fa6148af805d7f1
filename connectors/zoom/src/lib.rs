pub mod auth;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod models;
pub mod sync;

pub use error::{Result, ZoomError};
