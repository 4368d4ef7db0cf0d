pub mod config;
pub mod http;
pub mod manifest;
pub mod platform;
pub mod provider;
pub mod runtime;
pub mod updater;
pub mod version;
