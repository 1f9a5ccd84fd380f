pub mod api;
pub mod auth;
pub mod config;
pub mod geoip;
pub mod localization;
pub mod query;
