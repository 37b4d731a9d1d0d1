pub mod api;
pub mod config;
pub mod db;
pub mod observability;
