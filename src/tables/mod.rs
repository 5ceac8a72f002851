//! Scalingo resource tables
//!
//! One module per table. Each declares its schema (name, key columns,
//! columns, region fan-out) and the hydrate function that fetches and
//! streams its rows.

pub mod addon;
pub mod app;
pub mod app_event;
pub mod collaborator;
pub mod container;
pub mod cron;
pub mod database;
pub mod database_type_version;
pub mod deployment;
pub mod domain;
pub mod environment;
pub mod key;
pub mod log_drain;
pub mod log_drain_addon;
pub mod region;
pub mod scm_repo_link;
pub mod token;
pub mod user_event;
