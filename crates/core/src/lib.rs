//! Domain types and pure rules for the diary service.
//!
//! Nothing in this crate touches the network or the database; the `db`,
//! `clients` and `api` crates build on these definitions.

pub mod diary;
pub mod error;
pub mod lookup;
pub mod patch;
pub mod types;
