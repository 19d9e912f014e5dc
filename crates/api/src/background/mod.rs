//! Background tasks spawned at startup.

pub mod archive_redelivery;
