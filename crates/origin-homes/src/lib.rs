//! Sale and rental property listings.
//!
//! [`listings`] holds the workflow shared by both listing kinds, [`storage`]
//! the relational and in-memory repositories, and [`media`] the hosted image
//! library client.

pub mod config;
pub mod error;
pub mod listings;
pub mod media;
pub mod storage;
pub mod telemetry;
