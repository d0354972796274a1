//! Hosted image library adapters.

pub mod cloudinary;

pub use cloudinary::{sign, CloudinaryClient};
