pub mod client;
pub mod models;

pub use client::S3ListingClient;
pub use models::{ListPage, ManifestObjectRef};
