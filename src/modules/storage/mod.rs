//! Storage module for preview images
//!
//! Provides a MinIO/S3-compatible client for the public preview bucket.

mod object_store;

pub use object_store::ObjectStore;
