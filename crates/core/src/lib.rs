//! Luxe Core - Shared content types.
//!
//! This crate provides the content model used across all Luxe components:
//! - `storefront` - Public-facing boutique site and content client
//! - `cli` - Command-line tools for inspecting CMS content
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every
//! entity is a read-only record of the remote CMS; deserialization is lenient
//! about absent and `null` fields so a half-filled record never fails a page.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, images and the Product/Category/Collection/Review
//!   entities

#![cfg_attr(not(test), forbid(unsafe_code))]

mod de;
pub mod types;

pub use types::*;
