//! Catalog access: the client contract, the REST implementation, an
//! in-memory implementation and client-side search.

mod client;
mod memory;
mod search;
pub mod wire;

pub use client::{CatalogClient, HttpCatalogClient};
pub use memory::StaticCatalog;
pub use search::filter_shows;
pub use wire::{event_image_path, parse_timestamp};
