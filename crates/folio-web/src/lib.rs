#![forbid(unsafe_code)]

//! WASM host binding for the folio site.
//!
//! This crate provides `FolioPage`, a `wasm-bindgen`-exported class that wraps
//! [`folio_core::GalleryController`] and the page effects, discovers the
//! gallery containers in the document and applies the returned track commands
//! to the DOM.
//!
//! Call `new FolioPage(configJson?)` and then `mount()` once the DOM is ready.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioPage;

pub mod page_core;

pub use page_core::{PageCore, sanitize_ms};
