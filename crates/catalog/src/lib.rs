//! # Meridian Catalog Engine
//!
//! The marketplace query engine: given the in-memory catalog, a filter state,
//! a search string and a sort option, derive the visible, ordered subset.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate depending only on `core-types`.
//! - **Derived queries:** `visible_items` is a pure function of its inputs and
//!   is re-run from scratch on every state change. The view layer owns a single
//!   mutable `FilterState` and mutates it one dimension at a time through
//!   [`FilterState::apply`]; nothing is cached between calls.
//! - **One mutation path:** the only stored-state mutation in this crate is
//!   [`Catalog::purchase`].
//!
//! ## Public API
//!
//! - `Catalog`: owns the item vector, exposes `visible` and `purchase`.
//! - `FilterState` / `FilterUpdate`: the query state and its update messages.
//! - `visible_items`: the underlying pure query for callers that own a slice.

pub mod engine;
pub mod filter;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use engine::visible_items;
pub use filter::{FilterState, FilterUpdate};
pub use store::Catalog;
