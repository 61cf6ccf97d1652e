//! # Meridian Core Types
//!
//! The shared vocabulary of the platform: the catalog item, the trade and
//! performance records the analytics engine consumes, and the enums they use.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate knows nothing about any other crate. Everything
//!   else in the workspace depends on it, never the other way around.
//! - **Plain data:** These are the shapes the REST layer delivers after
//!   deserialization. They carry no behavior beyond invariant checks.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Category, Level, OrderSide, SortOption};
pub use error::CoreError;
pub use structs::{Ebook, PerformanceData, PerformancePoint, TradeRecord};
