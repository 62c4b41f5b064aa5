//! MealScout Search - Debounced, incrementally loaded recipe search
//!
//! This crate turns a stream of keystrokes and scroll events into a small
//! number of well-ordered search requests:
//!
//! - [`Debouncer`]: waits for typing to pause before a term is searched
//! - [`PageWindow`]: how many results are requested, growing on demand
//! - [`Sentinel`]: end-of-list visibility edges
//! - [`FetchCoordinator`]: decides what to fetch and infers exhaustion from
//!   short responses, fencing out superseded responses
//! - [`SearchLoader`]: async task wiring the pieces to a [`RecipeApi`]
//! - [`SearchLocation`]: the term as a shareable `?q=` URL
//!
//! ## Example
//!
//! ```ignore
//! use mealscout_search::{LoaderOptions, SearchLoader};
//!
//! let mut handle = SearchLoader::spawn(api, LoaderOptions::default());
//! handle.input("chicken").await?;
//! let snapshot = handle.settled().await?;
//! println!("{} recipes", snapshot.recipes().len());
//!
//! handle.reach_end().await?;
//! let snapshot = handle.settled().await?;
//! println!("{} recipes, more: {}", snapshot.recipes().len(), snapshot.query.has_more);
//! ```
//!
//! [`RecipeApi`]: mealscout_client::RecipeApi

pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod loader;
pub mod location;
pub mod sentinel;
pub mod window;

pub use coordinator::{
    FetchCoordinator, FetchKind, FetchPhase, FetchTicket, QueryState, SearchView, Settlement,
};
pub use debounce::Debouncer;
pub use error::LoaderError;
pub use loader::{LoaderEvent, LoaderHandle, LoaderOptions, LoaderSnapshot, SearchLoader};
pub use location::{SearchLocation, TERM_PARAM};
pub use sentinel::Sentinel;
pub use window::{PageWindow, WindowUpdate};

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;
