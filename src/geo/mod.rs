//! The 2-D world a tour travels through.
//!
//! A [`GeoWorld`] is an immutable, indexable set of distinct [`Point`]s.
//! Indices `0..N` are the identity of each point for the rest of the
//! crate: tours are permutations of these indices, and the engine only
//! ever asks the world for [`GeoWorld::distance`] between two of them.
//!
//! # Key Types
//!
//! - [`Point`]: integer coordinates with Euclidean distance
//! - [`GeoWorld`]: the point set, built randomly or from fixed points

mod point;
mod world;

pub use point::Point;
pub use world::{GeoWorld, COORDINATE_MAX, COORDINATE_MIN};
