#![forbid(unsafe_code)]

//! Core: grid geometry shared by the gridboard layout engine and its hosts.
//!
//! # Role in gridboard
//! `gridboard-core` owns the coordinate vocabulary. Layout items are placed
//! with [`GridRect`] values in integer grid units; renderers and pointer
//! handlers work in pixels through [`PixelRect`]. The layout crate
//! (`gridboard-layout`) converts between the two and never stores pixels.

pub mod geometry;

pub use geometry::{GridPoint, GridRect, GridSize, PixelRect};
