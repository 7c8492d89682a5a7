//! Coordinate, index, unit and reduction layer for CELMA dumps.
//!
//! Stage 1: store access, input options
//! Stage 2: index resolution, mesh, units, poloidal reduction

pub mod index;
pub mod input;
pub mod mesh;
pub mod reduce;
pub mod store;
pub mod units;
