//! Core batching, redrive and pagination operators
//!
//! Writes compose [`window`] and [`redrive`] (see [`pipeline`]); reads use
//! [`paginate`]; point lookups go through [`loader`].

pub mod feedback;
pub mod loader;
pub mod paginate;
pub mod pipeline;
pub mod redrive;
pub mod window;
