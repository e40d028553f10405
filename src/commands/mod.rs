//! CLI command implementations.

pub mod export;
pub mod load;
pub mod overview;
pub mod remove;
pub mod restore;
