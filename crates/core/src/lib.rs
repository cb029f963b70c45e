//! cookbook_core - domain model and contracts for the cookbook sync layer.
//!
//! Everything in this crate is either plain data, a pure function, or a
//! trait describing a side-effecting component. Concrete backends live in
//! the `cookbook` and `cookbook_client` crates.

pub mod recipe;
pub mod remote;
pub mod storage;
pub mod sync;
