//! # Clubly Core
//!
//! Domain types shared by the database and API crates: entities, request and
//! response payloads, status lifecycles and the error taxonomy. Nothing in
//! this crate performs I/O.

pub mod errors;
pub mod models;
pub mod time;
