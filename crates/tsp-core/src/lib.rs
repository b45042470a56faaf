//! Core data types shared across the TSP tooling workspace.
//!
//! This crate owns the instance representation (distances, edges, tours) and
//! the TSPLIB95 vocabulary (`tsp_lib_spec`). It has no knowledge of parsing,
//! solving, or cutting-plane machinery; those live in their own crates and
//! depend on this one.

pub mod instance;
pub mod tsp_lib_spec;
