/*!
This crate provides implementations of various algorithms to solve the Traveling Salesman Problem (TSP).
Explanations and references for the algorithms can be found in their respective modules.
 */

pub mod held_karp_mod;
pub use held_karp_mod::held_karp;
