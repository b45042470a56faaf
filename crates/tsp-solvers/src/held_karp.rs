//! Held-Karp TSP solver implementation using branch-and-bound and Lagrangian relaxation.
//!
//! ## Call Structure of the Algorithm
//! The call structure of the algorithm and sub-methods is as follows. Indented functions indicate
//! that they are called by the function above them.
//!
//! - `held_karp`: Main entry point for the Held-Karp solver. Sets up parameters and initiates the
//!   branch-and-bound search.
//!     - `explore_node` Performs depth-first branch-and-bound search.
//!         - `explore_node` to recursively explore the search tree.
//!         - `edge_to_branch_on` to select edges for branching.
//!         - `held_karp_lower_bound` to compute lower bounds using 1-trees.
//!             - `min_one_tree` to compute minimum 1-trees as part of the lower bound calculation.
//!                 - `min_spanning_tree` to compute minimum spanning trees using Prim's algorithm.
//!
//! The basic idea of the Held-Karp algorithm is to compute lower bounds on the TSP tour cost using
//! 1-trees and Lagrangian relaxation.
//!
//! ## 1-trees
//!
//! 1-trees are minimum spanning trees that span nodes 2 to n, plus two minimum cost edges
//! connecting node 1 to the tree. This is always a lower bound on the cost of a TSP tour, since
//! any TSP tour is a 1-tree. Thus, the cheapest 1-tree provides a lower bound on the TSP tour cost.
//!
//!
//! ## Lagrangian Relaxation
//!
//! Because the computed 1-tree might have many nodes with degree unequal to 2, we introduce
//! penalties for each node based on how far their degree is from 2. This is what we call Lagrangian
//! relaxation. By iteratively adjusting the penalties based on the degree of nodes in the 1-tree,
//! we can converge towards a tighter lower bound on the TSP tour cost. Once an actual tour is
//! found, we can use that as an upper bound to prune the search space in the branch-and-bound
//! exploration.
//!
//! ## Edge States
//!
//! Edges can be in one of three states: Available, Excluded, or Fixed. This allows the
//! branch-and-bound search to systematically explore different configurations of the TSP tour
//! by forcibly including or excluding edges.

use tsp_core::instance::edge::{data::EdgeDataMatrixSym, distance::Distance};

pub fn held_karp(distances: &EdgeDataMatrixSym<Distance>) {
    let mut upper_bound = u32::MAX;
    let mut edge_states = EdgeDataMatrixSym {
        data: vec![EdgeState::Available; distances.data.len()],
        dimension: distances.dimension,
    };

    explore_node(
        distances,
        &mut edge_states,
        &mut upper_bound,
        &mut 0,
        None,
        0,
    );
}

const INITIAL_MAX_ITERATIONS: usize = 1_000;
const MAX_ITERATIONS: usize = 10;

const INITIAL_BETA: f64 = 0.99;
const BETA_INCREASE: f64 = 0.9;

type EdgeStateMatrix = EdgeDataMatrixSym<EdgeState>;

#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeState {
    Available = 1,
    Excluded = 0,
    Fixed = -1,
}

impl EdgeState {
    /// Constructs an EdgeState from an i8 value, panicking if the value is invalid.
    fn from_i8(value: i8) -> Self {
        match value {
            1 => EdgeState::Available,
            0 => EdgeState::Excluded,
            -1 => EdgeState::Fixed,
            _ => panic!("Invalid value for EdgeState: {}", value),
        }
    }

    /// Constructs an EdgeState from an i8 value without checking its validity.
    ///
    /// # Safety
    /// The caller must ensure that the value is one of 1, 0, or -1.
    unsafe fn from_i8_unchecked(value: i8) -> Self {
        // SAFETY: Caller guarantees value is valid
        unsafe { std::mem::transmute(value) }
    }

    fn flip(self) -> Self {
        // SAFETY: The negation of a valid EdgeState value is also valid
        unsafe { EdgeState::from_i8_unchecked(-(self as i8)) }
    }
}

/// Depth-first branch-and-bound search to find optimal TSP Tour.
///
/// TODO: Document properly
///
/// bb_counter: A mutable reference to a usize that counts the number of branch-and-bound nodes
/// explored
/// bb_limit: A usize that sets the limit for branch-and-bound exploration
/// depth: The current depth in the search tree
/// max_iterations: The maximum number of iterations allowed
/// upper_bound: A mutable reference to the current best upper bound on the tour cost
fn explore_node(
    distances: &EdgeDataMatrixSym<Distance>,
    edge_states: &mut EdgeStateMatrix,
    upper_bound: &mut u32,
    bb_counter: &mut usize,
    bb_limit: Option<usize>,
    depth: usize,
) {
    // Increment the branch count
    *bb_counter += 1;

    // Check if the branch and bound limit has been reached
    if let Some(limit) = bb_limit {
        if *bb_counter >= limit {
            return;
        }
    }

    match held_karp_lower_bound() {
        LowerBoundOutput::Tour(cost) => {
            // Found a new tour, that is, an upper bound
            *upper_bound = cost;
            return;
        }
        LowerBoundOutput::LowerBound(lower_bound) => {
            // Check if the lower bound is better than the current best cost
            if lower_bound < *upper_bound {
                // Prune this node, as we have already found a better tour than the lower bound
                return;
            }
        }
    };

    let branching_edge = edge_to_branch_on();

    // Try exploring the branch excluding the edge
    todo!();

    // Try exploring the branch including the edge
    todo!();
}

enum LowerBoundOutput {
    LowerBound(u32),
    Tour(u32),
}

/// Compute Held-Karp lower bound using 1-trees and Lagrangian relaxation
fn held_karp_lower_bound() -> LowerBoundOutput {
    todo!();
}

fn edge_to_branch_on() {
    todo!();
}
