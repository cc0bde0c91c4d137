//! Concept prerequisite graph.
//!
//! # Overview
//!
//! A [`ConceptGraph`] is built once from a snapshot of concepts and
//! prerequisite edges and then answers read-only queries. Nothing is cached
//! across snapshots: when the underlying roadmap changes, build a new graph.
//!
//! ## Pipeline
//!
//! ```text
//! concepts {id → name} + edges [(prerequisite, dependent)]
//!        ↓  build::ConceptGraph::build()
//! ConceptGraph (forward + reverse adjacency, in-degrees)
//!        ├─ cycles:   is_valid_dag(), find_cycles()
//!        ├─ order:    topological_sort(), learning_layers()
//!        └─ progress: frontier(), unlocked(), progress()
//! ```
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A is a prerequisite of B": A must be mastered
//! before B is learnable.
//!
//! ## Typical Usage
//!
//! ```rust
//! use std::collections::HashSet;
//! use roadmap_core::graph::ConceptGraph;
//!
//! let graph = ConceptGraph::build(
//!     [(1, "Arrays"), (2, "Linked Lists"), (3, "Hash Tables")],
//!     [(1, 2), (2, 3), (1, 3)],
//! );
//! assert!(graph.is_valid_dag());
//! assert_eq!(graph.topological_sort(), vec![1, 2, 3]);
//!
//! let mastered = HashSet::from([1]);
//! assert_eq!(graph.unlocked(&mastered), vec![2]);
//! assert_eq!(graph.frontier(&mastered), vec![3]);
//! ```

pub mod build;
pub mod cycles;
pub mod order;
pub mod progress;

// Re-export primary types at module level for convenience.
pub use build::ConceptGraph;
pub use progress::Progress;
