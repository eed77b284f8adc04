//! # algovis
//!
//! Algorithm cores behind step-by-step educational visualizations:
//!
//! - a **convex hull stepper** that exposes every stack operation of the
//!   Graham scan as a discrete, observable step,
//! - a **planar diagram engine** that derives Voronoi cells, bisector edges,
//!   and a brute-force triangulation from a mutable 2-D point set,
//! - a **self-balancing search tree engine** with selectable balancing
//!   discipline (plain BST, AVL, Red-Black) and full traversal enumeration.
//!
//! Each engine is a plain, independently constructible object that holds its
//! own point/node set and derived state. A presentation layer issues commands
//! (`add_point`, `insert`, `next_step`, `reset`, …) and polls side-effect-free
//! accessors (`hull()`, `cells()`, `inorder()`, `stats()`, …) to render. The
//! engines never touch rendering state and never block; animated execution is
//! handled by the caller-owned [`Driver`](core::driver::Driver), which invokes
//! one pure step at a time and owns all wall-clock policy.
//!
//! # Basic Usage
//!
//! ```rust
//! use algovis::prelude::*;
//!
//! let mut scan = GrahamScan::new();
//! scan.add_point(0.0, 0.0).unwrap();
//! scan.add_point(4.0, 0.0).unwrap();
//! scan.add_point(4.0, 4.0).unwrap();
//! scan.add_point(0.0, 4.0).unwrap();
//! scan.add_point(2.0, 2.0).unwrap(); // interior point
//!
//! // Single-step until the scan reports completion.
//! while scan.next_step() {}
//!
//! // The interior point is not a hull vertex.
//! assert_eq!(scan.hull().len(), 4);
//! ```
//!
//! Tree engines follow the same command/query split:
//!
//! ```rust
//! use algovis::prelude::*;
//!
//! let mut tree: SearchTree<i64> = SearchTree::new(TreeKind::Avl);
//! for key in [50, 30, 70, 20, 40, 60, 80] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.inorder(), vec![20, 30, 40, 50, 60, 70, 80]);
//! assert!(tree.validate().is_ok());
//! ```
//!
//! # Error handling
//!
//! The failure taxonomy is narrow by design: insufficient input, duplicate
//! keys, and missing keys are *skipped operations* reported through
//! `bool`/`Option` returns with no partial state mutation. Degenerate
//! geometry (collinear triples, zero-area triangles) is represented with
//! sentinel values (`None` circumcenter, infinite circumradius) that callers
//! check before use. Typed errors are reserved for structural misuse, such as
//! feeding non-finite coordinates to an engine.

#![forbid(unsafe_code)]

/// Engine layer: the hull stepper, the planar diagram engine, the search tree
/// engine, and the shared infrastructure they are built on (identified
/// points, operation logs, the cooperative step driver).
pub mod core {
    /// Fast collection aliases used across the engines.
    pub mod collections;
    /// Brute-force Voronoi/Delaunay planar diagram engine.
    pub mod diagram;
    /// Step/schedule abstraction: [`Stepper`](driver::Stepper) and the
    /// caller-owned [`Driver`](driver::Driver).
    pub mod driver;
    /// Graham scan convex hull stepper.
    pub mod hull;
    /// Human-readable per-operation narration.
    pub mod log;
    /// Identified 2-D input points shared by the geometric engines.
    pub mod point;
    /// Self-balancing search tree engine (BST / AVL / Red-Black).
    pub mod tree;
    pub mod util;

    pub use diagram::*;
    pub use driver::*;
    pub use hull::*;
    pub use log::*;
    pub use point::*;
    pub use tree::*;
    pub use util::*;
    // Note: collections is not re-exported here to avoid namespace pollution.
}

/// Pure geometric primitives: coordinates, orientation predicates, and the
/// circumcircle/bisector calculations the diagram engine is built on. No
/// engine state lives here.
pub mod geometry {
    pub mod predicates;
    pub mod util;
    pub mod vector;

    pub use predicates::*;
    pub use util::*;
    pub use vector::*;
}

/// A prelude module that re-exports the commonly used types from the crate.
pub mod prelude {
    pub use crate::core::{diagram::*, driver::*, hull::*, log::*, point::*, tree::*, util::*};
    pub use crate::geometry::{predicates::*, util::*, vector::*};
}
