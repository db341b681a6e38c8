//! # persistent-rbtree
//!
//! A persistent (immutable, structurally shared) red-black tree.
//!
//! ## Overview
//!
//! Every operation returns a new tree and leaves every previously observed
//! tree intact. Insertion is a single top-down pass: node color lives in the
//! node's type, and the rebalancing decision travels back through the
//! recursive return value instead of a separate fixup pass.
//!
//! - [`persistent::RedBlackTree`]: the tree itself
//! - [`persistent::InvariantViolation`]: diagnostic error from
//!   [`persistent::RedBlackTree::validate`]
//!
//! ## Feature Flags
//!
//! - `arc` (default): share nodes through `Arc`, making trees `Send + Sync`
//! - `serde`: `Serialize`/`Deserialize` for [`persistent::RedBlackTree`]
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_rbtree::prelude::*;
//!
//! let tree = RedBlackTree::empty().insert(3).insert(1).insert(2);
//! assert_eq!(tree.flatten(), vec![1, 2, 3]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use persistent_rbtree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
}

pub mod persistent;
