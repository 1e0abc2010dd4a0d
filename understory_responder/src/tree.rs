// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host tree interface.
//!
//! The engine never owns nodes. Everything it needs from the surrounding UI
//! runtime goes through [`ResponderTree`]: parent links for the inside-out
//! walk, the responders attached to a node, the scope (document) a node lives
//! in, and optional geometry for hit-slop and press-retention queries.
//!
//! ## Logical instances
//!
//! Runtimes that double-buffer their trees keep two physical copies of the
//! same logical instance. [`ResponderTree::canonical`] maps either copy to the
//! single active one. The engine resolves it once per visited node and keys
//! per-node state, ownership and root registrations by the canonical node, so
//! responder modules never see both copies.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Point, Rect};

use crate::hit_slop::HitSlop;
use crate::module::Responder;

/// The tree the event manager walks.
pub trait ResponderTree: Sized + 'static {
    /// Node identifier.
    type Node: Copy + Eq + Hash + Debug + 'static;
    /// Interaction root, e.g. a document. Ownership is tracked per scope.
    type Scope: Copy + Eq + Hash + Debug + 'static;

    /// Parent of `node`, or `None` at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// The active physical node for the logical instance `node` belongs to.
    fn canonical(&self, node: Self::Node) -> Self::Node {
        node
    }

    /// Responders attached to `node`, in declaration order.
    ///
    /// A node carries at most one responder per module.
    fn responders(&self, node: Self::Node) -> &[Responder<Self>];

    /// The scope `node` belongs to, or `None` if it is detached.
    fn scope_of(&self, node: Self::Node) -> Option<Self::Scope>;

    /// Topmost node under `pt` in `scope`.
    fn element_from_point(&self, _scope: Self::Scope, _pt: Point) -> Option<Self::Node> {
        None
    }

    /// Hit-slop extension of `node`, if it has one.
    fn hit_slop(&self, _node: Self::Node) -> Option<HitSlop> {
        None
    }

    /// Client-space bounds of `node`.
    fn bounds(&self, _node: Self::Node) -> Option<Rect> {
        None
    }

    /// Returns `true` for navigational anchors, whose keyboard activation the
    /// host must not suppress.
    fn is_anchor(&self, _node: Self::Node) -> bool {
        false
    }
}

/// Returns `true` if `node` is `ancestor` or lies beneath it.
///
/// Both sides are compared by canonical node.
pub fn is_within<T: ResponderTree>(tree: &T, node: T::Node, ancestor: T::Node) -> bool {
    let ancestor = tree.canonical(ancestor);
    let mut cursor = Some(node);
    while let Some(n) = cursor {
        let n = tree.canonical(n);
        if n == ancestor {
            return true;
        }
        cursor = tree.parent(n);
    }
    false
}
