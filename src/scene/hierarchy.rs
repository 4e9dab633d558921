//! Parent links of a node table and their evaluation order.
//!
//! Composition is always one linear pass. When the producer stored every
//! parent before its children the pass runs in index order; otherwise a
//! parent-first order is derived once at load time and reused every frame.

use glam::Affine3A;

use crate::assets::format::NodeInfo;
use crate::assets::settings::HierarchyPolicy;
use crate::errors::{ImdlError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    parents: Vec<Option<usize>>,
    /// `None` when index order is already parent-first.
    order: Option<Vec<usize>>,
}

impl Hierarchy {
    /// Checks every parent index and picks an evaluation order.
    pub fn from_nodes(nodes: &[NodeInfo], policy: HierarchyPolicy) -> Result<Self> {
        let len = nodes.len();
        let mut parents = Vec::with_capacity(len);
        let mut first_out_of_order = None;

        for (i, node) in nodes.iter().enumerate() {
            if node.parent_index < -1 {
                return Err(ImdlError::DanglingIndex {
                    context: format!("node {i} parent"),
                    index: i64::from(node.parent_index),
                    len,
                });
            }

            let parent = node.parent();
            if let Some(p) = parent {
                if p >= len {
                    return Err(ImdlError::DanglingIndex {
                        context: format!("node {i} parent"),
                        index: i64::from(node.parent_index),
                        len,
                    });
                }
                if p == i {
                    return Err(ImdlError::HierarchyCycle { node: i });
                }
                if p > i && first_out_of_order.is_none() {
                    first_out_of_order = Some((i, p));
                }
            }
            parents.push(parent);
        }

        let order = match (first_out_of_order, policy) {
            (None, _) => None,
            (Some((node, parent)), HierarchyPolicy::RequireSorted) => {
                return Err(ImdlError::NodeOrder { node, parent });
            }
            (Some((node, parent)), HierarchyPolicy::Resolve) => {
                log::debug!(
                    "Node {node} is stored before its parent {parent}; resolving evaluation order"
                );
                Some(resolve_order(&parents)?)
            }
        };

        Ok(Self { parents, order })
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn parent(&self, node: usize) -> Option<usize> {
        self.parents.get(node).copied().flatten()
    }

    /// Whether the node table is stored parent-first.
    #[inline]
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.order.is_none()
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_none().then_some(i))
    }

    /// Composes local matrices into world matrices.
    ///
    /// `world[i] = world[parent] * local[i]`, or `local[i]` for roots.
    /// Both slices must be as long as the hierarchy.
    pub fn compose(&self, locals: &[Affine3A], world: &mut [Affine3A]) {
        debug_assert_eq!(locals.len(), self.len());
        debug_assert_eq!(world.len(), self.len());

        match &self.order {
            None => {
                for (i, parent) in self.parents.iter().enumerate() {
                    world[i] = match *parent {
                        Some(p) => world[p] * locals[i],
                        None => locals[i],
                    };
                }
            }
            Some(order) => {
                for &i in order {
                    world[i] = match self.parents[i] {
                        Some(p) => world[p] * locals[i],
                        None => locals[i],
                    };
                }
            }
        }
    }
}

/// Parent-first order for an arbitrary parent table.
///
/// Walks each node's ancestor chain up to the first already-placed node,
/// then emits the chain top-down. Iterative, so deep chains cannot
/// overflow the stack.
fn resolve_order(parents: &[Option<usize>]) -> Result<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; parents.len()];
    let mut order = Vec::with_capacity(parents.len());
    let mut chain = Vec::new();

    for start in 0..parents.len() {
        let mut current = Some(start);
        while let Some(i) = current {
            match marks[i] {
                Mark::Done => break,
                Mark::InProgress => return Err(ImdlError::HierarchyCycle { node: i }),
                Mark::Unvisited => {
                    marks[i] = Mark::InProgress;
                    chain.push(i);
                    current = parents[i];
                }
            }
        }

        while let Some(i) = chain.pop() {
            marks[i] = Mark::Done;
            order.push(i);
        }
    }

    Ok(order)
}
