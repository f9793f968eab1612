use std::collections;
use std::fmt;

use crate::model::document::NodeId;
use crate::model::document::structure;

#[derive(Debug, Clone)]
pub enum ChangeType {
    /// Modifies the properties of a node, but doesn't affect its children.
    AlterNode { id: NodeId, props: structure::Properties },

    /// Inserts the subtree as a child of `parent`, before the child currently at `index`.
    InsertNode { parent: NodeId, index: usize, subtree: structure::Subtree },

    /// Inserts the subtree into `parent`'s slot list.
    InsertSlot { parent: NodeId, index: usize, subtree: structure::Subtree },

    /// Deletes some of a node's (range inclusive) children along with their descendants.
    DeleteRange { parent: NodeId, first: usize, last: usize },

    /// Moves a node, keeping its id. `index` is interpreted after the node was
    /// taken out of its old parent.
    MoveNode { id: NodeId, parent: NodeId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    NodeNotFound(NodeId),
    DuplicateId(NodeId),
    InvalidParameters(&'static str),
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplyError::NodeNotFound(id) => write!(f, "no node with id {:?}", id),
            ApplyError::DuplicateId(id) => write!(f, "a node with id {:?} already exists", id),
            ApplyError::InvalidParameters(msg) => write!(f, "invalid change: {}", msg),
        }
    }
}

impl std::error::Error for ApplyError {}

/// Nodes whose child lists were changed, in the order they should be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyRecord {
    pub affected_parents: Vec<NodeId>,
}

fn lookup<'a>(arena: &'a structure::Arena, id: &str) -> Result<&'a structure::Node, ApplyError> {
    arena.get(id).ok_or_else(|| ApplyError::NodeNotFound(id.to_string()))
}

fn lookup_mut<'a>(arena: &'a mut structure::Arena, id: &str) -> Result<&'a mut structure::Node, ApplyError> {
    arena.get_mut(id).ok_or_else(|| ApplyError::NodeNotFound(id.to_string()))
}

fn check_insertable(arena: &structure::Arena, subtree: &structure::Subtree) -> Result<(), ApplyError> {
    let mut seen = collections::HashSet::new();

    for id in subtree.ids() {
        if arena.contains_key(id) || !seen.insert(id) {
            return Err(ApplyError::DuplicateId(id.to_string()));
        }
    }

    Ok(())
}

impl ChangeType {
    /// Applies the change to the arena. Either the whole change goes through or
    /// the arena is left untouched.
    pub fn apply(self, arena: &mut structure::Arena) -> Result<ApplyRecord, ApplyError> {
        match self {
            ChangeType::AlterNode { id, props } => {
                lookup_mut(arena, &id)?.props = props;
                Ok(ApplyRecord::default())
            },

            ChangeType::InsertNode { parent, index, subtree } => {
                if index > lookup(arena, &parent)?.children.len() {
                    return Err(ApplyError::InvalidParameters("attempted to insert node at out-of-bounds index"));
                }
                check_insertable(arena, &subtree)?;

                let id = subtree.id.clone();
                subtree.install(Some(parent.clone()), arena);
                lookup_mut(arena, &parent)?.children.insert(index, id);

                Ok(ApplyRecord { affected_parents: vec![parent] })
            },

            ChangeType::InsertSlot { parent, index, subtree } => {
                if index > lookup(arena, &parent)?.slots.len() {
                    return Err(ApplyError::InvalidParameters("attempted to insert slot at out-of-bounds index"));
                }
                check_insertable(arena, &subtree)?;

                let id = subtree.id.clone();
                subtree.install(Some(parent.clone()), arena);
                lookup_mut(arena, &parent)?.slots.insert(index, id);

                Ok(ApplyRecord { affected_parents: vec![parent] })
            },

            ChangeType::DeleteRange { parent, first, last } => {
                let node = lookup(arena, &parent)?;
                if first > last {
                    return Err(ApplyError::InvalidParameters("attempted to delete a backwards range"));
                }
                if last >= node.children.len() {
                    return Err(ApplyError::InvalidParameters("attempted to delete children beyond the end of the child list"));
                }

                let node = lookup_mut(arena, &parent)?;
                let removed: Vec<NodeId> = (first..=last).map(|_| node.children.remove(first)).collect();

                for id in removed {
                    structure::uninstall(&id, arena);
                }

                Ok(ApplyRecord { affected_parents: vec![parent] })
            },

            ChangeType::MoveNode { id, parent, index } => {
                let old_parent = lookup(arena, &id)?.parent.clone()
                    .ok_or(ApplyError::InvalidParameters("attempted to move the document root"))?;
                let new_parent = lookup(arena, &parent)?;

                if structure::is_ancestor_or_self(arena, &id, &parent) {
                    return Err(ApplyError::InvalidParameters("attempted to move node underneath itself"));
                }

                let old = lookup(arena, &old_parent)?;
                let in_children = old.children.iter().position(|ch| *ch == id);
                let in_slots = old.slots.iter().position(|ch| *ch == id);

                /* bounds are checked against the child list as it'll look once the node is gone */
                let len_after_removal = if old_parent == parent && in_children.is_some() {
                    new_parent.children.len() - 1
                } else {
                    new_parent.children.len()
                };
                if index > len_after_removal {
                    return Err(ApplyError::InvalidParameters("attempted to move node to out-of-bounds index"));
                }

                let old = lookup_mut(arena, &old_parent)?;
                match (in_children, in_slots) {
                    (Some(i), _) => { old.children.remove(i); },
                    (None, Some(i)) => { old.slots.remove(i); },
                    (None, None) => return Err(ApplyError::InvalidParameters("node is missing from its parent")),
                }

                lookup_mut(arena, &parent)?.children.insert(index, id.clone());
                lookup_mut(arena, &id)?.parent = Some(parent.clone());

                let affected_parents = if old_parent == parent {
                    vec![parent]
                } else {
                    vec![old_parent, parent]
                };

                Ok(ApplyRecord { affected_parents })
            },
        }
    }
}
