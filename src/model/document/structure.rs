use std::collections;

use crate::model::document::ConditionGroup;
use crate::model::document::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    pub title: String,
    pub is_modal: bool,
    pub condition_group: Option<ConditionGroup>,
}

/// A live node inside a [super::host::DocumentHost]. Relationships are stored
/// as ids into the host's arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: imbl::Vector<NodeId>,
    pub slots: imbl::Vector<NodeId>,
    pub props: Properties,
}

pub type Arena = collections::HashMap<NodeId, Node>;

/// A detached tree of nodes, waiting to be inserted into a document.
#[derive(Debug, Clone)]
pub struct Subtree {
    pub id: NodeId,
    pub props: Properties,
    pub children: Vec<Subtree>,
    pub slots: Vec<Subtree>,
}

pub struct NodeBuilder {
    subtree: Subtree,
}

impl Node {
    pub fn builder(id: impl Into<NodeId>) -> NodeBuilder {
        let id = id.into();

        NodeBuilder {
            subtree: Subtree {
                props: Properties {
                    title: id.clone(),
                    ..Properties::default()
                },
                id,
                children: Vec::new(),
                slots: Vec::new(),
            }
        }
    }
}

impl NodeBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.subtree.props.title = title.into();
        self
    }

    pub fn modal(mut self) -> Self {
        self.subtree.props.is_modal = true;
        self
    }

    pub fn group(mut self, group: &ConditionGroup) -> Self {
        self.subtree.props.condition_group = Some(group.clone());
        self
    }

    pub fn child<F: FnOnce(NodeBuilder) -> NodeBuilder>(mut self, id: impl Into<NodeId>, cb: F) -> Self {
        self.subtree.children.push(cb(Node::builder(id)).build());
        self
    }

    pub fn slot<F: FnOnce(NodeBuilder) -> NodeBuilder>(mut self, id: impl Into<NodeId>, cb: F) -> Self {
        self.subtree.slots.push(cb(Node::builder(id)).build());
        self
    }

    pub fn build(self) -> Subtree {
        self.subtree
    }
}

impl Subtree {
    /// Every id in the subtree, slots included, in pre-order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        let mut stack = vec![self];

        while let Some(subtree) = stack.pop() {
            ids.push(subtree.id.as_str());
            stack.extend(subtree.slots.iter().rev());
            stack.extend(subtree.children.iter().rev());
        }

        ids
    }

    /// Moves the subtree into the arena under `parent`. Doesn't link it into
    /// the parent's child or slot list.
    pub(super) fn install(self, parent: Option<NodeId>, arena: &mut Arena) {
        let Subtree { id, props, children, slots } = self;

        let node = Node {
            id: id.clone(),
            parent,
            children: children.iter().map(|ch| ch.id.clone()).collect(),
            slots: slots.iter().map(|ch| ch.id.clone()).collect(),
            props,
        };
        arena.insert(id.clone(), node);

        for ch in children.into_iter().chain(slots) {
            ch.install(Some(id.clone()), arena);
        }
    }
}

/// Removes `id` and everything beneath it from the arena. Doesn't unlink it
/// from its parent.
pub(super) fn uninstall(id: &str, arena: &mut Arena) {
    if let Some(node) = arena.remove(id) {
        for ch in node.children.iter().chain(node.slots.iter()) {
            uninstall(ch, arena);
        }
    }
}

/// Whether `ancestor` is `id` or one of its ancestors.
pub fn is_ancestor_or_self(arena: &Arena, ancestor: &str, id: &str) -> bool {
    let mut current = Some(id);

    while let Some(cur) = current {
        if cur == ancestor {
            return true;
        }
        current = arena.get(cur).and_then(|node| node.parent.as_deref());
    }

    false
}
