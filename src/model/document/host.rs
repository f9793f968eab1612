use std::cell;
use std::fmt;
use std::rc;

use tracing::{event, Level};

use crate::model::document;
use crate::model::document::change;
use crate::model::document::structure;
use crate::model::document::{ConditionGroup, DocumentId, DropLocation, NodeId};
use crate::util;

struct HostInner {
    id: DocumentId,
    root: NodeId,
    arena: cell::RefCell<structure::Arena>,
    focus: cell::RefCell<Option<NodeId>>,
    drop_location: cell::RefCell<Option<DropLocation>>,
    children_changed: util::Listeners<HostNode>,
    drop_location_changed: util::Listeners<Option<DropLocation>>,
}

/// Single-threaded, in-memory document. Cloning yields another handle to the
/// same document.
#[derive(Clone)]
pub struct DocumentHost {
    inner: rc::Rc<HostInner>,
}

/// Handle to one node of a [DocumentHost], by id. Reads always see the live
/// document; a handle to a deleted node reads as a detached leaf.
#[derive(Clone)]
pub struct HostNode {
    host: rc::Rc<HostInner>,
    id: NodeId,
}

impl DocumentHost {
    /// Creates a document whose focus starts out at the root.
    pub fn new(id: impl Into<DocumentId>, root: structure::Subtree) -> DocumentHost {
        let root_id = root.id.clone();
        let mut arena = structure::Arena::new();
        root.install(None, &mut arena);

        DocumentHost {
            inner: rc::Rc::new(HostInner {
                id: id.into(),
                root: root_id.clone(),
                arena: cell::RefCell::new(arena),
                focus: cell::RefCell::new(Some(root_id)),
                drop_location: cell::RefCell::new(None),
                children_changed: util::Listeners::new(),
                drop_location_changed: util::Listeners::new(),
            })
        }
    }

    pub fn root(&self) -> HostNode {
        self.handle(self.inner.root.clone())
    }

    pub fn node(&self, id: &str) -> Option<HostNode> {
        if self.inner.arena.borrow().contains_key(id) {
            Some(self.handle(id.to_string()))
        } else {
            None
        }
    }

    fn handle(&self, id: NodeId) -> HostNode {
        HostNode {
            host: self.inner.clone(),
            id,
        }
    }

    pub fn change(&self, change: change::ChangeType) -> Result<(), change::ApplyError> {
        let record = change.apply(&mut self.inner.arena.borrow_mut())?;

        /* the focus node might have been deleted out from under us */
        {
            let arena = self.inner.arena.borrow();
            let mut focus = self.inner.focus.borrow_mut();
            if focus.as_ref().is_some_and(|id| !arena.contains_key(id)) {
                event!(Level::DEBUG, "focus node was deleted");
                *focus = None;
            }
        }

        /* listeners read the document, so every borrow must be released by now */
        for parent in record.affected_parents {
            event!(Level::TRACE, document = %self.inner.id, %parent, "children changed");
            if let Some(node) = self.node(&parent) {
                self.inner.children_changed.emit(&node);
            }
        }

        Ok(())
    }

    pub fn alter_node(&self, id: &str, props: structure::Properties) -> Result<(), change::ApplyError> {
        self.change(change::ChangeType::AlterNode {
            id: id.to_string(),
            props,
        })
    }

    pub fn insert_node(&self, parent: &str, index: usize, subtree: structure::Subtree) -> Result<(), change::ApplyError> {
        self.change(change::ChangeType::InsertNode {
            parent: parent.to_string(),
            index,
            subtree,
        })
    }

    pub fn insert_slot(&self, parent: &str, index: usize, subtree: structure::Subtree) -> Result<(), change::ApplyError> {
        self.change(change::ChangeType::InsertSlot {
            parent: parent.to_string(),
            index,
            subtree,
        })
    }

    pub fn delete_range(&self, parent: &str, first: usize, last: usize) -> Result<(), change::ApplyError> {
        self.change(change::ChangeType::DeleteRange {
            parent: parent.to_string(),
            first,
            last,
        })
    }

    pub fn move_node(&self, id: &str, parent: &str, index: usize) -> Result<(), change::ApplyError> {
        self.change(change::ChangeType::MoveNode {
            id: id.to_string(),
            parent: parent.to_string(),
            index,
        })
    }

    /// Re-roots the outline. Passing an id that isn't in the document clears the focus.
    pub fn set_focus(&self, id: Option<&str>) {
        let focus = id.filter(|id| self.inner.arena.borrow().contains_key(*id)).map(str::to_string);
        *self.inner.focus.borrow_mut() = focus;
    }

    pub fn set_drop_location(&self, location: Option<DropLocation>) {
        *self.inner.drop_location.borrow_mut() = location.clone();
        self.inner.drop_location_changed.emit(&location);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.children_changed.len() + self.inner.drop_location_changed.len()
    }
}

impl document::Document for DocumentHost {
    type Node = HostNode;

    fn id(&self) -> DocumentId {
        self.inner.id.clone()
    }

    fn focus_node(&self) -> Option<HostNode> {
        let focus = self.inner.focus.borrow().clone();
        focus.map(|id| self.handle(id))
    }

    fn drop_location(&self) -> Option<DropLocation> {
        self.inner.drop_location.borrow().clone()
    }

    fn on_change_node_children(&self, listener: Box<dyn FnMut(&HostNode)>) -> util::Subscription {
        self.inner.children_changed.subscribe(listener)
    }

    fn on_drop_location_changed(&self, mut listener: Box<dyn FnMut(Option<&DropLocation>)>) -> util::Subscription {
        self.inner.drop_location_changed.subscribe(move |location: &Option<DropLocation>| listener(location.as_ref()))
    }
}

impl HostNode {
    fn read<T, F: FnOnce(&structure::Node) -> T>(&self, cb: F) -> Option<T> {
        self.host.arena.borrow().get(&self.id).map(cb)
    }

    fn handles(&self, ids: &imbl::Vector<NodeId>) -> Vec<HostNode> {
        ids.iter().map(|id| HostNode {
            host: self.host.clone(),
            id: id.clone(),
        }).collect()
    }

    pub fn props(&self) -> Option<structure::Properties> {
        self.read(|node| node.props.clone())
    }
}

impl document::DocumentNode for HostNode {
    fn id(&self) -> NodeId {
        self.id.clone()
    }

    fn parent(&self) -> Option<HostNode> {
        self.read(|node| node.parent.clone()).flatten().map(|id| HostNode {
            host: self.host.clone(),
            id,
        })
    }

    fn children(&self) -> Vec<HostNode> {
        self.read(|node| self.handles(&node.children)).unwrap_or_default()
    }

    fn slots(&self) -> Vec<HostNode> {
        self.read(|node| self.handles(&node.slots)).unwrap_or_default()
    }

    fn title(&self) -> String {
        self.read(|node| node.props.title.clone()).unwrap_or_default()
    }

    fn is_modal(&self) -> bool {
        self.read(|node| node.props.is_modal).unwrap_or(false)
    }

    fn condition_group(&self) -> Option<ConditionGroup> {
        self.read(|node| node.props.condition_group.clone()).flatten()
    }
}

impl fmt::Debug for DocumentHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHost")
            .field("id", &self.inner.id)
            .field("nodes", &self.inner.arena.borrow().len())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for HostNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HostNode")
            .field(&self.id)
            .finish()
    }
}
