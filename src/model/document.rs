//! The host document as seen by the outline pane. The pane never owns or
//! mutates the document; it reads nodes through [DocumentNode] and hears about
//! structural changes through the subscriptions on [Document].
//!
//! [host::DocumentHost] is a complete in-memory implementation of the contract.

pub mod change;
pub mod host;
pub mod structure;

use std::fmt;
use std::rc;

use crate::util;

pub type NodeId = String;
pub type DocumentId = String;

/// Grouping key for rendering runs of conditionally-rendered siblings. Two
/// groups are the same group only if they are the same instance.
#[derive(Clone)]
pub struct ConditionGroup(rc::Rc<ConditionGroupInfo>);

#[derive(Debug)]
struct ConditionGroupInfo {
    id: String,
    title: String,
}

impl ConditionGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> ConditionGroup {
        ConditionGroup(rc::Rc::new(ConditionGroupInfo {
            id: id.into(),
            title: title.into(),
        }))
    }

    pub fn id(&self) -> &str {
        &self.0.id
    }

    pub fn title(&self) -> &str {
        &self.0.title
    }
}

impl PartialEq for ConditionGroup {
    fn eq(&self, other: &Self) -> bool {
        rc::Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ConditionGroup {}

impl fmt::Debug for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConditionGroup")
            .field(&self.0.id)
            .finish()
    }
}

/// Where a dragged component would land inside a node's child list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDetail {
    /// Insertion index among the target's children. `None` while hovering
    /// without a concrete position.
    pub index: Option<usize>,
    pub valid: bool,
    pub focus: Option<DropFocus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropFocus {
    Slots,
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationDetail {
    /// Dropping among the target's children.
    Children(DropDetail),

    /// Dropping onto one of the target's properties.
    Prop { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    pub target: NodeId,
    pub detail: LocationDetail,
}

impl DropLocation {
    /// The drop detail to show on `id`'s child list, if this location is one.
    pub fn children_detail_for(&self, id: &str) -> Option<&DropDetail> {
        match &self.detail {
            LocationDetail::Children(detail) if self.target == id => Some(detail),
            _ => None,
        }
    }
}

pub trait DocumentNode: Clone + 'static {
    /// Stable across edits; may be reused after the node is deleted.
    fn id(&self) -> NodeId;
    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;
    fn slots(&self) -> Vec<Self>;
    fn title(&self) -> String;

    /// Whether the component renders as a modal (componentMeta.isModal).
    fn is_modal(&self) -> bool;
    fn condition_group(&self) -> Option<ConditionGroup>;
}

pub trait Document: 'static {
    type Node: DocumentNode;

    fn id(&self) -> DocumentId;

    /// The node the outline is currently rooted at.
    fn focus_node(&self) -> Option<Self::Node>;

    fn drop_location(&self) -> Option<DropLocation>;

    /// Called with the parent whenever a node's child list changes.
    fn on_change_node_children(&self, listener: Box<dyn FnMut(&Self::Node)>) -> util::Subscription;

    fn on_drop_location_changed(&self, listener: Box<dyn FnMut(Option<&DropLocation>)>) -> util::Subscription;
}
