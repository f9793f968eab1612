//! What goes underneath a node in the outline: its slots, then its children,
//! with runs of siblings sharing a condition group wrapped together and the
//! insertion marker for a drag in progress placed among them.

use std::mem;

use crate::model::document::{ConditionGroup, Document, DocumentNode};
use crate::model::outline::ViewNode;

#[derive(Debug)]
pub enum BranchEntry<D: Document> {
    Node(ViewNode<D>),

    /// Where the dragged component would land.
    Insertion { valid: bool },

    /// A run of consecutive siblings in the same condition group.
    Group {
        group: ConditionGroup,
        /// The group title should be highlighted as a filter match.
        title_match: bool,
        keywords: Option<String>,
        entries: Vec<BranchEntry<D>>,
    },
}

#[derive(Debug)]
pub struct Branches<D: Document> {
    pub slots: Vec<ViewNode<D>>,
    pub children: Vec<BranchEntry<D>>,
}

/// Branches show when the node is expanded, or when an active filter matched
/// something underneath it.
pub fn branches_visible<D: Document>(node: &ViewNode<D>) -> bool {
    let filter = node.filter_result();
    node.expanded() || (filter.working && filter.match_child)
}

/// Lays out `node`'s branches for the modal or the non-modal part of the
/// outline. Returns `None` when they're hidden.
pub fn compose<D: Document>(node: &ViewNode<D>, modal: bool) -> Option<Branches<D>> {
    if !branches_visible(node) {
        return None;
    }

    let slots = if !modal && node.has_slots() {
        node.slots()
    } else {
        Vec::new()
    };

    Some(Branches {
        slots,
        children: compose_children(node, modal),
    })
}

struct GroupRun<D: Document> {
    current: Option<ConditionGroup>,
    contents: Vec<BranchEntry<D>>,
    title_match: bool,
    keywords: Option<String>,
}

impl<D: Document> GroupRun<D> {
    fn end(&mut self, entries: &mut Vec<BranchEntry<D>>) {
        if self.contents.is_empty() {
            return;
        }

        /* contents only ever get pushed after current was set */
        if let Some(group) = &self.current {
            entries.push(BranchEntry::Group {
                group: group.clone(),
                title_match: self.title_match,
                keywords: self.keywords.clone(),
                entries: mem::take(&mut self.contents),
            });
        }
    }
}

pub fn compose_children<D: Document>(node: &ViewNode<D>, modal: bool) -> Vec<BranchEntry<D>> {
    let filter = node.filter_result();
    let detail = node.drop_detail();
    let drop_index = detail.as_ref().and_then(|detail| detail.index);
    let valid = detail.as_ref().map_or(true, |detail| detail.valid);

    let children = node.children();
    let mut entries = Vec::new();
    let mut run = GroupRun {
        current: None,
        contents: Vec::new(),
        title_match: filter.working && filter.match_self,
        keywords: filter.keywords.clone(),
    };

    for (index, child) in children.iter().enumerate() {
        let document_node = child.node();
        if document_node.is_modal() != modal {
            continue;
        }

        let group = document_node.condition_group();
        if group != run.current {
            run.end(&mut entries);
        }

        let insert_here = drop_index == Some(index);
        match group {
            Some(group) => {
                run.current = Some(group);
                if insert_here {
                    if run.contents.is_empty() {
                        entries.push(BranchEntry::Insertion { valid });
                    } else {
                        run.contents.push(BranchEntry::Insertion { valid });
                    }
                }
                run.contents.push(BranchEntry::Node(child.clone()));
            },
            None => {
                if insert_here {
                    entries.push(BranchEntry::Insertion { valid });
                }
                entries.push(BranchEntry::Node(child.clone()));
            },
        }
    }
    run.end(&mut entries);

    if drop_index.is_some_and(|index| index >= children.len()) {
        entries.push(BranchEntry::Insertion { valid });
    }

    entries
}
