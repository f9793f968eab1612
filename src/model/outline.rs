//! View model for the outline pane. A [TreeMirror] mirrors one document's node
//! tree into [ViewNode]s, which carry the per-node UI state (expansion, filter
//! matches, drop markers) the document itself knows nothing about.

pub mod branches;
pub mod filter;
pub mod node;

use std::cell;
use std::collections;
use std::rc;

use tracing::{event, instrument, Level};

use crate::config;
use crate::model::document::{Document, DocumentId, DocumentNode, DropLocation, NodeId};
use crate::util;

pub use filter::FilterResult;
pub use node::ViewNode;

struct MirrorInner<D: Document> {
    id: Option<DocumentId>,
    document: Option<D>,

    /* never evicted on its own; see evict_unreachable */
    nodes: cell::RefCell<collections::HashMap<NodeId, ViewNode<D>>>,

    drop_target: cell::RefCell<Option<NodeId>>,
    subscriptions: cell::RefCell<Vec<util::Subscription>>,
}

/// Mirrors one document into a cache of [ViewNode]s keyed by node id. At most
/// one view node ever exists per id, so state attached to a view node survives
/// the document node being moved around or replaced.
pub struct TreeMirror<D: Document> {
    inner: rc::Rc<MirrorInner<D>>,
}

impl<D: Document> Clone for TreeMirror<D> {
    fn clone(&self) -> Self {
        TreeMirror {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Document> TreeMirror<D> {
    pub fn new(document: Option<D>) -> TreeMirror<D> {
        let inner = rc::Rc::new(MirrorInner {
            id: document.as_ref().map(Document::id),
            drop_target: cell::RefCell::new(document.as_ref().and_then(Document::drop_location).map(|location| location.target)),
            document,
            nodes: cell::RefCell::new(collections::HashMap::new()),
            subscriptions: cell::RefCell::new(Vec::new()),
        });

        if let Some(document) = &inner.document {
            let weak = rc::Rc::downgrade(&inner);
            let children_changed = document.on_change_node_children(Box::new(move |node: &D::Node| {
                if let Some(inner) = weak.upgrade() {
                    TreeMirror { inner }.children_changed(&node.id());
                }
            }));

            let weak = rc::Rc::downgrade(&inner);
            let drop_location_changed = document.on_drop_location_changed(Box::new(move |location: Option<&DropLocation>| {
                if let Some(inner) = weak.upgrade() {
                    TreeMirror { inner }.drop_location_changed(location);
                }
            }));

            inner.subscriptions.borrow_mut().extend([children_changed, drop_location_changed]);
        }

        TreeMirror { inner }
    }

    fn from_inner(inner: rc::Rc<MirrorInner<D>>) -> TreeMirror<D> {
        TreeMirror { inner }
    }

    fn downgrade(&self) -> rc::Weak<MirrorInner<D>> {
        rc::Rc::downgrade(&self.inner)
    }

    /// Id of the mirrored document, or `None` when no document is open.
    pub fn id(&self) -> Option<&str> {
        self.inner.id.as_deref()
    }

    pub fn document(&self) -> Option<&D> {
        self.inner.document.as_ref()
    }

    /// The view node for the document's focus node.
    pub fn root(&self) -> Option<ViewNode<D>> {
        self.inner.document.as_ref()?.focus_node().map(|node| self.resolve_or_create(&node))
    }

    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.inner.document.as_ref()?.focus_node().map(|node| node.id())
    }

    /// Returns the view node for `node`'s id, creating it on first sight. An
    /// existing view node is pointed at `node` and returned as-is.
    pub fn resolve_or_create(&self, node: &D::Node) -> ViewNode<D> {
        let id = node.id();

        if let Some(existing) = self.lookup_by_id(&id) {
            existing.set_node(node.clone());
            return existing;
        }

        let drop_detail = self.inner.document.as_ref()
            .and_then(Document::drop_location)
            .and_then(|location| location.children_detail_for(&id).cloned());

        let view_node = ViewNode::new(self.downgrade(), node.clone(), drop_detail);
        event!(Level::TRACE, %id, "created view node");
        self.inner.nodes.borrow_mut().insert(id, view_node.clone());

        view_node
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<ViewNode<D>> {
        self.inner.nodes.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reveals the node with the given id by expanding its ancestors. Does
    /// nothing if no view node exists for it yet.
    pub fn select_node(&self, id: &str) {
        let node = self.lookup_by_id(id);
        self.expand_all_ancestors(node.as_ref());
    }

    /// Expands every ancestor of `node` up to and including the root, outermost
    /// first. `node`'s own expansion is left alone.
    #[instrument(skip_all)]
    pub fn expand_all_ancestors(&self, node: Option<&ViewNode<D>>) {
        let Some(node) = node else { return };
        if node.is_root() {
            return;
        }

        let mut ancestors = Vec::new();
        let mut current = node.parent();
        while let Some(ancestor) = current {
            current = if ancestor.is_root() { None } else { ancestor.parent() };
            ancestors.push(ancestor);
        }

        for ancestor in ancestors.iter().rev() {
            ancestor.set_expanded(true);
        }
    }

    /// Expands `node` and every node reachable from it through children (not
    /// slots), parents before children.
    #[instrument(skip_all)]
    pub fn expand_all_descendants(&self, node: Option<&ViewNode<D>>) {
        set_expanded_recursive(node, true);
    }

    #[instrument(skip_all)]
    pub fn collapse_all_descendants(&self, node: Option<&ViewNode<D>>) {
        set_expanded_recursive(node, false);
    }

    /// Forgets view nodes that can no longer be reached from the root through
    /// children or slots. Their state is lost, and a view node created later
    /// for the same id is a new instance. Returns how many were dropped.
    pub fn evict_unreachable(&self) -> usize {
        let mut reachable = collections::HashSet::new();

        if let Some(root) = self.inner.document.as_ref().and_then(Document::focus_node) {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                if reachable.insert(node.id()) {
                    stack.extend(node.children());
                    stack.extend(node.slots());
                }
            }
        }

        let evicted: Vec<ViewNode<D>> = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let stale: Vec<NodeId> = nodes.keys().filter(|id| !reachable.contains(*id)).cloned().collect();
            stale.iter().filter_map(|id| nodes.remove(id)).collect()
        };

        if !evicted.is_empty() {
            event!(Level::DEBUG, count = evicted.len(), "evicted unreachable view nodes");
        }

        evicted.len()
    }

    /// Stops listening to the document. Happens automatically once the last
    /// handle to the mirror is dropped.
    pub fn dispose(&self) {
        let subscriptions: Vec<util::Subscription> = self.inner.subscriptions.borrow_mut().drain(..).collect();
        for subscription in subscriptions {
            subscription.dispose();
        }
    }

    fn children_changed(&self, id: &str) {
        match self.lookup_by_id(id) {
            Some(node) => {
                event!(Level::TRACE, %id, "children changed");
                node.notify_expandable_changed();
            },
            None => event!(Level::TRACE, %id, "children changed on a node we never mirrored"),
        }

        let evict = config::get().evict_on_children_changed;
        if evict {
            self.evict_unreachable();
        }
    }

    fn drop_location_changed(&self, location: Option<&DropLocation>) {
        let new_target = location.map(|location| location.target.clone());
        let old_target = self.inner.drop_target.replace(new_target.clone());

        if let Some(old_target) = old_target.filter(|old| Some(old) != new_target.as_ref()) {
            if let Some(node) = self.lookup_by_id(&old_target) {
                node.set_drop_detail(None);
            }
        }

        if let (Some(location), Some(target)) = (location, new_target) {
            if let Some(node) = self.lookup_by_id(&target) {
                node.set_drop_detail(location.children_detail_for(&target).cloned());
            }
        }
    }
}

fn set_expanded_recursive<D: Document>(node: Option<&ViewNode<D>>, expanded: bool) {
    let Some(node) = node else { return };

    /* explicit stack, but same order as recursing */
    let mut stack = vec![node.clone()];
    while let Some(current) = stack.pop() {
        current.set_expanded(expanded);
        stack.extend(current.children().into_iter().rev());
    }
}

impl<D: Document> Drop for MirrorInner<D> {
    fn drop(&mut self) {
        for subscription in self.subscriptions.get_mut().drain(..) {
            subscription.dispose();
        }
    }
}

impl<D: Document> std::fmt::Debug for TreeMirror<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeMirror")
            .field("id", &self.inner.id)
            .field("nodes", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rusty_fork::rusty_fork_test;

    use crate::model::document::host::DocumentHost;
    use crate::model::document::structure;
    use crate::model::document::{DropDetail, LocationDetail};

    pub(crate) fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    /// R -> [A -> [B], C], with a slot S on A.
    pub(crate) fn create_simple_document() -> DocumentHost {
        DocumentHost::new("doc", structure::Node::builder("R")
                          .title("Page")
                          .child("A", |b| b
                                 .title("Container")
                                 .slot("S", |b| b
                                       .title("Header")
                                       .child("S.0", |b| b.title("Logo")))
                                 .child("B", |b| b.title("Button")))
                          .child("C", |b| b.title("Text"))
                          .build())
    }

    fn lookup(mirror: &TreeMirror<DocumentHost>, id: &str) -> ViewNode<DocumentHost> {
        let node = mirror.document().and_then(|doc| doc.node(id)).unwrap();
        mirror.resolve_or_create(&node)
    }

    fn record_expansions(nodes: &[&ViewNode<DocumentHost>]) -> (rc::Rc<cell::RefCell<Vec<(String, bool)>>>, Vec<util::Subscription>) {
        let log = rc::Rc::new(cell::RefCell::new(Vec::new()));
        let subs = nodes.iter().map(|node| {
            let sink = log.clone();
            let id = node.id().to_string();
            node.on_expanded_changed(move |expanded| sink.borrow_mut().push((id.clone(), expanded)))
        }).collect();
        (log, subs)
    }

    #[test]
    fn test_resolve_or_create_is_idempotent() {
        init_tracing();
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));

        let a = lookup(&mirror, "A");
        let a_again = mirror.resolve_or_create(&doc.node("A").unwrap());

        assert!(a.ptr_eq(&a_again));
        assert_eq!(a, a_again);
        assert_eq!(mirror.len(), 1);
        assert!(mirror.lookup_by_id(a.id()).unwrap().ptr_eq(&a));
        assert_matches!(mirror.lookup_by_id("B"), None);
    }

    #[test]
    fn test_id_and_root() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));

        assert_eq!(mirror.id(), Some("doc"));

        let root = mirror.root().unwrap();
        assert_eq!(root.id(), "R");
        assert!(root.is_root());
        assert!(mirror.root().unwrap().ptr_eq(&root));

        for child in root.children() {
            assert!(!child.is_root());
        }

        doc.set_focus(Some("A"));
        let a = mirror.lookup_by_id("A").unwrap();
        assert!(a.is_root());
        assert!(!root.is_root());
        assert!(mirror.root().unwrap().ptr_eq(&a));

        doc.set_focus(None);
        assert_matches!(mirror.root(), None);
        assert!(!a.is_root());
    }

    #[test]
    fn test_select_node_expands_ancestors() {
        init_tracing();
        let mirror = TreeMirror::new(Some(create_simple_document()));

        let root = mirror.root().unwrap();
        let a = lookup(&mirror, "A");
        let b = lookup(&mirror, "B");
        let (log, _subs) = record_expansions(&[&root, &a, &b]);

        mirror.select_node("B");

        assert!(root.expanded());
        assert!(a.expanded());
        assert!(!b.expanded());
        assert_eq!(*log.borrow(), vec![("R".to_string(), true), ("A".to_string(), true)]);

        mirror.collapse_all_descendants(Some(&root));
        assert!(!root.expanded());
        assert!(!a.expanded());
    }

    #[test]
    fn test_select_node_leaves_target_expansion_alone() {
        let mirror = TreeMirror::new(Some(create_simple_document()));
        let b = lookup(&mirror, "B");

        b.set_expanded(true);
        mirror.select_node("B");

        assert!(b.expanded());
        assert!(mirror.lookup_by_id("A").unwrap().expanded());
    }

    #[test]
    fn test_select_node_stops_at_focus_root() {
        let doc = create_simple_document();
        doc.set_focus(Some("A"));
        let mirror = TreeMirror::new(Some(doc.clone()));

        let b = lookup(&mirror, "B");
        mirror.select_node("B");

        assert!(mirror.lookup_by_id("A").unwrap().expanded());
        /* R is above the outline's root and was never walked */
        assert_matches!(mirror.lookup_by_id("R"), None);
        assert!(!b.expanded());
    }

    #[test]
    fn test_select_node_noops() {
        let mirror = TreeMirror::new(Some(create_simple_document()));

        /* nothing cached for B yet */
        mirror.select_node("B");
        assert!(mirror.is_empty());

        /* the root has no ancestors to expand */
        let root = mirror.root().unwrap();
        mirror.select_node("R");
        assert!(!root.expanded());

        mirror.expand_all_ancestors(None);
        mirror.select_node("missing");
    }

    #[test]
    fn test_expand_and_collapse_all_descendants() {
        let mirror = TreeMirror::new(Some(create_simple_document()));
        let root = mirror.root().unwrap();

        let (log, _subs) = {
            let a = lookup(&mirror, "A");
            let b = lookup(&mirror, "B");
            let c = lookup(&mirror, "C");
            record_expansions(&[&root, &a, &b, &c])
        };

        mirror.expand_all_descendants(Some(&root));
        for id in ["R", "A", "B", "C"] {
            assert!(mirror.lookup_by_id(id).unwrap().expanded(), "{} should be expanded", id);
        }

        /* slots aren't descended into */
        let s = lookup(&mirror, "S");
        assert!(!s.expanded());

        assert_eq!(*log.borrow(), vec![
            ("R".to_string(), true),
            ("A".to_string(), true),
            ("B".to_string(), true),
            ("C".to_string(), true),
        ]);

        mirror.collapse_all_descendants(Some(&root));
        for id in ["R", "A", "B", "C"] {
            assert!(!mirror.lookup_by_id(id).unwrap().expanded(), "{} should be collapsed", id);
        }

        mirror.expand_all_descendants(None);
        mirror.collapse_all_descendants(None);
    }

    #[test]
    fn test_expand_all_descendants_of_subtree() {
        let mirror = TreeMirror::new(Some(create_simple_document()));
        let root = mirror.root().unwrap();
        let a = lookup(&mirror, "A");

        mirror.expand_all_descendants(Some(&a));

        assert!(a.expanded());
        assert!(lookup(&mirror, "B").expanded());
        assert!(!root.expanded());
        assert!(!lookup(&mirror, "C").expanded());
    }

    #[test]
    fn test_children_changed_on_uncached_node() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let root = mirror.root().unwrap();

        let count = rc::Rc::new(cell::Cell::new(0));
        let counter = count.clone();
        let _sub = root.on_expandable_changed(move || counter.set(counter.get() + 1));

        doc.delete_range("A", 0, 0).unwrap();

        assert_eq!(count.get(), 0);
        assert_matches!(mirror.lookup_by_id("A"), None);
    }

    #[test]
    fn test_children_changed_notifies_expandable() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let a = lookup(&mirror, "A");
        a.set_expanded(true);

        let count = rc::Rc::new(cell::Cell::new(0));
        let counter = count.clone();
        let _sub = a.on_expandable_changed(move || counter.set(counter.get() + 1));

        doc.delete_range("A", 0, 0).unwrap();

        assert_eq!(count.get(), 1);
        assert!(a.expanded());
        assert!(a.children().is_empty());
        /* still has its slot */
        assert!(a.expandable());
    }

    #[test]
    fn test_identity_survives_moves() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));

        let b = lookup(&mirror, "B");
        b.set_expanded(true);

        doc.move_node("B", "C", 0).unwrap();

        let c = lookup(&mirror, "C");
        let children = c.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].ptr_eq(&b));
        assert!(b.expanded());
        assert!(b.parent().unwrap().ptr_eq(&c));
    }

    #[test]
    fn test_identity_survives_reinsertion() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));

        let c = lookup(&mirror, "C");
        c.set_expanded(true);

        doc.delete_range("R", 1, 1).unwrap();
        doc.insert_node("A", 0, structure::Node::builder("C").title("Paragraph").build()).unwrap();

        let a = lookup(&mirror, "A");
        let reinserted = a.children().into_iter().next().unwrap();
        assert!(reinserted.ptr_eq(&c));
        assert!(c.expanded());
        assert_eq!(c.node().title(), "Paragraph");
    }

    #[test]
    fn test_evict_unreachable() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));

        let root = mirror.root().unwrap();
        mirror.expand_all_descendants(Some(&root));
        lookup(&mirror, "S");
        assert_eq!(mirror.len(), 5);

        doc.delete_range("R", 0, 0).unwrap();

        /* no eviction unless asked for */
        assert_eq!(mirror.len(), 5);
        assert_eq!(mirror.evict_unreachable(), 3);
        assert_eq!(mirror.len(), 2);
        assert_matches!(mirror.lookup_by_id("B"), None);
        assert!(mirror.lookup_by_id("C").is_some());
    }

    rusty_fork_test! {
        #[test]
        fn test_evict_on_children_changed() {
            config::set().evict_on_children_changed = true;

            let doc = create_simple_document();
            let mirror = TreeMirror::new(Some(doc.clone()));
            let root = mirror.root().unwrap();
            mirror.expand_all_descendants(Some(&root));

            doc.delete_range("A", 0, 0).unwrap();
            assert_matches!(mirror.lookup_by_id("B"), None);
            assert!(mirror.lookup_by_id("A").is_some());
        }
    }

    #[test]
    fn test_drop_detail_follows_drop_location() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let a = lookup(&mirror, "A");
        let c = lookup(&mirror, "C");

        let log = rc::Rc::new(cell::RefCell::new(Vec::new()));
        let subs: Vec<util::Subscription> = [&a, &c].iter().map(|node| {
            let sink = log.clone();
            let id = node.id().to_string();
            node.on_drop_detail_changed(move |detail| sink.borrow_mut().push((id.clone(), detail.cloned())))
        }).collect();

        let detail = DropDetail { index: Some(1), valid: true, focus: None };
        doc.set_drop_location(Some(DropLocation {
            target: "A".to_string(),
            detail: LocationDetail::Children(detail.clone()),
        }));
        assert_eq!(a.drop_detail(), Some(detail.clone()));

        doc.set_drop_location(Some(DropLocation {
            target: "C".to_string(),
            detail: LocationDetail::Prop { name: "title".to_string() },
        }));
        assert_eq!(a.drop_detail(), None);
        assert_eq!(c.drop_detail(), None);

        doc.set_drop_location(Some(DropLocation {
            target: "C".to_string(),
            detail: LocationDetail::Children(detail.clone()),
        }));
        doc.set_drop_location(None);

        assert_eq!(*log.borrow(), vec![
            ("A".to_string(), Some(detail.clone())),
            ("A".to_string(), None),
            ("C".to_string(), Some(detail.clone())),
            ("C".to_string(), None),
        ]);

        for sub in subs {
            sub.dispose();
        }
    }

    #[test]
    fn test_insertion_point_changes_expandable() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let c = lookup(&mirror, "C");

        let log = rc::Rc::new(cell::RefCell::new(Vec::new()));
        let sink = log.clone();
        let observed = c.clone();
        let _sub = c.on_expandable_changed(move || sink.borrow_mut().push(observed.expandable()));

        assert!(!c.expandable());

        doc.set_drop_location(Some(DropLocation {
            target: "C".to_string(),
            detail: LocationDetail::Children(DropDetail { index: Some(0), valid: true, focus: None }),
        }));
        assert!(c.expandable());

        /* same insertion point, different validity: still expandable */
        doc.set_drop_location(Some(DropLocation {
            target: "C".to_string(),
            detail: LocationDetail::Children(DropDetail { index: Some(0), valid: false, focus: None }),
        }));

        doc.set_drop_location(Some(DropLocation {
            target: "C".to_string(),
            detail: LocationDetail::Children(DropDetail { index: None, valid: true, focus: Some(crate::model::document::DropFocus::Slots) }),
        }));
        doc.set_drop_location(None);

        assert!(!c.expandable());
        assert_eq!(*log.borrow(), vec![true, false]);
    }

    #[test]
    fn test_document_changed_from_inside_listener() {
        init_tracing();
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let root = mirror.root().unwrap();
        let a = lookup(&mirror, "A");

        let log = rc::Rc::new(cell::RefCell::new(Vec::new()));

        let sink = log.clone();
        let nested_doc = doc.clone();
        let inserted = cell::Cell::new(false);
        let _root_sub = root.on_expandable_changed(move || {
            sink.borrow_mut().push("R");
            if !inserted.replace(true) {
                nested_doc.insert_node("A", 0, structure::Node::builder("X").build()).unwrap();
                /* the nested event is still waiting for this one to finish */
                sink.borrow_mut().push("inserted X");
            }
        });

        let sink = log.clone();
        let _a_sub = a.on_expandable_changed(move || sink.borrow_mut().push("A"));

        doc.insert_node("R", 2, structure::Node::builder("D").build()).unwrap();

        assert_eq!(*log.borrow(), vec!["R", "inserted X", "A"]);
        itertools::assert_equal(a.children().iter().map(ViewNode::id), ["X", "B"]);
        itertools::assert_equal(root.children().iter().map(ViewNode::id), ["A", "C", "D"]);
    }

    #[test]
    fn test_drop_detail_for_nodes_created_mid_drag() {
        let doc = create_simple_document();
        let detail = DropDetail { index: None, valid: false, focus: Some(crate::model::document::DropFocus::Slots) };
        doc.set_drop_location(Some(DropLocation {
            target: "B".to_string(),
            detail: LocationDetail::Children(detail.clone()),
        }));

        let mirror = TreeMirror::new(Some(doc.clone()));
        let b = lookup(&mirror, "B");
        assert_eq!(b.drop_detail(), Some(detail));

        doc.set_drop_location(None);
        assert_eq!(b.drop_detail(), None);
    }

    #[test]
    fn test_no_document() {
        let mirror: TreeMirror<DocumentHost> = TreeMirror::new(None);

        assert_matches!(mirror.id(), None);
        assert_matches!(mirror.root(), None);
        assert_matches!(mirror.lookup_by_id("R"), None);
        mirror.select_node("R");
        mirror.expand_all_descendants(None);
        assert_eq!(mirror.evict_unreachable(), 0);
    }

    #[test]
    fn test_dispose_releases_document_subscriptions() {
        let doc = create_simple_document();

        let mirror = TreeMirror::new(Some(doc.clone()));
        assert_eq!(doc.subscriber_count(), 2);
        mirror.dispose();
        assert_eq!(doc.subscriber_count(), 0);

        let mirror = TreeMirror::new(Some(doc.clone()));
        assert_eq!(doc.subscriber_count(), 2);
        std::mem::drop(mirror);
        assert_eq!(doc.subscriber_count(), 0);
    }

    #[test]
    fn test_view_nodes_outliving_mirror() {
        let doc = create_simple_document();
        let mirror = TreeMirror::new(Some(doc.clone()));
        let a = lookup(&mirror, "A");
        std::mem::drop(mirror);

        assert!(a.children().is_empty());
        assert!(a.slots().is_empty());
        assert_matches!(a.parent(), None);
        assert!(!a.is_root());
        a.set_expanded(true);
        assert!(a.expanded());
    }
}
