use std::cell;
use std::fmt;
use std::rc;

use tracing::{event, Level};

use crate::config;
use crate::model::document::{Document, DocumentNode, DropDetail};
use crate::model::outline::filter::FilterResult;
use crate::model::outline::{MirrorInner, TreeMirror};
use crate::util;

struct ViewNodeInner<D: Document> {
    id: String,

    /* refreshed in place whenever the mirror resolves this id again */
    node: cell::RefCell<D::Node>,

    /* the mirror owns us, so this has to stay weak */
    mirror: rc::Weak<MirrorInner<D>>,

    expanded: cell::Cell<bool>,
    filter_result: cell::RefCell<FilterResult>,
    drop_detail: cell::RefCell<Option<DropDetail>>,

    expanded_changed: util::Listeners<bool>,
    expandable_changed: util::Listeners<()>,
    filter_result_changed: util::Listeners<FilterResult>,
    drop_detail_changed: util::Listeners<Option<DropDetail>>,
}

/// UI-side twin of one document node. Cloning yields another handle to the
/// same view node; equality is identity.
pub struct ViewNode<D: Document> {
    inner: rc::Rc<ViewNodeInner<D>>,
}

impl<D: Document> ViewNode<D> {
    pub(super) fn new(mirror: rc::Weak<MirrorInner<D>>, node: D::Node, drop_detail: Option<DropDetail>) -> ViewNode<D> {
        ViewNode {
            inner: rc::Rc::new(ViewNodeInner {
                id: node.id(),
                node: cell::RefCell::new(node),
                mirror,
                expanded: cell::Cell::new(false),
                filter_result: cell::RefCell::new(FilterResult::default()),
                drop_detail: cell::RefCell::new(drop_detail),
                expanded_changed: util::Listeners::new(),
                expandable_changed: util::Listeners::new(),
                filter_result_changed: util::Listeners::new(),
                drop_detail_changed: util::Listeners::new(),
            })
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// The document node as of the last time the mirror resolved it.
    pub fn node(&self) -> D::Node {
        self.inner.node.borrow().clone()
    }

    pub(super) fn set_node(&self, node: D::Node) {
        *self.inner.node.borrow_mut() = node;
    }

    pub fn mirror(&self) -> Option<TreeMirror<D>> {
        self.inner.mirror.upgrade().map(TreeMirror::from_inner)
    }

    pub fn ptr_eq(&self, other: &ViewNode<D>) -> bool {
        rc::Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn expanded(&self) -> bool {
        self.inner.expanded.get()
    }

    /// Notifies expansion listeners if the flag changed (or always, with
    /// `notify_unchanged_expansion` configured).
    pub fn set_expanded(&self, expanded: bool) {
        let was_expanded = self.inner.expanded.replace(expanded);
        if was_expanded == expanded && !config::get().notify_unchanged_expansion {
            return;
        }

        event!(Level::TRACE, id = %self.inner.id, expanded, "expansion changed");
        self.inner.expanded_changed.emit(&expanded);
    }

    pub fn on_expanded_changed<F: FnMut(bool) + 'static>(&self, mut cb: F) -> util::Subscription {
        self.inner.expanded_changed.subscribe(move |expanded: &bool| cb(*expanded))
    }

    /// Whether an expander should be offered: the node has children or slots,
    /// or something is being dragged to a position inside it.
    pub fn expandable(&self) -> bool {
        self.has_children() || self.has_slots() || self.drop_detail().is_some_and(|detail| detail.index.is_some())
    }

    pub fn has_children(&self) -> bool {
        !self.inner.node.borrow().children().is_empty()
    }

    pub fn has_slots(&self) -> bool {
        !self.inner.node.borrow().slots().is_empty()
    }

    /// Tells listeners that [ViewNode::expandable] may have changed. Leaves
    /// the expansion flag alone.
    pub fn notify_expandable_changed(&self) {
        self.inner.expandable_changed.emit(&());
    }

    pub fn on_expandable_changed<F: FnMut() + 'static>(&self, mut cb: F) -> util::Subscription {
        self.inner.expandable_changed.subscribe(move |_: &()| cb())
    }

    pub fn filter_result(&self) -> FilterResult {
        self.inner.filter_result.borrow().clone()
    }

    /// Stores a freshly computed filter result. Listeners hear about every
    /// recomputation, even one that produced the same result.
    pub fn set_filter_result(&self, result: FilterResult) {
        *self.inner.filter_result.borrow_mut() = result.clone();
        self.inner.filter_result_changed.emit(&result);
    }

    pub fn on_filter_result_changed<F: FnMut(&FilterResult) + 'static>(&self, cb: F) -> util::Subscription {
        self.inner.filter_result_changed.subscribe(cb)
    }

    /// Where a drag in progress would drop into this node's children, if it's
    /// targeting this node.
    pub fn drop_detail(&self) -> Option<DropDetail> {
        self.inner.drop_detail.borrow().clone()
    }

    pub(super) fn set_drop_detail(&self, detail: Option<DropDetail>) {
        if *self.inner.drop_detail.borrow() == detail {
            return;
        }

        let had_insertion = self.inner.drop_detail.replace(detail.clone()).is_some_and(|old| old.index.is_some());
        self.inner.drop_detail_changed.emit(&detail);

        /* an insertion point makes the node expandable on its own */
        if had_insertion != detail.as_ref().is_some_and(|detail| detail.index.is_some()) {
            self.notify_expandable_changed();
        }
    }

    pub fn on_drop_detail_changed<F: FnMut(Option<&DropDetail>) + 'static>(&self, mut cb: F) -> util::Subscription {
        self.inner.drop_detail_changed.subscribe(move |detail: &Option<DropDetail>| cb(detail.as_ref()))
    }

    pub fn is_root(&self) -> bool {
        self.mirror().and_then(|mirror| mirror.root_id()).is_some_and(|root| root == self.inner.id)
    }

    pub fn parent(&self) -> Option<ViewNode<D>> {
        let mirror = self.mirror()?;
        let parent = self.inner.node.borrow().parent()?;
        Some(mirror.resolve_or_create(&parent))
    }

    /// The node's current children, in document order. Computed fresh on every
    /// call; the only side effect is creating view nodes for new ids.
    pub fn children(&self) -> Vec<ViewNode<D>> {
        let children = self.inner.node.borrow().children();
        self.resolve_all(children)
    }

    pub fn slots(&self) -> Vec<ViewNode<D>> {
        let slots = self.inner.node.borrow().slots();
        self.resolve_all(slots)
    }

    fn resolve_all(&self, nodes: Vec<D::Node>) -> Vec<ViewNode<D>> {
        match self.mirror() {
            Some(mirror) => nodes.iter().map(|node| mirror.resolve_or_create(node)).collect(),
            None => Vec::new(),
        }
    }
}

impl<D: Document> Clone for ViewNode<D> {
    fn clone(&self) -> Self {
        ViewNode {
            inner: self.inner.clone(),
        }
    }
}

impl<D: Document> PartialEq for ViewNode<D> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<D: Document> Eq for ViewNode<D> {}

impl<D: Document> fmt::Debug for ViewNode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewNode")
            .field("id", &self.inner.id)
            .field("expanded", &self.inner.expanded.get())
            .finish_non_exhaustive()
    }
}
