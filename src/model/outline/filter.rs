use tracing::instrument;

use crate::config;
use crate::model::document::{Document, DocumentNode};
use crate::model::outline::{TreeMirror, ViewNode};

/// Search-filter state for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// A filter is active.
    pub working: bool,
    pub match_self: bool,
    /// Some descendant matched, so the node has to stay visible (and open).
    pub match_child: bool,
    pub keywords: Option<String>,
}

struct Matcher {
    keywords: String,
    needle: String,
    case_sensitive: bool,
}

impl Matcher {
    fn matches(&self, title: &str) -> bool {
        if self.case_sensitive {
            title.contains(&self.needle)
        } else {
            title.to_lowercase().contains(&self.needle)
        }
    }

    /* every child gets visited so each one receives a fresh result, even
     * after a sibling already matched */
    fn visit<D: Document>(&self, node: &ViewNode<D>) -> bool {
        let match_child = node.children().iter()
            .fold(false, |matched, child| self.visit(child) | matched);
        let match_self = self.matches(&node.node().title());

        node.set_filter_result(FilterResult {
            working: true,
            match_self,
            match_child,
            keywords: Some(self.keywords.clone()),
        });

        match_self || match_child
    }
}

/// Re-runs the keyword filter over the tree under the mirror's root, updating
/// every node's [FilterResult]. Blank or missing keywords switch filtering
/// off. Returns whether anything matched.
#[instrument(skip(mirror))]
pub fn apply<D: Document>(mirror: &TreeMirror<D>, keywords: Option<&str>) -> bool {
    let Some(root) = mirror.root() else { return false };

    match keywords.map(str::trim).filter(|keywords| !keywords.is_empty()) {
        Some(keywords) => {
            let case_sensitive = config::get().filter_case_sensitive;
            let matcher = Matcher {
                keywords: keywords.to_string(),
                needle: if case_sensitive { keywords.to_string() } else { keywords.to_lowercase() },
                case_sensitive,
            };

            matcher.visit(&root)
        },
        None => {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                node.set_filter_result(FilterResult::default());
                stack.extend(node.children().into_iter().rev());
            }

            false
        },
    }
}
