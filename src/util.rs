use std::cell;
use std::collections;
use std::fmt;
use std::rc;

use tracing::{event, Level};

type Callback<A> = rc::Rc<cell::RefCell<dyn FnMut(&A)>>;

struct Entry<A> {
    key: u64,
    callback: Callback<A>,
}

struct ListenersInner<A> {
    next_key: u64,
    entries: Vec<Entry<A>>,

    /* set while an emission is being delivered */
    emitting: bool,
    pending: collections::VecDeque<A>,
}

/// An ordered list of callbacks, notified synchronously in registration
/// order. An emission triggered by one of the listeners is held back until
/// the current one has reached every listener, then delivered before the
/// outer [Listeners::emit] returns. Nothing is dropped or coalesced.
pub struct Listeners<A: 'static> {
    inner: rc::Rc<cell::RefCell<ListenersInner<A>>>,
}

/// Handle returned when registering a listener. Calling [Subscription::dispose]
/// removes exactly that listener. Dropping the handle without disposing it
/// leaves the listener registered for as long as its list lives.
#[must_use = "the listener stays registered until dispose() is called"]
pub struct Subscription {
    disposer: Option<Box<dyn FnOnce()>>,
}

impl<A: 'static> Listeners<A> {
    pub fn new() -> Self {
        Listeners {
            inner: rc::Rc::new(cell::RefCell::new(ListenersInner {
                next_key: 0,
                entries: Vec::new(),
                emitting: false,
                pending: collections::VecDeque::new(),
            })),
        }
    }

    pub fn subscribe<F: FnMut(&A) + 'static>(&self, callback: F) -> Subscription {
        let callback: Callback<A> = rc::Rc::new(cell::RefCell::new(callback));

        let key = {
            let mut inner = self.inner.borrow_mut();
            let key = inner.next_key;
            inner.next_key+= 1;
            inner.entries.push(Entry { key, callback });
            key
        };

        let list = rc::Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.borrow_mut().entries.retain(|entry| entry.key != key);
            }
        })
    }

    pub fn emit(&self, arg: &A) where A: Clone {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.emitting {
                inner.pending.push_back(arg.clone());
                event!(Level::TRACE, queued = inner.pending.len(), "deferring nested emission");
                return;
            }
            inner.emitting = true;
        }

        let _guard = EmitGuard { list: &self.inner };

        self.deliver(arg);
        loop {
            let next = self.inner.borrow_mut().pending.pop_front();
            match next {
                Some(arg) => self.deliver(&arg),
                None => break,
            }
        }
    }

    fn deliver(&self, arg: &A) {
        /* listeners are allowed to subscribe and dispose while we're notifying,
         * so work from a snapshot and release our borrow first. */
        let snapshot: Vec<(u64, Callback<A>)> = self.inner.borrow().entries.iter()
            .map(|entry| (entry.key, entry.callback.clone()))
            .collect();

        for (key, callback) in snapshot {
            /* disposed by an earlier listener during this emission */
            if !self.inner.borrow().entries.iter().any(|entry| entry.key == key) {
                continue;
            }

            /* nested emissions are queued, so this shouldn't be busy */
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(arg),
                Err(_) => event!(Level::WARN, key, "listener is already running; skipping delivery"),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/* resets the list even when a listener panics */
struct EmitGuard<'a, A> {
    list: &'a rc::Rc<cell::RefCell<ListenersInner<A>>>,
}

impl<A> Drop for EmitGuard<'_, A> {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.list.try_borrow_mut() {
            inner.emitting = false;
            inner.pending.clear();
        }
    }
}

impl<A: 'static> Default for Listeners<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> fmt::Debug for Listeners<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    pub fn new<F: FnOnce() + 'static>(disposer: F) -> Subscription {
        Subscription {
            disposer: Some(Box::new(disposer)),
        }
    }

    /// For collaborators that have nothing to unsubscribe.
    pub fn noop() -> Subscription {
        Subscription {
            disposer: None,
        }
    }

    pub fn dispose(mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.disposer.is_some())
            .finish()
    }
}
