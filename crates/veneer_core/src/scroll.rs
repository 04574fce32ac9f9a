//! Scroll container model
//!
//! A [`ScrollView`] is a [`View`] with scrollable-content state: a content
//! offset, a content inset, and a content size. Offset changes are delivered
//! to registered observers through stable tokens, so independent subscribers
//! on the same container never disturb each other.
//!
//! Observers are held weakly: delivery to a dropped subscriber is a safe
//! no-op and the dead entry is pruned on the next dispatch.

use std::ops::Deref;
use std::sync::{Arc, Mutex, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::geometry::{EdgeInsets, Point, Size};
use crate::view::{View, WeakView};

new_key_type! {
    /// Private identifying token for one offset-change subscription
    pub struct ObserverToken;
}

/// Receiver of content-offset change notifications
pub trait ScrollObserver: Send + Sync {
    fn scroll_view_did_scroll(self: Arc<Self>, scroll_view: &ScrollView);
}

pub(crate) struct ScrollState {
    content_offset: Point,
    content_inset: EdgeInsets,
    content_size: Size,
    observers: SlotMap<ObserverToken, Weak<dyn ScrollObserver>>,
}

impl ScrollState {
    fn new() -> Self {
        Self {
            content_offset: Point::ZERO,
            content_inset: EdgeInsets::ZERO,
            content_size: Size::ZERO,
            observers: SlotMap::with_key(),
        }
    }
}

/// Stable identity of a scroll container
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScrollViewId(usize);

/// Shared handle to a scroll container
#[derive(Clone)]
pub struct ScrollView {
    view: View,
    scroll: Arc<Mutex<ScrollState>>,
}

/// Weak handle to a scroll container
#[derive(Clone)]
pub struct WeakScrollView {
    view: WeakView,
    scroll: Weak<Mutex<ScrollState>>,
}

impl WeakScrollView {
    pub fn upgrade(&self) -> Option<ScrollView> {
        let view = self.view.upgrade()?;
        let scroll = self.scroll.upgrade()?;
        Some(ScrollView { view, scroll })
    }
}

impl Deref for ScrollView {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollView {
    pub fn new() -> Self {
        let scroll = Arc::new(Mutex::new(ScrollState::new()));
        let view = View::with_scroll_state(scroll.clone());
        Self { view, scroll }
    }

    pub(crate) fn from_parts(view: View, scroll: Arc<Mutex<ScrollState>>) -> Self {
        Self { view, scroll }
    }

    pub fn id(&self) -> ScrollViewId {
        ScrollViewId(Arc::as_ptr(&self.scroll) as usize)
    }

    /// Whether two handles refer to the same container
    pub fn same_container(&self, other: &ScrollView) -> bool {
        Arc::ptr_eq(&self.scroll, &other.scroll)
    }

    pub fn downgrade(&self) -> WeakScrollView {
        WeakScrollView {
            view: self.view.downgrade(),
            scroll: Arc::downgrade(&self.scroll),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Content geometry
    // ─────────────────────────────────────────────────────────────────────

    pub fn content_offset(&self) -> Point {
        self.scroll.lock().unwrap().content_offset
    }

    /// Set the offset and notify every live offset observer
    pub fn set_content_offset(&self, offset: Point) {
        self.scroll.lock().unwrap().content_offset = offset;
        self.notify_observers();
    }

    pub fn content_inset(&self) -> EdgeInsets {
        self.scroll.lock().unwrap().content_inset
    }

    /// Set the inset. If the stored offset now sits above the new top
    /// boundary it is clamped there, which re-notifies observers; callers
    /// that want a seamless transition adjust the offset first.
    pub fn set_content_inset(&self, inset: EdgeInsets) {
        let clamped = {
            let mut state = self.scroll.lock().unwrap();
            state.content_inset = inset;
            if state.content_offset.y < -inset.top {
                tracing::trace!(
                    "content inset clamp: offset {:.1} -> {:.1}",
                    state.content_offset.y,
                    -inset.top
                );
                state.content_offset.y = -inset.top;
                true
            } else {
                false
            }
        };
        if clamped {
            self.notify_observers();
        }
    }

    pub fn content_size(&self) -> Size {
        self.scroll.lock().unwrap().content_size
    }

    pub fn set_content_size(&self, size: Size) {
        self.scroll.lock().unwrap().content_size = size;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Offset observation
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_offset_observer(&self, observer: Weak<dyn ScrollObserver>) -> ObserverToken {
        let token = self.scroll.lock().unwrap().observers.insert(observer);
        tracing::trace!("offset observer added: {:?}", token);
        token
    }

    /// Remove one subscription; unknown tokens are ignored
    pub fn remove_offset_observer(&self, token: ObserverToken) {
        if self.scroll.lock().unwrap().observers.remove(token).is_some() {
            tracing::trace!("offset observer removed: {:?}", token);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.scroll.lock().unwrap().observers.len()
    }

    fn notify_observers(&self) {
        // Snapshot under the lock, deliver outside it: observers are free to
        // read back offset and inset while handling the notification.
        let snapshot: Vec<(ObserverToken, Weak<dyn ScrollObserver>)> = {
            let state = self.scroll.lock().unwrap();
            state
                .observers
                .iter()
                .map(|(token, observer)| (token, observer.clone()))
                .collect()
        };

        let mut dead = Vec::new();
        for (token, observer) in snapshot {
            match observer.upgrade() {
                Some(observer) => observer.scroll_view_did_scroll(self),
                None => dead.push(token),
            }
        }

        if !dead.is_empty() {
            let mut state = self.scroll.lock().unwrap();
            for token in dead {
                state.observers.remove(token);
            }
        }
    }
}
