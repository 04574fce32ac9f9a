//! One blur decoration per host view
//!
//! Mirrors the header registry: a side table keyed by view identity, handing
//! out mutable access to the per-view [`BlurView`]. Entries for dropped hosts
//! are pruned on access.

use rustc_hash::FxHashMap;

use veneer_core::{View, ViewId, WeakView};

use crate::blur::BlurView;

struct Entry {
    host: WeakView,
    blur: BlurView,
}

/// Side table mapping host views to their blur controllers
#[derive(Default)]
pub struct BlurRegistry {
    entries: FxHashMap<ViewId, Entry>,
}

impl BlurRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The blur controller for `host`, created lazily
    pub fn blur_for(&mut self, host: &View) -> &mut BlurView {
        self.entries
            .retain(|_, entry| entry.host.upgrade().is_some());

        let entry = self.entries.entry(host.id()).or_insert_with(|| Entry {
            host: host.downgrade(),
            blur: BlurView::new(host),
        });
        // Pointer-derived ids can be recycled; a surviving entry must still
        // point at this exact view.
        if !entry.host.upgrade().is_some_and(|view| view.ptr_eq(host)) {
            *entry = Entry {
                host: host.downgrade(),
                blur: BlurView::new(host),
            };
        }
        &mut entry.blur
    }

    /// Drop the entry for a host, returning its controller
    pub fn remove(&mut self, host: &View) -> Option<BlurView> {
        self.entries.remove(&host.id()).map(|entry| entry.blur)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
