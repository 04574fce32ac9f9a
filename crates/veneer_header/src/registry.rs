//! One parallax header per scroll container
//!
//! Hosts that decorate many containers keep a [`HeaderRegistry`] as a side
//! table instead of threading controllers through their widget state. Lookup
//! is by container identity; entries whose container has been dropped are
//! pruned on access.

use rustc_hash::FxHashMap;

use veneer_core::{Result, ScrollView, ScrollViewId, WeakScrollView};

use crate::header::ParallaxHeader;

struct Entry {
    scroll_view: WeakScrollView,
    header: ParallaxHeader,
}

/// Side table mapping scroll containers to their header controllers
#[derive(Default)]
pub struct HeaderRegistry {
    entries: FxHashMap<ScrollViewId, Entry>,
}

impl HeaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The header for `scroll_view`, created and attached on first use
    pub fn header_for(&mut self, scroll_view: &ScrollView) -> Result<ParallaxHeader> {
        self.entries
            .retain(|_, entry| entry.scroll_view.upgrade().is_some());

        // Ids are pointer-derived, so a recycled allocation could collide
        // with a stale key; the retain above plus this identity check keep
        // the map honest.
        if let Some(entry) = self.entries.get(&scroll_view.id()) {
            let same = entry
                .scroll_view
                .upgrade()
                .is_some_and(|existing| existing.same_container(scroll_view));
            if same {
                return Ok(entry.header.clone());
            }
        }

        let header = ParallaxHeader::new();
        header.attach(scroll_view)?;
        tracing::debug!("registered parallax header for {:?}", scroll_view.id());
        self.entries.insert(
            scroll_view.id(),
            Entry {
                scroll_view: scroll_view.downgrade(),
                header: header.clone(),
            },
        );
        Ok(header)
    }

    /// Drop the entry for a container, returning its controller
    pub fn remove(&mut self, scroll_view: &ScrollView) -> Option<ParallaxHeader> {
        self.entries
            .remove(&scroll_view.id())
            .map(|entry| entry.header)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::Rect;

    fn scroll_view() -> ScrollView {
        let scroll = ScrollView::new();
        scroll.set_frame(Rect::new(0.0, 0.0, 320.0, 480.0));
        scroll
    }

    #[test]
    fn test_one_header_per_container() {
        let mut registry = HeaderRegistry::new();
        let scroll = scroll_view();

        let first = registry.header_for(&scroll).unwrap();
        first.set_height(100.0).unwrap();

        let second = registry.header_for(&scroll).unwrap();
        assert_eq!(second.height(), 100.0);
        assert_eq!(registry.len(), 1);
        // Attach ran once: the inset reflects a single reservation.
        assert_eq!(scroll.content_inset().top, 100.0);
    }

    #[test]
    fn test_distinct_containers_get_distinct_headers() {
        let mut registry = HeaderRegistry::new();
        let a = scroll_view();
        let b = scroll_view();

        let header_a = registry.header_for(&a).unwrap();
        header_a.set_height(60.0).unwrap();
        let header_b = registry.header_for(&b).unwrap();

        assert_eq!(header_b.height(), 0.0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_dropped_container_is_pruned() {
        let mut registry = HeaderRegistry::new();
        {
            let scroll = scroll_view();
            registry.header_for(&scroll).unwrap();
        }
        assert_eq!(registry.len(), 1);

        let fresh = scroll_view();
        registry.header_for(&fresh).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_returns_controller() {
        let mut registry = HeaderRegistry::new();
        let scroll = scroll_view();
        let header = registry.header_for(&scroll).unwrap();

        let removed = registry.remove(&scroll).unwrap();
        assert!(removed.scroll_view().unwrap().same_container(&scroll));
        assert!(registry.is_empty());
        drop(header);
    }
}
