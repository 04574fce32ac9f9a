//! Parallax header controller
//!
//! A [`ParallaxHeader`] owns a clipping content view that it inserts into a
//! scroll container. Scrolling moves the content view so the header appears
//! anchored under the top inset, stretching on overscroll and collapsing down
//! to a minimum height. The header view proper sits inside the content view,
//! placed by the active [`HeaderMode`] constraint set.
//!
//! The controller subscribes to offset changes through the content view's
//! hierarchy hooks: entering a scroll container subscribes, leaving
//! unsubscribes. That gives exactly one subscription per attachment no matter
//! how the content view got there.

use std::sync::{Arc, Mutex, Weak};

use veneer_core::{
    HierarchyObserver, ObserverToken, Rect, Result, ScrollObserver, ScrollView, View,
    WeakScrollView,
};

use crate::constraints::{ConstraintSet, HeaderMode};

/// Progress callback, invoked only when the progress value changes
type ProgressHandler = Box<dyn FnMut(&ParallaxHeader) + Send>;

struct HeaderState {
    scroll_view: Option<WeakScrollView>,
    content_view: Option<View>,
    view: Option<View>,
    mode: HeaderMode,
    height: f32,
    minimum_height: f32,
    progress: f32,
    observer_token: Option<ObserverToken>,
    constraints: ConstraintSet,
}

impl HeaderState {
    fn new() -> Self {
        Self {
            scroll_view: None,
            content_view: None,
            view: None,
            mode: HeaderMode::default(),
            height: 0.0,
            minimum_height: 0.0,
            progress: 0.0,
            observer_token: None,
            constraints: ConstraintSet::default(),
        }
    }
}

struct HeaderShared {
    state: Mutex<HeaderState>,
    handler: Mutex<Option<ProgressHandler>>,
}

/// Scroll-reactive header controller, cheap to clone
#[derive(Clone)]
pub struct ParallaxHeader {
    shared: Arc<HeaderShared>,
}

impl Default for ParallaxHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallaxHeader {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(HeaderShared {
                state: Mutex::new(HeaderState::new()),
                handler: Mutex::new(None),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Attachment
    // ─────────────────────────────────────────────────────────────────────

    /// Attach to a scroll container.
    ///
    /// Re-attaching to the same container is a no-op. Attaching to a
    /// different container moves the content view there, which drops the old
    /// container's offset subscription on the way.
    pub fn attach(&self, scroll_view: &ScrollView) -> Result<()> {
        let (height, content) = {
            let mut state = self.shared.state.lock().unwrap();
            if let Some(current) = state.scroll_view.as_ref().and_then(WeakScrollView::upgrade) {
                if current.same_container(scroll_view) {
                    return Ok(());
                }
            }
            state.scroll_view = Some(scroll_view.downgrade());
            let content = ensure_content_view(&self.shared, &mut state);
            (state.height, content)
        };

        tracing::debug!("attaching parallax header, height {:.1}", height);
        adjust_top_inset(scroll_view, scroll_view.content_inset().top + height);
        scroll_view.add_subview(&content)?;
        self.update_constraints()?;
        self.layout_content_view();
        Ok(())
    }

    /// The container this header is attached to, if it is still alive
    pub fn scroll_view(&self) -> Option<ScrollView> {
        self.shared
            .state
            .lock()
            .unwrap()
            .scroll_view
            .as_ref()
            .and_then(WeakScrollView::upgrade)
    }

    /// The clipping view the header view lives in (created lazily)
    pub fn content_view(&self) -> View {
        let mut state = self.shared.state.lock().unwrap();
        ensure_content_view(&self.shared, &mut state)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Header view and sizing
    // ─────────────────────────────────────────────────────────────────────

    pub fn view(&self) -> Option<View> {
        self.shared.state.lock().unwrap().view.clone()
    }

    /// Install the header view, detaching any previous one
    pub fn set_view(&self, view: &View) -> Result<()> {
        let previous = {
            let mut state = self.shared.state.lock().unwrap();
            if state.view.as_ref().is_some_and(|v| v.ptr_eq(view)) {
                return Ok(());
            }
            let previous = state.view.take();
            state.view = Some(view.clone());
            previous
        };
        if let Some(previous) = previous {
            previous.remove_from_superview();
        }
        self.update_constraints()?;
        self.layout_content_view();
        Ok(())
    }

    pub fn mode(&self) -> HeaderMode {
        self.shared.state.lock().unwrap().mode
    }

    /// Switch the sizing mode; the constraint set is rebuilt and the layout
    /// recomputed immediately
    pub fn set_mode(&self, mode: HeaderMode) -> Result<()> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if state.mode == mode {
                return Ok(());
            }
            state.mode = mode;
        }
        tracing::debug!("header mode -> {:?}", mode);
        self.update_constraints()?;
        self.layout_content_view();
        Ok(())
    }

    pub fn height(&self) -> f32 {
        self.shared.state.lock().unwrap().height
    }

    /// Change the header height; no-op when unchanged or unattached.
    ///
    /// The container's top inset moves by the height delta. The offset is
    /// corrected first, against the pre-change inset, so the visible position
    /// holds through the inset change.
    pub fn set_height(&self, height: f32) -> Result<()> {
        let (scroll_view, old_height) = {
            let mut state = self.shared.state.lock().unwrap();
            if state.height == height {
                return Ok(());
            }
            let Some(scroll_view) = state.scroll_view.as_ref().and_then(WeakScrollView::upgrade)
            else {
                return Ok(());
            };
            let old_height = state.height;
            state.height = height;
            (scroll_view, old_height)
        };
        let target = scroll_view.content_inset().top - old_height + height;
        adjust_top_inset(&scroll_view, target);
        self.update_constraints()?;
        self.layout_content_view();
        Ok(())
    }

    pub fn minimum_height(&self) -> f32 {
        self.shared.state.lock().unwrap().minimum_height
    }

    /// The height the header collapses to; values above `height` are
    /// effectively clamped to it during layout
    pub fn set_minimum_height(&self, minimum_height: f32) {
        self.shared.state.lock().unwrap().minimum_height = minimum_height;
        self.layout_content_view();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Progress
    // ─────────────────────────────────────────────────────────────────────

    /// 1 at the configured height, 0 fully collapsed, above 1 on overscroll
    pub fn progress(&self) -> f32 {
        self.shared.state.lock().unwrap().progress
    }

    pub fn set_progress_handler(&self, handler: impl FnMut(&ParallaxHeader) + Send + 'static) {
        *self.shared.handler.lock().unwrap() = Some(Box::new(handler));
    }

    /// The active declarative constraint set, for hosts with a real solver
    pub fn constraints(&self) -> ConstraintSet {
        self.shared.state.lock().unwrap().constraints.clone()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────

    /// Recompute the content view frame, the header view frame, and the
    /// progress value from the container's current offset and inset.
    ///
    /// Normally driven by offset notifications; hosts call it directly after
    /// resizing the container.
    pub fn layout_content_view(&self) {
        let changed = {
            let mut state = self.shared.state.lock().unwrap();
            let Some(scroll_view) = state.scroll_view.as_ref().and_then(WeakScrollView::upgrade)
            else {
                return;
            };

            let effective_minimum = state.minimum_height.min(state.height);
            let offset = scroll_view.content_offset();
            let inset = scroll_view.content_inset();

            let relative_y = offset.y + inset.top - state.height;
            let relative_height = -relative_y;
            let frame = Rect::new(
                0.0,
                relative_y,
                scroll_view.frame().width,
                relative_height.max(effective_minimum),
            );

            let content = ensure_content_view(&self.shared, &mut state);
            content.set_frame(frame);

            if let Some(view) = &state.view {
                let resolved = state.constraints.resolve(frame.bounds(), view.preferred_size());
                view.set_frame(resolved);
            }

            let span = state.height - effective_minimum;
            let progress = if span <= f32::EPSILON {
                0.0
            } else {
                (frame.height - effective_minimum) / span
            };
            if progress == state.progress {
                false
            } else {
                tracing::trace!("header progress {:.3} -> {:.3}", state.progress, progress);
                state.progress = progress;
                true
            }
        };

        if changed {
            self.fire_progress_handler();
        }
    }

    /// Reparent the header view under the content view and rebuild the
    /// constraint set for the current mode
    fn update_constraints(&self) -> Result<()> {
        let (view, content, mode, height) = {
            let mut state = self.shared.state.lock().unwrap();
            let Some(view) = state.view.clone() else {
                return Ok(());
            };
            let content = ensure_content_view(&self.shared, &mut state);
            (view, content, state.mode, state.height)
        };

        view.remove_from_superview();
        content.add_subview(&view)?;
        self.shared.state.lock().unwrap().constraints = ConstraintSet::for_mode(mode, height);
        Ok(())
    }

    fn fire_progress_handler(&self) {
        // The handler comes out of its slot for the call so it can reach back
        // into the controller without deadlocking. A handler that scrolls
        // produces a nested layout pass that finds the slot empty, so the
        // loop re-delivers until the progress it reported is the final one.
        loop {
            let handler = self.shared.handler.lock().unwrap().take();
            let Some(mut handler) = handler else {
                return;
            };
            let reported = self.progress();
            handler(self);
            {
                let mut slot = self.shared.handler.lock().unwrap();
                if slot.is_none() {
                    *slot = Some(handler);
                }
            }
            if self.progress() == reported {
                return;
            }
        }
    }
}

/// Create the content view on first use. It clips, carries a debug label, and
/// wires its hierarchy hooks back to the controller.
fn ensure_content_view(shared: &Arc<HeaderShared>, state: &mut HeaderState) -> View {
    state
        .content_view
        .get_or_insert_with(|| {
            let content = View::new().with_name("parallax-content");
            content.set_clips_to_bounds(true);
            let observer: Weak<HeaderShared> = Arc::downgrade(shared);
            content.set_hierarchy_observer(observer);
            content
        })
        .clone()
}

/// Move the container's top inset to `target` without a visible jump: the
/// offset is shifted by the inset delta first, so the clamping the container
/// applies when the inset lands finds the offset already in range.
fn adjust_top_inset(scroll_view: &ScrollView, target: f32) {
    let mut offset = scroll_view.content_offset();
    offset.y += scroll_view.content_inset().top - target;
    scroll_view.set_content_offset(offset);

    let mut inset = scroll_view.content_inset();
    inset.top = target;
    scroll_view.set_content_inset(inset);
    tracing::trace!("top inset -> {:.1}", target);
}

// ─────────────────────────────────────────────────────────────────────────────
// Observer bridge
// ─────────────────────────────────────────────────────────────────────────────

impl HierarchyObserver for HeaderShared {
    fn will_move_to_superview(self: Arc<Self>, view: &View, _new_superview: Option<&View>) {
        // Leaving a scroll container: drop that container's subscription.
        let Some(scroll_view) = view.superview().and_then(|v| v.as_scroll_view()) else {
            return;
        };
        let token = self.state.lock().unwrap().observer_token.take();
        if let Some(token) = token {
            scroll_view.remove_offset_observer(token);
        }
    }

    fn did_move_to_superview(self: Arc<Self>, _view: &View, superview: Option<&View>) {
        // Entering a scroll container: subscribe to its offset changes.
        let Some(scroll_view) = superview.and_then(|v| v.as_scroll_view()) else {
            return;
        };
        let weak_self: Weak<HeaderShared> = Arc::downgrade(&self);
        let token = scroll_view.add_offset_observer(weak_self);
        self.state.lock().unwrap().observer_token = Some(token);
    }
}

impl ScrollObserver for HeaderShared {
    fn scroll_view_did_scroll(self: Arc<Self>, _scroll_view: &ScrollView) {
        ParallaxHeader { shared: self }.layout_content_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_core::Point;

    fn scroll_view() -> ScrollView {
        let scroll = ScrollView::new();
        scroll.set_frame(Rect::new(0.0, 0.0, 320.0, 480.0));
        scroll
    }

    fn attached_header(scroll: &ScrollView) -> ParallaxHeader {
        let header = ParallaxHeader::new();
        header.set_view(&View::new()).unwrap();
        header.attach(scroll).unwrap();
        header.set_height(100.0).unwrap();
        header.set_minimum_height(20.0);
        header
    }

    #[test]
    fn test_attach_reserves_inset_and_subscribes() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        assert_eq!(scroll.content_inset().top, 100.0);
        assert_eq!(scroll.observer_count(), 1);
        assert!(header.scroll_view().unwrap().same_container(&scroll));
    }

    #[test]
    fn test_reattach_same_container_is_noop() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        header.attach(&scroll).unwrap();
        assert_eq!(scroll.content_inset().top, 100.0);
        assert_eq!(scroll.observer_count(), 1);
    }

    #[test]
    fn test_reattach_moves_subscription() {
        let first = scroll_view();
        let second = scroll_view();
        let header = attached_header(&first);

        header.attach(&second).unwrap();
        assert_eq!(first.observer_count(), 0);
        assert_eq!(second.observer_count(), 1);
        assert!(header.scroll_view().unwrap().same_container(&second));
    }

    #[test]
    fn test_set_height_keeps_visible_position() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        // At rest the offset sits at the top of the inset area.
        scroll.set_content_offset(Point::new(0.0, -100.0));
        header.set_height(150.0).unwrap();

        assert_eq!(scroll.content_inset().top, 150.0);
        assert_eq!(scroll.content_offset().y, -150.0);
        assert_eq!(header.height(), 150.0);
    }

    #[test]
    fn test_set_height_unattached_is_noop() {
        let header = ParallaxHeader::new();
        header.set_height(80.0).unwrap();
        assert_eq!(header.height(), 0.0);
        assert!(header.scroll_view().is_none());

        // The height takes effect once a container is there to reserve it.
        let scroll = scroll_view();
        header.attach(&scroll).unwrap();
        header.set_height(80.0).unwrap();
        assert_eq!(header.height(), 80.0);
        assert_eq!(scroll.content_inset().top, 80.0);
    }

    #[test]
    fn test_setters_are_idempotent() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);
        scroll.set_content_offset(Point::new(0.0, -100.0));

        let offset = scroll.content_offset();
        header.set_height(100.0).unwrap();
        header.set_mode(HeaderMode::Fill).unwrap();
        assert_eq!(scroll.content_offset(), offset);
        assert_eq!(scroll.content_inset().top, 100.0);
    }

    #[test]
    fn test_progress_tracks_collapse() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        scroll.set_content_offset(Point::new(0.0, -100.0));
        assert_eq!(header.progress(), 1.0);

        // Halfway between minimum (20) and height (100).
        scroll.set_content_offset(Point::new(0.0, -60.0));
        assert_eq!(header.progress(), 0.5);

        scroll.set_content_offset(Point::new(0.0, -20.0));
        assert_eq!(header.progress(), 0.0);

        // Fully collapsed the content view holds the minimum height.
        scroll.set_content_offset(Point::new(0.0, 300.0));
        assert_eq!(header.progress(), 0.0);
        assert_eq!(header.content_view().frame().height, 20.0);

        // Overscroll pushes past 1.
        scroll.set_content_offset(Point::new(0.0, -180.0));
        assert_eq!(header.progress(), 2.0);
    }

    #[test]
    fn test_progress_guard_when_span_is_zero() {
        let scroll = scroll_view();
        let header = ParallaxHeader::new();
        header.attach(&scroll).unwrap();
        header.set_height(50.0).unwrap();
        header.set_minimum_height(50.0);

        scroll.set_content_offset(Point::new(0.0, -10.0));
        assert_eq!(header.progress(), 0.0);
    }

    #[test]
    fn test_minimum_above_height_is_clamped() {
        let scroll = scroll_view();
        let header = ParallaxHeader::new();
        header.attach(&scroll).unwrap();
        header.set_height(50.0).unwrap();
        header.set_minimum_height(120.0);

        scroll.set_content_offset(Point::new(0.0, 200.0));
        assert_eq!(header.content_view().frame().height, 50.0);
    }

    #[test]
    fn test_handler_fires_only_on_change() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let scroll = scroll_view();
        let header = attached_header(&scroll);

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        header.set_progress_handler(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        scroll.set_content_offset(Point::new(0.0, -60.0));
        scroll.set_content_offset(Point::new(0.0, -60.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        scroll.set_content_offset(Point::new(0.0, -20.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_may_read_controller() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();
        header.set_progress_handler(move |header| {
            sink.lock().unwrap().push(header.progress());
        });

        scroll.set_content_offset(Point::new(0.0, -60.0));
        assert_eq!(*observed.lock().unwrap(), vec![0.5]);
    }

    #[test]
    fn test_reentrant_handler_sees_final_progress() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let inner = scroll.clone();
        header.set_progress_handler(move |header| {
            let progress = header.progress();
            sink.lock().unwrap().push(progress);
            // Collapse the header from inside the callback.
            if progress == 0.5 {
                inner.set_content_offset(Point::new(0.0, -20.0));
            }
        });

        scroll.set_content_offset(Point::new(0.0, -60.0));
        assert_eq!(*seen.lock().unwrap(), vec![0.5, 0.0]);
        assert_eq!(header.progress(), 0.0);
    }

    #[test]
    fn test_dropped_controller_is_safe() {
        let scroll = scroll_view();
        {
            let _header = attached_header(&scroll);
        }
        // The content view is still in the tree but its controller is gone;
        // scrolling must not panic and the dead subscription gets pruned.
        scroll.set_content_offset(Point::new(0.0, -60.0));
        assert_eq!(scroll.observer_count(), 0);
    }

    #[test]
    fn test_set_view_replaces_previous() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);
        let replacement = View::new().with_name("replacement");

        header.set_view(&replacement).unwrap();
        let subviews = header.content_view().subviews();
        assert_eq!(subviews.len(), 1);
        assert!(subviews[0].ptr_eq(&replacement));
    }

    #[test]
    fn test_mode_change_rebuilds_constraints() {
        let scroll = scroll_view();
        let header = attached_header(&scroll);

        scroll.set_content_offset(Point::new(0.0, -100.0));
        header.set_mode(HeaderMode::Top).unwrap();
        scroll.set_content_offset(Point::new(0.0, -40.0));

        // Top mode keeps the configured height while the content collapses.
        let view = header.view().unwrap();
        assert_eq!(view.frame().height, 100.0);
        assert_eq!(header.content_view().frame().height, 40.0);
    }
}
