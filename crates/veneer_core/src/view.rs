//! Retained view tree
//!
//! Views are cheap-clone shared handles over locked state, in the same shape
//! as other shared handles in this workspace. The tree is a strict
//! parent-owns-child hierarchy: a parent holds strong handles to its subviews,
//! a child holds a weak handle back to its superview.
//!
//! Hierarchy moves fire the [`HierarchyObserver`] hooks exactly once each:
//! `will_move_to_superview` while the view is still linked to its old parent,
//! `did_move_to_superview` after it is linked to the new one. Decorations use
//! these hooks to subscribe to (and unsubscribe from) scroll notifications.

use std::sync::{Arc, Mutex, Weak};

use crate::effects::VisualEffect;
use crate::error::{Result, ViewError};
use crate::geometry::{Color, Rect, Size};
use crate::scroll::{ScrollState, ScrollView};

// ─────────────────────────────────────────────────────────────────────────────
// Hierarchy observation
// ─────────────────────────────────────────────────────────────────────────────

/// Hooks fired around a view's move between superviews
pub trait HierarchyObserver: Send + Sync {
    /// Fired before the view is unlinked; `view.superview()` still returns
    /// the old parent, `new_superview` is where the view is headed (None on
    /// plain removal).
    fn will_move_to_superview(self: Arc<Self>, view: &View, new_superview: Option<&View>);

    /// Fired after the move; `superview` is the view's new parent.
    fn did_move_to_superview(self: Arc<Self>, view: &View, superview: Option<&View>);
}

// ─────────────────────────────────────────────────────────────────────────────
// View state
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct ViewState {
    frame: Rect,
    opacity: f32,
    hidden: bool,
    background: Option<Color>,
    clips_to_bounds: bool,
    name: Option<String>,
    rotation_degrees: f32,
    preferred_size: Size,
    fills_superview: bool,
    effect: Option<VisualEffect>,
    superview: Weak<Mutex<ViewState>>,
    /// Index 0 = backmost
    subviews: Vec<View>,
    pub(crate) scroll: Option<Arc<Mutex<ScrollState>>>,
    hierarchy_observer: Option<Weak<dyn HierarchyObserver>>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            frame: Rect::ZERO,
            opacity: 1.0,
            hidden: false,
            background: None,
            clips_to_bounds: false,
            name: None,
            rotation_degrees: 0.0,
            preferred_size: Size::ZERO,
            fills_superview: false,
            effect: None,
            superview: Weak::new(),
            subviews: Vec::new(),
            scroll: None,
            hierarchy_observer: None,
        }
    }
}

/// Stable identity of a view handle (pointer identity of its shared state)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(usize);

/// Shared handle to a view
#[derive(Clone)]
pub struct View {
    state: Arc<Mutex<ViewState>>,
}

/// Weak handle to a view, for non-owning back references
#[derive(Clone)]
pub struct WeakView {
    state: Weak<Mutex<ViewState>>,
}

impl WeakView {
    pub fn upgrade(&self) -> Option<View> {
        self.state.upgrade().map(|state| View { state })
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState::new())),
        }
    }

    pub(crate) fn with_scroll_state(scroll: Arc<Mutex<ScrollState>>) -> Self {
        let view = Self::new();
        view.state.lock().unwrap().scroll = Some(scroll);
        view
    }

    /// Attach a debug label
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.state.lock().unwrap().name = Some(name.into());
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ViewId {
        ViewId(Arc::as_ptr(&self.state) as usize)
    }

    /// Whether two handles refer to the same view
    pub fn ptr_eq(&self, other: &View) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    pub fn downgrade(&self) -> WeakView {
        WeakView {
            state: Arc::downgrade(&self.state),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Properties
    // ─────────────────────────────────────────────────────────────────────

    pub fn frame(&self) -> Rect {
        self.state.lock().unwrap().frame
    }

    /// Set the frame; subviews pinned with [`View::set_fills_superview`]
    /// track the new bounds.
    pub fn set_frame(&self, frame: Rect) {
        let pinned: Vec<View> = {
            let mut state = self.state.lock().unwrap();
            if state.frame == frame {
                return;
            }
            state.frame = frame;
            state
                .subviews
                .iter()
                .filter(|child| child.fills_superview())
                .cloned()
                .collect()
        };
        let bounds = frame.bounds();
        for child in pinned {
            child.set_frame(bounds);
        }
    }

    /// The view's own coordinate space (frame size at origin zero)
    pub fn bounds(&self) -> Rect {
        self.frame().bounds()
    }

    pub fn opacity(&self) -> f32 {
        self.state.lock().unwrap().opacity
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.state.lock().unwrap().opacity = opacity;
    }

    pub fn is_hidden(&self) -> bool {
        self.state.lock().unwrap().hidden
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.state.lock().unwrap().hidden = hidden;
    }

    pub fn background(&self) -> Option<Color> {
        self.state.lock().unwrap().background
    }

    pub fn set_background(&self, background: Option<Color>) {
        self.state.lock().unwrap().background = background;
    }

    pub fn clips_to_bounds(&self) -> bool {
        self.state.lock().unwrap().clips_to_bounds
    }

    pub fn set_clips_to_bounds(&self, clips: bool) {
        self.state.lock().unwrap().clips_to_bounds = clips;
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().unwrap().name.clone()
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.state.lock().unwrap().rotation_degrees
    }

    /// Rotate the view by the given angle, accumulating with any prior rotation
    pub fn rotate(&self, degrees: f32) {
        self.state.lock().unwrap().rotation_degrees += degrees;
    }

    /// Intrinsic-size analog, consumed by centered layout
    pub fn preferred_size(&self) -> Size {
        self.state.lock().unwrap().preferred_size
    }

    pub fn set_preferred_size(&self, size: Size) {
        self.state.lock().unwrap().preferred_size = size;
    }

    pub fn fills_superview(&self) -> bool {
        self.state.lock().unwrap().fills_superview
    }

    /// Pin the view to its superview's edges: its frame tracks the
    /// superview's bounds from the moment it is inserted.
    pub fn set_fills_superview(&self, fills: bool) {
        self.state.lock().unwrap().fills_superview = fills;
    }

    pub fn effect(&self) -> Option<VisualEffect> {
        self.state.lock().unwrap().effect
    }

    pub fn set_effect(&self, effect: Option<VisualEffect>) {
        self.state.lock().unwrap().effect = effect;
    }

    pub fn set_hierarchy_observer(&self, observer: Weak<dyn HierarchyObserver>) {
        self.state.lock().unwrap().hierarchy_observer = Some(observer);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Hierarchy
    // ─────────────────────────────────────────────────────────────────────

    pub fn superview(&self) -> Option<View> {
        self.state
            .lock()
            .unwrap()
            .superview
            .upgrade()
            .map(|state| View { state })
    }

    pub fn subviews(&self) -> Vec<View> {
        self.state.lock().unwrap().subviews.clone()
    }

    /// Whether `self` sits in `other`'s subtree (a view is a descendant of
    /// itself)
    pub fn is_descendant_of(&self, other: &View) -> bool {
        let mut current = Some(self.clone());
        while let Some(view) = current {
            if view.ptr_eq(other) {
                return true;
            }
            current = view.superview();
        }
        false
    }

    /// Append `child` as the frontmost subview
    pub fn add_subview(&self, child: &View) -> Result<()> {
        let index = self.effective_subview_len(child);
        self.insert_subview(child, index)
    }

    /// Insert `child` at `index` in the subview list (0 = backmost).
    ///
    /// A child attached elsewhere is moved: it leaves its old superview
    /// (firing that side's hierarchy hooks) before joining this one.
    pub fn insert_subview(&self, child: &View, index: usize) -> Result<()> {
        if self.is_descendant_of(child) {
            return Err(ViewError::HierarchyCycle);
        }
        let len = self.effective_subview_len(child);
        if index > len {
            return Err(ViewError::IndexOutOfRange { index, len });
        }

        child.remove_from_superview();

        child.notify_will_move(Some(self));
        self.state
            .lock()
            .unwrap()
            .subviews
            .insert(index, child.clone());
        child.state.lock().unwrap().superview = Arc::downgrade(&self.state);
        if child.fills_superview() {
            child.set_frame(self.bounds());
        }
        child.notify_did_move(Some(self));
        Ok(())
    }

    /// Unlink from the superview; no-op when detached
    pub fn remove_from_superview(&self) {
        let Some(parent) = self.superview() else {
            return;
        };
        self.notify_will_move(None);
        parent
            .state
            .lock()
            .unwrap()
            .subviews
            .retain(|child| !child.ptr_eq(self));
        self.state.lock().unwrap().superview = Weak::new();
        self.notify_did_move(None);
    }

    /// The scroll container aspect of this view, if it has one
    pub fn as_scroll_view(&self) -> Option<ScrollView> {
        let scroll = self.state.lock().unwrap().scroll.clone()?;
        Some(ScrollView::from_parts(self.clone(), scroll))
    }

    /// Subview count not counting `child` itself (for move-in-place indexing)
    fn effective_subview_len(&self, child: &View) -> usize {
        let state = self.state.lock().unwrap();
        let contains = state.subviews.iter().any(|v| v.ptr_eq(child));
        state.subviews.len() - usize::from(contains)
    }

    fn notify_will_move(&self, new_superview: Option<&View>) {
        let Some(observer) = self.observer() else {
            return;
        };
        observer.will_move_to_superview(self, new_superview);
    }

    fn notify_did_move(&self, superview: Option<&View>) {
        let Some(observer) = self.observer() else {
            return;
        };
        observer.did_move_to_superview(self, superview);
    }

    fn observer(&self) -> Option<Arc<dyn HierarchyObserver>> {
        self.state
            .lock()
            .unwrap()
            .hierarchy_observer
            .as_ref()
            .and_then(Weak::upgrade)
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("View")
            .field("name", &state.name)
            .field("frame", &state.frame)
            .field("subviews", &state.subviews.len())
            .finish()
    }
}
