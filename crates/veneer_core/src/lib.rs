//! Veneer Host Model
//!
//! This crate provides the headless host-toolkit primitives the veneer
//! decorations attach to:
//!
//! - **View tree**: retained hierarchy with frames, opacity, visibility,
//!   clipping, and hierarchy-move hooks
//! - **Scroll containers**: content offset/inset/size with token-based
//!   offset-change observation
//! - **Visual effects**: blur/vibrancy markers for the host renderer
//! - **Opacity tweens**: a tick-driven scheduler for fire-and-forget fades
//!
//! There is no rendering, layout solving, or event loop here; a real host
//! supplies those. The model exists so the decorations (and their tests) have
//! concrete view and scroll contracts to run against.
//!
//! # Example
//!
//! ```rust
//! use veneer_core::{Point, Rect, ScrollView, View};
//!
//! let scroll = ScrollView::new();
//! scroll.set_frame(Rect::new(0.0, 0.0, 320.0, 480.0));
//!
//! let banner = View::new().with_name("banner");
//! scroll.add_subview(&banner).unwrap();
//!
//! scroll.set_content_offset(Point::new(0.0, 120.0));
//! assert_eq!(scroll.content_offset().y, 120.0);
//! ```

pub mod animation;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod scroll;
pub mod view;

pub use animation::{AnimationScheduler, Easing, TweenId};
pub use effects::{BlurStyle, VisualEffect};
pub use error::{Result, ViewError};
pub use geometry::{Color, EdgeInsets, Point, Rect, Size};
pub use scroll::{ObserverToken, ScrollObserver, ScrollView, ScrollViewId, WeakScrollView};
pub use view::{HierarchyObserver, View, ViewId, WeakView};
