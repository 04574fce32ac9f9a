//! Parallax Header
//!
//! A scroll-reactive header decoration: a controller inserts a clipping
//! content view into a scroll container, reserves room for it in the top
//! inset, and re-derives its frame from every offset change so the header
//! stretches on overscroll and collapses to a minimum height while scrolling
//! down. Eight sizing modes place the header view inside that content view.
//!
//! ```rust
//! use veneer_core::{Point, Rect, ScrollView, View};
//! use veneer_header::{HeaderMode, ParallaxHeader};
//!
//! let scroll = ScrollView::new();
//! scroll.set_frame(Rect::new(0.0, 0.0, 320.0, 480.0));
//!
//! let header = ParallaxHeader::new();
//! header.set_view(&View::new().with_name("cover")).unwrap();
//! header.set_mode(HeaderMode::Fill).unwrap();
//! header.attach(&scroll).unwrap();
//! header.set_height(100.0).unwrap();
//! header.set_minimum_height(20.0);
//!
//! scroll.set_content_offset(Point::new(0.0, -60.0));
//! assert_eq!(header.progress(), 0.5);
//! ```

pub mod constraints;
pub mod header;
pub mod registry;

pub use constraints::{
    Anchor, Constraint, ConstraintSet, ConstraintTarget, HeaderMode, Priority, Relation,
};
pub use header::ParallaxHeader;
pub use registry::HeaderRegistry;
