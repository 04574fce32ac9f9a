//! Blur Overlay
//!
//! Decorates a host view with a translucent blur backdrop and a nested
//! vibrancy layer, inserted behind the host's own content. Style changes
//! rebuild the overlay; alpha changes fade it, through an
//! [`AnimationScheduler`](veneer_core::AnimationScheduler) when one is
//! attached.
//!
//! ```rust
//! use veneer_blur::BlurView;
//! use veneer_core::{BlurStyle, Rect, View};
//!
//! let host = View::new();
//! host.set_frame(Rect::new(0.0, 0.0, 320.0, 200.0));
//!
//! let mut blur = BlurView::new(&host);
//! blur.setup(BlurStyle::Dark, 0.8).enable(false);
//! assert_eq!(blur.blur_view().unwrap().opacity(), 0.8);
//! ```

pub mod blur;
pub mod registry;

pub use blur::BlurView;
pub use registry::BlurRegistry;
