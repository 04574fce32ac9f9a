//! Blur overlay fade simulation
//!
//! Builds a blur overlay on a card view and drives a fade in and out through
//! the shared animation scheduler.
//!
//! Run with:
//! `cargo run -p veneer_blur --example blur_fade`

use std::sync::{Arc, Mutex};

use veneer_blur::BlurView;
use veneer_core::{AnimationScheduler, BlurStyle, Rect, View};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let card = View::new().with_name("card");
    card.set_frame(Rect::new(0.0, 0.0, 320.0, 200.0));

    let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));

    let mut blur = BlurView::new(&card);
    blur.set_scheduler(&scheduler);
    blur.set_animation_duration(0.3);
    blur.setup(BlurStyle::Dark, 0.0).enable(false);

    blur.set_alpha(0.9);
    run_to_completion(&scheduler, &blur);

    blur.set_alpha(0.0);
    run_to_completion(&scheduler, &blur);
}

fn run_to_completion(scheduler: &Arc<Mutex<AnimationScheduler>>, blur: &BlurView) {
    let overlay = match blur.blur_view() {
        Some(overlay) => overlay,
        None => return,
    };
    loop {
        let active = scheduler.lock().unwrap().tick(1.0 / 60.0);
        tracing::info!("overlay opacity {:.3}", overlay.opacity());
        if !active {
            break;
        }
    }
}
