//! Overlay lifecycle across batched edits, rebuild counting, and the
//! registry.

use std::sync::{Arc, Mutex};

use veneer_blur::{BlurRegistry, BlurView};
use veneer_core::{AnimationScheduler, BlurStyle, Rect, View, VisualEffect};

fn host() -> View {
    let host = View::new().with_name("card");
    host.set_frame(Rect::new(0.0, 0.0, 320.0, 200.0));
    host
}

#[test]
fn unbatched_edits_rebuild_once_each() {
    let host = host();
    let mut blur = BlurView::new(&host);

    blur.set_style(BlurStyle::Dark);
    let first = blur.blur_view().unwrap();

    blur.set_style(BlurStyle::Prominent);
    let second = blur.blur_view().unwrap();
    assert!(!first.ptr_eq(&second));

    // The replaced overlay left the tree.
    assert!(first.superview().is_none());
    assert_eq!(host.subviews().len(), 1);
}

#[test]
fn batched_edit_defers_everything_to_enable() {
    let host = host();
    let mut blur = BlurView::new(&host);

    blur.setup(BlurStyle::Dark, 0.4);
    blur.setup(BlurStyle::Regular, 0.9);
    assert!(host.subviews().is_empty());

    blur.enable(false);
    let overlay = blur.blur_view().unwrap();
    assert_eq!(overlay.effect(), Some(VisualEffect::Blur(BlurStyle::Regular)));
    assert_eq!(overlay.opacity(), 0.9);
    assert_eq!(host.subviews().len(), 1);
}

#[test]
fn fade_runs_through_a_shared_scheduler() {
    let host = host();
    let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));

    let mut blur = BlurView::new(&host);
    blur.set_scheduler(&scheduler);
    blur.set_animation_duration(0.2);
    blur.enable(false);

    blur.set_alpha(1.0);
    let overlay = blur.blur_view().unwrap();
    assert_eq!(overlay.opacity(), 0.0);

    // Retargeting mid-flight keeps a single tween.
    scheduler.lock().unwrap().tick(0.1);
    blur.set_alpha(0.25);
    assert_eq!(scheduler.lock().unwrap().tween_count(), 1);

    scheduler.lock().unwrap().tick(0.2);
    assert!((overlay.opacity() - 0.25).abs() < 1e-5);
}

#[test]
fn registry_round_trip() {
    let mut registry = BlurRegistry::new();
    let card = host();

    registry.blur_for(&card).setup(BlurStyle::Dark, 0.5);
    registry.blur_for(&card).enable(false);

    let overlay = registry.blur_for(&card).blur_view().unwrap();
    assert_eq!(overlay.effect(), Some(VisualEffect::Blur(BlurStyle::Dark)));
    assert_eq!(overlay.opacity(), 0.5);
    assert_eq!(registry.len(), 1);
}
