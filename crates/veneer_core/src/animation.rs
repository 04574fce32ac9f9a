//! Opacity tweens
//!
//! A small scheduler that advances fire-and-forget opacity animations. The
//! host drives it with `tick(dt)` once per frame. One tween per view: asking
//! for a new target while one is in flight replaces it, starting from the
//! view's current opacity (last writer wins visually).

use slotmap::{new_key_type, SlotMap};

use crate::view::{View, WeakView};

new_key_type! {
    pub struct TweenId;
}

/// Easing function applied to tween progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// One in-flight opacity animation
struct OpacityTween {
    view: WeakView,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

/// The animation scheduler that ticks all active tweens
#[derive(Default)]
pub struct AnimationScheduler {
    tweens: SlotMap<TweenId, OpacityTween>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
        }
    }

    /// Animate a view's opacity to `target` over `duration` seconds.
    ///
    /// Replaces any tween already running for the same view. A zero or
    /// negative duration applies the target immediately and schedules
    /// nothing (returns None).
    pub fn animate_opacity(
        &mut self,
        view: &View,
        target: f32,
        duration: f32,
        easing: Easing,
    ) -> Option<TweenId> {
        // Dropping the replaced tween also sweeps out any whose view expired.
        self.tweens
            .retain(|_, tween| tween.view.upgrade().is_some_and(|v| !v.ptr_eq(view)));

        if duration <= 0.0 {
            view.set_opacity(target);
            return None;
        }

        let id = self.tweens.insert(OpacityTween {
            view: view.downgrade(),
            from: view.opacity(),
            to: target,
            duration,
            elapsed: 0.0,
            easing,
        });
        tracing::trace!(
            "opacity tween {:?}: {:.2} -> {:.2} over {:.2}s",
            id,
            view.opacity(),
            target,
            duration
        );
        Some(id)
    }

    pub fn remove_tween(&mut self, id: TweenId) {
        self.tweens.remove(id);
    }

    /// Advance all tweens by `dt` seconds; returns whether any remain active
    pub fn tick(&mut self, dt: f32) -> bool {
        self.tweens.retain(|_, tween| {
            let Some(view) = tween.view.upgrade() else {
                return false;
            };
            tween.elapsed += dt;
            let t = (tween.elapsed / tween.duration).clamp(0.0, 1.0);
            let eased = tween.easing.apply(t);
            view.set_opacity(tween.from + (tween.to - tween.from) * eased);
            t < 1.0
        });
        !self.tweens.is_empty()
    }

    /// Check if any tweens are still active
    pub fn has_active_animations(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Get the number of tweens in the scheduler
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_reaches_target() {
        let view = View::new();
        view.set_opacity(0.0);
        let mut scheduler = AnimationScheduler::new();
        scheduler.animate_opacity(&view, 1.0, 0.1, Easing::Linear);

        assert!(scheduler.tick(0.05));
        assert!((view.opacity() - 0.5).abs() < 1e-5);

        assert!(!scheduler.tick(0.05));
        assert_eq!(view.opacity(), 1.0);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_zero_duration_applies_immediately() {
        let view = View::new();
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.animate_opacity(&view, 0.25, 0.0, Easing::Linear);
        assert!(id.is_none());
        assert_eq!(view.opacity(), 0.25);
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_retarget_replaces_in_flight_tween() {
        let view = View::new();
        view.set_opacity(0.0);
        let mut scheduler = AnimationScheduler::new();
        scheduler.animate_opacity(&view, 1.0, 0.1, Easing::Linear);
        scheduler.tick(0.05);

        // Last writer wins: restart from the current opacity toward 0.
        scheduler.animate_opacity(&view, 0.0, 0.1, Easing::Linear);
        assert_eq!(scheduler.tween_count(), 1);

        scheduler.tick(0.1);
        assert_eq!(view.opacity(), 0.0);
    }

    #[test]
    fn test_expired_tween_pruned_when_scheduling() {
        let mut scheduler = AnimationScheduler::new();
        {
            let view = View::new();
            scheduler.animate_opacity(&view, 1.0, 1.0, Easing::Linear);
        }
        assert_eq!(scheduler.tween_count(), 1);

        let other = View::new();
        scheduler.animate_opacity(&other, 1.0, 1.0, Easing::Linear);
        assert_eq!(scheduler.tween_count(), 1);
    }

    #[test]
    fn test_dropped_view_ends_tween() {
        let mut scheduler = AnimationScheduler::new();
        {
            let view = View::new();
            scheduler.animate_opacity(&view, 1.0, 1.0, Easing::Linear);
        }
        assert!(!scheduler.tick(0.016));
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }
}
