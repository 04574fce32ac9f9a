//! Blur overlay controller
//!
//! A [`BlurView`] decorates one host view with a backmost blur overlay and a
//! nested vibrancy layer. The overlay is rebuilt whenever the style changes;
//! alpha changes fade the existing overlay instead. `setup` batches both so a
//! combined edit costs at most the one rebuild the caller triggers later.

use std::sync::{Arc, Mutex, Weak};

use veneer_core::{
    AnimationScheduler, BlurStyle, Color, Easing, Result, View, VisualEffect,
};

/// Per-view blur decoration
pub struct BlurView {
    host: View,
    style: BlurStyle,
    alpha: f32,
    animation_duration: f32,
    editing: bool,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    blur: Option<View>,
    blur_content_view: Option<View>,
    vibrancy_content_view: Option<View>,
}

impl BlurView {
    /// Create the controller without building anything; the overlay appears
    /// on the first style/alpha/enable call
    pub fn new(host: &View) -> Self {
        Self {
            host: host.clone(),
            style: BlurStyle::default(),
            alpha: 0.0,
            animation_duration: 0.1,
            editing: false,
            scheduler: Weak::new(),
            blur: None,
            blur_content_view: None,
            vibrancy_content_view: None,
        }
    }

    pub fn host(&self) -> &View {
        &self.host
    }

    /// Alpha fades run through this scheduler; without one they apply
    /// immediately
    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Style and alpha
    // ─────────────────────────────────────────────────────────────────────

    pub fn style(&self) -> BlurStyle {
        self.style
    }

    /// Change the blur style, rebuilding the overlay
    pub fn set_style(&mut self, style: BlurStyle) {
        if self.style == style {
            return;
        }
        self.style = style;
        if self.editing {
            return;
        }
        self.apply_blur_effect();
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Fade the overlay to `alpha`, building it first if needed
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
        if self.editing {
            return;
        }
        if self.blur.is_none() {
            self.apply_blur_effect();
        }
        let Some(blur) = self.blur.clone() else {
            return;
        };
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                scheduler.lock().unwrap().animate_opacity(
                    &blur,
                    alpha,
                    self.animation_duration,
                    Easing::EaseInOut,
                );
            }
            None => blur.set_opacity(alpha),
        }
    }

    pub fn animation_duration(&self) -> f32 {
        self.animation_duration
    }

    pub fn set_animation_duration(&mut self, duration: f32) {
        self.animation_duration = duration;
    }

    /// Batched edit: stores style and alpha without rebuilding or animating,
    /// even when both change
    pub fn setup(&mut self, style: BlurStyle, alpha: f32) -> &mut Self {
        self.editing = true;
        self.set_style(style);
        self.set_alpha(alpha);
        self.editing = false;
        self
    }

    /// Build the overlay if absent and set its visibility
    pub fn enable(&mut self, hidden: bool) {
        if self.blur.is_none() {
            self.apply_blur_effect();
        }
        if let Some(blur) = &self.blur {
            blur.set_hidden(hidden);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Overlay construction
    // ─────────────────────────────────────────────────────────────────────

    /// The overlay view itself, once built
    pub fn blur_view(&self) -> Option<View> {
        self.blur.clone()
    }

    /// Where callers place content that should sit on the blurred backdrop
    pub fn blur_content_view(&self) -> Option<View> {
        self.blur_content_view.clone()
    }

    /// Where callers place content that should pick up the vibrancy treatment
    pub fn vibrancy_content_view(&self) -> Option<View> {
        self.vibrancy_content_view.clone()
    }

    /// Tear down any previous overlay and build a fresh one for the current
    /// style: a blur layer pinned to the host, carrying a content layer with
    /// a nested vibrancy layer, inserted backmost. The host background is
    /// cleared so the blur shows through.
    pub fn apply_blur_effect(&mut self) {
        if let Some(old) = self.blur.take() {
            old.remove_from_superview();
        }
        self.blur_content_view = None;
        self.vibrancy_content_view = None;

        self.host.set_background(Some(Color::TRANSPARENT));

        let blur = View::new().with_name("blur-effect");
        blur.set_effect(Some(VisualEffect::Blur(self.style)));
        blur.set_fills_superview(true);
        blur.set_opacity(self.alpha);

        let blur_content = View::new().with_name("blur-content");
        blur_content.set_fills_superview(true);

        let vibrancy = View::new().with_name("vibrancy-effect");
        vibrancy.set_effect(Some(VisualEffect::Vibrancy(self.style)));
        vibrancy.set_fills_superview(true);

        let vibrancy_content = View::new().with_name("vibrancy-content");
        vibrancy_content.set_fills_superview(true);

        if let Err(err) = install(&self.host, &blur, &blur_content, &vibrancy, &vibrancy_content) {
            tracing::warn!("blur overlay install failed: {err}");
            return;
        }
        tracing::debug!("blur overlay rebuilt with style {:?}", self.style);

        self.blur = Some(blur);
        self.blur_content_view = Some(blur_content);
        self.vibrancy_content_view = Some(vibrancy_content);
    }
}

fn install(
    host: &View,
    blur: &View,
    blur_content: &View,
    vibrancy: &View,
    vibrancy_content: &View,
) -> Result<()> {
    blur.add_subview(blur_content)?;
    blur_content.add_subview(vibrancy)?;
    vibrancy.add_subview(vibrancy_content)?;
    host.insert_subview(blur, 0)?;
    Ok(())
}

impl std::fmt::Debug for BlurView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlurView")
            .field("style", &self.style)
            .field("alpha", &self.alpha)
            .field("built", &self.blur.is_some())
            .finish()
    }
}
