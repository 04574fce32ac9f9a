//! Visual effect markers
//!
//! The headless model does not composite anything; an effect attached to a
//! view records what the host renderer should draw behind that view's
//! content. The presets mirror the usual translucent-material categories.

use crate::geometry::Color;

/// Blur intensity/material category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlurStyle {
    /// Bright, nearly white material
    ExtraLight,
    /// Light material (default)
    #[default]
    Light,
    /// Dark material
    Dark,
    /// Adaptive regular material
    Regular,
    /// Adaptive prominent material
    Prominent,
}

impl BlurStyle {
    /// Gaussian radius the renderer should apply for this style
    pub fn radius(&self) -> f32 {
        match self {
            BlurStyle::ExtraLight => 20.0,
            BlurStyle::Light => 16.0,
            BlurStyle::Dark => 16.0,
            BlurStyle::Regular => 12.0,
            BlurStyle::Prominent => 24.0,
        }
    }

    /// Tint laid over the blurred backdrop
    pub fn tint(&self) -> Color {
        match self {
            BlurStyle::ExtraLight => Color::rgba(1.0, 1.0, 1.0, 0.9),
            BlurStyle::Light => Color::rgba(1.0, 1.0, 1.0, 0.7),
            BlurStyle::Dark => Color::rgba(0.1, 0.1, 0.1, 0.7),
            BlurStyle::Regular => Color::rgba(0.9, 0.9, 0.9, 0.6),
            BlurStyle::Prominent => Color::rgba(0.95, 0.95, 0.95, 0.8),
        }
    }
}

/// Effect drawn behind a view's content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisualEffect {
    /// Blurred backdrop
    Blur(BlurStyle),
    /// Contrast/saturation boost for content legibility on top of a blur
    Vibrancy(BlurStyle),
}

impl VisualEffect {
    pub fn style(&self) -> BlurStyle {
        match self {
            VisualEffect::Blur(style) | VisualEffect::Vibrancy(style) => *style,
        }
    }
}
