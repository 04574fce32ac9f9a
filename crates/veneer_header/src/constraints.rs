//! Constraint policy for the header sizing modes
//!
//! Each [`HeaderMode`] maps to a declarative set of edge/size relationships
//! between the header view and the parallax content view. A host with a real
//! constraint solver can consume the set directly; the [`ConstraintSet::resolve`]
//! method is the headless reference resolution the controller runs on every
//! layout pass.

use smallvec::SmallVec;
use veneer_core::{Rect, Size};

// ─────────────────────────────────────────────────────────────────────────────
// Sizing modes
// ─────────────────────────────────────────────────────────────────────────────

/// How the header view is sized and placed inside the content view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// Header edges track the content view (default)
    #[default]
    Fill,
    /// Fixed height, pinned to the top
    Top,
    /// Pinned to the top, stretching past its height on overscroll
    TopFill,
    /// Centered at its preferred size, never larger than the content view
    Center,
    /// Centered, filling the content view and stretching on overscroll
    CenterFill,
    /// Fixed height, pinned to the bottom
    Bottom,
    /// Pinned to the bottom with a height floor
    BottomFill,
    /// Fixed height, pinned to the bottom, top drawn toward the content top
    BottomAndTopFill,
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarative constraints
// ─────────────────────────────────────────────────────────────────────────────

/// Header-view attribute being constrained
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    CenterX,
    CenterY,
    Width,
    Height,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

/// What the anchor is related to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintTarget {
    /// The matching attribute of the content view
    ContentView,
    /// The content view's bottom edge
    ContentViewBottom,
    /// A fixed value
    Constant(f32),
}

/// Constraint strength: a `High` constraint yields to a `Required` one under
/// conflict
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Priority {
    Required,
    High,
}

/// One edge/size relationship between header view and content view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraint {
    pub anchor: Anchor,
    pub relation: Relation,
    pub target: ConstraintTarget,
    pub priority: Priority,
}

impl Constraint {
    fn required(anchor: Anchor, relation: Relation, target: ConstraintTarget) -> Self {
        Self {
            anchor,
            relation,
            target,
            priority: Priority::Required,
        }
    }

    fn soft(anchor: Anchor, relation: Relation, target: ConstraintTarget) -> Self {
        Self {
            anchor,
            relation,
            target,
            priority: Priority::High,
        }
    }
}

/// The constraint set one mode produces
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    constraints: SmallVec<[Constraint; 6]>,
}

impl ConstraintSet {
    /// Pure policy: map a sizing mode and the configured header height to its
    /// declarative constraint set.
    pub fn for_mode(mode: HeaderMode, height: f32) -> Self {
        use Anchor::*;
        use ConstraintTarget::*;
        use Relation::*;

        let constraints: SmallVec<[Constraint; 6]> = match mode {
            HeaderMode::Fill => SmallVec::from_slice(&[
                Constraint::required(Top, Equal, ContentView),
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Bottom, Equal, ContentView),
            ]),
            HeaderMode::Top => SmallVec::from_slice(&[
                Constraint::required(Top, Equal, ContentView),
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Height, Equal, Constant(height)),
            ]),
            HeaderMode::TopFill => SmallVec::from_slice(&[
                Constraint::soft(Top, Equal, ContentView),
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Height, GreaterOrEqual, Constant(height)),
                Constraint::soft(Bottom, Equal, ContentView),
            ]),
            HeaderMode::Center => SmallVec::from_slice(&[
                Constraint::required(CenterX, Equal, ContentView),
                Constraint::required(CenterY, Equal, ContentView),
                Constraint::required(Width, LessOrEqual, ContentView),
                Constraint::required(Height, LessOrEqual, ContentView),
            ]),
            HeaderMode::CenterFill => SmallVec::from_slice(&[
                Constraint::soft(Top, Equal, ContentView),
                Constraint::soft(Left, Equal, ContentView),
                Constraint::soft(Right, Equal, ContentView),
                Constraint::soft(Bottom, Equal, ContentView),
                Constraint::required(CenterX, Equal, ContentView),
                Constraint::required(CenterY, Equal, ContentView),
                Constraint::soft(Height, GreaterOrEqual, Constant(height)),
            ]),
            HeaderMode::Bottom => SmallVec::from_slice(&[
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Bottom, Equal, ContentView),
                Constraint::required(Height, Equal, Constant(height)),
            ]),
            HeaderMode::BottomFill => SmallVec::from_slice(&[
                Constraint::soft(Top, GreaterOrEqual, ContentViewBottom),
                Constraint::required(Bottom, Equal, ContentView),
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Height, GreaterOrEqual, Constant(height)),
            ]),
            HeaderMode::BottomAndTopFill => SmallVec::from_slice(&[
                Constraint::soft(Top, Equal, ContentView),
                Constraint::required(Bottom, Equal, ContentView),
                Constraint::required(Left, Equal, ContentView),
                Constraint::required(Right, Equal, ContentView),
                Constraint::required(Height, Equal, Constant(height)),
            ]),
        };

        Self { constraints }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Reference resolution of the set against the content view's bounds.
    ///
    /// Priority rules, in the order they decide a frame:
    /// - a required `Height == constant` pins the height; `<= ContentView`
    ///   clamps the preferred size; `>=` grows to the content height only
    ///   when both vertical edges are pinned (soft pins count), otherwise it
    ///   pins the floor;
    /// - a required bottom pin places before a center pin, which places
    ///   before any top pin; soft pins place only when nothing stronger
    ///   claimed the axis.
    pub fn resolve(&self, content: Rect, preferred: Size) -> Rect {
        let (x, width) = self.resolve_horizontal(content, preferred);
        let height = self.resolve_height(content, preferred);
        let y = self.resolve_y(content, height);
        Rect::new(x, y, width, height)
    }

    fn resolve_horizontal(&self, content: Rect, preferred: Size) -> (f32, f32) {
        if self.has(Anchor::CenterX, Relation::Equal) {
            let width = if self.has(Anchor::Width, Relation::LessOrEqual) {
                preferred.width.min(content.width)
            } else {
                content.width
            };
            ((content.width - width) / 2.0, width)
        } else {
            (0.0, content.width)
        }
    }

    fn resolve_height(&self, content: Rect, preferred: Size) -> f32 {
        if let Some(fixed) = self.height_constant(Relation::Equal) {
            return fixed;
        }
        if self.has(Anchor::Height, Relation::LessOrEqual) {
            return preferred.height.min(content.height);
        }
        if let Some(floor) = self.height_constant(Relation::GreaterOrEqual) {
            let top_pinned = self.has(Anchor::Top, Relation::Equal);
            let bottom_pinned = self.has(Anchor::Bottom, Relation::Equal);
            if top_pinned && bottom_pinned {
                return content.height.max(floor);
            }
            return floor;
        }
        if self.has(Anchor::Top, Relation::Equal) && self.has(Anchor::Bottom, Relation::Equal) {
            return content.height;
        }
        preferred.height
    }

    fn resolve_y(&self, content: Rect, height: f32) -> f32 {
        if self.has_with_priority(Anchor::Bottom, Relation::Equal, Priority::Required) {
            return content.height - height;
        }
        if self.has_with_priority(Anchor::CenterY, Relation::Equal, Priority::Required) {
            return (content.height - height) / 2.0;
        }
        if self.has(Anchor::Top, Relation::Equal) {
            return 0.0;
        }
        if self.has(Anchor::Bottom, Relation::Equal) {
            return content.height - height;
        }
        if self.has(Anchor::CenterY, Relation::Equal) {
            return (content.height - height) / 2.0;
        }
        0.0
    }

    fn has(&self, anchor: Anchor, relation: Relation) -> bool {
        self.constraints
            .iter()
            .any(|c| c.anchor == anchor && c.relation == relation)
    }

    fn has_with_priority(&self, anchor: Anchor, relation: Relation, priority: Priority) -> bool {
        self.constraints
            .iter()
            .any(|c| c.anchor == anchor && c.relation == relation && c.priority == priority)
    }

    fn height_constant(&self, relation: Relation) -> Option<f32> {
        self.constraints.iter().find_map(|c| {
            if c.anchor == Anchor::Height && c.relation == relation {
                match c.target {
                    ConstraintTarget::Constant(value) => Some(value),
                    _ => None,
                }
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_EXPANDED: Rect = Rect::new(0.0, 0.0, 320.0, 160.0);
    const CONTENT_COLLAPSED: Rect = Rect::new(0.0, 0.0, 320.0, 20.0);

    fn resolve(mode: HeaderMode, content: Rect) -> Rect {
        ConstraintSet::for_mode(mode, 100.0).resolve(content, Size::ZERO)
    }

    #[test]
    fn test_fill_tracks_content() {
        assert_eq!(resolve(HeaderMode::Fill, CONTENT_EXPANDED), CONTENT_EXPANDED);
        assert_eq!(
            resolve(HeaderMode::Fill, CONTENT_COLLAPSED),
            CONTENT_COLLAPSED
        );
    }

    #[test]
    fn test_top_keeps_fixed_height() {
        assert_eq!(
            resolve(HeaderMode::Top, CONTENT_EXPANDED),
            Rect::new(0.0, 0.0, 320.0, 100.0)
        );
        assert_eq!(
            resolve(HeaderMode::Top, CONTENT_COLLAPSED),
            Rect::new(0.0, 0.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_top_fill_stretches_on_overscroll() {
        assert_eq!(
            resolve(HeaderMode::TopFill, CONTENT_EXPANDED),
            Rect::new(0.0, 0.0, 320.0, 160.0)
        );
        // Collapsed below the configured height the floor holds, pinned top.
        assert_eq!(
            resolve(HeaderMode::TopFill, CONTENT_COLLAPSED),
            Rect::new(0.0, 0.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_center_clamps_preferred_size() {
        let set = ConstraintSet::for_mode(HeaderMode::Center, 100.0);
        let frame = set.resolve(CONTENT_EXPANDED, Size::new(200.0, 80.0));
        assert_eq!(frame, Rect::new(60.0, 40.0, 200.0, 80.0));

        // Preferred size larger than the content clamps to the content.
        let frame = set.resolve(CONTENT_COLLAPSED, Size::new(400.0, 80.0));
        assert_eq!(frame, Rect::new(0.0, 0.0, 320.0, 20.0));
    }

    #[test]
    fn test_center_fill_stays_centered_while_stretching() {
        assert_eq!(
            resolve(HeaderMode::CenterFill, CONTENT_EXPANDED),
            Rect::new(0.0, 0.0, 320.0, 160.0)
        );
        // Height floor wins over the soft edges; overflow splits evenly.
        assert_eq!(
            resolve(HeaderMode::CenterFill, CONTENT_COLLAPSED),
            Rect::new(0.0, -40.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_bottom_pins_fixed_height_to_bottom() {
        assert_eq!(
            resolve(HeaderMode::Bottom, CONTENT_EXPANDED),
            Rect::new(0.0, 60.0, 320.0, 100.0)
        );
        assert_eq!(
            resolve(HeaderMode::Bottom, CONTENT_COLLAPSED),
            Rect::new(0.0, -80.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_bottom_fill_holds_height_floor() {
        assert_eq!(
            resolve(HeaderMode::BottomFill, CONTENT_EXPANDED),
            Rect::new(0.0, 60.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_bottom_and_top_fill_pins_bottom() {
        assert_eq!(
            resolve(HeaderMode::BottomAndTopFill, CONTENT_EXPANDED),
            Rect::new(0.0, 60.0, 320.0, 100.0)
        );
        assert_eq!(
            resolve(HeaderMode::BottomAndTopFill, CONTENT_COLLAPSED),
            Rect::new(0.0, -80.0, 320.0, 100.0)
        );
    }

    #[test]
    fn test_policy_is_pure() {
        let a = ConstraintSet::for_mode(HeaderMode::TopFill, 100.0);
        let b = ConstraintSet::for_mode(HeaderMode::TopFill, 100.0);
        assert_eq!(a.constraints(), b.constraints());
        assert_eq!(a.len(), 5);
    }
}
