use eframe::egui::{Pos2, Rect, Vec2};
use tracing::debug;

pub(in crate::app) const MIN_SCALE: f32 = 0.1;
pub(in crate::app) const MAX_SCALE: f32 = 4.0;

const FIT_RATIO: f32 = 0.8;
const FIT_DELAY_SECS: f32 = 0.5;
const FIT_DURATION_SECS: f32 = 0.75;

/// Canvas-local transform: `screen = translate + world * scale`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Viewport {
    pub(in crate::app) scale: f32,
    pub(in crate::app) translate: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub(in crate::app) fn to_screen(&self, world: Vec2) -> Pos2 {
        (self.translate + world * self.scale).to_pos2()
    }

    pub(in crate::app) fn to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.translate) / self.scale
    }

    /// Scales by `factor` keeping the world point under `anchor` fixed.
    pub(in crate::app) fn zoom_about(&mut self, anchor: Pos2, factor: f32) -> bool {
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (scale - self.scale).abs() <= f32::EPSILON {
            return false;
        }

        let world = self.to_world(anchor);
        self.scale = scale;
        self.translate = anchor.to_vec2() - world * scale;
        true
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.translate += delta;
        true
    }

    /// Transform that centers `bounds` on a canvas of `canvas` size, filling
    /// at most 80% of it. `None` when the box has no area.
    pub(in crate::app) fn fit_bounds(bounds: Rect, canvas: Vec2) -> Option<Self> {
        let width = bounds.width();
        let height = bounds.height();
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return None;
        }

        let scale = (FIT_RATIO / (width / canvas.x).max(height / canvas.y))
            .clamp(MIN_SCALE, MAX_SCALE);
        let translate = canvas * 0.5 - bounds.center().to_vec2() * scale;
        Some(Self { scale, translate })
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            scale: self.scale + (other.scale - self.scale) * t,
            translate: self.translate + (other.translate - self.translate) * t,
        }
    }
}

fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Transition {
    from: Viewport,
    to: Viewport,
    elapsed: f32,
}

/// One-shot fit of the whole layout, fired shortly after the first settle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(in crate::app) enum AutoFit {
    #[default]
    Settling,
    Waiting {
        remaining: f32,
    },
    Animating(Transition),
    Finished,
}

impl AutoFit {
    pub(in crate::app) fn is_pending(&self) -> bool {
        !matches!(self, Self::Finished)
    }

    pub(in crate::app) fn interrupt(&mut self) {
        if self.is_pending() {
            debug!("auto-fit interrupted by user");
        }
        *self = Self::Finished;
    }

    /// Advances the timer by `dt` seconds. The delay only runs while the
    /// layout is `settled`; a reheat sends it back to waiting for rest.
    /// Returns whether `viewport` changed.
    pub(in crate::app) fn tick(
        &mut self,
        dt: f32,
        settled: bool,
        viewport: &mut Viewport,
        bounds: Option<Rect>,
        canvas: Vec2,
    ) -> bool {
        match self {
            Self::Finished => false,
            Self::Settling | Self::Waiting { .. } if !settled => {
                *self = Self::Settling;
                false
            }
            Self::Settling => {
                *self = Self::Waiting {
                    remaining: FIT_DELAY_SECS,
                };
                false
            }
            Self::Waiting { remaining } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return false;
                }

                match bounds.and_then(|bounds| Viewport::fit_bounds(bounds, canvas)) {
                    Some(to) => {
                        *self = Self::Animating(Transition {
                            from: *viewport,
                            to,
                            elapsed: 0.0,
                        });
                    }
                    None => {
                        debug!("auto-fit skipped for degenerate bounds");
                        *self = Self::Finished;
                    }
                }
                false
            }
            Self::Animating(transition) => {
                transition.elapsed += dt;
                let t = (transition.elapsed / FIT_DURATION_SECS).min(1.0);
                *viewport = transition.from.lerp(&transition.to, ease_cubic_in_out(t));
                if t >= 1.0 {
                    *self = Self::Finished;
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    const CANVAS: Vec2 = vec2(800.0, 600.0);

    fn run_to_end(auto_fit: &mut AutoFit, viewport: &mut Viewport, bounds: Option<Rect>) {
        for _ in 0..200 {
            auto_fit.tick(1.0 / 60.0, true, viewport, bounds, CANVAS);
            if !auto_fit.is_pending() {
                break;
            }
        }
    }

    #[test]
    fn two_node_fit_stays_within_ratio_and_centered() {
        let bounds = Rect::from_min_max(pos2(100.0, 100.0), pos2(500.0, 400.0));
        let mut viewport = Viewport::default();
        let mut auto_fit = AutoFit::default();

        run_to_end(&mut auto_fit, &mut viewport, Some(bounds));

        assert_eq!(auto_fit, AutoFit::Finished);
        let min = viewport.to_screen(bounds.min.to_vec2());
        let max = viewport.to_screen(bounds.max.to_vec2());
        assert!(max.x - min.x <= CANVAS.x * 0.8 + 1.0e-3);
        assert!(max.y - min.y <= CANVAS.y * 0.8 + 1.0e-3);
        let center = min + (max - min) * 0.5;
        assert!((center - pos2(400.0, 300.0)).length() < 1.0e-3);
    }

    #[test]
    fn degenerate_bounds_leave_transform_unchanged() {
        let single = Rect::from_min_max(pos2(250.0, 80.0), pos2(250.0, 80.0));
        let mut viewport = Viewport {
            scale: 1.3,
            translate: vec2(12.0, -4.0),
        };
        let before = viewport;
        let mut auto_fit = AutoFit::default();

        run_to_end(&mut auto_fit, &mut viewport, Some(single));

        assert_eq!(viewport, before);
        assert_eq!(auto_fit, AutoFit::Finished);
        assert!(Viewport::fit_bounds(single, CANVAS).is_none());
    }

    #[test]
    fn fit_waits_for_rest_then_delay() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 50.0));
        let mut viewport = Viewport::default();
        let mut auto_fit = AutoFit::default();

        for _ in 0..120 {
            assert!(!auto_fit.tick(1.0 / 20.0, false, &mut viewport, Some(bounds), CANVAS));
        }
        assert_eq!(auto_fit, AutoFit::Settling);

        assert!(!auto_fit.tick(0.3, true, &mut viewport, Some(bounds), CANVAS));
        assert!(matches!(auto_fit, AutoFit::Waiting { .. }));
        assert!(!auto_fit.tick(0.3, true, &mut viewport, Some(bounds), CANVAS));
        assert!(matches!(auto_fit, AutoFit::Waiting { .. }));
        assert!(!auto_fit.tick(0.3, true, &mut viewport, Some(bounds), CANVAS));
        assert!(matches!(auto_fit, AutoFit::Animating(_)));
        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn reheat_during_delay_restarts_the_wait() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 50.0));
        let mut viewport = Viewport::default();
        let mut auto_fit = AutoFit::default();

        auto_fit.tick(0.1, true, &mut viewport, Some(bounds), CANVAS);
        auto_fit.tick(0.4, true, &mut viewport, Some(bounds), CANVAS);
        auto_fit.tick(0.1, false, &mut viewport, Some(bounds), CANVAS);
        assert_eq!(auto_fit, AutoFit::Settling);

        auto_fit.tick(0.1, true, &mut viewport, Some(bounds), CANVAS);
        assert_eq!(
            auto_fit,
            AutoFit::Waiting {
                remaining: FIT_DELAY_SECS
            }
        );
    }

    #[test]
    fn tiny_layouts_fit_at_max_scale() {
        let bounds = Rect::from_min_max(pos2(10.0, 10.0), pos2(11.0, 11.0));
        let fitted = Viewport::fit_bounds(bounds, CANVAS).unwrap();
        assert_eq!(fitted.scale, MAX_SCALE);
    }

    #[test]
    fn interrupt_cancels_pending_fit() {
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(300.0, 300.0));
        let mut viewport = Viewport::default();
        let mut auto_fit = AutoFit::default();

        auto_fit.interrupt();
        run_to_end(&mut auto_fit, &mut viewport, Some(bounds));

        assert_eq!(viewport, Viewport::default());
    }

    #[test]
    fn easing_is_symmetric() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1.0e-6);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!(ease_cubic_in_out(0.25) < 0.25);
        assert!(ease_cubic_in_out(0.75) > 0.75);
    }

    #[test]
    fn zoom_keeps_anchor_and_clamps() {
        let mut viewport = Viewport {
            scale: 1.0,
            translate: vec2(40.0, 25.0),
        };
        let anchor = pos2(310.0, 220.0);
        let world = viewport.to_world(anchor);

        assert!(viewport.zoom_about(anchor, 1.15));
        assert!((viewport.to_screen(world) - anchor).length() < 1.0e-3);

        for _ in 0..100 {
            viewport.zoom_about(anchor, 1.15);
        }
        assert_eq!(viewport.scale, MAX_SCALE);
        assert!(!viewport.zoom_about(anchor, 1.15));

        for _ in 0..200 {
            viewport.zoom_about(anchor, 0.85);
        }
        assert_eq!(viewport.scale, MIN_SCALE);
    }

    #[test]
    fn to_world_inverts_to_screen() {
        let viewport = Viewport {
            scale: 2.5,
            translate: vec2(-120.0, 64.0),
        };
        let world = vec2(33.0, -7.5);
        assert!((viewport.to_world(viewport.to_screen(world)) - world).length() < 1.0e-4);
    }
}
