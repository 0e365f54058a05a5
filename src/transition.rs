use crate::{
    age::AgeParams,
    driver::{Driver, Status},
    ease::Ease,
};

/// Shared visual parameters consumed by the rendering surface (CSS custom
/// properties, canvas uniforms, or a test recorder). Single instance per
/// session; neutral state is the prompt view's look.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct VisualState {
    pub saturation_pct: f64,
    pub flood_pct: f64,
    pub reverse_flood_pct: f64,
    pub glow_pos_pct: f64,
    pub glow_opacity: f64,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            saturation_pct: 100.0,
            flood_pct: 0.0,
            reverse_flood_pct: 0.0,
            glow_pos_pct: 0.0,
            glow_opacity: 0.0,
        }
    }
}

impl VisualState {
    /// Returning-user path: no animation, straight to the settled main view.
    pub fn apply_instant(&mut self, params: &AgeParams) {
        self.saturation_pct = params.saturation_pct;
        self.flood_pct = 100.0;
    }

    /// Neutral prompt-view state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One flood transition in flight. Forward and reverse drive independent
/// flood channels so a direction flip never inverts a channel mid-flight;
/// stop-before-start is the owner's job (a new transition replaces the old).
#[derive(Clone, Copy, Debug)]
pub struct Transition {
    direction: Direction,
    driver: Driver,
}

impl Transition {
    /// Prompt -> main. The age saturation lands immediately (it is the target
    /// the flood reveals, not an animated value).
    pub fn forward(
        transition_ms: f64,
        params: &AgeParams,
        now_ms: f64,
        visuals: &mut VisualState,
    ) -> Self {
        visuals.saturation_pct = params.saturation_pct;
        visuals.flood_pct = 0.0;
        Self {
            direction: Direction::Forward,
            driver: Driver::new(now_ms, transition_ms, Ease::OutCubic),
        }
    }

    /// Main -> prompt. Runs its own flood channel from a clean slate.
    pub fn reverse(transition_ms: f64, now_ms: f64, visuals: &mut VisualState) -> Self {
        visuals.reverse_flood_pct = 0.0;
        Self {
            direction: Direction::Reverse,
            driver: Driver::new(now_ms, transition_ms, Ease::OutCubic),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advances the flood, glow sweep, and glow opacity envelope. On the
    /// completing poll the end-state invariants are applied: glow opacity 0;
    /// forward leaves its flood at 100%, reverse resets saturation to 100%
    /// and both flood channels to 0%.
    pub fn advance(&mut self, now_ms: f64, visuals: &mut VisualState) -> Status {
        let sample = self.driver.advance(now_ms);
        let sweep = sample.eased * 100.0;

        match self.direction {
            Direction::Forward => {
                visuals.flood_pct = sweep;
                visuals.glow_pos_pct = sweep;
            }
            Direction::Reverse => {
                visuals.reverse_flood_pct = sweep;
                visuals.glow_pos_pct = 100.0 - sweep;
            }
        }
        visuals.glow_opacity = glow_envelope(sample.linear);

        if sample.status == Status::Complete {
            visuals.glow_opacity = 0.0;
            if self.direction == Direction::Reverse {
                visuals.saturation_pct = 100.0;
                visuals.flood_pct = 0.0;
                visuals.reverse_flood_pct = 0.0;
            }
        }
        sample.status
    }
}

/// Opacity over *linear* progress: ramp in over the first 10%, hold at 1,
/// ramp out over the final 10%.
fn glow_envelope(linear: f64) -> f64 {
    if linear < 0.1 {
        linear / 0.1
    } else if linear > 0.9 {
        (1.0 - linear) / 0.1
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(saturation_pct: f64) -> AgeParams {
        AgeParams {
            age_years: 30,
            ratio: 0.4,
            saturation_pct,
        }
    }

    #[test]
    fn forward_sets_saturation_immediately() {
        let mut v = VisualState::default();
        let _t = Transition::forward(2000.0, &params(72.0), 0.0, &mut v);
        assert_eq!(v.saturation_pct, 72.0);
        assert_eq!(v.flood_pct, 0.0);
    }

    #[test]
    fn forward_completion_invariants() {
        let mut v = VisualState::default();
        let mut t = Transition::forward(2000.0, &params(72.0), 0.0, &mut v);
        assert_eq!(t.advance(1000.0, &mut v), Status::Active);
        assert!(v.flood_pct > 0.0 && v.flood_pct < 100.0);
        assert_eq!(t.advance(2000.0, &mut v), Status::Complete);
        assert_eq!(v.flood_pct, 100.0);
        assert_eq!(v.glow_opacity, 0.0);
        assert_eq!(v.saturation_pct, 72.0);
    }

    #[test]
    fn reverse_completion_resets_everything() {
        let mut v = VisualState {
            saturation_pct: 60.0,
            flood_pct: 100.0,
            ..VisualState::default()
        };
        let mut t = Transition::reverse(2000.0, 0.0, &mut v);
        assert_eq!(v.reverse_flood_pct, 0.0);
        t.advance(500.0, &mut v);
        assert!(v.reverse_flood_pct > 0.0);
        // Forward channel stays put mid-flight.
        assert_eq!(v.flood_pct, 100.0);
        assert_eq!(t.advance(2500.0, &mut v), Status::Complete);
        assert_eq!(v.saturation_pct, 100.0);
        assert_eq!(v.flood_pct, 0.0);
        assert_eq!(v.reverse_flood_pct, 0.0);
        assert_eq!(v.glow_opacity, 0.0);
    }

    #[test]
    fn glow_sweep_mirrors_by_direction() {
        let mut vf = VisualState::default();
        let mut f = Transition::forward(1000.0, &params(80.0), 0.0, &mut vf);
        f.advance(500.0, &mut vf);

        let mut vr = VisualState::default();
        let mut r = Transition::reverse(1000.0, 0.0, &mut vr);
        r.advance(500.0, &mut vr);

        assert!((vf.glow_pos_pct - (100.0 - vr.glow_pos_pct)).abs() < 1e-9);
    }

    #[test]
    fn glow_envelope_ramps_and_holds() {
        assert_eq!(glow_envelope(0.0), 0.0);
        assert!((glow_envelope(0.05) - 0.5).abs() < 1e-12);
        assert_eq!(glow_envelope(0.5), 1.0);
        assert!((glow_envelope(0.95) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn glow_envelope_drives_opacity_mid_flight() {
        let mut v = VisualState::default();
        let mut t = Transition::forward(1000.0, &params(80.0), 0.0, &mut v);
        t.advance(50.0, &mut v); // linear 0.05 -> ramping in
        assert!((v.glow_opacity - 0.5).abs() < 1e-12);
        t.advance(500.0, &mut v);
        assert_eq!(v.glow_opacity, 1.0);
    }
}
