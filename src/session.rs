use chrono::NaiveDate;

use crate::{
    age::{self, AgeParams, BirthDate, BirthInput, LifeConfig, LifeStats},
    driver::Status,
    error::{LifefloodError, LifefloodResult},
    store::BirthStore,
    streaks::{Streak, StreakField},
    transition::{Direction, Transition, VisualState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum View {
    Prompt,
    Main,
}

/// The view orchestrator: owns the single visual state, the single optional
/// transition, and the single streak schedule, and sequences them in response
/// to `submit` and `reset`. All animation state lives here rather than in
/// module globals, so independent sessions never interfere.
///
/// `today` is captured at session start; a session lives for one page view,
/// so age rolling over at midnight mid-session is out of scope.
pub struct Session<S: BirthStore> {
    cfg: LifeConfig,
    store: S,
    today: NaiveDate,
    view: View,
    birth: Option<BirthDate>,
    visuals: VisualState,
    transition: Option<Transition>,
    streaks: StreakField,
}

impl<S: BirthStore> Session<S> {
    /// Loads the store and picks the entry view: a stored birth date enters
    /// Main via instant presentation (no animation, streaks immediately);
    /// otherwise Prompt with neutral visuals.
    pub fn start(
        cfg: LifeConfig,
        store: S,
        seed: u64,
        today: NaiveDate,
        now_ms: f64,
    ) -> LifefloodResult<Self> {
        cfg.validate()?;
        let mut session = Self {
            cfg,
            store,
            today,
            view: View::Prompt,
            birth: None,
            visuals: VisualState::default(),
            transition: None,
            streaks: StreakField::new(seed),
        };
        if let Some(birth) = session.store.load()? {
            let params = AgeParams::derive(&session.cfg, &birth, today);
            session.visuals.apply_instant(&params);
            session.streaks.start(params.ratio, now_ms);
            session.birth = Some(birth);
            session.view = View::Main;
        }
        Ok(session)
    }

    /// Prompt -> Main. The guard rejects an absent or unparseable month/year
    /// pair with no state change and no side effect. On success the birth
    /// date is persisted and the forward transition begins; streaks start
    /// only when it completes (see `tick`).
    #[tracing::instrument(skip(self))]
    pub fn submit(&mut self, input: &BirthInput, now_ms: f64) -> LifefloodResult<AgeParams> {
        if self.view != View::Prompt {
            return Err(LifefloodError::validation(
                "submit is only valid on the prompt view",
            ));
        }
        let Some(birth) = input.parse() else {
            return Err(LifefloodError::validation(
                "month and year must both be present and parseable",
            ));
        };
        self.store.save(&birth)?;

        let params = AgeParams::derive(&self.cfg, &birth, self.today);
        self.birth = Some(birth);
        self.view = View::Main;
        self.streaks.stop();
        self.transition = Some(Transition::forward(
            self.cfg.transition_ms,
            &params,
            now_ms,
            &mut self.visuals,
        ));
        Ok(params)
    }

    /// Main -> Prompt. Clears persistence, forgets the birth date, stops the
    /// streaks and begins the reverse transition. The view flips to Prompt
    /// only once the reverse transition completes, so the prompt never shows
    /// half-reset visuals. A no-op on the prompt view.
    pub fn reset(&mut self, now_ms: f64) -> LifefloodResult<()> {
        if self.view != View::Main {
            return Ok(());
        }
        self.store.clear()?;
        self.birth = None;
        self.streaks.stop();
        self.transition = Some(Transition::reverse(
            self.cfg.transition_ms,
            now_ms,
            &mut self.visuals,
        ));
        Ok(())
    }

    /// Advances the active transition (applying its completion invariants
    /// exactly once) and the streak field. Returns the streaks spawned by
    /// this tick for the rendering surface.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Streak> {
        if let Some(mut transition) = self.transition.take() {
            match transition.advance(now_ms, &mut self.visuals) {
                Status::Active => self.transition = Some(transition),
                Status::Complete => match transition.direction() {
                    Direction::Forward => {
                        if let Some(birth) = &self.birth {
                            let ratio = age::age_ratio(&self.cfg, birth, self.today);
                            self.streaks.start(ratio, now_ms);
                        }
                    }
                    Direction::Reverse => self.view = View::Prompt,
                },
            }
        }
        self.streaks.tick(now_ms)
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn visuals(&self) -> &VisualState {
        &self.visuals
    }

    pub fn birth_date(&self) -> Option<BirthDate> {
        self.birth
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn streaks(&self) -> &StreakField {
        &self.streaks
    }

    pub fn age_params(&self) -> Option<AgeParams> {
        self.birth
            .map(|b| AgeParams::derive(&self.cfg, &b, self.today))
    }

    pub fn stats(&self) -> Option<LifeStats> {
        self.birth
            .map(|b| LifeStats::derive(&self.cfg, &b, self.today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DURATION: f64 = 2000.0;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn fresh_session() -> Session<MemoryStore> {
        Session::start(LifeConfig::default(), MemoryStore::new(), 1, today(), 0.0).unwrap()
    }

    fn input(month: &str, year: &str) -> BirthInput {
        BirthInput {
            month: Some(month.to_string()),
            year: Some(year.to_string()),
        }
    }

    #[test]
    fn starts_on_prompt_with_neutral_visuals() {
        let s = fresh_session();
        assert_eq!(s.view(), View::Prompt);
        assert_eq!(*s.visuals(), VisualState::default());
        assert!(!s.streaks().is_running());
        assert!(!s.is_transitioning());
    }

    #[test]
    fn stored_birth_date_enters_main_instantly() {
        let store = MemoryStore::with(BirthDate::new(1, 2000).unwrap());
        let s = Session::start(LifeConfig::default(), store, 1, today(), 0.0).unwrap();
        assert_eq!(s.view(), View::Main);
        assert!(!s.is_transitioning());
        assert_eq!(s.visuals().flood_pct, 100.0);
        assert!((s.visuals().saturation_pct - 77.666_666_666).abs() < 1e-6);
        assert!(s.streaks().is_running());
    }

    #[test]
    fn invalid_submit_changes_nothing() {
        let mut s = fresh_session();
        assert!(s.submit(&BirthInput::default(), 0.0).is_err());
        assert!(s.submit(&input("june", "1990"), 0.0).is_err());
        assert_eq!(s.view(), View::Prompt);
        assert_eq!(*s.visuals(), VisualState::default());
        assert_eq!(s.store.load().unwrap(), None);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn submit_persists_and_runs_forward_transition() {
        let mut s = fresh_session();
        let params = s.submit(&input("1", "2000"), 0.0).unwrap();
        assert_eq!(params.age_years, 25);
        assert_eq!(s.view(), View::Main);
        assert_eq!(
            s.store.load().unwrap(),
            Some(BirthDate { month: 1, year: 2000 })
        );
        assert!(s.is_transitioning());

        // Streaks must not start before the forward transition completes.
        s.tick(1000.0);
        assert!(s.visuals().flood_pct > 0.0 && s.visuals().flood_pct < 100.0);
        assert!(!s.streaks().is_running());

        s.tick(DURATION);
        assert!(!s.is_transitioning());
        assert_eq!(s.visuals().flood_pct, 100.0);
        assert_eq!(s.visuals().glow_opacity, 0.0);
        assert!(s.streaks().is_running());
    }

    #[test]
    fn reset_clears_store_and_returns_to_prompt_after_reverse() {
        let mut s = fresh_session();
        s.submit(&input("1", "2000"), 0.0).unwrap();
        s.tick(DURATION);
        s.tick(DURATION + 100.0);
        assert!(s.streaks().is_running());

        s.reset(3000.0).unwrap();
        assert_eq!(s.store.load().unwrap(), None);
        assert_eq!(s.birth_date(), None);
        assert!(!s.streaks().is_running());
        assert_eq!(s.streaks().live_count(), 0);
        // Prompt is not visible until the reverse transition completes.
        assert_eq!(s.view(), View::Main);

        s.tick(4000.0);
        assert_eq!(s.view(), View::Main);
        s.tick(3000.0 + DURATION);
        assert_eq!(s.view(), View::Prompt);
        assert_eq!(s.visuals().saturation_pct, 100.0);
        assert_eq!(s.visuals().flood_pct, 0.0);
        assert_eq!(s.visuals().reverse_flood_pct, 0.0);
        assert_eq!(s.visuals().glow_opacity, 0.0);
    }

    #[test]
    fn reset_on_prompt_is_a_noop() {
        let mut s = fresh_session();
        s.reset(0.0).unwrap();
        assert_eq!(s.view(), View::Prompt);
        assert!(!s.is_transitioning());
    }

    #[test]
    fn submit_rejected_while_main() {
        let mut s = fresh_session();
        s.submit(&input("1", "2000"), 0.0).unwrap();
        assert!(s.submit(&input("2", "2001"), 100.0).is_err());
        assert_eq!(
            s.birth_date(),
            Some(BirthDate { month: 1, year: 2000 })
        );
    }

    #[test]
    fn reset_mid_forward_replaces_transition() {
        let mut s = fresh_session();
        s.submit(&input("1", "2000"), 0.0).unwrap();
        s.tick(500.0);
        s.reset(600.0).unwrap();
        assert!(s.is_transitioning());
        s.tick(600.0 + DURATION);
        assert_eq!(s.view(), View::Prompt);
        assert_eq!(*s.visuals(), VisualState::default());
        assert!(!s.streaks().is_running());
    }

    #[test]
    fn stats_available_in_main() {
        let mut s = fresh_session();
        assert!(s.stats().is_none());
        s.submit(&input("1", "2000"), 0.0).unwrap();
        let stats = s.stats().unwrap();
        assert_eq!(stats.age_years, 25);
        assert!(stats.days_lived > 9000);
        assert!(stats.weeks_remaining > 0);
    }
}
