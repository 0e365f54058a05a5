use rand::{rngs::StdRng, Rng, SeedableRng};

const MIN_INTERVAL_MS: f64 = 200.0;
const MAX_INTERVAL_MS: f64 = 4000.0;
const BURST_SPACING_MS: f64 = 200.0;
const REAP_SLACK_MS: f64 = 100.0;
const MAX_DELAY_S: f64 = 0.3;

/// Age-dependent spawn statistics, precomputed once per schedule.
///
/// Direction: a higher age ratio yields more frequent, smaller, dimmer,
/// faster streaks — life speeding by.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StreakProfile {
    pub ratio: f64,
    pub interval_ms: f64,
    pub burst_count: u32,
    pub min_width_px: f64,
    pub max_width_px: f64,
    pub min_duration_s: f64,
    pub max_duration_s: f64,
    pub opacity: f64,
}

impl StreakProfile {
    pub fn for_ratio(ratio: f64) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        let inverse = 1.0 - ratio;
        Self {
            ratio,
            interval_ms: MAX_INTERVAL_MS - (MAX_INTERVAL_MS - MIN_INTERVAL_MS) * ratio.powf(1.5),
            burst_count: (1.0 + ratio * 5.0).floor().max(1.0) as u32,
            min_width_px: 50.0 + inverse * 550.0,
            max_width_px: 150.0 + inverse * 750.0,
            min_duration_s: 0.8 + inverse * 3.2,
            max_duration_s: 1.5 + inverse * 4.5,
            opacity: 0.3 + inverse * 0.5,
        }
    }
}

/// One short-lived decorative streak, handed to the rendering surface on
/// spawn. `id` is creation order within the field.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Streak {
    pub id: u64,
    pub top_pct: f64,
    pub width_px: f64,
    pub duration_s: f64,
    pub delay_s: f64,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug)]
struct LiveStreak {
    streak: Streak,
    expires_ms: f64,
}

/// Recurring, age-parameterized streak scheduler. Owns the live entities and
/// their expiry times; a single `tick` reaps the expired and fires whatever
/// spawns are due. Exactly one schedule is active at a time — `start` stops
/// any prior one first.
#[derive(Debug)]
pub struct StreakField {
    rng: StdRng,
    profile: Option<StreakProfile>,
    live: Vec<LiveStreak>,
    queued: Vec<f64>, // one-shot spawn deadlines (burst spacing, bonus jitter)
    next_fire_ms: Option<f64>,
    next_id: u64,
}

impl StreakField {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            profile: None,
            live: Vec::new(),
            queued: Vec::new(),
            next_fire_ms: None,
            next_id: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&StreakProfile> {
        self.profile.as_ref()
    }

    pub fn live(&self) -> impl Iterator<Item = &Streak> {
        self.live.iter().map(|l| &l.streak)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Arms a fresh schedule for `ratio`: queues the initial burst (spaced
    /// 200 ms apart, first one due immediately) and sets the recurring timer.
    /// Idempotent re-entry safe: any prior schedule and all live streaks are
    /// cleared first.
    pub fn start(&mut self, ratio: f64, now_ms: f64) {
        self.stop();
        let profile = StreakProfile::for_ratio(ratio);
        for i in 0..profile.burst_count {
            self.queued.push(now_ms + f64::from(i) * BURST_SPACING_MS);
        }
        self.next_fire_ms = Some(now_ms + profile.interval_ms);
        tracing::debug!(
            ratio = profile.ratio,
            interval_ms = profile.interval_ms,
            burst = profile.burst_count,
            "streak schedule armed"
        );
        self.profile = Some(profile);
    }

    /// Cancels the schedule and removes all live streaks immediately, no
    /// fade-out.
    pub fn stop(&mut self) {
        self.profile = None;
        self.queued.clear();
        self.live.clear();
        self.next_fire_ms = None;
    }

    /// Reaps expired streaks, fires due one-shot spawns, then due recurring
    /// spawns. Each recurring fire has a `< ratio` chance — further gated at
    /// > 0.5 by a second draw — of queueing a bonus streak 50-150 ms later.
    /// Returns the streaks spawned by this tick, in spawn order.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Streak> {
        self.live.retain(|l| l.expires_ms > now_ms);

        let Some(profile) = self.profile else {
            return Vec::new();
        };
        let mut spawned = Vec::new();

        let due = self.queued.iter().filter(|&&at| at <= now_ms).count();
        self.queued.retain(|&at| at > now_ms);
        for _ in 0..due {
            spawned.push(self.spawn(profile, now_ms));
        }

        while let Some(fire_ms) = self.next_fire_ms {
            if fire_ms > now_ms {
                break;
            }
            spawned.push(self.spawn(profile, now_ms));
            let chance: f64 = self.rng.gen_range(0.0..1.0);
            let gate: f64 = self.rng.gen_range(0.0..1.0);
            if chance < profile.ratio && gate > 0.5 {
                self.queued
                    .push(fire_ms + 50.0 + self.rng.gen_range(0.0..100.0));
            }
            self.next_fire_ms = Some(fire_ms + profile.interval_ms);
        }

        spawned
    }

    fn spawn(&mut self, profile: StreakProfile, now_ms: f64) -> Streak {
        let streak = Streak {
            id: self.next_id,
            top_pct: self.rng.gen_range(0.0..100.0),
            width_px: self
                .rng
                .gen_range(profile.min_width_px..profile.max_width_px),
            duration_s: self
                .rng
                .gen_range(profile.min_duration_s..profile.max_duration_s),
            delay_s: self.rng.gen_range(0.0..MAX_DELAY_S),
            opacity: profile.opacity,
        };
        self.next_id += 1;
        self.live.push(LiveStreak {
            streak,
            expires_ms: now_ms + (streak.duration_s + streak.delay_s) * 1000.0 + REAP_SLACK_MS,
        });
        streak
    }
}
