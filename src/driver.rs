use crate::ease::Ease;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Status {
    Active,
    Complete,
}

/// One polled frame of a running animation.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct Sample {
    pub linear: f64,
    pub eased: f64,
    pub status: Status,
}

/// Time-based progress driver, polled by an external loop (render loop or
/// test harness) with explicit wall-clock timestamps. Owners stop polling once
/// `Complete` is reported; progress never regresses afterwards.
#[derive(Clone, Copy, Debug)]
pub struct Driver {
    start_ms: f64,
    duration_ms: f64,
    ease: Ease,
    done: bool,
}

impl Driver {
    pub fn new(now_ms: f64, duration_ms: f64, ease: Ease) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
            ease,
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Samples progress at `now_ms`. Frame spacing is never assumed: linear
    /// progress is recomputed from elapsed wall-clock time each poll. A zero
    /// (or negative) duration completes on the first poll.
    pub fn advance(&mut self, now_ms: f64) -> Sample {
        let linear = if self.done || self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        if linear >= 1.0 {
            self.done = true;
        }
        Sample {
            linear,
            eased: self.ease.apply(linear),
            status: if self.done {
                Status::Complete
            } else {
                Status::Active
            },
        }
    }
}
