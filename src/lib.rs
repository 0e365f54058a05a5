//! Lifeflood is the age-driven animation engine behind a "life calendar"
//! widget: a birth month/year maps deterministically to visual parameters
//! (saturation, streak statistics), a two-phase flood transition moves between
//! the prompt and main views, and a recurring procedural process spawns and
//! reaps short-lived streak entities.
//!
//! The engine is platform-free. Every time-dependent component is polled with
//! an explicit millisecond timestamp, so a render loop, a CLI, and a test
//! harness all drive it the same way:
//!
//! 1. **Derive**: `BirthDate + today -> AgeParams` (saturation, age ratio)
//! 2. **Transition**: `Transition::advance(now_ms) -> VisualState` updates
//! 3. **Generate**: `StreakField::tick(now_ms) -> spawned streaks`
//! 4. **Orchestrate**: [`Session`] sequences the above on submit/reset.
#![forbid(unsafe_code)]

pub mod age;
pub mod driver;
pub mod ease;
pub mod error;
pub mod session;
pub mod store;
pub mod streaks;
pub mod transition;

pub use age::{AgeParams, BirthDate, BirthInput, LifeConfig, LifeStats};
pub use driver::{Driver, Sample, Status};
pub use ease::Ease;
pub use error::{LifefloodError, LifefloodResult};
pub use session::{Session, View};
pub use store::{BirthStore, JsonFileStore, MemoryStore};
pub use streaks::{Streak, StreakField, StreakProfile};
pub use transition::{Transition, VisualState};
