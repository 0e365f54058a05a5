use std::path::PathBuf;

use crate::{
    age::BirthDate,
    error::{LifefloodError, LifefloodResult},
};

/// Persistence collaborator for the sole durable record. Last write wins; no
/// durability guarantees beyond that.
pub trait BirthStore {
    fn load(&self) -> LifefloodResult<Option<BirthDate>>;
    fn save(&mut self, birth: &BirthDate) -> LifefloodResult<()>;
    fn clear(&mut self) -> LifefloodResult<()>;
}

/// In-process store for tests and offline simulation.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Option<BirthDate>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(birth: BirthDate) -> Self {
        Self { value: Some(birth) }
    }
}

impl BirthStore for MemoryStore {
    fn load(&self) -> LifefloodResult<Option<BirthDate>> {
        Ok(self.value)
    }

    fn save(&mut self, birth: &BirthDate) -> LifefloodResult<()> {
        self.value = Some(*birth);
        Ok(())
    }

    fn clear(&mut self) -> LifefloodResult<()> {
        self.value = None;
        Ok(())
    }
}

/// One JSON file holding the `{month, year}` record. A missing file reads as
/// absent; a malformed or partial record also reads as absent (the prompt
/// view is the safe fallback), logged rather than surfaced.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl BirthStore for JsonFileStore {
    fn load(&self) -> LifefloodResult<Option<BirthDate>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(LifefloodError::storage(format!(
                    "read '{}': {err}",
                    self.path.display()
                )));
            }
        };
        match serde_json::from_str::<BirthDate>(&raw) {
            Ok(birth) if birth.validate().is_ok() => Ok(Some(birth)),
            Ok(birth) => {
                tracing::warn!(?birth, "stored birth date out of range, treating as absent");
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(%err, "stored birth date malformed, treating as absent");
                Ok(None)
            }
        }
    }

    fn save(&mut self, birth: &BirthDate) -> LifefloodResult<()> {
        let json = serde_json::to_string_pretty(birth)
            .map_err(|err| LifefloodError::serde(err.to_string()))?;
        std::fs::write(&self.path, json).map_err(|err| {
            LifefloodError::storage(format!("write '{}': {err}", self.path.display()))
        })
    }

    fn clear(&mut self) -> LifefloodResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(LifefloodError::storage(format!(
                "remove '{}': {err}",
                self.path.display()
            ))),
        }
    }
}
