// Copyright (c) 2024 Mike Tsao

use super::{
    ContinuationDriver, GeneratedVoices, GenerationError, GenerationRequest, Player,
    SnapshotError, StateSnapshot,
};
use crate::{
    traits::{ContinuationOracle, HasSettings, ProgressFn},
    util::GenerationSettings,
};
use thiserror::Error;

/// Things that stop a [Session] from doing what was asked.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Both seed voices are empty or failed to decode.
    #[error("there's nothing to continue")]
    OriginCleared,
    /// There's no generated pair to copy.
    #[error("nothing has been generated")]
    NothingGenerated,
    #[allow(missing_docs)]
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// A seed pair, the pair generated from it, and the settings that control
/// generation. This is the state a user works with, and the state that
/// [Session::save_json()] and [Session::load_json()] persist.
#[derive(Debug)]
pub struct Session<O: ContinuationOracle> {
    driver: ContinuationDriver<O>,
    origin: Player,
    generated: Player,
    settings: GenerationSettings,
}
impl<O: ContinuationOracle> Session<O> {
    #[allow(missing_docs)]
    pub fn new_with(driver: ContinuationDriver<O>) -> Self {
        Self {
            driver,
            origin: Default::default(),
            generated: Default::default(),
            settings: Default::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn driver(&self) -> &ContinuationDriver<O> {
        &self.driver
    }

    /// The seed pair.
    pub fn origin(&self) -> &Player {
        &self.origin
    }

    #[allow(missing_docs)]
    pub fn origin_mut(&mut self) -> &mut Player {
        &mut self.origin
    }

    /// The most recent result.
    pub fn generated(&self) -> &Player {
        &self.generated
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }

    /// Extends the origin pair according to the current settings and stores
    /// the result in the generated player.
    ///
    /// Progress starts at 0.1 and ends at 1.0. On failure, neither player
    /// changes.
    pub fn generate(&mut self, progress: &mut ProgressFn) -> Result<GeneratedVoices, SessionError> {
        if !self.origin.check() {
            return Err(SessionError::OriginCleared);
        }
        progress(0.1);
        let request = GenerationRequest::from(&self.settings);
        let voices = self.driver.generate(
            self.origin.primary(),
            self.origin.secondary(),
            &request,
            progress,
        )?;
        self.generated
            .set_sequences(voices.primary.clone(), voices.secondary.clone());
        progress(1.0);
        Ok(voices)
    }

    /// Makes the generated pair the new seed pair, so the next generation
    /// continues from it.
    pub fn copy_generated_to_origin(&mut self) -> Result<(), SessionError> {
        self.origin.check();
        if !self.generated.check() {
            return Err(SessionError::NothingGenerated);
        }
        match (self.generated.primary_mml(), self.generated.secondary_mml()) {
            (Some(primary), Some(secondary)) => {
                let (primary, secondary) = (primary.to_string(), secondary.to_string());
                self.origin.set_mml(&primary, &secondary);
                Ok(())
            }
            _ => Err(SessionError::NothingGenerated),
        }
    }

    /// Captures the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        let text = |mml: Option<&str>| mml.unwrap_or_default().to_string();
        StateSnapshot {
            secondary_result_mml: text(self.generated.secondary_mml()),
            primary_result_mml: text(self.generated.primary_mml()),
            primary_seed_mml: text(self.origin.primary_mml()),
            secondary_seed_mml: text(self.origin.secondary_mml()),
            temperature: self.settings.temperature(),
            repeat_count: self.settings.repeat_count(),
            correct_discordance: self.settings.correct_discordance(),
        }
    }

    /// Replaces the current state with the snapshot's. The MML text comes
    /// back exactly as saved, and the sequences are decoded from it.
    pub fn restore(&mut self, snapshot: &StateSnapshot) {
        self.origin
            .restore_mml(&snapshot.primary_seed_mml, &snapshot.secondary_seed_mml);
        self.generated
            .restore_mml(&snapshot.primary_result_mml, &snapshot.secondary_result_mml);
        self.settings.set_temperature(snapshot.temperature);
        self.settings.set_repeat_count(snapshot.repeat_count);
        self.settings
            .set_correct_discordance(snapshot.correct_discordance);
    }

    /// Serializes the current state and marks the settings clean.
    pub fn save_json(&mut self) -> Result<String, SnapshotError> {
        let json = self.snapshot().to_json()?;
        self.settings.mark_clean();
        Ok(json)
    }

    /// Restores state saved by [Session::save_json()]. If the text can't be
    /// loaded, the session is unchanged.
    pub fn load_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot = StateSnapshot::from_json(json)?;
        self.restore(&snapshot);
        self.settings.mark_clean();
        log::info!("restored session state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        oracles::{EchoOracle, FailingOracle},
        util::{RepeatChoice, Rng, TemperatureChoice},
    };

    fn session() -> Session<EchoOracle> {
        Session::new_with(ContinuationDriver::new_with_rng(
            EchoOracle::default(),
            Rng::new_with_seed(9),
        ))
    }

    #[test]
    fn cleared_origin_refuses_to_generate() {
        let mut s = session();
        let mut reports = Vec::default();
        assert!(matches!(
            s.generate(&mut |p| reports.push(p)),
            Err(SessionError::OriginCleared)
        ));
        assert!(reports.is_empty());
        assert!(!s.driver().is_generating());
    }

    #[test]
    fn generate_fills_generated_player() {
        let mut s = session();
        s.origin_mut().set_mml("l4 o4 cdef", "l2 o3 cg");
        let mut reports = Vec::default();
        let voices = s.generate(&mut |p| reports.push(p)).unwrap();
        assert_eq!(reports.first(), Some(&0.1));
        assert_eq!(reports.last(), Some(&1.0));
        assert_eq!(reports.len(), 4, "start, two iterations, done");
        assert_eq!(s.generated().primary(), &voices.primary);
        assert!(s.generated().primary_mml().is_some());
        assert!(!s.generated().is_cleared());
    }

    #[test]
    fn failure_leaves_players_alone() {
        let mut s = Session::new_with(ContinuationDriver::new_with(FailingOracle::default()));
        s.origin_mut().set_mml("l4 o4 cdef", "l2 o3 cg");
        let origin_before = s.origin().clone();
        let r = s.generate(&mut |_| {});
        assert!(matches!(r, Err(SessionError::Generation(_))));
        assert_eq!(s.origin(), &origin_before);
        assert!(s.generated().is_cleared());
    }

    #[test]
    fn copy_generated_to_origin() {
        let mut s = session();
        assert!(matches!(
            s.copy_generated_to_origin(),
            Err(SessionError::NothingGenerated)
        ));

        s.origin_mut().set_mml("l4 o4 cdef", "l2 o3 cg");
        s.generate(&mut |_| {}).unwrap();
        s.copy_generated_to_origin().unwrap();
        assert_eq!(s.origin().primary_mml(), s.generated().primary_mml());
        assert_eq!(s.origin().primary(), s.generated().primary());
    }

    #[test]
    fn save_and_load() {
        let mut s = session();
        s.origin_mut().set_mml("l4 o4 cdef", "l2 o3 cg");
        s.generate(&mut |_| {}).unwrap();
        s.settings_mut().set_temperature(TemperatureChoice::Calm);
        s.settings_mut().set_repeat_count(RepeatChoice::Thrice);
        s.settings_mut().set_correct_discordance(false);
        assert!(!s.settings().has_been_saved());

        let json = s.save_json().unwrap();
        assert!(s.settings().has_been_saved());
        assert!(!json.contains(", "));

        let mut restored = session();
        restored.load_json(&json).unwrap();
        assert_eq!(restored.snapshot(), s.snapshot());
        assert_eq!(restored.origin().primary(), s.origin().primary());
        assert_eq!(restored.generated().secondary(), s.generated().secondary());
        assert_eq!(restored.settings(), s.settings());
        assert!(restored.settings().has_been_saved());
    }

    #[test]
    fn bad_load_changes_nothing() {
        let mut s = session();
        s.origin_mut().set_mml("l4 o4 cdef", "l2 o3 cg");
        let before = s.snapshot();
        assert!(s.load_json(r#"["a","b","c","d",1,9,true]"#).is_err());
        assert!(s.load_json("[1,2,3]").is_err());
        assert_eq!(s.snapshot(), before);
    }
}
