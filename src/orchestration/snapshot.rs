// Copyright (c) 2024 Mike Tsao

use crate::util::{RepeatChoice, TemperatureChoice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a saved state can't be loaded.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Not JSON, not an array of seven, or an element of the wrong type.
    #[error("snapshot is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A choice index that doesn't name any choice.
    #[error("{field} index {index} is out of range")]
    IndexOutOfRange {
        #[allow(missing_docs)]
        field: &'static str,
        #[allow(missing_docs)]
        index: usize,
    },
}

/// The wire layout, in order.
type SnapshotFields = (String, String, String, String, usize, usize, bool);

/// Everything needed to bring a session back: the seed and result MML for
/// both voices, and the generation settings.
///
/// On the wire it's a seven-element JSON array with no whitespace:
/// `[secondaryResult, primaryResult, primarySeed, secondarySeed,
/// temperatureIndex, repeatCountIndex, correctDiscordance]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "SnapshotFields", try_from = "SnapshotFields")]
pub struct StateSnapshot {
    #[allow(missing_docs)]
    pub secondary_result_mml: String,
    #[allow(missing_docs)]
    pub primary_result_mml: String,
    #[allow(missing_docs)]
    pub primary_seed_mml: String,
    #[allow(missing_docs)]
    pub secondary_seed_mml: String,
    #[allow(missing_docs)]
    pub temperature: TemperatureChoice,
    #[allow(missing_docs)]
    pub repeat_count: RepeatChoice,
    #[allow(missing_docs)]
    pub correct_discordance: bool,
}
impl From<StateSnapshot> for SnapshotFields {
    fn from(s: StateSnapshot) -> Self {
        (
            s.secondary_result_mml,
            s.primary_result_mml,
            s.primary_seed_mml,
            s.secondary_seed_mml,
            s.temperature.index(),
            s.repeat_count.index(),
            s.correct_discordance,
        )
    }
}
impl TryFrom<SnapshotFields> for StateSnapshot {
    type Error = SnapshotError;

    fn try_from(fields: SnapshotFields) -> Result<Self, Self::Error> {
        let (
            secondary_result_mml,
            primary_result_mml,
            primary_seed_mml,
            secondary_seed_mml,
            temperature_index,
            repeat_count_index,
            correct_discordance,
        ) = fields;
        let temperature = TemperatureChoice::from_index(temperature_index).ok_or(
            SnapshotError::IndexOutOfRange {
                field: "temperature",
                index: temperature_index,
            },
        )?;
        let repeat_count =
            RepeatChoice::from_index(repeat_count_index).ok_or(SnapshotError::IndexOutOfRange {
                field: "repeat count",
                index: repeat_count_index,
            })?;
        Ok(Self {
            secondary_result_mml,
            primary_result_mml,
            primary_seed_mml,
            secondary_seed_mml,
            temperature,
            repeat_count,
            correct_discordance,
        })
    }
}
impl StateSnapshot {
    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and validates. Nothing is returned unless every field is good.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let fields: SnapshotFields = serde_json::from_str(json)?;
        Self::try_from(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> StateSnapshot {
        StateSnapshot {
            secondary_result_mml: "l8 o3 c d e".to_string(),
            primary_result_mml: "l16 o5 g\"a".to_string(),
            primary_seed_mml: "l4 o4 cdef".to_string(),
            secondary_seed_mml: String::default(),
            temperature: TemperatureChoice::Wild,
            repeat_count: RepeatChoice::Once,
            correct_discordance: false,
        }
    }

    #[test]
    fn wire_layout() {
        assert_eq!(
            known().to_json().unwrap(),
            r#"["l8 o3 c d e","l16 o5 g\"a","l4 o4 cdef","",2,0,false]"#
        );
    }

    #[test]
    fn round_trip() {
        let json = known().to_json().unwrap();
        assert_eq!(StateSnapshot::from_json(&json).unwrap(), known());
    }

    #[test]
    fn rejects_bad_input() {
        for bad in [
            "",
            "{}",
            "not json",
            r#"["a","b","c","d",1,1]"#,
            r#"["a","b","c","d",1,1,true,"extra"]"#,
            r#"["a","b","c","d","1",1,true]"#,
            r#"["a","b","c","d",1,1,"true"]"#,
            r#"["a","b","c","d",-1,1,true]"#,
        ] {
            assert!(
                matches!(StateSnapshot::from_json(bad), Err(SnapshotError::Malformed(_))),
                "{bad} should be malformed"
            );
        }
        assert!(matches!(
            StateSnapshot::from_json(r#"["a","b","c","d",3,1,true]"#),
            Err(SnapshotError::IndexOutOfRange {
                field: "temperature",
                index: 3
            })
        ));
        assert!(matches!(
            StateSnapshot::from_json(r#"["a","b","c","d",0,7,true]"#),
            Err(SnapshotError::IndexOutOfRange {
                field: "repeat count",
                index: 7
            })
        ));
    }

    #[test]
    fn tolerates_whitespace_on_input() {
        let s = StateSnapshot::from_json("[ \"\", \"\", \"c\", \"d\", 1, 1, true ]\n").unwrap();
        assert_eq!(s.primary_seed_mml, "c");
        assert_eq!(s.temperature, TemperatureChoice::Balanced);
        assert!(s.correct_discordance);
    }
}
