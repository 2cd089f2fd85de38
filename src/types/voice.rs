// Copyright (c) 2024 Mike Tsao

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Names one of the two voices in a duet. The primary voice (usually the
/// melody) is the harmonic reference; the secondary voice (usually the bass)
/// is the one that gets corrected.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumCount,
    EnumIter,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Voice {
    #[allow(missing_docs)]
    #[default]
    Primary,
    #[allow(missing_docs)]
    Secondary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn names() {
        assert_eq!(Voice::COUNT, 2);
        assert_eq!(
            Voice::iter().map(|v| v.to_string()).collect::<Vec<_>>(),
            vec!["primary", "secondary"]
        );
    }
}
