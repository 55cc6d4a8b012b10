use serde::{Deserialize, Serialize};

/// The time-window filter applied to expense dates.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Every record, regardless of date.
    #[default]
    All,
    /// Records in the same calendar month and year as the reference date.
    Monthly,
    /// Records dated on or after the Sunday that starts the reference date's week.
    Weekly,
}

serde_plain::derive_display_from_serialize!(Period);
serde_plain::derive_fromstr_from_deserialize!(Period);
