use std::fmt;

use serde::{Deserialize, Serialize};

pub const HUMILITY_SCORE_MIN: f64 = 1.0;
pub const HUMILITY_SCORE_MAX: f64 = 10.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(HeroId);

impl HeroId {
    /// First `len` UTF-16 code units of the id, matching how the web page
    /// slices it. A character that would straddle the cut is left out rather
    /// than split; shorter ids are returned whole.
    pub fn prefix(&self, len: usize) -> &str {
        let mut units = 0;
        for (end, ch) in self.0.char_indices() {
            units += ch.len_utf16();
            if units > len {
                return &self.0[..end];
            }
        }
        &self.0
    }
}

/// A hero as returned by the list endpoint. Records coming back from the
/// server are trusted as-is; the score range is only enforced on create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroRecord {
    pub id: HeroId,
    pub name: String,
    pub superpower: String,
    pub humility_score: f64,
}

pub fn is_valid_humility_score(score: f64) -> bool {
    (HUMILITY_SCORE_MIN..=HUMILITY_SCORE_MAX).contains(&score)
}
