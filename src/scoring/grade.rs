//! Letter grades

use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade for a 0–100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Maps a score onto a grade: ≥90 A, ≥75 B, ≥60 C, ≥40 D, otherwise F
    ///
    /// # Examples
    ///
    /// ```
    /// use ranksight::scoring::Grade;
    ///
    /// assert_eq!(Grade::from_score(90), Grade::A);
    /// assert_eq!(Grade::from_score(89), Grade::B);
    /// assert_eq!(Grade::from_score(39), Grade::F);
    /// ```
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            40..=59 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
