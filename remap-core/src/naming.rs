//! Case conventions for enum entry names.

use serde::{Deserialize, Serialize};

use crate::utils::{capitalize, split_words};

/// A naming convention an enum's entries are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseConvention {
    /// `ONE_SAMPLE`
    UpperSnake,
    /// `one_sample`
    LowerSnake,
    /// `OneSample`
    UpperCamel,
    /// `oneSample`
    LowerCamel,
}

impl CaseConvention {
    /// Re-spell `value`, written in this convention, in convention `to`.
    pub fn convert(self, to: CaseConvention, value: &str) -> String {
        to.join(&self.split(value))
    }

    fn split(self, value: &str) -> Vec<String> {
        match self {
            Self::UpperSnake | Self::LowerSnake => value
                .split('_')
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase)
                .collect(),
            Self::UpperCamel | Self::LowerCamel => split_words(value),
        }
    }

    fn join(self, words: &[String]) -> String {
        match self {
            Self::UpperSnake => words
                .iter()
                .map(|w| w.to_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::LowerSnake => words.join("_"),
            Self::UpperCamel => words.iter().map(|w| capitalize(w)).collect(),
            Self::LowerCamel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
        }
    }
}
