//! Label encoding of categorical columns.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Code returned for a label that was not seen while fitting.
pub const UNKNOWN_CODE: i64 = -1;

/// A mapping from string labels to dense integer codes `0..k`.
///
/// Codes are assigned in the order labels are first seen, so fitting the same label
/// sequence twice always gives the same mapping. Each categorical column gets its own
/// `EncodedCategory`; the wind-direction and rain-tomorrow mappings are never shared.
///
/// # Examples
///
/// ```
/// use weather_predict::{EncodedCategory, UNKNOWN_CODE};
///
/// let encoding = EncodedCategory::fit(["No", "Yes", "No"]);
/// assert_eq!(encoding.transform("No"), 0);
/// assert_eq!(encoding.transform("Yes"), 1);
/// assert_eq!(encoding.transform("Maybe"), UNKNOWN_CODE);
/// assert_eq!(encoding.inverse(1), Some("Yes"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedCategory {
    classes: Vec<String>,
    codes: HashMap<String, i64>,
}

impl EncodedCategory {
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes = Vec::new();
        let mut codes = HashMap::new();
        for label in labels {
            let label = label.as_ref();
            if !codes.contains_key(label) {
                codes.insert(label.to_string(), classes.len() as i64);
                classes.push(label.to_string());
            }
        }
        Self { classes, codes }
    }

    /// Returns the code of `label`, or [`UNKNOWN_CODE`] if it was never fitted.
    ///
    /// An unknown label is not an error. Callers that feed the code to a model must
    /// treat `-1` as out of distribution.
    pub fn transform(&self, label: &str) -> i64 {
        self.codes.get(label).copied().unwrap_or(UNKNOWN_CODE)
    }

    pub fn transform_all<I, S>(&self, labels: I) -> Vec<i64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.transform(label.as_ref()))
            .collect()
    }

    pub fn inverse(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.classes.get(index))
            .map(String::as_str)
    }

    /// The fitted labels, indexed by code.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_first_seen_order() {
        let encoding = EncodedCategory::fit(["W", "NNE", "W", "SSW", "NNE"]);
        assert_eq!(encoding.classes(), ["W", "NNE", "SSW"]);
        assert_eq!(encoding.transform_all(["SSW", "W", "NNE"]), vec![2, 0, 1]);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let labels = vec!["No", "No", "Yes", "No", "Yes"];
        assert_eq!(
            EncodedCategory::fit(labels.iter()),
            EncodedCategory::fit(labels.iter())
        );
    }

    #[test]
    fn test_unknown_label_is_sentinel() {
        let encoding = EncodedCategory::fit(["N", "S"]);
        assert_eq!(encoding.transform("E"), UNKNOWN_CODE);
        assert_eq!(encoding.inverse(UNKNOWN_CODE), None);
        assert_eq!(encoding.inverse(2), None);
    }

    #[test]
    fn test_separate_columns_do_not_share_codes() {
        let directions = EncodedCategory::fit(["NW", "SE"]);
        let rain = EncodedCategory::fit(["No", "Yes"]);
        assert_eq!(rain.transform("NW"), UNKNOWN_CODE);
        assert_eq!(directions.transform("Yes"), UNKNOWN_CODE);
        assert_eq!(directions.len(), 2);
        assert!(!rain.is_empty());
    }
}
