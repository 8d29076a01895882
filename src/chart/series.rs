// MonthlySeries - ordered (label, value) pairs, one calendar year at most

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Upper bound on points in one series
pub const MAX_POINTS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u32,
}

/// Insertion order is calendar order. Labels are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    points: Vec<SeriesPoint>,
}

impl MonthlySeries {
    pub fn empty() -> Self {
        MonthlySeries { points: Vec::new() }
    }

    /// Full year labeled Jan..Dec
    pub fn calendar(values: [u32; 12]) -> Self {
        let points = MONTH_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| SeriesPoint {
                label: label.to_string(),
                value,
            })
            .collect();
        MonthlySeries { points }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut points: Vec<SeriesPoint> = Vec::new();
        for (label, value) in pairs {
            let label = label.into();
            if points.iter().any(|p| p.label == label) {
                return Err(ChartError::DuplicateLabel(label));
            }
            points.push(SeriesPoint { label, value });
        }

        if points.len() > MAX_POINTS {
            return Err(ChartError::TooManyPoints {
                max: MAX_POINTS,
                got: points.len(),
            });
        }

        Ok(MonthlySeries { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.points.iter().find(|p| p.label == label).map(|p| p.value)
    }

    pub fn max_value(&self) -> Option<u32> {
        self.values().max()
    }

    pub fn min_value(&self) -> Option<u32> {
        self.values().min()
    }

    /// Index of the maximum; first occurrence wins on ties
    pub fn arg_max(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, value) in self.values().enumerate() {
            match best {
                Some((_, max)) if value <= max => {}
                _ => best = Some((i, value)),
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn total(&self) -> u64 {
        self.values().map(u64::from).sum()
    }
}

// Deserialization goes through the same validation as from_pairs
impl<'de> Deserialize<'de> for MonthlySeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<SeriesPoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        MonthlySeries::from_pairs(raw.points.into_iter().map(|p| (p.label, p.value)))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_labels_in_order() {
        let series = MonthlySeries::calendar([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(series.len(), 12);
        assert_eq!(series.points()[0].label, "Jan");
        assert_eq!(series.points()[11].label, "Dec");
        assert_eq!(series.get("Jun"), Some(6));
        assert_eq!(series.total(), 78);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = MonthlySeries::from_pairs(vec![("Jan", 1), ("Jan", 2)]).unwrap_err();
        assert_eq!(err, ChartError::DuplicateLabel("Jan".to_string()));
    }

    #[test]
    fn test_too_many_points_rejected() {
        let pairs: Vec<(String, u32)> = (0..13).map(|i| (format!("M{}", i), i)).collect();
        let err = MonthlySeries::from_pairs(pairs).unwrap_err();
        assert_eq!(err, ChartError::TooManyPoints { max: 12, got: 13 });
    }

    #[test]
    fn test_arg_max_first_occurrence() {
        let series = MonthlySeries::from_pairs(vec![("a", 3), ("b", 9), ("c", 9), ("d", 1)]).unwrap();
        assert_eq!(series.arg_max(), Some(1));
        assert_eq!(MonthlySeries::empty().arg_max(), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"points":[{"label":"Jan","value":1},{"label":"Jan","value":2}]}"#;
        assert!(serde_json::from_str::<MonthlySeries>(json).is_err());

        let json = r#"{"points":[{"label":"Jan","value":1}]}"#;
        let series: MonthlySeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.get("Jan"), Some(1));
    }
}
