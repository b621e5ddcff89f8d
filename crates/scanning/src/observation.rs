use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::symbology::Symbology;

/// Bounding box in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One raw decoder hit from a single preprocessing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub payload: String,
    pub symbology: Symbology,
    #[serde(default)]
    pub region: Region,
}

impl Detection {
    pub fn new(payload: impl Into<String>, symbology: Symbology, region: Region) -> Self {
        Self {
            payload: payload.into(),
            symbology,
            region,
        }
    }
}

/// A distinct barcode seen in one captured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub payload: String,
    pub symbology: Symbology,
    pub region: Region,
    pub captured_at: DateTime<Utc>,
}

/// Merge detection passes over one image into distinct observations.
///
/// Detections are the same observation iff their payloads are byte-identical;
/// the first one seen wins, symbology included. Output keeps first-occurrence
/// order across the sets taken in the order given.
pub fn merge<I, S>(detection_sets: I, captured_at: DateTime<Utc>) -> Vec<Observation>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Detection>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for detection in detection_sets.into_iter().flatten() {
        if !seen.insert(detection.payload.clone()) {
            continue;
        }
        out.push(Observation {
            payload: detection.payload,
            symbology: detection.symbology,
            region: detection.region,
            captured_at,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn det(payload: &str, symbology: Symbology) -> Detection {
        Detection::new(payload, symbology, Region::default())
    }

    fn payloads(obs: &[Observation]) -> Vec<&str> {
        obs.iter().map(|o| o.payload.as_str()).collect()
    }

    #[test]
    fn overlapping_passes_merge_in_first_seen_order() {
        let raw = vec![det("A", Symbology::QrCode), det("B", Symbology::QrCode)];
        let thresholded = vec![det("B", Symbology::QrCode), det("C", Symbology::Code128)];

        let out = merge([raw, thresholded], Utc::now());
        assert_eq!(payloads(&out), vec!["A", "B", "C"]);
    }

    #[test]
    fn first_symbology_wins_on_identical_payload() {
        let region = Region { x: 4, y: 8, width: 20, height: 20 };
        let first = vec![Detection::new("4006381333931", Symbology::Ean13, region)];
        let second = vec![det("4006381333931", Symbology::Code128)];

        let out = merge([first, second], Utc::now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbology, Symbology::Ean13);
        assert_eq!(out[0].region, region);
    }

    #[test]
    fn payload_comparison_is_exact() {
        let pass = vec![
            det("abc", Symbology::QrCode),
            det("ABC", Symbology::QrCode),
            det("abc ", Symbology::QrCode),
        ];
        let out = merge([pass], Utc::now());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let sets: Vec<Vec<Detection>> = vec![vec![], vec![]];
        assert!(merge(sets, Utc::now()).is_empty());
    }

    #[test]
    fn observations_share_capture_time() {
        let at = Utc::now();
        let out = merge([vec![det("A", Symbology::QrCode), det("B", Symbology::QrCode)]], at);
        assert!(out.iter().all(|o| o.captured_at == at));
    }

    proptest! {
        /// Property: output payloads are unique, every input payload appears,
        /// and each appears at the position of its first occurrence.
        #[test]
        fn merge_matches_first_occurrence_dedup(
            sets in prop::collection::vec(prop::collection::vec("[a-d]{1,2}", 0..6), 0..4)
        ) {
            let flat: Vec<String> = sets.iter().flatten().cloned().collect();
            let mut expected: Vec<String> = Vec::new();
            for p in &flat {
                if !expected.contains(p) {
                    expected.push(p.clone());
                }
            }

            let detection_sets: Vec<Vec<Detection>> = sets
                .iter()
                .map(|s| s.iter().map(|p| det(p, Symbology::QrCode)).collect())
                .collect();
            let out = merge(detection_sets, Utc::now());
            let got: Vec<String> = out.into_iter().map(|o| o.payload).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
