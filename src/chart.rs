// src/chart.rs
//! Score profile built from a report's components. The browser dashboard
//! draws these as a radar chart; here they become labelled percentages
//! the renderer can print as bars.

use serde_json::{Map, Value};
use tracing::warn;

/// Fewer reported components than this and no profile is built.
const MIN_COMPONENTS: usize = 3;

/// Fixed axis order with display labels. The service may report other
/// components, but only these four are drawn.
const AXIS_ORDER: [(&str, &str); 4] = [
    ("Experience", "Experience"),
    ("Skills Match", "Skills"),
    ("Contact Info", "Contacts"),
    ("Title Match", "Title"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreProfile {
    pub axes: Vec<ScoreAxis>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreAxis {
    pub label: &'static str,
    /// 0-100, clamped.
    pub percent: f64,
}

/// Build the score profile from reported components. Returns `None` when
/// fewer than three components came back, which is too sparse to draw.
/// Axes missing from the report are shown as 0.
pub fn score_profile(components: &Map<String, Value>) -> Option<ScoreProfile> {
    if components.len() < MIN_COMPONENTS {
        warn!(
            "Only {} score components reported, profile not built",
            components.len()
        );
        return None;
    }

    let axes = AXIS_ORDER
        .iter()
        .map(|&(key, label)| {
            let percent = match components.get(key) {
                Some(value) => fraction_to_percent(value),
                None => {
                    warn!("Component \"{}\" not reported, assuming 0", key);
                    0.0
                }
            };
            ScoreAxis { label, percent }
        })
        .collect();

    Some(ScoreProfile { axes })
}

/// 0-1 fraction to percent. Out-of-range values are clamped and
/// non-numeric values count as 0.
fn fraction_to_percent(value: &Value) -> f64 {
    value.as_f64().unwrap_or(0.0).clamp(0.0, 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn components(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_too_few_components_yield_no_profile() {
        assert!(score_profile(&Map::new()).is_none());
        assert!(score_profile(&components(json!({"Experience": 0.5}))).is_none());
        assert!(
            score_profile(&components(json!({"Experience": 0.5, "Skills Match": 0.5}))).is_none()
        );
    }

    #[test]
    fn test_axes_follow_fixed_order() {
        let profile = score_profile(&components(json!({
            "Title Match": 0.25,
            "Experience": 0.5,
            "Skills Match": 0.75,
            "Contact Info": 1.0
        })))
        .unwrap();

        let labels: Vec<&str> = profile.axes.iter().map(|a| a.label).collect();
        assert_eq!(labels, ["Experience", "Skills", "Contacts", "Title"]);
        let percents: Vec<f64> = profile.axes.iter().map(|a| a.percent).collect();
        assert_eq!(percents, [50.0, 75.0, 100.0, 25.0]);
    }

    #[test]
    fn test_fractions_are_clamped() {
        let profile = score_profile(&components(json!({
            "Experience": 1.5,
            "Skills Match": -0.25,
            "Contact Info": 0.5,
            "Title Match": 0.0
        })))
        .unwrap();

        let percents: Vec<f64> = profile.axes.iter().map(|a| a.percent).collect();
        assert_eq!(percents, [100.0, 0.0, 50.0, 0.0]);
    }

    #[test]
    fn test_missing_axes_count_as_zero() {
        // three unrelated keys pass the gate; every drawn axis is 0
        let profile = score_profile(&components(json!({
            "Alpha": 0.5,
            "Beta": 0.5,
            "Gamma": 0.5
        })))
        .unwrap();

        assert!(profile.axes.iter().all(|a| a.percent == 0.0));
    }

    #[test]
    fn test_non_numeric_values_count_as_zero() {
        let profile = score_profile(&components(json!({
            "Experience": "high",
            "Skills Match": 0.5,
            "Contact Info": null,
            "Title Match": 0.25
        })))
        .unwrap();

        let percents: Vec<f64> = profile.axes.iter().map(|a| a.percent).collect();
        assert_eq!(percents, [0.0, 50.0, 0.0, 25.0]);
    }
}
