//! Hike time and difficulty estimate.
//!
//! Time is distance at the chosen pace plus 10 minutes per 100 m of ascent.
//! Difficulty comes from `distance / 4 + elevation / 300`.

use crate::render::DisplayFragment;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    #[error("Please enter a valid positive number for distance.")]
    InvalidDistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Slow,
    Moderate,
    Fast,
}

impl Pace {
    /// Reads the pace select value; anything unrecognized is moderate.
    pub fn from_form(value: &str) -> Self {
        match value.trim() {
            "slow" => Pace::Slow,
            "fast" => Pace::Fast,
            _ => Pace::Moderate,
        }
    }

    /// Walking speed in km/h
    pub fn speed_kmh(&self) -> f64 {
        match self {
            Pace::Slow => 3.0,
            Pace::Moderate => 4.0,
            Pace::Fast => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HikeDifficulty {
    Easy,
    Moderate,
    Challenging,
}

impl HikeDifficulty {
    pub fn from_score(score: f64) -> Self {
        if score < 5.0 {
            HikeDifficulty::Easy
        } else if score <= 10.0 {
            HikeDifficulty::Moderate
        } else {
            HikeDifficulty::Challenging
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HikeDifficulty::Easy => "Easy",
            HikeDifficulty::Moderate => "Moderate",
            HikeDifficulty::Challenging => "Challenging",
        }
    }

    /// Material Symbols icon name
    pub fn icon(&self) -> &'static str {
        match self {
            HikeDifficulty::Easy => "directions_walk",
            HikeDifficulty::Moderate => "hiking",
            HikeDifficulty::Challenging => "filter_hdr",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HikeEstimate {
    pub pace_speed: f64,
    /// Minutes
    pub time_for_distance: f64,
    /// Minutes
    pub time_for_elevation: f64,
    pub total_minutes: i64,
    pub score: f64,
    pub difficulty: HikeDifficulty,
}

impl HikeEstimate {
    /// `"{hours}h {minutes}m"`
    pub fn formatted_time(&self) -> String {
        let hours = self.total_minutes.div_euclid(60);
        let minutes = self.total_minutes % 60;
        format!("{}h {}m", hours, minutes)
    }
}

/// Estimates from numeric inputs. Distance must be positive.
pub fn estimate_values(
    distance_km: f64,
    elevation_m: f64,
    pace: Pace,
) -> Result<HikeEstimate, CalculatorError> {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return Err(CalculatorError::InvalidDistance);
    }
    let elevation_m = if elevation_m.is_finite() { elevation_m } else { 0.0 };

    let pace_speed = pace.speed_kmh();
    let time_for_distance = distance_km / pace_speed * 60.0;
    let time_for_elevation = elevation_m / 100.0 * 10.0;
    // Halves round up, toward positive infinity
    let total_minutes = (time_for_distance + time_for_elevation + 0.5).floor() as i64;

    let score = distance_km / 4.0 + elevation_m / 300.0;

    Ok(HikeEstimate {
        pace_speed,
        time_for_distance,
        time_for_elevation,
        total_minutes,
        score,
        difficulty: HikeDifficulty::from_score(score),
    })
}

/// Estimates from raw form values.
///
/// Numbers are read from the leading numeric part of each field, so `"10km"`
/// is 10. A blank or unreadable elevation counts as 0.
pub fn estimate(distance: &str, elevation: &str, pace: &str) -> Result<HikeEstimate, CalculatorError> {
    let distance = parse_leading_float(distance).ok_or(CalculatorError::InvalidDistance)?;
    let elevation = parse_leading_float(elevation).unwrap_or(0.0);
    estimate_values(distance, elevation, Pace::from_form(pace))
}

fn parse_leading_float(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

pub fn render_estimate(estimate: &HikeEstimate) -> DisplayFragment {
    DisplayFragment::new(format!(
        r#"<h3>Your Estimated Hike</h3>
<div class="calc-hike-info">
    <div class="info-item">
        <span class="material-symbols-outlined">schedule</span>
        <div><strong>Time:</strong> {}</div>
    </div>
    <div class="info-item">
        <span class="material-symbols-outlined">{}</span>
        <div><strong>Difficulty:</strong> {}</div>
    </div>
</div>
<p class="calc-hike-description">This is an estimate. Actual time may vary based on trail conditions, weather, and personal fitness. Always plan accordingly and hike safely!</p>"#,
        estimate.formatted_time(),
        estimate.difficulty.icon(),
        estimate.difficulty.label(),
    ))
}

pub fn render_calculator_error(err: &CalculatorError) -> DisplayFragment {
    DisplayFragment::new(format!(r#"<p class="error-message">{}</p>"#, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_ten_km() {
        let est = estimate("10", "300", "fast").unwrap();
        assert_eq!(est.pace_speed, 5.0);
        assert_eq!(est.time_for_distance, 120.0);
        assert_eq!(est.time_for_elevation, 30.0);
        assert_eq!(est.total_minutes, 150);
        assert_eq!(est.formatted_time(), "2h 30m");
        assert_eq!(est.score, 3.5);
        assert_eq!(est.difficulty, HikeDifficulty::Easy);

        let html = render_estimate(&est);
        assert!(html.as_str().contains("2h 30m"));
        assert!(html.as_str().contains("directions_walk"));
    }

    #[test]
    fn test_default_pace_and_elevation() {
        let est = estimate("8", "", "whatever").unwrap();
        assert_eq!(est.pace_speed, 4.0);
        assert_eq!(est.total_minutes, 120);
        assert_eq!(est.formatted_time(), "2h 0m");
        assert_eq!(est.difficulty, HikeDifficulty::Easy);
    }

    #[test]
    fn test_difficulty_boundaries() {
        assert_eq!(HikeDifficulty::from_score(4.99), HikeDifficulty::Easy);
        assert_eq!(HikeDifficulty::from_score(5.0), HikeDifficulty::Moderate);
        assert_eq!(HikeDifficulty::from_score(10.0), HikeDifficulty::Moderate);
        assert_eq!(HikeDifficulty::from_score(10.01), HikeDifficulty::Challenging);

        let est = estimate("20", "1500", "slow").unwrap();
        assert_eq!(est.score, 10.0);
        assert_eq!(est.difficulty, HikeDifficulty::Moderate);
        assert_eq!(est.difficulty.icon(), "hiking");
    }

    #[test]
    fn test_rounds_half_up() {
        // 1 km at 4 km/h is 15 min, 5 m ascent is 0.5 min
        let est = estimate_values(1.0, 5.0, Pace::Moderate).unwrap();
        assert_eq!(est.total_minutes, 16);
    }

    #[test]
    fn test_invalid_distance() {
        for distance in ["", "abc", "0", "-3", "."] {
            assert_eq!(
                estimate(distance, "100", "moderate"),
                Err(CalculatorError::InvalidDistance),
                "distance {:?}",
                distance
            );
        }

        let html = render_calculator_error(&CalculatorError::InvalidDistance);
        assert_eq!(
            html.as_str(),
            r#"<p class="error-message">Please enter a valid positive number for distance.</p>"#
        );
    }

    #[test]
    fn test_leading_number_parsing() {
        assert_eq!(parse_leading_float("10km"), Some(10.0));
        assert_eq!(parse_leading_float("  2.5 "), Some(2.5));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("1e2m"), Some(100.0));
        assert_eq!(parse_leading_float("3e"), Some(3.0));
        assert_eq!(parse_leading_float("km"), None);
    }
}
