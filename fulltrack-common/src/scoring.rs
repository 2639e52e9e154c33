//! Source scoring and best-source selection
//!
//! Additive weights:
//!
//! | Condition                                   | Points              |
//! |---------------------------------------------|---------------------|
//! | streamable or playable                      | 100                 |
//! | cross-origin playback supported             | 10                  |
//! | bitrate known                               | min(kbps / 32, 10)  |
//! | duration known                              | 5                   |
//! | license carries an open marker              | 5                   |
//! | download explicitly allowed / downloadable  | 2                   |

use crate::models::TrackSource;

/// Case-insensitive substrings that mark a license as open
pub const OPEN_LICENSE_MARKERS: [&str; 4] = ["cc", "creative", "public", "jamendo"];

const PLAYABLE_POINTS: f64 = 100.0;
const CORS_POINTS: f64 = 10.0;
const BITRATE_DIVISOR: f64 = 32.0;
const BITRATE_CAP: f64 = 10.0;
const DURATION_POINTS: f64 = 5.0;
const OPEN_LICENSE_POINTS: f64 = 5.0;
const DOWNLOAD_POINTS: f64 = 2.0;

fn has_open_license(license: &str) -> bool {
    let license = license.to_lowercase();
    OPEN_LICENSE_MARKERS.iter().any(|m| license.contains(m))
}

/// Quality score for one source; higher is better, never negative
pub fn score_source(source: &TrackSource) -> f64 {
    let mut score = 0.0;

    if source.streamable == Some(true) || source.playable == Some(true) {
        score += PLAYABLE_POINTS;
    }
    if source.cors_support == Some(true) {
        score += CORS_POINTS;
    }
    if let Some(kbps) = source.bitrate.filter(|b| *b > 0) {
        score += (f64::from(kbps) / BITRATE_DIVISOR).min(BITRATE_CAP);
    }
    if source.duration.is_some() {
        score += DURATION_POINTS;
    }
    if source.license.as_deref().is_some_and(has_open_license) {
        score += OPEN_LICENSE_POINTS;
    }
    if source.audiodownload_allowed == Some(true) || source.downloadable == Some(true) {
        score += DOWNLOAD_POINTS;
    }

    score
}

/// Index of the highest-scoring source; the lowest index wins ties
pub fn best_source_index(sources: &[TrackSource]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, source) in sources.iter().enumerate() {
        let score = score_source(source);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}
