//! Simulated analysis used when no inference backend is wired up.
//!
//! Scores are drawn uniformly from [`SCORE_RANGE`]; anything above
//! [`DEEPFAKE_THRESHOLD`] is reported as a deepfake. This is a stand-in contract
//! for existing callers, not a detector.

use std::ops::Range;

use rand::Rng;

use crate::models::{AnalysisResult, Verdict};

/// Half-open range of fabricated confidence scores.
pub const SCORE_RANGE: Range<u32> = 70..100;

/// Scores strictly above this are classified as deepfakes.
pub const DEEPFAKE_THRESHOLD: u32 = 80;

/// Maps a score to its verdict.
pub fn classify(score: u32) -> Verdict {
    if score > DEEPFAKE_THRESHOLD {
        Verdict::Deepfake
    } else {
        Verdict::Real
    }
}

fn reason_for(verdict: Verdict, score: u32) -> String {
    match verdict {
        Verdict::Deepfake => format!(
            "Detected facial inconsistencies and unnatural frame transitions ({score}% confidence)."
        ),
        Verdict::Real => format!(
            "No significant manipulation artifacts detected ({score}% confidence)."
        ),
    }
}

/// Fabricates an [`AnalysisResult`] for an upload of `size_bytes`.
pub fn simulate<R: Rng + ?Sized>(rng: &mut R, size_bytes: u64) -> AnalysisResult {
    let score = rng.random_range(SCORE_RANGE);
    let verdict = classify(score);

    tracing::debug!(score, %verdict, size_bytes, "simulated analysis");

    AnalysisResult {
        success: true,
        verdict,
        confidence: Some(score),
        reason: reason_for(verdict, score),
        size_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(classify(70), Verdict::Real);
        assert_eq!(classify(80), Verdict::Real);
        assert_eq!(classify(81), Verdict::Deepfake);
        assert_eq!(classify(99), Verdict::Deepfake);
    }

    #[test]
    fn scores_stay_in_range_and_match_verdict() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let result = simulate(&mut rng, 42);
            let score = result.confidence.unwrap();
            assert!(SCORE_RANGE.contains(&score), "score {score} out of range");
            assert_eq!(result.verdict == Verdict::Deepfake, score > DEEPFAKE_THRESHOLD);
            assert!(result.success);
            assert_eq!(result.size_bytes, 42);
            assert!(result.reason.contains(&score.to_string()));
        }
    }
}
