//! Relationship tone — maps a signed relationship score to how the agent
//! feels about the sender and how it should act on that.
//!
//! | Score | Tone |
//! |-------|------|
//! | `> 100` | Devoted |
//! | `> 30` | Friendly |
//! | `< -20` | Hostile |
//! | otherwise | Neutral |

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Devoted,
    Friendly,
    Hostile,
    Neutral,
}

impl Tone {
    /// Tier for a relationship score. NaN falls through to Neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 100.0 {
            Self::Devoted
        } else if score > 30.0 {
            Self::Friendly
        } else if score < -20.0 {
            Self::Hostile
        } else {
            Self::Neutral
        }
    }

    /// How the agent relates to the sender.
    pub fn relation(&self) -> &'static str {
        match self {
            Self::Devoted => "关系特别特别好，你很喜欢他",
            Self::Friendly => "关系不错，比较友好",
            Self::Hostile => "关系很差，你很讨厌他",
            Self::Neutral => "关系一般",
        }
    }

    /// What the agent wants to do about the message.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Devoted => "热情地发言或者回复",
            Self::Friendly => "友好地发言",
            Self::Hostile => "骂他",
            Self::Neutral => "发言或者回复",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn representative_scores() {
        assert_eq!(Tone::from_score(150.0), Tone::Devoted);
        assert_eq!(Tone::from_score(50.0), Tone::Friendly);
        assert_eq!(Tone::from_score(-30.0), Tone::Hostile);
        assert_eq!(Tone::from_score(0.0), Tone::Neutral);
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert_eq!(Tone::from_score(100.0), Tone::Friendly);
        assert_eq!(Tone::from_score(100.001), Tone::Devoted);
        assert_eq!(Tone::from_score(30.0), Tone::Neutral);
        assert_eq!(Tone::from_score(-20.0), Tone::Neutral);
        assert_eq!(Tone::from_score(-20.001), Tone::Hostile);
    }

    #[test]
    fn every_score_maps_to_a_tier() {
        for score in (-500..=500).map(|s| s as f64 * 0.5) {
            let tone = Tone::from_score(score);
            assert!(!tone.relation().is_empty());
            assert!(!tone.directive().is_empty());
        }
        assert_eq!(Tone::from_score(f64::NAN), Tone::Neutral);
        assert_eq!(Tone::from_score(f64::INFINITY), Tone::Devoted);
        assert_eq!(Tone::from_score(f64::NEG_INFINITY), Tone::Hostile);
    }

    #[test]
    fn tiers_have_distinct_directives() {
        let tiers = [Tone::Devoted, Tone::Friendly, Tone::Hostile, Tone::Neutral];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(a.directive(), b.directive());
                assert_ne!(a.relation(), b.relation());
            }
        }
    }
}
