//! Persona and style selection.
//!
//! Each prompt build draws one persona variant from a weighted discrete
//! distribution and, independently, a handful of optional style modifiers.
//! The persona weights partition [0, 1), so every draw maps to exactly one
//! variant.

use chirp_core::error::Error;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The persona variants the agent can adopt for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Laid-back, plain replies
    Primary,
    /// Opinionated, argues its own view
    Alternate,
}

/// Probability mass of each variant. Sums to 1.
pub const PERSONA_WEIGHTS: [(Persona, f64); 2] = [
    (Persona::Primary, 4.0 / 6.0),
    (Persona::Alternate, 2.0 / 6.0),
];

impl Persona {
    /// Map a uniform draw in [0, 1) onto the weighted variants.
    pub fn from_draw(u: f64) -> Self {
        let mut cumulative = 0.0;
        for (persona, weight) in PERSONA_WEIGHTS {
            cumulative += weight;
            if u < cumulative {
                return persona;
            }
        }
        // Only reachable through float rounding at the top of the range.
        PERSONA_WEIGHTS[PERSONA_WEIGHTS.len() - 1].0
    }

    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_draw(rng.random::<f64>())
    }

    /// Position of this variant's descriptor in the configured persona list.
    pub fn index(&self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Alternate => 1,
        }
    }
}

/// Nickname plus one descriptor per persona variant.
#[derive(Debug, Clone)]
pub struct PersonaProfile {
    nickname: String,
    descriptors: [String; 2],
}

impl PersonaProfile {
    /// Fails when fewer than two descriptors are configured.
    pub fn new(nickname: impl Into<String>, descriptors: &[String]) -> Result<Self, Error> {
        match descriptors {
            [primary, alternate, ..] => Ok(Self {
                nickname: nickname.into(),
                descriptors: [primary.clone(), alternate.clone()],
            }),
            _ => Err(Error::Config {
                message: format!(
                    "persona profile needs 2 descriptors, got {}",
                    descriptors.len()
                ),
            }),
        }
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn descriptor(&self, persona: Persona) -> &str {
        &self.descriptors[persona.index()]
    }

    /// Opening shared by every persona clause: nickname, then descriptor.
    pub fn introduction(&self, persona: Persona) -> String {
        format!("你的网名叫{}，{}", self.nickname, self.descriptor(persona))
    }
}

/// Optional stylistic quirks, each triggered by its own coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleModifier {
    InvertedSentences,
    RhetoricalQuestions,
    ArchaicPhrasing,
}

impl StyleModifier {
    pub const ALL: [StyleModifier; 3] = [
        StyleModifier::InvertedSentences,
        StyleModifier::RhetoricalQuestions,
        StyleModifier::ArchaicPhrasing,
    ];

    pub fn probability(&self) -> f64 {
        match self {
            Self::InvertedSentences => 0.04,
            Self::RhetoricalQuestions => 0.02,
            Self::ArchaicPhrasing => 0.01,
        }
    }

    pub fn directive(&self) -> &'static str {
        match self {
            Self::InvertedSentences => "你喜欢用倒装句",
            Self::RhetoricalQuestions => "你喜欢用反问句",
            Self::ArchaicPhrasing => "你喜欢用文言文",
        }
    }

    /// One independent Bernoulli trial per modifier, in declaration order.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Vec<StyleModifier> {
        Self::ALL
            .into_iter()
            .filter(|m| rng.random_bool(m.probability()))
            .collect()
    }

    /// Concatenated directives of the triggered modifiers.
    pub fn render(modifiers: &[StyleModifier]) -> String {
        modifiers
            .iter()
            .map(|m| m.directive())
            .collect::<Vec<_>>()
            .join("，")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn weights_partition_unit_interval() {
        let total: f64 = PERSONA_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn draw_boundaries() {
        assert_eq!(Persona::from_draw(0.0), Persona::Primary);
        assert_eq!(Persona::from_draw(0.66), Persona::Primary);
        assert_eq!(Persona::from_draw(4.0 / 6.0), Persona::Alternate);
        assert_eq!(Persona::from_draw(0.999_999_999), Persona::Alternate);
    }

    #[test]
    fn primary_frequency_converges() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 60_000;
        let primary = (0..n)
            .filter(|_| Persona::choose(&mut rng) == Persona::Primary)
            .count();
        let freq = primary as f64 / n as f64;
        // 4/6 ± ~5 standard errors
        assert!((freq - 4.0 / 6.0).abs() < 0.01, "frequency was {freq}");
    }

    #[test]
    fn profile_requires_two_descriptors() {
        let err = PersonaProfile::new("小啾", &["only".to_string()]).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(PersonaProfile::new("小啾", &[]).is_err());
    }

    #[test]
    fn profile_picks_descriptor_by_variant() {
        let profile =
            PersonaProfile::new("小啾", &["温和".to_string(), "毒舌".to_string()]).unwrap();
        assert_eq!(profile.descriptor(Persona::Primary), "温和");
        assert_eq!(profile.descriptor(Persona::Alternate), "毒舌");
        assert_eq!(profile.introduction(Persona::Alternate), "你的网名叫小啾，毒舌");
    }

    #[test]
    fn style_frequencies_track_probabilities() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            for m in StyleModifier::draw(&mut rng) {
                counts[StyleModifier::ALL.iter().position(|x| *x == m).unwrap()] += 1;
            }
        }
        for (i, m) in StyleModifier::ALL.iter().enumerate() {
            let freq = counts[i] as f64 / n as f64;
            assert!((freq - m.probability()).abs() < 0.005, "{m:?} was {freq}");
        }
    }

    #[test]
    fn render_joins_directives() {
        let text = StyleModifier::render(&[
            StyleModifier::InvertedSentences,
            StyleModifier::ArchaicPhrasing,
        ]);
        assert_eq!(text, "你喜欢用倒装句，你喜欢用文言文");
        assert!(StyleModifier::render(&[]).is_empty());
    }
}
