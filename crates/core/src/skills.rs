//! Canonical skill enumeration, content-tag mapping and learning tracks.
//!
//! The skill set is closed: every rating, placement score and drill target
//! is keyed by [`Skill`], and free-form catalog tags are translated into it
//! exclusively through [`skills_for_tags`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

/// One of the fixed practice skills.
///
/// Declaration order is significant: it is the tie-break order wherever
/// skills with equal ratings have to be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    GenerativeAi,
    AgenticAi,
    SyntheticAi,
    Coding,
    AgiReadiness,
    Communication,
    Logic,
    Planning,
    Analysis,
    Creativity,
    Collaboration,
}

impl Skill {
    /// Every skill, in declaration order.
    pub const ALL: [Skill; 11] = [
        Skill::GenerativeAi,
        Skill::AgenticAi,
        Skill::SyntheticAi,
        Skill::Coding,
        Skill::AgiReadiness,
        Skill::Communication,
        Skill::Logic,
        Skill::Planning,
        Skill::Analysis,
        Skill::Creativity,
        Skill::Collaboration,
    ];

    /// Stable identifier used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::GenerativeAi => "generative_ai",
            Skill::AgenticAi => "agentic_ai",
            Skill::SyntheticAi => "synthetic_ai",
            Skill::Coding => "coding",
            Skill::AgiReadiness => "agi_readiness",
            Skill::Communication => "communication",
            Skill::Logic => "logic",
            Skill::Planning => "planning",
            Skill::Analysis => "analysis",
            Skill::Creativity => "creativity",
            Skill::Collaboration => "collaboration",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .into_iter()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown skill '{s}'")))
    }
}

/// The skills exercised by the placement test, two items each.
pub const MAJOR_SKILLS: [Skill; 6] = [
    Skill::GenerativeAi,
    Skill::AgenticAi,
    Skill::Coding,
    Skill::Communication,
    Skill::Logic,
    Skill::Creativity,
];

// ---------------------------------------------------------------------------
// Tag mapping
// ---------------------------------------------------------------------------

/// Normalized tag keyword -> skill.
const TAG_KEYWORDS: &[(&str, Skill)] = &[
    ("generative-ai", Skill::GenerativeAi),
    ("generative", Skill::GenerativeAi),
    ("genai", Skill::GenerativeAi),
    ("llm", Skill::GenerativeAi),
    ("prompt", Skill::GenerativeAi),
    ("prompting", Skill::GenerativeAi),
    ("diffusion", Skill::GenerativeAi),
    ("agentic-ai", Skill::AgenticAi),
    ("agentic", Skill::AgenticAi),
    ("agent", Skill::AgenticAi),
    ("agents", Skill::AgenticAi),
    ("tool-use", Skill::AgenticAi),
    ("autonomous", Skill::AgenticAi),
    ("synthetic-ai", Skill::SyntheticAi),
    ("synthetic", Skill::SyntheticAi),
    ("simulation", Skill::SyntheticAi),
    ("coding", Skill::Coding),
    ("code", Skill::Coding),
    ("programming", Skill::Coding),
    ("debugging", Skill::Coding),
    ("python", Skill::Coding),
    ("javascript", Skill::Coding),
    ("agi-readiness", Skill::AgiReadiness),
    ("agi", Skill::AgiReadiness),
    ("alignment", Skill::AgiReadiness),
    ("safety", Skill::AgiReadiness),
    ("ethics", Skill::AgiReadiness),
    ("communication", Skill::Communication),
    ("writing", Skill::Communication),
    ("presentation", Skill::Communication),
    ("storytelling", Skill::Communication),
    ("logic", Skill::Logic),
    ("reasoning", Skill::Logic),
    ("puzzle", Skill::Logic),
    ("math", Skill::Logic),
    ("planning", Skill::Planning),
    ("strategy", Skill::Planning),
    ("roadmap", Skill::Planning),
    ("analysis", Skill::Analysis),
    ("analytics", Skill::Analysis),
    ("data", Skill::Analysis),
    ("research", Skill::Analysis),
    ("creativity", Skill::Creativity),
    ("creative", Skill::Creativity),
    ("design", Skill::Creativity),
    ("brainstorming", Skill::Creativity),
    ("ideation", Skill::Creativity),
    ("collaboration", Skill::Collaboration),
    ("teamwork", Skill::Collaboration),
    ("team", Skill::Collaboration),
    ("leadership", Skill::Collaboration),
];

/// Lowercase, trim and fold `_` / whitespace into `-`.
fn normalize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn lookup(keyword: &str) -> Option<Skill> {
    TAG_KEYWORDS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, skill)| *skill)
}

/// Map one free-form content tag onto the skill set.
///
/// The whole normalized tag is tried first (`"Tool Use"` -> agentic). If it
/// has no entry, each `-`-separated word is tried on its own so compound
/// tags such as `"prompt-engineering"` still resolve.
pub fn skills_for_tag(tag: &str) -> BTreeSet<Skill> {
    let normalized = normalize_tag(tag);
    if let Some(skill) = lookup(&normalized) {
        return BTreeSet::from([skill]);
    }
    normalized.split('-').filter_map(lookup).collect()
}

/// Union of [`skills_for_tag`] over all tags of an item.
pub fn skills_for_tags<S: AsRef<str>>(tags: &[S]) -> BTreeSet<Skill> {
    tags.iter()
        .flat_map(|tag| skills_for_tag(tag.as_ref()))
        .collect()
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// Coarse learning track recommended after placement.
///
/// Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Content,
    Builder,
    Strategist,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Content, Track::Builder, Track::Strategist];

    pub fn as_str(self) -> &'static str {
        match self {
            Track::Content => "content",
            Track::Builder => "builder",
            Track::Strategist => "strategist",
        }
    }

    /// Skills whose ratings are summed into this track's composite score.
    pub fn composite_skills(self) -> &'static [Skill] {
        match self {
            Track::Content => &[Skill::GenerativeAi, Skill::Creativity, Skill::Communication],
            Track::Builder => &[Skill::Coding, Skill::AgenticAi, Skill::Logic],
            Track::Strategist => &[Skill::Logic, Skill::Communication, Skill::AgenticAi],
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Track {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Track::ALL
            .into_iter()
            .find(|track| track.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown track '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_ids_round_trip_through_from_str() {
        for skill in Skill::ALL {
            assert_eq!(skill.as_str().parse::<Skill>().unwrap(), skill);
        }
    }

    #[test]
    fn unknown_skill_is_rejected() {
        assert!("juggling".parse::<Skill>().is_err());
        assert!("".parse::<Skill>().is_err());
    }

    #[test]
    fn skill_serializes_as_snake_case_id() {
        let json = serde_json::to_string(&Skill::AgiReadiness).unwrap();
        assert_eq!(json, "\"agi_readiness\"");
    }

    #[test]
    fn major_skills_are_distinct() {
        let unique: BTreeSet<_> = MAJOR_SKILLS.iter().collect();
        assert_eq!(unique.len(), MAJOR_SKILLS.len());
    }

    #[test]
    fn canonical_skill_ids_map_to_themselves() {
        for skill in Skill::ALL {
            assert_eq!(skills_for_tag(skill.as_str()), BTreeSet::from([skill]));
        }
    }

    #[test]
    fn tag_mapping_normalizes_case_and_separators() {
        assert_eq!(skills_for_tag("  Tool Use "), BTreeSet::from([Skill::AgenticAi]));
        assert_eq!(skills_for_tag("GENERATIVE_AI"), BTreeSet::from([Skill::GenerativeAi]));
    }

    #[test]
    fn compound_tag_falls_back_to_words() {
        assert_eq!(
            skills_for_tag("prompt-engineering"),
            BTreeSet::from([Skill::GenerativeAi])
        );
        assert_eq!(
            skills_for_tag("data storytelling"),
            BTreeSet::from([Skill::Analysis, Skill::Communication])
        );
    }

    #[test]
    fn unmapped_tag_yields_empty_set() {
        assert!(skills_for_tag("gardening").is_empty());
        assert!(skills_for_tag("").is_empty());
    }

    #[test]
    fn tags_union_across_item() {
        let tags = vec!["python".to_string(), "teamwork".to_string(), "misc".to_string()];
        assert_eq!(
            skills_for_tags(&tags),
            BTreeSet::from([Skill::Coding, Skill::Collaboration])
        );
    }

    #[test]
    fn track_composites_use_major_skills_only() {
        for track in Track::ALL {
            for skill in track.composite_skills() {
                assert!(MAJOR_SKILLS.contains(skill), "{track} uses non-major {skill}");
            }
        }
    }
}
