//! Manipulation and boundary tripwires.
//!
//! Unlike the risk scorer these checks carry no weights and no context:
//! a tripwire either fires or it does not, at every safety level.

use regex::Regex;
use tracing::debug;

/// Detects prompt-injection style manipulation of the assistant.
///
/// Fires on phrases meaning "ignore prior instructions", "you are now a
/// different entity", "pretend/act/roleplay as", jailbreak vocabulary,
/// and explicit prompt-injection mentions.
#[derive(Debug)]
pub struct ManipulationDetector {
    patterns: Vec<Regex>,
}

impl ManipulationDetector {
    pub fn new() -> Self {
        let sources = [
            r"(?i)(ignore|disregard|forget)\s+(all\s+)?(previous|prior|earlier|above|your)\s+(instructions?|prompts?|rules?|guidelines?|training)",
            r"(?i)you\s+are\s+(now|no\s+longer)\s+(a|an|the)?\s*\w+",
            r"(?i)(pretend|act|roleplay|imagine)\s+(to\s+be|as|you('re|\s+are))",
            r"(?i)jailbreak|jailbroken",
            r"(?i)prompt\s+injection",
        ];
        Self {
            patterns: compile(&sources),
        }
    }

    /// Returns true if any manipulation pattern matches.
    pub fn detect(&self, prompt: &str) -> bool {
        let hit = self.patterns.iter().any(|p| p.is_match(prompt));
        if hit {
            debug!("Manipulation tripwire fired");
        }
        hit
    }
}

impl Default for ManipulationDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detects requests outside a coach's professional boundaries.
///
/// Fires on requests for private data about other people, medical
/// diagnosis, legal counsel, financial/investment advice, and
/// relationship advice targeting a third party.
#[derive(Debug)]
pub struct BoundaryDetector {
    patterns: Vec<Regex>,
}

impl BoundaryDetector {
    pub fn new() -> Self {
        let sources = [
            r"(?i)(tell|give|find|get)\s+me\s+(their|his|her|someone'?s)\s+(address|phone\s+number|email|password|location|personal\s+(data|information))",
            r"(?i)(diagnose\s+(me|my)|what\s+(illness|disease|condition)\s+do\s+i\s+have|prescribe\s+me|medical\s+diagnosis)",
            r"(?i)(legal\s+advice|should\s+i\s+sue|represent\s+me\s+in\s+court|draft\s+(me\s+)?a\s+contract)",
            r"(?i)(investment\s+advice|which\s+stocks?\s+(to|should\s+i)\s+buy|financial\s+advice|guaranteed\s+returns?)",
            r"(?i)(how\s+(do|can)\s+i\s+(get|make|win))\s+(him|her|them|my\s+ex)\s+(back|to\s+love)",
        ];
        Self {
            patterns: compile(&sources),
        }
    }

    /// Returns true if any boundary pattern matches.
    pub fn detect(&self, prompt: &str) -> bool {
        let hit = self.patterns.iter().any(|p| p.is_match(prompt));
        if hit {
            debug!("Boundary tripwire fired");
        }
        hit
    }
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .filter_map(|source| match Regex::new(source) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping detector pattern");
                None
            }
        })
        .collect()
}
