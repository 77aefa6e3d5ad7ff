//! Robots.txt summary parser
//!
//! Only full-site blocks (`Disallow: /`) are tracked. The scan keeps a single
//! "current user-agent": each `Disallow: /` applies to whichever agent was
//! declared most recently, the wildcard `*` included.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Crawlers reported on, as (display name, lowercase agent tokens)
pub const TRACKED_BOTS: &[(&str, &[&str])] = &[
    ("GPTBot", &["gptbot"]),
    ("ClaudeBot", &["claudebot", "claude-web"]),
    ("Bingbot", &["bingbot"]),
    ("Googlebot", &["googlebot"]),
];

/// What a site's robots.txt says about the tracked crawlers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsSummary {
    /// Whether robots.txt was fetched successfully
    pub exists: bool,

    /// Raw file content (empty when missing)
    pub raw: String,

    #[serde(rename = "blocksGPTBot")]
    pub blocks_gpt_bot: bool,

    #[serde(rename = "blocksClaudeBot")]
    pub blocks_claude_bot: bool,

    #[serde(rename = "blocksBingbot")]
    pub blocks_bingbot: bool,

    #[serde(rename = "blocksGooglebot")]
    pub blocks_googlebot: bool,

    /// Display names of every blocked tracked crawler
    #[serde(rename = "blockedBots")]
    pub blocked_bots: Vec<String>,
}

impl RobotsSummary {
    /// Summary for a site without a usable robots.txt
    pub fn missing() -> Self {
        Self::default()
    }

    /// Returns true if the named tracked bot is blocked
    pub fn blocks(&self, bot: &str) -> bool {
        self.blocked_bots.iter().any(|b| b.eq_ignore_ascii_case(bot))
    }
}

/// Parses robots.txt content into a summary
///
/// A bot is blocked if its own group or the wildcard group disallows `/`.
///
/// # Example
///
/// ```
/// use ranksight::robots::parse_robots;
///
/// let summary = parse_robots("User-agent: GPTBot\nDisallow: /\n");
/// assert!(summary.blocks_gpt_bot);
/// assert!(!summary.blocks_googlebot);
/// ```
pub fn parse_robots(content: &str) -> RobotsSummary {
    let mut blocked_agents: HashSet<String> = HashSet::new();
    let mut current_agent = String::new();

    for line in content.lines() {
        // Drop trailing comments
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => current_agent = value.to_ascii_lowercase(),
            "disallow" if value == "/" => {
                blocked_agents.insert(current_agent.clone());
            }
            _ => {}
        }
    }

    let wildcard = blocked_agents.contains("*");
    let is_blocked = |aliases: &[&str]| {
        wildcard || aliases.iter().any(|alias| blocked_agents.contains(*alias))
    };

    let blocked_bots: Vec<String> = TRACKED_BOTS
        .iter()
        .filter(|entry| is_blocked(entry.1))
        .map(|entry| entry.0.to_string())
        .collect();

    RobotsSummary {
        exists: true,
        raw: content.to_string(),
        blocks_gpt_bot: is_blocked(TRACKED_BOTS[0].1),
        blocks_claude_bot: is_blocked(TRACKED_BOTS[1].1),
        blocks_bingbot: is_blocked(TRACKED_BOTS[2].1),
        blocks_googlebot: is_blocked(TRACKED_BOTS[3].1),
        blocked_bots,
    }
}
