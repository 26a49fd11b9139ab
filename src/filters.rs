use std::env;

use serde::{Deserialize, Serialize};

/// User-toggled map filters. Every option defaults to enabled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    #[serde(default = "enabled")]
    pub show_mother_side: bool,
    #[serde(default = "enabled")]
    pub show_father_side: bool,
    #[serde(default = "enabled")]
    pub show_male_events: bool,
    #[serde(default = "enabled")]
    pub show_female_events: bool,
    #[serde(default = "enabled")]
    pub show_spouse_line: bool,
    #[serde(default = "enabled")]
    pub show_ancestor_lines: bool,
    #[serde(default = "enabled")]
    pub show_life_story_line: bool,
}

fn enabled() -> bool {
    true
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            show_mother_side: true,
            show_father_side: true,
            show_male_events: true,
            show_female_events: true,
            show_spouse_line: true,
            show_ancestor_lines: true,
            show_life_story_line: true,
        }
    }
}

impl FilterSettings {
    /// Initial filters for new sessions, overridable per option.
    pub fn from_env() -> Self {
        Self {
            show_mother_side: env_flag("FAMILY_MAP_SHOW_MOTHER_SIDE"),
            show_father_side: env_flag("FAMILY_MAP_SHOW_FATHER_SIDE"),
            show_male_events: env_flag("FAMILY_MAP_SHOW_MALE_EVENTS"),
            show_female_events: env_flag("FAMILY_MAP_SHOW_FEMALE_EVENTS"),
            show_spouse_line: env_flag("FAMILY_MAP_SHOW_SPOUSE_LINE"),
            show_ancestor_lines: env_flag("FAMILY_MAP_SHOW_ANCESTOR_LINES"),
            show_life_story_line: env_flag("FAMILY_MAP_SHOW_LIFE_STORY_LINE"),
        }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| parse_flag(&v))
        .unwrap_or(true)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
