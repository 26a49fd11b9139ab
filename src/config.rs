use std::{env, net::SocketAddr};

use anyhow::Result;

use crate::filters::FilterSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub session_idle_seconds: u64,
    pub session_capacity: usize,
    pub default_filters: FilterSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_idle_seconds: 60 * 60,
            session_capacity: 256,
            default_filters: FilterSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let bind_raw =
            env::var("FAMILY_MAP_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let bind_addr = parse_bind_addr(&bind_raw).unwrap_or(defaults.bind_addr);

        let session_idle_seconds = env::var("FAMILY_MAP_SESSION_IDLE_SECONDS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(defaults.session_idle_seconds);

        let session_capacity = env::var("FAMILY_MAP_SESSION_CAPACITY")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(defaults.session_capacity);

        Ok(Self {
            bind_addr,
            session_idle_seconds,
            session_capacity,
            default_filters: FilterSettings::from_env(),
        })
    }
}

fn parse_bind_addr(raw: &str) -> Option<SocketAddr> {
    raw.trim()
        .trim_matches('"')
        .trim_matches('\'')
        .parse::<SocketAddr>()
        .ok()
}
