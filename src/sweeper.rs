use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::time;
use tracing::{debug, info};

use crate::AppState;

pub fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = evict_idle_sessions(&state).await;
            if evicted > 0 {
                debug!(evicted, "Session sweep finished");
            }
        }
    });
}

/// Drops sessions idle for longer than the configured limit. Returns how many
/// were evicted.
pub async fn evict_idle_sessions(state: &AppState) -> usize {
    let idle_seconds = state.config.session_idle_seconds.min(u64::from(u32::MAX));
    let idle_limit = ChronoDuration::seconds(idle_seconds as i64);
    let now = Utc::now();

    let expired = {
        let mut sessions = state.sessions.write().await;
        let stale: Vec<String> = sessions
            .values()
            .filter(|record| now - record.last_access_at() > idle_limit)
            .map(|record| record.session_id.clone())
            .collect();
        stale
            .into_iter()
            .filter_map(|id| sessions.remove(&id))
            .collect::<Vec<_>>()
    };

    let count = expired.len();
    for record in expired {
        info!(session_id = %record.session_id, "Expiring idle session");
        record.session.clear();
    }
    count
}
