//! Query and pool metrics.
//!
//! Repositories wrap each statement in a [`QueryTimer`]; the health endpoint
//! samples the pool gauges on every probe.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

pub const QUERY_DURATION_METRIC: &str = "database_query_duration_seconds";

/// Times one repository statement under a fixed label.
///
/// ```ignore
/// let timer = QueryTimer::new("find_profile_by_id");
/// let result = sqlx::query_as::<_, ProfileEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
#[derive(Debug)]
pub struct QueryTimer {
    label: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            started: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Records the elapsed time, whether or not the statement succeeded.
    pub fn record(self) {
        histogram!(QUERY_DURATION_METRIC, "query" => self.label)
            .record(self.started.elapsed().as_secs_f64());
    }
}

/// Publishes pool occupancy gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_total").set(size as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
}
