//! HTTP middleware components.

pub mod access_gate;
pub mod logging;
pub mod metrics;
pub mod rate_limit;
pub mod trace_id;
pub mod user_auth;

pub use access_gate::{require_page_access, GateArea};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
pub use user_auth::require_user_auth;
