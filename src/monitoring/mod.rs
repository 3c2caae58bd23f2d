/*!
 * Monitoring
 * Structured log output for scheduling decisions
 */

mod tracer;

pub use tracer::{init_tracing, ENV_TRACE_JSON};
