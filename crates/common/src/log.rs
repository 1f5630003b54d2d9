use std::sync::Once;
use crate::trace_setup::init_tracing;

static INIT: Once = Once::new();

/// Setup function that is only run once, even if called multiple times.
pub fn init_logger_main(log_level: String) {
    INIT.call_once(|| {
        init_tracing(&log_level);
    });
}
