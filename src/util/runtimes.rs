use tokio::runtime::{Builder, Runtime};

use dosetup_schema::{DsResult, ErrorInfoContext};

/// Every step of a command is awaited in sequence, so one thread is enough.
pub fn build_simple_runtime(name: impl Into<String>) -> DsResult<Runtime> {
    Builder::new_current_thread()
        .thread_name(name)
        .enable_all()
        .build()
        .error_info("Failed to build tokio runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_drives_timers() {
        let rt = build_simple_runtime("dosetup-test").unwrap();
        let v = rt.block_on(async {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
            7
        });
        assert_eq!(v, 7);
    }
}
