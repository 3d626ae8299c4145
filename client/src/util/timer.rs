//! Host timer used to bound session rehydration.

use std::future::Future;
use std::time::Duration;

/// Future that completes after `timeout` in the browser. Native builds have
/// no event loop timer here, so the deadline never fires.
pub fn deadline(timeout: Duration) -> impl Future<Output = ()> {
    #[cfg(feature = "csr")]
    {
        gloo_timers::future::sleep(timeout)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = timeout;
        std::future::pending::<()>()
    }
}
