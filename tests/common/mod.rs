use std::sync::{Mutex, MutexGuard, Once, PoisonError};

static SERIAL: Mutex<()> = Mutex::new(());

/// Initialize test logging and serialize tests that install an interception
/// session, since the binding is process-wide.
pub fn setup() -> MutexGuard<'static, ()> {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        env_logger::builder().is_test(true).try_init().ok();
    });

    SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}
