//! Runs in its own test binary: `EventLogger::init` installs the process-wide
//! subscriber, which would collide with `#[traced_test]` in the unit tests.

use qnet_telemetry::EventLogger;

#[test]
fn test_init_twice_is_harmless() {
    EventLogger::init();
    EventLogger::init();
}
