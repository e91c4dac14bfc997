use std::time::Duration;
use std::thread;
use log::info;

/// Block the current request before retrying a rate-limited call.
pub fn rate_limit_delay(user_id: u64, delay: Duration) {
    info!("Rate limited for user {}, waiting {} seconds...", user_id, delay.as_secs_f32());
    thread::sleep(delay);
}
