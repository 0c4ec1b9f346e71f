//! Process configuration, read once at startup from environment variables.
//! `std::env::var(...)` with `.unwrap_or_else(...)` defaults and a
//! `.parse().expect(...)`; no config file, no CLI flags.

use itinerary_engine::graph::TransferPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub schedule_path: String,
    pub transfer_policy: TransferPolicy,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Config {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_owned())
            .parse()
            .expect("PORT must be a valid u16");
        let schedule_path =
            std::env::var("SCHEDULE_PATH").unwrap_or_else(|_| "schedule.json".to_owned());
        let min_connect_minutes = std::env::var("MIN_CONNECT_MINUTES")
            .unwrap_or_else(|_| "1".to_owned())
            .parse()
            .expect("MIN_CONNECT_MINUTES must be a valid u16");
        let max_wait_minutes = std::env::var("MAX_WAIT_MINUTES")
            .unwrap_or_else(|_| "60".to_owned())
            .parse()
            .expect("MAX_WAIT_MINUTES must be a valid u16");
        let request_timeout_secs = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_owned())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Config {
            port,
            schedule_path,
            transfer_policy: TransferPolicy {
                min_connect_minutes,
                max_wait_minutes,
            },
            request_timeout_secs,
        }
    }
}
