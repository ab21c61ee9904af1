#![no_main]

use chrono::{Duration, TimeZone, Utc};
use gamesdk_core::use_cases::{parse_token_response, token_expiry};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Decoding may fail on arbitrary input, but must never panic,
    // and neither may the expiry arithmetic on whatever it yields.
    if let Ok(token) = parse_token_response(data) {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let _ = token_expiry(now, token.expires_in, Duration::seconds(10));
        let _ = token_expiry(now, token.expires_in, Duration::zero());
    }
});
