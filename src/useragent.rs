//! Randomized user-agent selection
//!
//! One realistic browser user-agent string is drawn uniformly at random when a
//! client is constructed and then reused for that client's default header set.

use rand::seq::SliceRandom;

/// Fixed table of realistic browser user-agent strings
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.53 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.114 Safari/537.36 Edg/103.0.1264.62",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.5060.134 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.5 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36",
];

/// Pick one user-agent string uniformly at random
pub fn random_useragent() -> &'static str {
    let mut rng = rand::thread_rng();
    // The table is a non-empty constant, so choose() cannot return None
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}
