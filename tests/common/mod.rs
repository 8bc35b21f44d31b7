//! Common test utilities

use brandpulse::models::{Mention, Sentiment};
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Midnight UTC on the day every fixture is anchored to
#[allow(dead_code)]
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// Time `hour` hours and `minute` minutes after [`base_time`]
#[allow(dead_code)]
pub fn at(hour: i64, minute: i64) -> DateTime<Utc> {
    base_time() + Duration::hours(hour) + Duration::minutes(minute)
}

/// Create a test mention
pub fn mention(id: &str, text: &str, sentiment: Sentiment, ts: Option<DateTime<Utc>>) -> Mention {
    Mention::new(id, text, sentiment, "reddit", ts)
}

/// Sixteen quiet hours followed by a burst of complaints
///
/// - hours 0..16: one positive mention each
/// - hour 20: twelve negative mentions, the first four with identical text
#[allow(dead_code)]
pub fn spike_scenario() -> Vec<Mention> {
    let mut mentions: Vec<Mention> = (0..16)
        .map(|h| {
            mention(
                &format!("bg-{h}"),
                &format!("Loving the battery life, day {h}"),
                Sentiment::Positive,
                Some(at(h, 0)),
            )
        })
        .collect();

    mentions.extend((0..12).map(|i| {
        let text = if i < 4 {
            "The screen cracked overnight".to_string()
        } else {
            format!("Strap snapped during run {i}")
        };
        mention(&format!("spike-{i}"), &text, Sentiment::Negative, Some(at(20, i)))
    }));

    mentions
}

/// `n` copies of the same text, ids prefixed with `prefix`
#[allow(dead_code)]
pub fn repeated(prefix: &str, text: &str, sentiment: Sentiment, n: usize) -> Vec<Mention> {
    (0..n)
        .map(|i| mention(&format!("{prefix}-{i}"), text, sentiment, None))
        .collect()
}
