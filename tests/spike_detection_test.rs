//! Spike detection over realistic batches

mod common;

use brandpulse::analytics::{
    detect_spikes, detect_trending_topics, AlertSeverity, AlertType, Increase, SpikeDetector,
};
use brandpulse::config::Config;
use brandpulse::models::Sentiment;
use common::{at, mention, spike_scenario};

#[test]
fn test_burst_of_complaints_raises_three_alerts() {
    let report = detect_spikes(&spike_scenario());

    assert!(report.has_spikes);
    assert_eq!(report.summary, "Found 2 critical and 1 warning alerts");
    assert_eq!(report.hours().len(), 17);
    assert_eq!(report.count_severity(AlertSeverity::Critical), 2);
    assert_eq!(report.count_severity(AlertSeverity::Warning), 1);

    let kinds: Vec<(AlertType, AlertSeverity)> = report
        .alerts
        .iter()
        .map(|a| (a.alert_type, a.severity))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (AlertType::Volume, AlertSeverity::Critical),
            (AlertType::NegativeSentiment, AlertSeverity::Critical),
            (AlertType::SentimentDrop, AlertSeverity::Warning),
        ]
    );
}

#[test]
fn test_volume_alert_details() {
    let report = detect_spikes(&spike_scenario());
    let volume = &report.alerts[0];

    // mean = 28 / 17, increase = 12 * 17 / 28 - 1 = 628.6%
    assert_eq!(volume.message, "629% spike in mentions (12 vs avg 2)");
    assert_eq!(volume.increase, Some(Increase::Percent(629)));
    assert_eq!(volume.value, 12.0);
    assert_eq!(volume.baseline, 2.0);
    assert_eq!(volume.timestamp, Some(at(20, 0)));

    // Four identical texts collapse to one
    assert_eq!(volume.affected_mentions.len(), 9);
    assert_eq!(volume.affected_mentions[0].id, "spike-0");
    assert_eq!(volume.affected_mentions[1].id, "spike-4");
}

#[test]
fn test_sentiment_alert_details() {
    let report = detect_spikes(&spike_scenario());

    let negative = &report.alerts[1];
    assert_eq!(
        negative.message,
        "High negative sentiment: 100% negative (12/12 mentions)"
    );
    assert_eq!(negative.value, 100.0);
    assert_eq!(negative.baseline, 43.0);
    assert_eq!(negative.affected_mentions.len(), 12);

    let drop = &report.alerts[2];
    assert_eq!(drop.message, "Positive sentiment dropped to 0% (normally 57%)");
    assert_eq!(drop.affected_mentions.len(), 12);
}

#[test]
fn test_report_serializes_camel_case() {
    let report = detect_spikes(&spike_scenario());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["hasSpikes"], true);
    assert_eq!(json["alerts"][0]["type"], "volume");
    assert_eq!(json["alerts"][0]["increase"], "629%");
    assert!(json["alerts"][0]["affectedMentions"].is_array());
    assert_eq!(json["hourlyData"][16]["count"], 12);
    assert_eq!(json["hourlyData"][16]["negative"], 12);
}

#[test]
fn test_undated_mentions_count_toward_minimum() {
    let mut mentions: Vec<_> = (0..3)
        .map(|h| mention(&h.to_string(), "fine", Sentiment::Neutral, Some(at(h, 0))))
        .collect();
    mentions.extend((0..7).map(|i| mention(&format!("u{i}"), "no date", Sentiment::Neutral, None)));

    let report = detect_spikes(&mentions);
    assert_eq!(report.summary, "No unusual activity detected");
    assert_eq!(report.hours().len(), 3);
}

#[test]
fn test_trending_is_opt_in() {
    let mentions = spike_scenario();
    let default_report = detect_spikes(&mentions);
    assert!(default_report
        .alerts
        .iter()
        .all(|a| a.alert_type != AlertType::TrendingTopic));

    let mut config = Config::default();
    config.spikes.include_trending = true;
    let report = SpikeDetector::from_config(&config).detect(&mentions);

    // Trending alerts are info and sort last; the summary ignores them
    assert_eq!(report.alerts.len(), 5);
    assert_eq!(report.summary, "Found 2 critical and 1 warning alerts");
    let keywords: Vec<&str> = report.alerts[3..]
        .iter()
        .map(|a| {
            assert_eq!(a.severity, AlertSeverity::Info);
            a.keyword.as_deref().unwrap()
        })
        .collect();
    assert_eq!(keywords, vec!["snapped", "strap"]);
}

#[test]
fn test_trending_caps_increase() {
    let alerts = detect_trending_topics(&spike_scenario());
    let strap = alerts
        .iter()
        .find(|a| a.keyword.as_deref() == Some("strap"))
        .unwrap();

    // 7 of 7 recent vs 1 of 18 older
    assert_eq!(strap.recent_count, Some(7));
    assert_eq!(strap.increase, Some(Increase::Percent(500)));
    assert_eq!(
        strap.message,
        "\"strap\" is trending (7 unique mentions, 500% increase)"
    );
}
