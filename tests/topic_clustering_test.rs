//! Topic clustering over realistic batches

mod common;

use brandpulse::config::ClusterConfig;
use brandpulse::models::{Mention, Sentiment};
use brandpulse::topics::{cluster_topics, TopicClusterer};
use common::{mention, repeated};
use std::collections::HashSet;

fn two_themes() -> Vec<Mention> {
    let mut mentions = repeated(
        "ship",
        "Package shipping delayed, tracking shows nothing",
        Sentiment::Negative,
        20,
    );
    mentions.extend(repeated(
        "spec",
        "Battery drains fast, screen too dim",
        Sentiment::Neutral,
        20,
    ));
    mentions
}

#[test]
fn test_two_themes_are_separated_and_labelled() {
    let clusters = cluster_topics(&two_themes());
    assert_eq!(clusters.len(), 2);

    let labels: HashSet<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        HashSet::from(["📦 Shipping & Delivery", "🔧 Technical Specs"])
    );

    let shipping = clusters
        .iter()
        .find(|c| c.label == "📦 Shipping & Delivery")
        .unwrap();
    assert_eq!(shipping.count, 20);
    assert!(shipping.mentions.iter().all(|m| m.id.starts_with("ship")));
    assert_eq!(
        shipping.keywords,
        vec!["package", "shipping", "delayed", "tracking", "shows"]
    );
    assert_eq!(shipping.sentiment_breakdown.negative, 20);
}

#[test]
fn test_repeated_label_is_disambiguated() {
    let mut mentions = repeated(
        "a",
        "Price is way too high, cost is insane, not worth it",
        Sentiment::Negative,
        20,
    );
    mentions.extend(repeated(
        "b",
        "Expensive watch, cheap strap, poor value for money",
        Sentiment::Negative,
        20,
    ));

    let clusters = cluster_topics(&mentions);
    assert_eq!(clusters.len(), 2);

    let labels: HashSet<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
    assert!(labels.contains("💰 Pricing & Cost"));
    assert!(
        labels.contains("Price & Insane Discussion")
            || labels.contains("Expensive & Cheap Discussion"),
        "unexpected labels: {labels:?}"
    );
}

#[test]
fn test_small_batch_is_one_cluster() {
    let mentions = vec![
        mention("1", "Strap broke", Sentiment::Negative, None),
        mention("2", "Strap replaced quickly", Sentiment::Positive, None),
        mention("3", "Okay", Sentiment::Neutral, None),
    ];
    let clusters = cluster_topics(&mentions);

    assert_eq!(clusters.len(), 1);
    let only = &clusters[0];
    assert_eq!(only.cluster_id, "0");
    assert_eq!(only.label, "📊 All Mentions");
    assert_eq!(only.count, 3);
    assert_eq!(only.keywords[0], "strap");
}

#[test]
fn test_unvectorizable_batch_falls_back_to_sentiment() {
    let mentions: Vec<Mention> = ["!!!", "???", "...", "--", "!!"]
        .iter()
        .zip([
            Sentiment::Negative,
            Sentiment::Negative,
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Positive,
        ])
        .enumerate()
        .map(|(i, (text, sentiment))| mention(&i.to_string(), text, sentiment, None))
        .collect();

    let clusters = cluster_topics(&mentions);
    let shape: Vec<(&str, &str, usize)> = clusters
        .iter()
        .map(|c| (c.cluster_id.as_str(), c.label.as_str(), c.count))
        .collect();
    assert_eq!(
        shape,
        vec![
            ("0", "😊 Positive Reviews", 2),
            ("1", "😠 Issues & Complaints", 3),
        ]
    );
}

#[test]
fn test_large_batch_respects_cluster_bounds() {
    let subjects = ["battery", "strap", "screen", "price", "shipping", "support", "update"];
    let mentions: Vec<Mention> = (0..120)
        .map(|i| {
            let subject = subjects[i % subjects.len()];
            let sentiment = match i % 3 {
                0 => Sentiment::Positive,
                1 => Sentiment::Negative,
                _ => Sentiment::Neutral,
            };
            mention(
                &i.to_string(),
                &format!("The {subject} thing again, take {}", i % 11),
                sentiment,
                None,
            )
        })
        .collect();

    let clusters = cluster_topics(&mentions);
    assert!(!clusters.is_empty() && clusters.len() <= 5);
    assert_eq!(clusters.iter().map(|c| c.count).sum::<usize>(), 120);
    assert!(clusters.windows(2).all(|w| w[0].count >= w[1].count));

    let labels: HashSet<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels.len(), clusters.len());
}

#[test]
fn test_seed_controls_result() {
    let mentions = two_themes();
    let clusterer = TopicClusterer::new(ClusterConfig {
        seed: 7,
        ..ClusterConfig::default()
    });
    assert_eq!(clusterer.cluster(&mentions), clusterer.cluster(&mentions));
}

#[test]
fn test_cluster_serializes_camel_case() {
    let clusters = cluster_topics(&two_themes());
    let json = serde_json::to_value(&clusters).unwrap();

    assert!(json[0]["clusterId"].is_string());
    assert_eq!(json[0]["count"], 20);
    assert!(json[0]["sentimentBreakdown"]["negative"].is_number());
    assert!(json[0]["keywords"].is_array());
}
