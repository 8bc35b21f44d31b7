//! Property tests for invariants that hold on any batch

mod common;

use brandpulse::analytics::{deduplicate_mentions, detect_spikes};
use brandpulse::models::{Mention, Sentiment, SentimentBreakdown};
use brandpulse::topics::{cluster_topics, fallback_clusters};
use proptest::prelude::*;
use std::collections::HashSet;

const WORDS: &[&str] = &[
    "battery", "strap", "screen", "price", "shipping", "refund", "great", "awful", "update",
    "crash", "design", "support", "love", "broken", "order",
];

fn sentiment_strategy() -> impl Strategy<Value = Sentiment> {
    prop_oneof![
        Just(Sentiment::Positive),
        Just(Sentiment::Neutral),
        Just(Sentiment::Negative),
    ]
}

fn mention_strategy() -> impl Strategy<Value = (Vec<usize>, Sentiment, Option<i64>, u8)> {
    (
        prop::collection::vec(0..WORDS.len(), 0..8),
        sentiment_strategy(),
        prop::option::weighted(0.9, 0i64..72),
        0u8..60,
    )
}

fn batch_strategy(max: usize) -> impl Strategy<Value = Vec<Mention>> {
    prop::collection::vec(mention_strategy(), 0..max).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (words, sentiment, hour, minute))| {
                let text = words.iter().map(|&w| WORDS[w]).collect::<Vec<_>>().join(" ");
                let ts = hour.map(|h| common::at(h, i64::from(minute)));
                common::mention(&i.to_string(), &text, sentiment, ts)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn small_batches_never_alert(mentions in batch_strategy(10)) {
        let report = detect_spikes(&mentions);
        prop_assert!(!report.has_spikes);
        prop_assert!(report.alerts.is_empty());
        prop_assert!(report.hourly_data.is_none());
    }

    #[test]
    fn alerts_are_sorted_by_severity(mentions in batch_strategy(80)) {
        let report = detect_spikes(&mentions);
        let ranks: Vec<u8> = report.alerts.iter().map(|a| a.severity.rank()).collect();
        prop_assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
        prop_assert_eq!(report.has_spikes, !report.alerts.is_empty());
    }

    #[test]
    fn hourly_buckets_are_ascending(mentions in batch_strategy(80)) {
        let report = detect_spikes(&mentions);
        prop_assert!(report.hours().windows(2).all(|w| w[0].hour < w[1].hour));
        for bucket in report.hours() {
            prop_assert_eq!(bucket.count, bucket.sentiment.total());
        }
    }

    #[test]
    fn dedup_is_idempotent(mentions in batch_strategy(40)) {
        let once = deduplicate_mentions(&mentions, 100);
        let twice = deduplicate_mentions(&once, 100);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn tiny_batches_form_one_cluster(mentions in batch_strategy(5)) {
        let clusters = cluster_topics(&mentions);
        prop_assert_eq!(clusters.len(), 1);
        prop_assert_eq!(clusters[0].count, mentions.len());
    }

    #[test]
    fn clusters_partition_the_batch(mentions in batch_strategy(70)) {
        let clusters = cluster_topics(&mentions);

        let total: usize = clusters.iter().map(|c| c.count).sum();
        prop_assert_eq!(total, mentions.len());

        let labels: HashSet<&str> = clusters.iter().map(|c| c.label.as_str()).collect();
        prop_assert_eq!(labels.len(), clusters.len());

        for cluster in &clusters {
            prop_assert_eq!(cluster.sentiment_breakdown.total(), cluster.count);
        }
    }

    #[test]
    fn clustering_is_deterministic(mentions in batch_strategy(50)) {
        prop_assert_eq!(cluster_topics(&mentions), cluster_topics(&mentions));
    }

    #[test]
    fn fallback_matches_overall_breakdown(mentions in batch_strategy(40)) {
        let overall = SentimentBreakdown::from_mentions(&mentions);
        let clusters = fallback_clusters(&mentions, 5);

        for cluster in &clusters {
            let sentiment = match cluster.cluster_id.as_str() {
                "0" => Sentiment::Positive,
                "1" => Sentiment::Negative,
                _ => Sentiment::Neutral,
            };
            prop_assert_eq!(cluster.count, overall.get(sentiment));
        }
        let nonempty = Sentiment::all().iter().filter(|s| overall.get(**s) > 0).count();
        prop_assert_eq!(clusters.len(), nonempty);
    }
}
