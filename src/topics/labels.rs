//! Human-readable cluster labels
//!
//! A cluster is labelled by the first topic pattern matching its combined
//! text at least three times, otherwise by its dominant sentiment.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::models::{Mention, Sentiment, SentimentBreakdown};

/// Minimum regex hits for a pattern label to apply
pub const MIN_PATTERN_MATCHES: usize = 3;

/// Label used when the whole batch forms one cluster
pub const ALL_MENTIONS_LABEL: &str = "📊 All Mentions";

struct TopicPattern {
    label: &'static str,
    regex: Regex,
}

impl TopicPattern {
    fn new(label: &'static str, words: &str) -> Self {
        let regex = Regex::new(&format!(r"(?i)(?-u:\b)(?:{words})(?-u:\b)"))
            .expect("valid topic pattern");
        Self { label, regex }
    }
}

lazy_static! {
    static ref TOPIC_PATTERNS: Vec<TopicPattern> = vec![
        TopicPattern::new(
            "💰 Pricing & Cost",
            "price|prices|pricing|cost|costs|expensive|cheap|afford|dollar|money|payment|paid|pay|worth|value",
        ),
        TopicPattern::new(
            "📦 Shipping & Delivery",
            "deliver|delivery|ship|shipping|shipped|package|packages|arrive|arrived|carrier|tracking|transit|freight",
        ),
        TopicPattern::new(
            "👥 Customer Support",
            "support|service|customer|help|helpful|representative|agent|contact|contacts|call|called|email|emailed|response|respond",
        ),
        TopicPattern::new(
            "⭐ Build Quality",
            "quality|build|built|made|material|materials|durable|durability|premium|construction|craftsmanship",
        ),
        TopicPattern::new(
            "🐛 Technical Problems",
            "bug|bugs|error|errors|broken|crash|crashes|crashing|issue|issues|problem|problems|glitch|glitches|fail|failed|failing",
        ),
        TopicPattern::new(
            "💡 Features & Improvements",
            "feature|features|functionality|function|capability|option|options|need|needs|want|wants|wish|wishes|should|could|add|adding|improve|improvement",
        ),
        TopicPattern::new(
            "❤️ Highly Positive",
            "love|loves|loved|loving|great|amazing|excellent|perfect|awesome|fantastic|wonderful|best|impressed|impressive|outstanding|superb",
        ),
        TopicPattern::new(
            "😠 Very Negative",
            "hate|hates|hated|terrible|worst|awful|bad|horrible|disappointing|disappointed|waste|useless|poor|pathetic",
        ),
        TopicPattern::new(
            "🎨 Design & Style",
            "design|designed|look|looks|style|styles|styled|color|colors|appearance|aesthetic|aesthetics|beautiful|elegant|sleek|modern",
        ),
        TopicPattern::new(
            "🔧 Technical Specs",
            "battery|batteries|screen|display|camera|cameras|performance|performing|speed|fast|slow|processor|storage|memory|ram",
        ),
        TopicPattern::new(
            "💬 Buying Advice",
            "recommend|recommends|recommended|suggest|suggests|suggested|buy|buying|purchase|purchasing|considering|thinking|worth",
        ),
        TopicPattern::new(
            "🆕 Updates & News",
            "update|updates|updated|updating|upgrade|upgrades|upgraded|version|versions|release|released|launch|launched|launching|new",
        ),
        TopicPattern::new(
            "🔄 Returns & Warranty",
            "warranty|warranties|guarantee|guaranteed|return|returns|returned|refund|refunds|refunded|replace|replacement|exchange",
        ),
        TopicPattern::new(
            "⚖️ Comparisons",
            "compare|compares|compared|comparison|versus|against|better|worse|alternative|competitor|competition|competitive",
        ),
        TopicPattern::new(
            "📋 Availability & Orders",
            "available|availability|stock|stocks|stocked|order|orders|ordered|ordering|wait|waiting|preorder",
        ),
    ];
}

/// Label for a cluster without a matching topic pattern
pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "😊 General Praise",
        Sentiment::Negative => "😞 General Complaints",
        Sentiment::Neutral => "💬 General Discussion",
    }
}

/// First topic pattern with enough hits in `text`
pub fn match_topic(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    TOPIC_PATTERNS
        .iter()
        .find(|pattern| pattern.regex.find_iter(&lowered).count() >= MIN_PATTERN_MATCHES)
        .map(|pattern| pattern.label)
}

/// Base label for a group of mentions
pub fn label_cluster(mentions: &[Mention]) -> String {
    let combined = mentions
        .iter()
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    match match_topic(&combined) {
        Some(label) => label.to_string(),
        None => sentiment_label(SentimentBreakdown::from_mentions(mentions).dominant()).to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Tracks labels already handed out so every cluster gets a distinct one
#[derive(Debug, Default)]
pub struct LabelRegistry {
    used: HashSet<String>,
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `base`, or a disambiguated variant when it is already taken
    ///
    /// The first fallback is `"{Kw1} & {Kw2} Discussion"` from `keywords`,
    /// or `"{Dominant} - Cluster {id}"` when there are none. A numeric
    /// suffix resolves anything still colliding.
    pub fn claim(
        &mut self,
        base: String,
        cluster_id: &str,
        keywords: &[String],
        dominant: Sentiment,
    ) -> String {
        let mut label = base;

        if self.used.contains(&label) {
            label = if keywords.is_empty() {
                format!("{} - Cluster {cluster_id}", dominant.title())
            } else {
                let joined = keywords
                    .iter()
                    .map(|k| capitalize(k))
                    .collect::<Vec<_>>()
                    .join(" & ");
                format!("{joined} Discussion")
            };
        }

        if self.used.contains(&label) {
            let stem = label;
            let mut n = 2;
            label = format!("{stem} ({n})");
            while self.used.contains(&label) {
                n += 1;
                label = format!("{stem} ({n})");
            }
        }

        self.used.insert(label.clone());
        label
    }
}
