// Core data structures shared by the analytics engines

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Sentiment label attached to a mention by the upstream analysis pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    /// Capitalized name, used in generated cluster labels
    pub fn title(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    /// Get all sentiments
    pub fn all() -> [Self; 3] {
        [Self::Positive, Self::Neutral, Self::Negative]
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single piece of text attributed to a brand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    /// Fetchers send string ids; generated fixtures send numbers
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub source: String,
    /// Creation time; absent or unparseable values become `None`
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Any other fields supplied by the fetchers, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Mention {
    /// Create a mention with only the fields the engines read
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        sentiment: Sentiment,
        source: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sentiment,
            source: source.into(),
            timestamp,
            subreddit: None,
            score: None,
            num_comments: None,
            url: None,
            author: None,
            extra: BTreeMap::new(),
        }
    }

    /// Dedup signature: first 100 characters of the trimmed, lower-cased text
    pub fn signature(&self, prefix_chars: usize) -> String {
        self.text
            .to_lowercase()
            .trim()
            .chars()
            .take(prefix_chars)
            .collect()
    }
}

/// Per-sentiment counts for a group of mentions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentBreakdown {
    /// Count sentiments over a set of mentions
    pub fn from_mentions<'a, I>(mentions: I) -> Self
    where
        I: IntoIterator<Item = &'a Mention>,
    {
        let mut breakdown = Self::default();
        for mention in mentions {
            breakdown.record(mention.sentiment);
        }
        breakdown
    }

    /// Add one observation
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    /// Count for a single sentiment
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Share of a sentiment in `[0.0, 1.0]`; zero for an empty breakdown
    pub fn fraction(&self, sentiment: Sentiment) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(sentiment) as f64 / total as f64
        }
    }

    /// Most frequent sentiment; ties go to the first of positive, negative, neutral
    pub fn dominant(&self) -> Sentiment {
        [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
            .into_iter()
            .fold(Sentiment::Positive, |best, candidate| {
                if self.get(candidate) > self.get(best) {
                    candidate
                } else {
                    best
                }
            })
    }
}

/// Read a mention batch from JSON
///
/// Accepts a bare array or an object with a `mentions` array.
pub fn parse_batch(json: &str) -> crate::error::Result<Vec<Mention>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let array = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => match map.remove("mentions") {
            Some(mentions @ serde_json::Value::Array(_)) => mentions,
            _ => return Err(crate::error::Error::invalid_input("Mentions array is required")),
        },
        _ => return Err(crate::error::Error::invalid_input("Mentions array is required")),
    };
    Ok(serde_json::from_value(array)?)
}

/// Read a mention batch from any reader, e.g. stdin or a file
pub fn read_batch<R: Read>(mut reader: R) -> crate::error::Result<Vec<Mention>> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_batch(&json)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let Some(value) = raw else {
        return Ok(None);
    };

    let parsed = match serde_json::from_value::<RawTimestamp>(value) {
        Ok(RawTimestamp::Int(millis)) => Utc.timestamp_millis_opt(millis).single(),
        Ok(RawTimestamp::Float(millis)) if millis.is_finite() => {
            Utc.timestamp_millis_opt(millis as i64).single()
        }
        Ok(RawTimestamp::Text(text)) => parse_timestamp(&text),
        _ => None,
    };

    Ok(parsed)
}

/// Parse an ISO-8601 timestamp; strings without an offset are read as UTC
///
/// A bare date means midnight UTC. Integer strings are epoch millis.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            text.parse::<i64>()
                .ok()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        })
}
