//! Static stop-word sets
//!
//! Two overlapping lists: [`TOKEN_STOP_WORDS`] filters trending tokens and is
//! the broader of the two (web hosts, marketplace spam, brand names);
//! [`KEYWORD_STOP_WORDS`] filters cluster keywords.

use lazy_static::lazy_static;
use std::collections::HashSet;

const FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "is",
    "are", "was", "were", "been", "be", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "this", "that", "these", "those", "i",
    "you", "he", "she", "it", "we", "they", "my", "your", "his", "her", "its", "our", "their",
    "just", "about", "even", "also", "really", "very", "much", "more", "most", "some", "any",
    "all", "both", "each", "few", "other", "such", "only", "own", "same", "so", "than", "too",
    "from", "up", "down", "out", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "who", "what", "which", "not", "no", "nor",
    "as", "into", "through", "during", "before", "after", "above", "below", "between",
    "because", "while", "until", "since",
];

const COMMON_VERBS: &[&str] = &[
    "get", "got", "getting", "make", "makes", "made", "goes", "going", "went", "come", "comes",
    "came", "coming", "take", "takes", "took", "taking", "see", "sees", "saw", "seen", "know",
    "knows", "knew", "known", "think", "thinks", "thought", "tell", "tells", "told", "feel",
    "feels", "felt", "try", "tried", "trying", "work", "works", "worked", "working", "give",
    "gives", "gave", "given", "find", "finds", "found", "use", "uses", "used", "using", "seem",
    "seems", "seemed", "like", "likes", "liked", "look", "looks", "looked", "looking", "say",
    "says", "said", "saying",
];

const DESCRIPTORS: &[&str] = &[
    "new", "first", "last", "long", "good", "little", "old", "right", "big", "high",
    "different", "small", "large", "next", "early", "young", "important", "public", "bad",
    "able",
];

const PLATFORM_WORDS: &[&str] = &[
    "reddit", "twitter", "post", "posts", "comment", "comments", "tweet", "tweets", "retweet",
    "retweets", "share", "shares", "follow", "following", "follower", "followers", "via",
    "article", "articles", "source", "sources", "link", "links", "click", "read", "view",
    "check", "timestamped", "authentic", "original", "content",
];

const WEB_AND_SPAM: &[&str] = &[
    "http", "https", "www", "com", "net", "org", "html", "website", "page", "weidian", "itemid",
    "pandabuy", "taobao", "aliexpress", "alibaba", "imgur", "youtube", "facebook", "instagram",
    "tiktok", "snapchat", "amazon", "ebay", "shopify", "etsy",
];

const BRAND_WORDS: &[&str] = &["apple", "watch", "nike", "adidas", "samsung", "google"];

lazy_static! {
    /// Stop words for trending-token extraction
    pub static ref TOKEN_STOP_WORDS: HashSet<&'static str> = FUNCTION_WORDS
        .iter()
        .chain(COMMON_VERBS)
        .chain(DESCRIPTORS)
        .chain(PLATFORM_WORDS)
        .chain(WEB_AND_SPAM)
        .chain(BRAND_WORDS)
        .copied()
        .collect();

    /// Stop words for cluster keyword extraction
    pub static ref KEYWORD_STOP_WORDS: HashSet<&'static str> = FUNCTION_WORDS
        .iter()
        .chain(COMMON_VERBS)
        .chain(DESCRIPTORS)
        .chain(&["apple", "watch"])
        .chain(&[
            "reddit", "twitter", "post", "posts", "comment", "comments", "via", "http", "https",
            "www", "com", "org", "net",
        ])
        .copied()
        .collect();
}

/// Check whether a word is in the trending-token stop set
pub fn is_stop_word(word: &str) -> bool {
    TOKEN_STOP_WORDS.contains(word.to_lowercase().as_str())
}
