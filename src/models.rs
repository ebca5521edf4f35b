/// Typed mirrors of the backend JSON payloads.
///
/// These are transient view-models: nothing here is owned or persisted by
/// the client beyond the anonymous history list and the auth user record.
/// Every optional field the backend may omit is `#[serde(default)]` so a
/// sparse response still decodes.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Sentiment label
// ---------------------------------------------------------------------------

/// One of the three fixed Indonesian sentiment categories.
///
/// Any other label coming from the backend is kept verbatim in
/// [`Sentiment::Other`] so it can still be displayed; styling treats it as
/// [`Sentiment::Netral`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positif,
    Negatif,
    Netral,
    Other(String),
}

impl Sentiment {
    /// Map a raw backend label to a sentiment. Matching is exact.
    pub fn parse(label: &str) -> Self {
        match label {
            "Positif" => Self::Positif,
            "Negatif" => Self::Negatif,
            "Netral" => Self::Netral,
            other => Self::Other(other.to_string()),
        }
    }

    /// The label exactly as received.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positif => "Positif",
            Self::Negatif => "Negatif",
            Self::Netral => "Netral",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Per-label counts as the backend reports them (`{"Positif": 3, ...}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "Positif", default)]
    pub positif: u64,
    #[serde(rename = "Negatif", default)]
    pub negatif: u64,
    #[serde(rename = "Netral", default)]
    pub netral: u64,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// The user record stored next to the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// `POST /auth/login` response.
#[derive(Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Single classification + history
// ---------------------------------------------------------------------------

/// A sub-topic within an analyzed text with its own label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    pub aspect: String,
    pub sentiment: Sentiment,
}

/// `POST /api/classify` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassifyResponse {
    pub sentiment: Sentiment,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub aspects: Vec<Aspect>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One history row, either from the anonymous session list or from
/// `GET /api/history`.
///
/// Anonymous entries carry `timestamp` and `confidence`; server entries carry
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HistoryEntry {
    /// Build an anonymous entry for a classification made just now.
    pub fn anonymous(text: &str, result: &ClassifyResponse, timestamp: String) -> Self {
        Self {
            id: None,
            text: text.to_string(),
            sentiment: result.sentiment.clone(),
            confidence: Some(result.confidence),
            created_at: None,
            timestamp: Some(timestamp),
        }
    }

    /// The moment the entry was recorded, whichever field carries it.
    pub fn recorded_at(&self) -> Option<&str> {
        self.created_at.as_deref().or(self.timestamp.as_deref())
    }
}

/// `GET /api/history` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// One classified row of an uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

/// Aggregates for one product group of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    #[serde(flatten)]
    pub counts: SentimentCounts,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub positive_pct: f64,
    #[serde(default)]
    pub negative_pct: f64,
}

/// Severity of a qualitative batch insight. Unknown kinds read as `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    #[serde(other)]
    Info,
}

/// A qualitative finding the backend attaches to product batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// `POST /api/batch-classify` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub stats: SentimentCounts,
    #[serde(default)]
    pub results: Vec<BatchRow>,
    #[serde(default)]
    pub has_products: bool,
    /// Per-product stats in the order the server listed them.
    #[serde(default)]
    pub product_stats: Option<IndexMap<String, ProductStats>>,
    #[serde(default)]
    pub insights: Option<Vec<Insight>>,
    #[serde(default)]
    pub filename: Option<String>,
}

// ---------------------------------------------------------------------------
// Social / YouTube
// ---------------------------------------------------------------------------

/// A scraped comment with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComment {
    pub text: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub confidence: f64,
}

/// `POST /api/scrape` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub stats: SentimentCounts,
    #[serde(default)]
    pub results: Vec<ScoredComment>,
}

/// The last scrape, kept so it can be saved for later comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeSnapshot {
    pub url: String,
    pub results: Vec<ScoredComment>,
    pub stats: SentimentCounts,
}

// ---------------------------------------------------------------------------
// Brand battle
// ---------------------------------------------------------------------------

/// Aggregated sentiment for one side of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BrandScore {
    #[serde(default)]
    pub positive_pct: f64,
    #[serde(default)]
    pub stats: SentimentCounts,
    #[serde(default)]
    pub total: u64,
}

/// Backend verdict; `gap` is `brand_a.positive_pct - brand_b.positive_pct`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    pub gap: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// `POST /api/brand/battle` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BattleResponse {
    pub brand_a: BrandScore,
    pub brand_b: BrandScore,
    pub verdict: Verdict,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// `GET /api/stats/summary` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
}

/// `GET /api/stats/trend` response: one count per date per label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrendSeries {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub positive: Vec<u64>,
    #[serde(default)]
    pub negative: Vec<u64>,
    #[serde(default)]
    pub neutral: Vec<u64>,
}

/// One entry of `GET /api/stats/wordcloud`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordWeight {
    pub text: String,
    pub weight: f64,
}

/// Everything the dashboard fetched; each part is independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub summary: Option<SummaryStats>,
    pub trend: Option<TrendSeries>,
    pub words: Option<Vec<WordWeight>>,
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Render a confidence in `[0, 1]` as a whole percentage.
pub fn confidence_pct(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
