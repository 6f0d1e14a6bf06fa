use serde_json::{Map, Value};

/// A normalized affiliate row. Canonical fields are always present;
/// unrecognized keys from the raw record ride along in `extra`.
#[derive(Debug, Clone, PartialEq)]
pub struct AffiliateRecord {
    pub code: String,
    pub total_wagered: f64,
    pub total_earnings: f64,
    pub users_registered: f64,
    pub conversion_rate: f64,
    pub last_active: Option<String>,
    pub created_at: Option<String>,
    pub extra: Map<String, Value>,
}

impl Default for AffiliateRecord {
    fn default() -> Self {
        Self {
            code: "Unknown".to_string(),
            total_wagered: 0.0,
            total_earnings: 0.0,
            users_registered: 0.0,
            conversion_rate: 0.0,
            last_active: None,
            created_at: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortState {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub affiliate_code: String,
    pub date_start: String,
    pub date_end: String,
    pub credential: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    Unranked,
}

impl RankTier {
    pub fn for_rank(rank: usize) -> RankTier {
        match rank {
            1 => RankTier::Gold,
            2 => RankTier::Silver,
            3 => RankTier::Bronze,
            _ => RankTier::Unranked,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankTier::Gold => "gold",
            RankTier::Silver => "silver",
            RankTier::Bronze => "bronze",
            RankTier::Unranked => "",
        }
    }
}

/// One display row of the leaderboard, with formatting already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub tier: RankTier,
    pub code: String,
    pub last_active_display: String,
    pub total_wagered_display: String,
    pub total_earnings_display: String,
    pub users_display: String,
}
