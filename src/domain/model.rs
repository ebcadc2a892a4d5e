use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// One input row, column name to cell, in file column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: Map<String, Value>,
}

/// Logical input columns and the header spellings accepted for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Campaign,
    AdGroup,
    Keyword,
    MatchType,
    MaxCpc,
    AdType,
    Headlines,
    Descriptions,
    FinalUrl,
    Status,
}

impl Field {
    pub fn name(self) -> &'static str {
        self.accepted_names()[0]
    }

    /// Tried in order; an exact spelling beats a case-insensitive one.
    pub fn accepted_names(self) -> &'static [&'static str] {
        match self {
            Field::Campaign => &["Campaign"],
            Field::AdGroup => &["Ad Group", "AdGroup", "Ad_Group"],
            Field::Keyword => &["Keyword"],
            Field::MatchType => &["Match Type", "MatchType", "Match_Type"],
            Field::MaxCpc => &["Max CPC", "MaxCPC", "Max_CPC"],
            Field::AdType => &["Ad Type", "AdType", "Ad_Type"],
            Field::Headlines => &["Headlines"],
            Field::Descriptions => &["Descriptions"],
            Field::FinalUrl => &["Final URL", "FinalURL", "Final_URL"],
            Field::Status => &["Status"],
        }
    }
}

impl Record {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            data: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn lookup(&self, field: Field) -> Option<&Value> {
        let names = field.accepted_names();
        names
            .iter()
            .find_map(|name| self.data.get(*name))
            .or_else(|| {
                names.iter().find_map(|name| {
                    self.data
                        .iter()
                        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
                        .map(|(_, value)| value)
                })
            })
    }

    /// Cell text, or `None` when the column is absent or the cell is empty/null.
    pub fn text(&self, field: Field) -> Option<String> {
        self.lookup(field).and_then(cell_text)
    }

    pub fn require(&self, field: Field) -> Result<String> {
        self.text(field).ok_or_else(|| EtlError::MissingFieldError {
            field: field.name().to_string(),
        })
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    Campaign,
    AdGroup,
    Keyword,
    Ad,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Campaign => "Campaign",
            RecordType::AdGroup => "Ad group",
            RecordType::Keyword => "Keyword",
            RecordType::Ad => "Ad",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignRow {
    pub campaign: String,
    pub status: String,
    pub campaign_type: String,
    pub budget: String,
    pub location_targeting: String,
    pub language_targeting: String,
    pub bid_strategy_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdGroupRow {
    pub campaign: String,
    pub ad_group: String,
    pub status: String,
    pub max_cpc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRow {
    pub campaign: String,
    pub ad_group: String,
    pub keyword: Option<String>,
    pub match_type: String,
    pub max_cpc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdRow {
    pub campaign: String,
    pub ad_group: String,
    pub ad_type: String,
    pub headlines: Option<String>,
    pub descriptions: Option<String>,
    pub final_url: Option<String>,
    pub status: String,
}

/// One line of the generated bulk sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkRow {
    Campaign(CampaignRow),
    AdGroup(AdGroupRow),
    Keyword(KeywordRow),
    Ad(AdRow),
}

impl BulkRow {
    pub fn record_type(&self) -> RecordType {
        match self {
            BulkRow::Campaign(_) => RecordType::Campaign,
            BulkRow::AdGroup(_) => RecordType::AdGroup,
            BulkRow::Keyword(_) => RecordType::Keyword,
            BulkRow::Ad(_) => RecordType::Ad,
        }
    }

    pub fn campaign(&self) -> &str {
        match self {
            BulkRow::Campaign(row) => &row.campaign,
            BulkRow::AdGroup(row) => &row.campaign,
            BulkRow::Keyword(row) => &row.campaign,
            BulkRow::Ad(row) => &row.campaign,
        }
    }
}

/// Why an input row was rejected or only partly expanded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("Missing Campaign or Ad group")]
    MissingCampaignOrAdGroup,

    #[error("Campaign name empty")]
    EmptyCampaignName,

    #[error("Campaign name should start with '{prefix}'")]
    PrefixMismatch { prefix: String },

    #[error("No ads found for this ad group")]
    NoAdsFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub record: Record,
    pub issue: RowIssue,
}

impl ErrorEntry {
    pub fn reason(&self) -> String {
        self.issue.to_string()
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.issue, self.record)
    }
}

/// Both parsed input tables.
#[derive(Debug, Clone, Default)]
pub struct ExtractedData {
    pub keywords: Vec<Record>,
    pub ads: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub rows: Vec<BulkRow>,
    pub errors: Vec<ErrorEntry>,
    pub csv_output: String,
    pub error_report: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let record = Record::from_pairs([("campaign", "C1"), ("ad group", "AG1")]);
        assert_eq!(record.text(Field::Campaign).as_deref(), Some("C1"));
        assert_eq!(record.text(Field::AdGroup).as_deref(), Some("AG1"));
    }

    #[test]
    fn test_exact_spelling_wins_over_other_casing() {
        let record = Record::from_pairs([("campaign", "lower"), ("Campaign", "exact")]);
        assert_eq!(record.text(Field::Campaign).as_deref(), Some("exact"));
    }

    #[test]
    fn test_empty_and_null_cells_are_missing() {
        let record = Record::from_pairs([
            ("Campaign", json!("")),
            ("Ad Group", Value::Null),
            ("Keyword", json!("   ")),
        ]);
        assert_eq!(record.text(Field::Campaign), None);
        assert_eq!(record.text(Field::AdGroup), None);
        assert_eq!(record.text(Field::Keyword).as_deref(), Some("   "));
    }

    #[test]
    fn test_numbers_render_as_text() {
        let record = Record::from_pairs([("Max CPC", json!(12.5))]);
        assert_eq!(record.text(Field::MaxCpc).as_deref(), Some("12.5"));
    }

    #[test]
    fn test_require_names_the_missing_field() {
        let record = Record::from_pairs([("Campaign", "C1")]);
        let err = record.require(Field::AdGroup).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: Ad Group");
    }

    #[test]
    fn test_row_issue_reasons() {
        assert_eq!(
            RowIssue::PrefixMismatch {
                prefix: "LG-2025-".to_string()
            }
            .to_string(),
            "Campaign name should start with 'LG-2025-'"
        );
        assert_eq!(
            RowIssue::NoAdsFound.to_string(),
            "No ads found for this ad group"
        );
    }

    #[test]
    fn test_record_type_labels() {
        assert_eq!(RecordType::AdGroup.as_str(), "Ad group");
        let row = BulkRow::Ad(AdRow {
            campaign: "C1".to_string(),
            ad_group: "AG1".to_string(),
            ad_type: "Responsive search ad".to_string(),
            headlines: None,
            descriptions: None,
            final_url: None,
            status: "Enabled".to_string(),
        });
        assert_eq!(row.record_type(), RecordType::Ad);
        assert_eq!(row.campaign(), "C1");
    }
}
