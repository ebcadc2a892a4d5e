use crate::config::settings::Settings;
use crate::domain::model::{
    AdGroupRow, AdRow, BulkRow, CampaignRow, ErrorEntry, Field, KeywordRow, Record, RowIssue,
};
use crate::domain::services::collector::ErrorCollector;
use crate::domain::services::resolver::resolve_defaults;
use crate::domain::services::validator::validate_campaign_name;
use std::collections::HashMap;

pub const ENABLED: &str = "Enabled";
pub const DEFAULT_CAMPAIGN_TYPE: &str = "Search";
pub const DEFAULT_MATCH_TYPE: &str = "Phrase";
pub const DEFAULT_AD_TYPE: &str = "Responsive search ad";

/// Bulk rows in emission order plus the rows that were rejected.
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub rows: Vec<BulkRow>,
    pub errors: Vec<ErrorEntry>,
}

/// Ads grouped by exact (campaign, ad group), keeping ad file order.
struct AdIndex<'a> {
    groups: HashMap<(String, String), Vec<&'a Record>>,
}

impl<'a> AdIndex<'a> {
    fn new(ads: &'a [Record]) -> Self {
        let mut groups: HashMap<(String, String), Vec<&'a Record>> = HashMap::new();
        for ad in ads {
            // An ad without both keys can never match a keyword row.
            if let (Some(campaign), Some(ad_group)) =
                (ad.text(Field::Campaign), ad.text(Field::AdGroup))
            {
                groups.entry((campaign, ad_group)).or_default().push(ad);
            }
        }
        Self { groups }
    }

    fn matching(&self, campaign: &str, ad_group: &str) -> &[&'a Record] {
        self.groups
            .get(&(campaign.to_string(), ad_group.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Expands every keyword row into Campaign, Ad group, Keyword and Ad rows.
///
/// Rows are emitted per keyword row in that order, so a campaign repeats once
/// per keyword until [`dedup_campaigns`](super::dedup::dedup_campaigns) runs.
/// Rejected rows emit nothing and leave one error entry; a keyword row with no
/// matching ads keeps its three rows and also leaves an entry.
pub fn expand(
    keywords: &[Record],
    ads: &[Record],
    settings: &Settings,
    prefix: Option<&str>,
) -> Expansion {
    let ad_index = AdIndex::new(ads);
    let mut rows = Vec::with_capacity(keywords.len() * 4);
    let mut errors = ErrorCollector::new();

    for (index, record) in keywords.iter().enumerate() {
        let keys = record
            .require(Field::Campaign)
            .and_then(|campaign| Ok((campaign, record.require(Field::AdGroup)?)));
        let (campaign, ad_group) = match keys {
            Ok(keys) => keys,
            Err(err) => {
                tracing::debug!("Keyword row {} rejected: {}", index + 1, err);
                errors.record(record.clone(), RowIssue::MissingCampaignOrAdGroup);
                continue;
            }
        };

        if let Err(issue) = validate_campaign_name(Some(&campaign), prefix) {
            errors.record(record.clone(), issue);
            continue;
        }

        let defaults = resolve_defaults(&campaign, settings);
        let max_cpc = record
            .text(Field::MaxCpc)
            .or_else(|| settings.default_max_cpc.clone());

        rows.push(BulkRow::Campaign(CampaignRow {
            campaign: campaign.clone(),
            status: ENABLED.to_string(),
            campaign_type: defaults
                .campaign_type
                .unwrap_or_else(|| DEFAULT_CAMPAIGN_TYPE.to_string()),
            budget: defaults.budget,
            location_targeting: defaults.location_targeting,
            language_targeting: defaults.language_targeting,
            bid_strategy_type: defaults.bid_strategy_type,
        }));

        rows.push(BulkRow::AdGroup(AdGroupRow {
            campaign: campaign.clone(),
            ad_group: ad_group.clone(),
            status: ENABLED.to_string(),
            max_cpc: max_cpc.clone(),
        }));

        rows.push(BulkRow::Keyword(KeywordRow {
            campaign: campaign.clone(),
            ad_group: ad_group.clone(),
            keyword: record.text(Field::Keyword),
            match_type: record
                .text(Field::MatchType)
                .unwrap_or_else(|| DEFAULT_MATCH_TYPE.to_string()),
            max_cpc,
        }));

        let matched = ad_index.matching(&campaign, &ad_group);
        if matched.is_empty() {
            tracing::warn!(
                "No ads found for campaign '{}', ad group '{}'",
                campaign,
                ad_group
            );
            let snapshot = Record::from_pairs([
                ("Campaign", campaign.as_str()),
                ("Ad group", ad_group.as_str()),
            ]);
            errors.record(snapshot, RowIssue::NoAdsFound);
            continue;
        }

        for ad in matched {
            rows.push(BulkRow::Ad(AdRow {
                campaign: campaign.clone(),
                ad_group: ad_group.clone(),
                ad_type: ad
                    .text(Field::AdType)
                    .unwrap_or_else(|| DEFAULT_AD_TYPE.to_string()),
                headlines: ad.text(Field::Headlines),
                descriptions: ad.text(Field::Descriptions),
                final_url: ad.text(Field::FinalUrl),
                status: ad.text(Field::Status).unwrap_or_else(|| ENABLED.to_string()),
            }));
        }
    }

    tracing::debug!(
        "Expanded {} keyword rows into {} bulk rows ({} issues)",
        keywords.len(),
        rows.len(),
        errors.len()
    );

    Expansion {
        rows,
        errors: errors.into_entries(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::RecordType;
    use serde_json::json;

    fn keyword(campaign: &str, ad_group: &str, keyword: &str) -> Record {
        Record::from_pairs([
            ("Campaign", campaign),
            ("Ad Group", ad_group),
            ("Keyword", keyword),
        ])
    }

    fn ad(campaign: &str, ad_group: &str, headline: &str) -> Record {
        Record::from_pairs([
            ("Campaign", campaign),
            ("Ad Group", ad_group),
            ("Headlines", headline),
        ])
    }

    fn types(rows: &[BulkRow]) -> Vec<RecordType> {
        rows.iter().map(BulkRow::record_type).collect()
    }

    #[test]
    fn test_emission_order_per_keyword_row() {
        let keywords = vec![keyword("C1", "AG1", "shoes"), keyword("C1", "AG1", "boots")];
        let ads = vec![ad("C1", "AG1", "H1"), ad("C1", "AG1", "H2")];

        let expansion = expand(&keywords, &ads, &Settings::builtin(), None);

        assert!(expansion.errors.is_empty());
        assert_eq!(
            types(&expansion.rows),
            vec![
                RecordType::Campaign,
                RecordType::AdGroup,
                RecordType::Keyword,
                RecordType::Ad,
                RecordType::Ad,
                RecordType::Campaign,
                RecordType::AdGroup,
                RecordType::Keyword,
                RecordType::Ad,
                RecordType::Ad,
            ]
        );
    }

    #[test]
    fn test_missing_campaign_or_ad_group_rejects_row() {
        let keywords = vec![
            Record::from_pairs([("Ad Group", "AG1"), ("Keyword", "k")]),
            Record::from_pairs([("Campaign", json!("C1")), ("Ad Group", serde_json::Value::Null)]),
            Record::from_pairs([("Campaign", ""), ("Ad Group", "AG1")]),
        ];

        let expansion = expand(&keywords, &[], &Settings::builtin(), None);

        assert!(expansion.rows.is_empty());
        assert_eq!(expansion.errors.len(), 3);
        for entry in &expansion.errors {
            assert_eq!(entry.issue, RowIssue::MissingCampaignOrAdGroup);
        }
        assert_eq!(expansion.errors[0].record, keywords[0]);
    }

    #[test]
    fn test_blank_campaign_name_fails_validation() {
        let keywords = vec![keyword("   ", "AG1", "k")];
        let expansion = expand(&keywords, &[], &Settings::builtin(), None);

        assert!(expansion.rows.is_empty());
        assert_eq!(expansion.errors[0].issue, RowIssue::EmptyCampaignName);
    }

    #[test]
    fn test_keyword_defaults_and_max_cpc_fallback() {
        let keywords = vec![
            keyword("C1", "AG1", "shoes"),
            Record::from_pairs([
                ("campaign", "C1"),
                ("ad group", "AG2"),
                ("keyword", "boots"),
                ("match type", "Broad"),
                ("max cpc", "7"),
            ]),
        ];

        let expansion = expand(&keywords, &[], &Settings::builtin(), None);

        match (&expansion.rows[1], &expansion.rows[2]) {
            (BulkRow::AdGroup(group), BulkRow::Keyword(kw)) => {
                assert_eq!(group.max_cpc.as_deref(), Some("50"));
                assert_eq!(kw.match_type, "Phrase");
                assert_eq!(kw.max_cpc.as_deref(), Some("50"));
            }
            other => panic!("unexpected rows: {:?}", other),
        }
        match (&expansion.rows[4], &expansion.rows[5]) {
            (BulkRow::AdGroup(group), BulkRow::Keyword(kw)) => {
                assert_eq!(group.max_cpc.as_deref(), Some("7"));
                assert_eq!(kw.keyword.as_deref(), Some("boots"));
                assert_eq!(kw.match_type, "Broad");
                assert_eq!(kw.max_cpc.as_deref(), Some("7"));
            }
            other => panic!("unexpected rows: {:?}", other),
        }
    }

    #[test]
    fn test_max_cpc_empty_without_default() {
        let keywords = vec![keyword("C1", "AG1", "shoes")];
        let expansion = expand(&keywords, &[], &Settings::default(), None);

        match &expansion.rows[1] {
            BulkRow::AdGroup(group) => assert_eq!(group.max_cpc, None),
            other => panic!("unexpected row: {:?}", other),
        }
    }

    #[test]
    fn test_ad_defaults() {
        let keywords = vec![keyword("C1", "AG1", "shoes")];
        let ads = vec![
            ad("C1", "AG1", "Buy"),
            Record::from_pairs([
                ("campaign", "C1"),
                ("AD GROUP", "AG1"),
                ("Ad Type", "Expanded text ad"),
                ("status", "Paused"),
                ("final url", "http://x.com"),
            ]),
        ];

        let expansion = expand(&keywords, &ads, &Settings::builtin(), None);

        match (&expansion.rows[3], &expansion.rows[4]) {
            (BulkRow::Ad(first), BulkRow::Ad(second)) => {
                assert_eq!(first.ad_type, "Responsive search ad");
                assert_eq!(first.status, "Enabled");
                assert_eq!(first.headlines.as_deref(), Some("Buy"));
                assert_eq!(first.final_url, None);
                assert_eq!(second.ad_type, "Expanded text ad");
                assert_eq!(second.status, "Paused");
                assert_eq!(second.final_url.as_deref(), Some("http://x.com"));
            }
            other => panic!("unexpected rows: {:?}", other),
        }
    }

    #[test]
    fn test_join_is_exact_and_needs_both_keys() {
        let keywords = vec![keyword("C1", "AG1", "shoes")];
        let ads = vec![
            ad("c1", "AG1", "wrong case"),
            ad("C1", "AG1 ", "trailing space"),
            Record::from_pairs([("Campaign", "C1"), ("Headlines", "no ad group")]),
        ];

        let expansion = expand(&keywords, &ads, &Settings::builtin(), None);

        assert_eq!(expansion.rows.len(), 3);
        assert_eq!(expansion.errors.len(), 1);
        assert_eq!(expansion.errors[0].issue, RowIssue::NoAdsFound);
        assert_eq!(
            expansion.errors[0].record,
            Record::from_pairs([("Campaign", "C1"), ("Ad group", "AG1")])
        );
    }

    #[test]
    fn test_campaign_type_from_mapping() {
        let settings = Settings::from_json_str(
            r#"{"campaign_mappings": {"DS-": {"Campaign Type": "Display"}}}"#,
        )
        .unwrap();
        let keywords = vec![keyword("DS-1", "AG", "k"), keyword("SR-1", "AG", "k")];

        let expansion = expand(&keywords, &[], &settings, None);

        match (&expansion.rows[0], &expansion.rows[3]) {
            (BulkRow::Campaign(display), BulkRow::Campaign(search)) => {
                assert_eq!(display.campaign_type, "Display");
                assert_eq!(search.campaign_type, "Search");
                assert_eq!(search.budget, "1000");
            }
            other => panic!("unexpected rows: {:?}", other),
        }
    }
}
