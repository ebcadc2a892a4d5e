use crate::domain::model::BulkRow;
use std::collections::HashSet;

/// Drops every Campaign row whose campaign name was already seen.
/// Other record types pass through untouched and in order.
pub fn dedup_campaigns(rows: Vec<BulkRow>) -> Vec<BulkRow> {
    let before = rows.len();
    let mut seen = HashSet::new();

    let kept: Vec<BulkRow> = rows
        .into_iter()
        .filter(|row| match row {
            BulkRow::Campaign(campaign) => seen.insert(campaign.campaign.clone()),
            _ => true,
        })
        .collect();

    tracing::debug!("Removed {} duplicate campaign rows", before - kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CampaignRow, KeywordRow, RecordType};

    fn campaign(name: &str, budget: &str) -> BulkRow {
        BulkRow::Campaign(CampaignRow {
            campaign: name.to_string(),
            status: "Enabled".to_string(),
            campaign_type: "Search".to_string(),
            budget: budget.to_string(),
            location_targeting: "India".to_string(),
            language_targeting: "English".to_string(),
            bid_strategy_type: "Maximize conversions".to_string(),
        })
    }

    fn keyword(name: &str, text: &str) -> BulkRow {
        BulkRow::Keyword(KeywordRow {
            campaign: name.to_string(),
            ad_group: "AG".to_string(),
            keyword: Some(text.to_string()),
            match_type: "Phrase".to_string(),
            max_cpc: None,
        })
    }

    #[test]
    fn test_keeps_first_campaign_row() {
        let rows = vec![
            campaign("A", "1"),
            keyword("A", "k1"),
            campaign("B", "2"),
            keyword("B", "k2"),
            campaign("A", "3"),
            keyword("A", "k3"),
        ];

        let deduped = dedup_campaigns(rows);

        assert_eq!(
            deduped,
            vec![
                campaign("A", "1"),
                keyword("A", "k1"),
                campaign("B", "2"),
                keyword("B", "k2"),
                keyword("A", "k3"),
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![
            campaign("A", "1"),
            campaign("A", "1"),
            keyword("A", "k"),
            keyword("A", "k"),
            campaign("B", "1"),
        ];

        let once = dedup_campaigns(rows);
        let twice = dedup_campaigns(once.clone());
        assert_eq!(once, twice);

        let campaign_rows = once
            .iter()
            .filter(|row| row.record_type() == RecordType::Campaign)
            .count();
        assert_eq!(campaign_rows, 2);
        // duplicate non-campaign rows survive
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_campaigns(Vec::new()).is_empty());
    }
}
