use crate::config::settings::{
    CampaignOverrides, Settings, FALLBACK_BID_STRATEGY, FALLBACK_BUDGET, FALLBACK_LANGUAGE,
    FALLBACK_LOCATION,
};

/// Effective campaign defaults after mapping lookup and fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDefaults {
    pub location_targeting: String,
    pub language_targeting: String,
    pub budget: String,
    pub bid_strategy_type: String,
    /// Left unset here; the campaign row falls back to "Search".
    pub campaign_type: Option<String>,
}

/// Exact mapping key, then the first prefix key in document order, then the
/// account-wide defaults, then the built-in constants.
pub fn resolve_defaults(campaign_name: &str, settings: &Settings) -> ResolvedDefaults {
    let mappings = &settings.campaign_mappings;
    let overrides = match mappings.get(campaign_name) {
        Some(exact) => {
            tracing::trace!("Campaign {} matched mapping exactly", campaign_name);
            Some(exact)
        }
        None => mappings
            .first_prefix_match(campaign_name)
            .map(|(prefix, overrides)| {
                tracing::trace!("Campaign {} matched mapping prefix {}", campaign_name, prefix);
                overrides
            }),
    };

    let empty = CampaignOverrides::default();
    let overrides = overrides.unwrap_or(&empty);

    let pick = |own: &Option<String>, global: &Option<String>, fallback: &str| {
        own.clone()
            .or_else(|| global.clone())
            .unwrap_or_else(|| fallback.to_string())
    };

    ResolvedDefaults {
        location_targeting: pick(
            &overrides.location_targeting,
            &settings.default_location,
            FALLBACK_LOCATION,
        ),
        language_targeting: pick(
            &overrides.language_targeting,
            &settings.default_language,
            FALLBACK_LANGUAGE,
        ),
        budget: pick(&overrides.budget, &settings.default_budget, FALLBACK_BUDGET),
        bid_strategy_type: pick(
            &overrides.bid_strategy_type,
            &settings.default_bid_strategy,
            FALLBACK_BID_STRATEGY,
        ),
        campaign_type: overrides.campaign_type.clone(),
    }
}
