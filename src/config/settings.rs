use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

pub const FALLBACK_LOCATION: &str = "India";
pub const FALLBACK_LANGUAGE: &str = "English";
pub const FALLBACK_BUDGET: &str = "1000";
pub const FALLBACK_BID_STRATEGY: &str = "Maximize conversions";

pub const SETTINGS_EXTENSIONS: &[&str] = &["json", "toml", "csv"];

/// Team-lead settings: per-campaign overrides plus account-wide defaults.
///
/// Every field is optional. Whatever is left unset falls back to the
/// `FALLBACK_*` constants when defaults are resolved for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub campaign_mappings: CampaignMappings,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_location: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_language: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        serialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_budget: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_bid_strategy: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        serialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_max_cpc: Option<String>,
}

/// Partial campaign defaults keyed by campaign name or name prefix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignOverrides {
    #[serde(
        rename = "Location Targeting",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub location_targeting: Option<String>,

    #[serde(
        rename = "Language Targeting",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub language_targeting: Option<String>,

    #[serde(
        rename = "Budget",
        default,
        deserialize_with = "scalar_text",
        serialize_with = "amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<String>,

    #[serde(
        rename = "Campaign Type",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub campaign_type: Option<String>,

    #[serde(
        rename = "Bid Strategy Type",
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub bid_strategy_type: Option<String>,
}

impl CampaignOverrides {
    /// Sets a field by its sheet column name. Returns false for unknown names.
    pub fn set(&mut self, field: &str, value: Option<String>) -> bool {
        let slot = match field.trim().to_ascii_lowercase().as_str() {
            "location targeting" => &mut self.location_targeting,
            "language targeting" => &mut self.language_targeting,
            "budget" => &mut self.budget,
            "campaign type" => &mut self.campaign_type,
            "bid strategy type" => &mut self.bid_strategy_type,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Campaign mappings in document order.
///
/// Order is significant: prefix lookup takes the first matching key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignMappings {
    entries: Vec<(String, CampaignOverrides)>,
}

impl CampaignMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated key keeps its first position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, overrides: CampaignOverrides) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = overrides,
            None => self.entries.push((key, overrides)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CampaignOverrides> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, overrides)| overrides)
    }

    pub fn entry_mut(&mut self, key: &str) -> &mut CampaignOverrides {
        let index = match self.entries.iter().position(|(existing, _)| existing == key) {
            Some(index) => index,
            None => {
                self.entries
                    .push((key.to_string(), CampaignOverrides::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn first_prefix_match(&self, campaign_name: &str) -> Option<(&str, &CampaignOverrides)> {
        self.entries
            .iter()
            .find(|(prefix, _)| campaign_name.starts_with(prefix.as_str()))
            .map(|(prefix, overrides)| (prefix.as_str(), overrides))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CampaignOverrides)> {
        self.entries
            .iter()
            .map(|(key, overrides)| (key.as_str(), overrides))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, CampaignOverrides)> for CampaignMappings {
    fn from_iter<I: IntoIterator<Item = (K, CampaignOverrides)>>(iter: I) -> Self {
        let mut mappings = CampaignMappings::new();
        for (key, overrides) in iter {
            mappings.insert(key, overrides);
        }
        mappings
    }
}

impl Serialize for CampaignMappings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, overrides) in &self.entries {
            map.serialize_entry(key, overrides)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CampaignMappings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MappingsVisitor;

        impl<'de> Visitor<'de> for MappingsVisitor {
            type Value = CampaignMappings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of campaign name or prefix to campaign defaults")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut mappings = CampaignMappings::new();
                while let Some((key, overrides)) =
                    access.next_entry::<String, CampaignOverrides>()?
                {
                    mappings.insert(key, overrides);
                }
                Ok(mappings)
            }
        }

        deserializer.deserialize_map(MappingsVisitor)
    }
}

/// Settings documents write amounts either as numbers or as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

fn scalar_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Flag(flag) => flag.to_string(),
    }))
}

fn amount<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value.as_deref() {
        Some(text) => {
            if let Ok(n) = text.parse::<i64>() {
                serializer.serialize_i64(n)
            } else if let Ok(n) = text.parse::<f64>() {
                serializer.serialize_f64(n)
            } else {
                serializer.serialize_str(text)
            }
        }
        None => serializer.serialize_none(),
    }
}

impl Settings {
    /// The sample settings shipped with the tool.
    pub fn builtin() -> Self {
        let gdc_india = CampaignOverrides {
            location_targeting: Some("India".to_string()),
            language_targeting: None,
            budget: Some("5000".to_string()),
            campaign_type: Some("Search".to_string()),
            bid_strategy_type: Some("Maximize conversions".to_string()),
        };

        Self {
            campaign_mappings: [("LG-2025-GDC-India", gdc_india)].into_iter().collect(),
            default_location: Some(FALLBACK_LOCATION.to_string()),
            default_language: Some(FALLBACK_LANGUAGE.to_string()),
            default_budget: Some(FALLBACK_BUDGET.to_string()),
            default_bid_strategy: Some(FALLBACK_BID_STRATEGY.to_string()),
            default_max_cpc: Some("50".to_string()),
        }
    }

    /// Built-in settings when no path is given, otherwise the parsed and
    /// validated file. A file that does not parse is an error.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            tracing::info!("No settings file supplied, using built-in defaults");
            return Ok(Self::builtin());
        };

        let settings = Self::from_file(path)?;
        settings.validate()?;
        tracing::info!(
            "Loaded settings from {} ({} campaign mappings)",
            path,
            settings.campaign_mappings.len()
        );
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        validation::validate_file_extension("settings", &display, SETTINGS_EXTENSIONS)?;

        let content = std::fs::read_to_string(path).map_err(EtlError::IoError)?;
        match validation::file_extension(&display).as_deref() {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_csv_str(&content),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        serde_json::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
            field: "settings".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        toml::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
            field: "settings".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Two-column `key,value` table.
    ///
    /// Keys are the global setting names, or
    /// `campaign_mappings.<name or prefix>.<Field Name>` for a mapping field.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        let is_key_value = headers.len() >= 2
            && headers[0].eq_ignore_ascii_case("key")
            && headers[1].eq_ignore_ascii_case("value");
        if !is_key_value {
            return Err(EtlError::ConfigValidationError {
                field: "settings".to_string(),
                message: "settings table must have a 'key,value' header".to_string(),
            });
        }

        let mut settings = Settings::default();
        for row in reader.records() {
            let row = row?;
            let key = row.get(0).unwrap_or_default();
            if key.is_empty() {
                continue;
            }
            let value = row
                .get(1)
                .filter(|value| !value.is_empty())
                .map(str::to_string);
            settings.apply_pair(key, value)?;
        }
        Ok(settings)
    }

    fn apply_pair(&mut self, key: &str, value: Option<String>) -> Result<()> {
        match key {
            "default_location" => self.default_location = value,
            "default_language" => self.default_language = value,
            "default_budget" => self.default_budget = value,
            "default_bid_strategy" => self.default_bid_strategy = value,
            "default_max_cpc" => self.default_max_cpc = value,
            _ => {
                let Some(rest) = key.strip_prefix("campaign_mappings.") else {
                    tracing::warn!("Ignoring unknown settings key: {}", key);
                    return Ok(());
                };
                let Some((campaign, field)) = rest.rsplit_once('.') else {
                    return Err(EtlError::ConfigValidationError {
                        field: key.to_string(),
                        message: "expected campaign_mappings.<name>.<field>".to_string(),
                    });
                };
                if !self.campaign_mappings.entry_mut(campaign).set(field, value) {
                    tracing::warn!("Ignoring unknown campaign mapping field: {}", field);
                }
            }
        }
        Ok(())
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("default_location", &self.default_location),
            ("default_language", &self.default_language),
            ("default_bid_strategy", &self.default_bid_strategy),
        ] {
            if let Some(value) = value {
                validation::validate_non_empty_string(field, value)?;
            }
        }

        let mut amounts = vec![
            ("default_budget".to_string(), &self.default_budget),
            ("default_max_cpc".to_string(), &self.default_max_cpc),
        ];
        for (key, overrides) in self.campaign_mappings.iter() {
            validation::validate_non_empty_string("campaign_mappings", key)?;
            amounts.push((format!("campaign_mappings.{}.Budget", key), &overrides.budget));
        }

        // Amounts are copied into the sheet as written.
        for (field, value) in amounts {
            if let Some(value) = value {
                if let Err(e) = validation::validate_amount(&field, value) {
                    tracing::warn!("{}", e);
                }
            }
        }

        Ok(())
    }
}
