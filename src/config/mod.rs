pub mod cli;
pub mod settings;

#[cfg(feature = "cli")]
use crate::adapters::tabular::TABLE_EXTENSIONS;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ads-bulk")]
#[command(about = "Builds a Google Ads Editor bulk upload CSV from keyword and ad sheets")]
pub struct CliConfig {
    /// Keywords sheet: Campaign, Ad Group, Keyword, Match Type, Max CPC (CSV or JSON)
    #[arg(long)]
    pub keywords: Option<String>,

    /// Ads sheet: Campaign, Ad Group, Ad Type, Headlines, Descriptions, Final URL, Status
    #[arg(long)]
    pub ads: Option<String>,

    /// Team-lead settings (JSON, TOML or key,value CSV); built-in defaults when omitted
    #[arg(long)]
    pub settings: Option<String>,

    /// Required campaign name prefix; pass an empty string to disable the check
    #[arg(long, default_value = "LG-2025-")]
    pub prefix: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Write a zip with the bulk sheet, error report and effective settings
    #[arg(long)]
    pub bundle: bool,

    /// Print the first rows of the generated sheet
    #[arg(long)]
    pub preview: bool,

    /// Print the built-in settings document and exit
    #[arg(long)]
    pub print_default_settings: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn keywords_path(&self) -> &str {
        self.keywords.as_deref().unwrap_or_default()
    }

    fn ads_path(&self) -> &str {
        self.ads.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn campaign_prefix(&self) -> Option<&str> {
        Some(self.prefix.as_str()).filter(|prefix| !prefix.is_empty())
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let keywords = validation::validate_required_field("keywords", &self.keywords)?;
        validation::validate_path("keywords", keywords)?;
        validation::validate_file_extension("keywords", keywords, TABLE_EXTENSIONS)?;

        let ads = validation::validate_required_field("ads", &self.ads)?;
        validation::validate_path("ads", ads)?;
        validation::validate_file_extension("ads", ads, TABLE_EXTENSIONS)?;

        if let Some(settings_path) = &self.settings {
            validation::validate_path("settings", settings_path)?;
            validation::validate_file_extension(
                "settings",
                settings_path,
                settings::SETTINGS_EXTENSIONS,
            )?;
        }

        validation::validate_path("output_path", &self.output_path)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("ads-bulk").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--keywords", "kw.csv", "--ads", "ads.csv"]);
        assert_eq!(config.campaign_prefix(), Some("LG-2025-"));
        assert_eq!(config.output_path(), "./output");
        assert!(!config.bundle_output());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_prefix_disables_check() {
        let config = parse(&["--keywords", "kw.csv", "--ads", "ads.csv", "--prefix", ""]);
        assert_eq!(config.campaign_prefix(), None);
    }

    #[test]
    fn test_missing_inputs_fail_validation() {
        let config = parse(&["--ads", "ads.csv"]);
        assert!(matches!(
            config.validate(),
            Err(EtlError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unsupported_extensions_fail_validation() {
        let config = parse(&["--keywords", "kw.xlsx", "--ads", "ads.csv"]);
        assert!(config.validate().is_err());

        let config = parse(&[
            "--keywords",
            "kw.csv",
            "--ads",
            "ads.csv",
            "--settings",
            "settings.yaml",
        ]);
        assert!(config.validate().is_err());
    }
}
