pub mod collector;
pub mod dedup;
pub mod expander;
pub mod resolver;
pub mod validator;

pub use collector::ErrorCollector;
pub use dedup::dedup_campaigns;
pub use expander::{expand, Expansion};
pub use resolver::{resolve_defaults, ResolvedDefaults};
pub use validator::validate_campaign_name;

use crate::config::settings::Settings;
use crate::domain::model::Record;

/// Expansion followed by campaign dedup: the complete bulk sheet and every
/// row issue, uncapped.
pub fn build_bulk_sheet(
    keywords: &[Record],
    ads: &[Record],
    settings: &Settings,
    prefix: Option<&str>,
) -> Expansion {
    let Expansion { rows, errors } = expand(keywords, ads, settings, prefix);
    Expansion {
        rows: dedup_campaigns(rows),
        errors,
    }
}
