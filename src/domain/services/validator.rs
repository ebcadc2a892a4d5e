use crate::domain::model::RowIssue;

/// A missing or blank name is rejected; with a non-empty `prefix` the name
/// must also start with it.
pub fn validate_campaign_name(name: Option<&str>, prefix: Option<&str>) -> Result<(), RowIssue> {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(RowIssue::EmptyCampaignName),
    };

    match prefix {
        Some(prefix) if !prefix.is_empty() && !name.starts_with(prefix) => {
            Err(RowIssue::PrefixMismatch {
                prefix: prefix.to_string(),
            })
        }
        _ => Ok(()),
    }
}
