//! Reading input sheets into [`Record`]s and writing the bulk sheet back out.

use crate::domain::model::{BulkRow, ErrorEntry, Record};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::file_extension;
use serde_json::Value;

pub const TABLE_EXTENSIONS: &[&str] = &["csv", "json"];

/// Union header of all four record types, in Editor column order.
pub const BULK_COLUMNS: [&str; 18] = [
    "Record Type",
    "Campaign",
    "Campaign Status",
    "Campaign Type",
    "Budget",
    "Location Targeting",
    "Language Targeting",
    "Bid Strategy Type",
    "Ad Group",
    "Ad Group Status",
    "Max CPC",
    "Keyword",
    "Match Type",
    "Ad Type",
    "Headlines",
    "Descriptions",
    "Final URL",
    "Status",
];

pub const ERROR_REPORT_COLUMNS: [&str; 2] = ["Reason", "Record"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses `bytes` by the extension of `path`.
pub fn parse_table(path: &str, bytes: &[u8]) -> Result<Vec<Record>> {
    match file_extension(path).as_deref() {
        Some("csv") => parse_csv_table(path, bytes),
        Some("json") => parse_json_table(path, bytes),
        _ => Err(EtlError::TableFormatError {
            path: path.to_string(),
            reason: format!("expected one of: {}", TABLE_EXTENSIONS.join(", ")),
        }),
    }
}

/// Header row required. Short rows leave their trailing columns missing.
pub fn parse_csv_table(path: &str, bytes: &[u8]) -> Result<Vec<Record>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        return Err(EtlError::TableFormatError {
            path: path.to_string(),
            reason: "no header row".to_string(),
        });
    }
    if headers.iter().any(String::is_empty) {
        return Err(EtlError::TableFormatError {
            path: path.to_string(),
            reason: "empty column name in header".to_string(),
        });
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() > headers.len() {
            let line = row.position().map_or(index as u64 + 2, |pos| pos.line());
            return Err(EtlError::TableFormatError {
                path: path.to_string(),
                reason: format!(
                    "row {} has {} fields, header has {}",
                    line,
                    row.len(),
                    headers.len()
                ),
            });
        }
        let data = headers
            .iter()
            .zip(row.iter())
            .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
            .collect();
        records.push(Record { data });
    }

    tracing::debug!("Parsed {} rows from {}", records.len(), path);
    Ok(records)
}

/// A JSON array of flat objects.
pub fn parse_json_table(path: &str, bytes: &[u8]) -> Result<Vec<Record>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    serde_json::from_slice::<Vec<Record>>(bytes).map_err(|e| EtlError::TableFormatError {
        path: path.to_string(),
        reason: format!("expected a JSON array of objects: {}", e),
    })
}

fn cell(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// The row laid out under [`BULK_COLUMNS`]; columns a record type does not
/// carry are empty.
pub fn bulk_cells(row: &BulkRow) -> [&str; 18] {
    let record_type = row.record_type().as_str();
    match row {
        BulkRow::Campaign(r) => [
            record_type,
            r.campaign.as_str(),
            r.status.as_str(),
            r.campaign_type.as_str(),
            r.budget.as_str(),
            r.location_targeting.as_str(),
            r.language_targeting.as_str(),
            r.bid_strategy_type.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ],
        BulkRow::AdGroup(r) => [
            record_type,
            r.campaign.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            r.ad_group.as_str(),
            r.status.as_str(),
            cell(&r.max_cpc),
            "",
            "",
            "",
            "",
            "",
            "",
            "",
        ],
        BulkRow::Keyword(r) => [
            record_type,
            r.campaign.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            r.ad_group.as_str(),
            "",
            cell(&r.max_cpc),
            cell(&r.keyword),
            r.match_type.as_str(),
            "",
            "",
            "",
            "",
            "",
        ],
        BulkRow::Ad(r) => [
            record_type,
            r.campaign.as_str(),
            "",
            "",
            "",
            "",
            "",
            "",
            r.ad_group.as_str(),
            "",
            "",
            "",
            "",
            r.ad_type.as_str(),
            cell(&r.headlines),
            cell(&r.descriptions),
            cell(&r.final_url),
            r.status.as_str(),
        ],
    }
}

pub fn write_bulk_csv(rows: &[BulkRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(BULK_COLUMNS)?;
    for row in rows {
        writer.write_record(bulk_cells(row))?;
    }
    finish(writer)
}

pub fn write_error_report(errors: &[ErrorEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ERROR_REPORT_COLUMNS)?;
    for entry in errors {
        writer.write_record([entry.reason(), entry.record.to_string()])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("bulk sheet is not valid UTF-8: {}", e),
    })
}
