//! CSV export of the filtered order list, one row per order line.

use crate::errors::ApiError;
use crate::formatting::EXPORT_DATE_FORMAT;
use crate::repository::OrderRecord;
use csv::{QuoteStyle, WriterBuilder};
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

pub const EXPORT_HEADER: [&str; 9] = [
    "ID",
    "Ref",
    "CreateDate",
    "InvoiceDate",
    "Company",
    "Customer firstName",
    "Customer lastName",
    "Amount",
    "Status",
];

const FILE_PREFIX: &str = "export_list_order_datatable";

/// A written export, ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub path: PathBuf,
    pub body: Vec<u8>,
}

impl CsvExport {
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Fields are never quoted, so separators and line breaks become spaces.
fn sanitize(value: &str) -> String {
    value.replace([';', '\r', '\n'], " ")
}

fn order_rows(record: &OrderRecord) -> impl Iterator<Item = [String; 9]> + '_ {
    let address = record.invoice_address.as_ref();
    let status = record
        .status
        .as_ref()
        .map(|status| status.code.clone())
        .unwrap_or_default();

    record.lines.iter().map(move |line| {
        [
            record.id.to_string(),
            sanitize(&record.reference),
            record.created_at.format(EXPORT_DATE_FORMAT).to_string(),
            record
                .invoice_date
                .map(|date| date.format(EXPORT_DATE_FORMAT).to_string())
                .unwrap_or_default(),
            sanitize(address.and_then(|a| a.company.as_deref()).unwrap_or_default()),
            sanitize(address.map(|a| a.firstname.as_str()).unwrap_or_default()),
            sanitize(address.map(|a| a.lastname.as_str()).unwrap_or_default()),
            format!("{:.2}", line.amount()),
            sanitize(&status),
        ]
    })
}

/// Header row plus one `;`-separated row per order line. Orders without lines produce no row.
///
/// # Errors
///
/// Returns an internal error if the CSV writer fails.
pub fn render_csv(records: &[OrderRecord]) -> Result<Vec<u8>, ApiError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    let csv_error = |err: csv::Error| ApiError::internal("Could not build the export", Some(err.to_string()));

    writer.write_record(EXPORT_HEADER).map_err(csv_error)?;
    for record in records {
        for row in order_rows(record) {
            writer.write_record(&row).map_err(csv_error)?;
        }
    }

    writer
        .into_inner()
        .map_err(|err| ApiError::internal("Could not build the export", Some(err.to_string())))
}

/// `export_list_order_datatable<sha256 of the rows>.csv`
#[must_use]
pub fn export_filename(body: &[u8]) -> String {
    format!("{FILE_PREFIX}{:x}.csv", Sha256::digest(body))
}

/// Render the export and write it to `dir`, replacing any previous file of the same name.
///
/// # Errors
///
/// Returns an internal error when the CSV cannot be built or the file cannot be written.
pub async fn write_export(dir: &Path, records: &[OrderRecord]) -> Result<CsvExport, ApiError> {
    let body = render_csv(records)?;
    let filename = export_filename(&body);
    let path = dir.join(&filename);

    let io_error = |err: io::Error| ApiError::internal("Could not write the export", Some(err.to_string()));

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed previous export"),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(io_error(err)),
    }
    tokio::fs::write(&path, &body).await.map_err(io_error)?;

    tracing::info!(path = %path.display(), orders = records.len(), "Wrote order export");
    Ok(CsvExport {
        filename,
        path,
        body,
    })
}
