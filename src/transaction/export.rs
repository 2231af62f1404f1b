//! Downloading the dashboard's transactions as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Serialize;
use time::Date;

use crate::{
    AppState, Error,
    dashboard::{DashboardQuery, displayed_transactions},
    session::{SessionId, SessionRegistry, with_store},
    timezone::local_today,
    transaction::Transaction,
};

/// The name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "transactions.csv";

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// Every live session and its transactions.
    pub sessions: Arc<Mutex<SessionRegistry>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: Date,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Type")]
    type_: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Description")]
    description: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(transaction: &'a Transaction) -> Self {
        Self {
            date: transaction.date,
            category: &transaction.category,
            type_: transaction.type_.to_string(),
            amount: format!("{:.2}", transaction.amount),
            description: &transaction.description,
        }
    }
}

const CSV_HEADER: [&str; 5] = ["Date", "Category", "Type", "Amount", "Description"];

/// Serialize `rows` as CSV with a header row, in the order given.
///
/// Fields that contain a comma, quote or newline are quoted.
///
/// # Errors
/// Returns an [Error::CsvExportError] if a row could not be written.
pub fn export_csv(rows: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(vec![]);

    // Written by hand so that an empty export still has a header.
    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::CsvExportError(error.to_string()))?;

    for transaction in rows {
        writer
            .serialize(CsvRow::from(transaction))
            .map_err(|error| Error::CsvExportError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))
}

/// Download the transactions shown on the dashboard for the same query string.
pub async fn get_export_transactions(
    State(state): State<ExportState>,
    Extension(session_id): Extension<SessionId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let rows = with_store(&state.sessions, session_id, |store| {
        displayed_transactions(&store.read_all(), &query, today)
    })?;

    let csv = export_csv(&rows).inspect_err(|error| {
        tracing::error!("Could not export transactions for session {session_id}: {error}")
    })?;

    tracing::info!("Exported {} transactions for session {session_id}", rows.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use axum_extra::extract::Query;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        dashboard::DashboardQuery,
        session::{SessionId, SessionRegistry},
        test_utils::{assert_content_type, assert_status_ok, get_header},
        transaction::{Transaction, TransactionFields, TransactionType},
    };

    use super::{ExportState, export_csv, get_export_transactions};

    fn transaction(id: i64, category: &str, amount: f64, description: &str) -> Transaction {
        Transaction {
            id,
            date: date!(2024 - 01 - 05),
            category: category.to_owned(),
            type_: TransactionType::Expense,
            amount,
            description: description.to_owned(),
        }
    }

    #[test]
    fn empty_export_has_only_header() {
        let csv = export_csv(&[]).unwrap();

        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Date,Category,Type,Amount,Description\n"
        );
    }

    #[test]
    fn formats_rows() {
        let csv = export_csv(&[transaction(0, "Food", 42.5, "Lunch")]).unwrap();

        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Date,Category,Type,Amount,Description\n2024-01-05,Food,Expense,42.50,Lunch\n"
        );
    }

    #[test]
    fn quotes_fields_with_delimiters() {
        let csv = export_csv(&[transaction(0, "Food, drink", 3.0, "Said \"hi\"\nthen left")])
            .unwrap();

        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Date,Category,Type,Amount,Description\n\
            2024-01-05,\"Food, drink\",Expense,3.00,\"Said \"\"hi\"\"\nthen left\"\n"
        );
    }

    #[test]
    fn round_trips_through_csv_reader() {
        let rows = vec![
            transaction(0, "Food, drink", 42.5, "Multi\nline"),
            Transaction {
                id: 1,
                date: date!(2023 - 12 - 24),
                category: "Salary".to_owned(),
                type_: TransactionType::Income,
                amount: 2000.0,
                description: String::new(),
            },
        ];

        let csv = export_csv(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["Date", "Category", "Type", "Amount", "Description"]
        );
        let records = reader
            .records()
            .map(|record| record.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(records.len(), rows.len());
        for (record, transaction) in records.iter().zip(&rows) {
            assert_eq!(&record[0], transaction.date.to_string());
            assert_eq!(&record[1], transaction.category);
            assert_eq!(&record[2], transaction.type_.to_string());
            assert_eq!(record[3].parse::<f64>().unwrap(), transaction.amount);
            assert_eq!(&record[4], transaction.description);
        }
    }

    #[tokio::test]
    async fn endpoint_exports_filtered_rows_as_attachment() {
        let mut registry = SessionRegistry::default();
        let session_id: SessionId = registry.create(OffsetDateTime::now_utc());
        let store = registry.store_mut(session_id).unwrap();
        for (category, type_) in [
            ("Food", TransactionType::Expense),
            ("Salary", TransactionType::Income),
        ] {
            store.append(
                TransactionFields::new(date!(2024 - 01 - 05), category, type_, 10.0, "").unwrap(),
            );
        }
        let state = ExportState {
            sessions: Arc::new(Mutex::new(registry)),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let query: DashboardQuery =
            serde_html_form::from_str("apply=true&start=2024-01-01&end=2024-01-31&type=income&category=Salary&category=Food")
                .unwrap();

        let response = get_export_transactions(State(state), Extension(session_id), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        assert_content_type(&response, "text/csv; charset=utf-8");
        assert_eq!(
            get_header(&response, "content-disposition"),
            "attachment; filename=\"transactions.csv\""
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "Date,Category,Type,Amount,Description\n2024-01-05,Salary,Income,10.00,\n"
        );
    }
}
