//! Google Sheets v4 / Drive v3 client.
//!
//! Only the handful of endpoints the store needs are covered. Values are
//! written with `valueInputOption=RAW` so every cell stays text, and read
//! back as formatted values.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::auth::{ServiceAccountAuth, ServiceAccountCredentials};
use crate::client::{SpreadsheetClient, Worksheet};
use crate::errors::{Result, SheetsError};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedSpreadsheet {
    spreadsheet_id: String,
}

#[derive(Deserialize)]
struct SpreadsheetSheets {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct BatchUpdateResponse {
    #[serde(default)]
    replies: Vec<Value>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Spreadsheet client authenticated as a service account.
pub struct GoogleSheetsClient {
    client: reqwest::Client,
    auth: ServiceAccountAuth,
}

impl GoogleSheetsClient {
    pub fn new(credentials: ServiceAccountCredentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        let auth = ServiceAccountAuth::new(credentials, client.clone())?;
        Ok(Self { client, auth })
    }

    async fn headers(&self) -> Result<HeaderMap> {
        let token = self.auth.access_token().await?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| SheetsError::auth("Invalid access token format"))?;
        headers.insert(AUTHORIZATION, auth_value);
        Ok(headers)
    }

    /// Parse a JSON response body.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                return Err(SheetsError::api(
                    status.as_u16(),
                    format!("{}: {}", error.error.status, error.error.message),
                ));
            }
            return Err(SheetsError::api(
                status.as_u16(),
                format!("Request failed: {}", body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to deserialize response. Error: {}", e);
            SheetsError::api(status.as_u16(), format!("Failed to parse response: {}", e))
        })
    }

    async fn batch_update(&self, document_id: &str, requests: Value) -> Result<BatchUpdateResponse> {
        let url = format!("{}/{}:batchUpdate", SHEETS_API, document_id);
        let response = self
            .client
            .post(&url)
            .headers(self.headers().await?)
            .json(&json!({ "requests": requests }))
            .send()
            .await?;
        Self::parse_response(response).await
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Drive query literal: backslashes and single quotes escaped.
fn quote_query(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[async_trait]
impl SpreadsheetClient for GoogleSheetsClient {
    fn identity(&self) -> &str {
        self.auth.client_email()
    }

    /// GET drive/v3/files?q=name='{title}' and mimeType=spreadsheet
    async fn find_document(&self, title: &str) -> Result<Option<String>> {
        let query = format!(
            "name = {} and mimeType = '{}' and trashed = false",
            quote_query(title),
            SPREADSHEET_MIME
        );
        let response = self
            .client
            .get(DRIVE_FILES_API)
            .headers(self.headers().await?)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?;

        let list: DriveFileList = Self::parse_response(response).await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// POST sheets/v4/spreadsheets
    async fn create_document(&self, title: &str) -> Result<String> {
        debug!("Creating spreadsheet '{}'", title);
        let response = self
            .client
            .post(SHEETS_API)
            .headers(self.headers().await?)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await?;

        let created: CreatedSpreadsheet = Self::parse_response(response).await?;
        Ok(created.spreadsheet_id)
    }

    /// GET sheets/v4/spreadsheets/{id}?fields=sheets.properties
    async fn list_worksheets(&self, document_id: &str) -> Result<Vec<Worksheet>> {
        let url = format!("{}/{}", SHEETS_API, document_id);
        let response = self
            .client
            .get(&url)
            .headers(self.headers().await?)
            .query(&[("fields", "sheets.properties(sheetId,title)")])
            .send()
            .await?;

        let sheets: SpreadsheetSheets = Self::parse_response(response).await?;
        Ok(sheets
            .sheets
            .into_iter()
            .map(|entry| Worksheet {
                document_id: document_id.to_string(),
                sheet_id: entry.properties.sheet_id,
                title: entry.properties.title,
            })
            .collect())
    }

    async fn add_worksheet(
        &self,
        document_id: &str,
        title: &str,
        rows: u32,
        cols: u32,
    ) -> Result<Worksheet> {
        debug!("Adding worksheet '{}' to {}", title, document_id);
        let reply = self
            .batch_update(
                document_id,
                json!([{
                    "addSheet": {
                        "properties": {
                            "title": title,
                            "gridProperties": { "rowCount": rows, "columnCount": cols }
                        }
                    }
                }]),
            )
            .await?;

        let properties = reply
            .replies
            .into_iter()
            .next()
            .and_then(|r| r.get("addSheet")?.get("properties").cloned())
            .ok_or_else(|| SheetsError::not_found(format!("addSheet reply for '{}'", title)))?;
        let properties: SheetProperties = serde_json::from_value(properties)?;

        Ok(Worksheet {
            document_id: document_id.to_string(),
            sheet_id: properties.sheet_id,
            title: properties.title,
        })
    }

    /// GET sheets/v4/spreadsheets/{id}/values/{title}
    async fn fetch_values(&self, sheet: &Worksheet) -> Result<Vec<Vec<String>>> {
        let url = format!("{}/{}/values/{}", SHEETS_API, sheet.document_id, sheet.title);
        let response = self
            .client
            .get(&url)
            .headers(self.headers().await?)
            .query(&[("valueRenderOption", "FORMATTED_VALUE")])
            .send()
            .await?;

        let range: ValueRange = Self::parse_response(response).await?;
        debug!("Fetched {} row(s) from '{}'", range.values.len(), sheet.title);
        Ok(range
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    /// POST sheets/v4/spreadsheets/{id}/values/{title}:append
    async fn append_row(&self, sheet: &Worksheet, cells: Vec<String>) -> Result<()> {
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_API, sheet.document_id, sheet.title
        );
        let response = self
            .client
            .post(&url)
            .headers(self.headers().await?)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [cells] }))
            .send()
            .await?;

        Self::parse_response::<Value>(response).await.map(|_| ())
    }

    /// PUT sheets/v4/spreadsheets/{id}/values/{title}!A{row}
    async fn update_row(
        &self,
        sheet: &Worksheet,
        row_number: usize,
        cells: Vec<String>,
    ) -> Result<()> {
        let range = format!("{}!A{}", sheet.title, row_number);
        let url = format!("{}/{}/values/{}", SHEETS_API, sheet.document_id, range);
        let response = self
            .client
            .put(&url)
            .headers(self.headers().await?)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "values": [cells] }))
            .send()
            .await?;

        Self::parse_response::<Value>(response).await.map(|_| ())
    }

    /// POST sheets/v4/spreadsheets/{id}:batchUpdate (deleteDimension)
    async fn delete_row(&self, sheet: &Worksheet, row_number: usize) -> Result<()> {
        let start = row_number.saturating_sub(1);
        self.batch_update(
            &sheet.document_id,
            json!([{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet.sheet_id,
                        "dimension": "ROWS",
                        "startIndex": start,
                        "endIndex": start + 1
                    }
                }
            }]),
        )
        .await
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("Feed")), "Feed");
        assert_eq!(cell_text(&json!(500.5)), "500.5");
        assert_eq!(cell_text(&Value::Null), "");
    }

    #[test]
    fn test_quote_query_escapes_quotes() {
        assert_eq!(quote_query("DairyManagerDB"), "'DairyManagerDB'");
        assert_eq!(quote_query("Ram's farm"), r"'Ram\'s farm'");
    }
}
