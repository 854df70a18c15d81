use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;

use super::{A1Range, CellFormat, SheetInfo, SheetsApi, SheetsError, SheetsResult};
use crate::config::SheetsConfig;

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const TOKEN_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the provider's expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
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
    #[serde(default)]
    hidden: bool,
}

impl From<SheetProperties> for SheetInfo {
    fn from(p: SheetProperties) -> Self {
        SheetInfo { sheet_id: p.sheet_id, title: p.title, hidden: p.hidden }
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Google Sheets v4 client for one spreadsheet, authenticated as a service
/// account.
pub struct GoogleSheets {
    http: reqwest::Client,
    spreadsheet_id: String,
    client_email: String,
    signing_key: EncodingKey,
    token: Mutex<Option<CachedToken>>,
}

impl GoogleSheets {
    pub fn new(config: &SheetsConfig) -> SheetsResult<Self> {
        let signing_key = EncodingKey::from_rsa_pem(config.private_key.as_bytes())
            .map_err(|e| SheetsError::Auth(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            client_email: config.client_email.clone(),
            signing_key,
            token: Mutex::new(None),
        })
    }

    fn spreadsheet_url(&self) -> String {
        format!("{SHEETS_BASE}/{}", self.spreadsheet_id)
    }

    fn values_url(&self, range: &A1Range) -> String {
        format!("{}/values/{}", self.spreadsheet_url(), range.encoded())
    }

    async fn access_token(&self) -> SheetsResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + EXPIRY_MARGIN < token.expires_at {
                return Ok(token.token.clone());
            }
        }

        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: SCOPE,
            aud: TOKEN_URI,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| SheetsError::Auth(e.to_string()))?;

        let resp = self
            .http
            .post(TOKEN_URI)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Auth(format!("{}: {body}", status.as_u16())));
        }
        let body: TokenResponse = resp.json().await?;
        debug!("refreshed sheets access token");

        *cached = Some(CachedToken {
            token: body.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        });
        Ok(body.access_token)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> SheetsResult<reqwest::Response> {
        let token = self.access_token().await?;
        let resp = request.bearer_auth(token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api { status: status.as_u16(), message });
        }
        Ok(resp)
    }

    async fn batch_update(&self, requests: Vec<Value>) -> SheetsResult<Vec<Value>> {
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let resp = self
            .send(self.http.post(url).json(&json!({ "requests": requests })))
            .await?;
        let body: Value = resp.json().await?;
        Ok(body
            .get("replies")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

fn reply_properties(replies: &[Value], kind: &str) -> SheetsResult<SheetInfo> {
    let properties = replies
        .first()
        .and_then(|reply| reply.get(kind))
        .and_then(|reply| reply.get("properties"))
        .cloned()
        .ok_or_else(|| SheetsError::Unexpected(format!("{kind} reply without properties")))?;
    let properties: SheetProperties = serde_json::from_value(properties)
        .map_err(|e| SheetsError::Unexpected(e.to_string()))?;
    Ok(properties.into())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn repeat_cell(sheet_id: i64, format: &CellFormat) -> Value {
    let mut text_format = json!({ "bold": format.bold });
    let mut fields = vec!["backgroundColor", "textFormat"];
    if let Some(size) = format.font_size {
        text_format["fontSize"] = json!(size);
    }
    let mut cell_format = json!({
        "backgroundColor": {
            "red": format.background.red,
            "green": format.background.green,
            "blue": format.background.blue,
        },
        "textFormat": text_format,
    });
    if format.centered {
        cell_format["horizontalAlignment"] = json!("CENTER");
        fields.push("horizontalAlignment");
    }

    json!({
        "repeatCell": {
            "range": {
                "sheetId": sheet_id,
                "startRowIndex": format.rows.0,
                "endRowIndex": format.rows.1,
                "startColumnIndex": format.columns.0,
                "endColumnIndex": format.columns.1,
            },
            "cell": { "userEnteredFormat": cell_format },
            "fields": format!("userEnteredFormat({})", fields.join(",")),
        }
    })
}

#[async_trait]
impl SheetsApi for GoogleSheets {
    async fn sheets(&self) -> SheetsResult<Vec<SheetInfo>> {
        let request = self
            .http
            .get(self.spreadsheet_url())
            .query(&[("fields", "sheets.properties")]);
        let meta: SpreadsheetMeta = self.send(request).await?.json().await?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.into()).collect())
    }

    async fn add_sheet(&self, title: &str) -> SheetsResult<SheetInfo> {
        let replies = self
            .batch_update(vec![json!({ "addSheet": { "properties": { "title": title } } })])
            .await?;
        reply_properties(&replies, "addSheet")
    }

    async fn duplicate_sheet(&self, source_sheet_id: i64, new_title: &str) -> SheetsResult<SheetInfo> {
        let replies = self
            .batch_update(vec![json!({
                "duplicateSheet": {
                    "sourceSheetId": source_sheet_id,
                    "newSheetName": new_title,
                }
            })])
            .await?;
        reply_properties(&replies, "duplicateSheet")
    }

    async fn set_hidden(&self, sheet_id: i64, hidden: bool) -> SheetsResult<()> {
        self.batch_update(vec![json!({
            "updateSheetProperties": {
                "properties": { "sheetId": sheet_id, "hidden": hidden },
                "fields": "hidden",
            }
        })])
        .await?;
        Ok(())
    }

    async fn format_cells(&self, sheet_id: i64, formats: &[CellFormat]) -> SheetsResult<()> {
        let requests = formats.iter().map(|f| repeat_cell(sheet_id, f)).collect();
        self.batch_update(requests).await?;
        Ok(())
    }

    async fn get_values(&self, range: &A1Range) -> SheetsResult<Vec<Vec<String>>> {
        let body: ValueRange = self
            .send(self.http.get(self.values_url(range)))
            .await?
            .json()
            .await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn update_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()> {
        let request = self
            .http
            .put(self.values_url(range))
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": values }));
        self.send(request).await?;
        Ok(())
    }

    async fn append_values(&self, range: &A1Range, values: Vec<Vec<String>>) -> SheetsResult<()> {
        let request = self
            .http
            .post(format!("{}:append", self.values_url(range)))
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": values }));
        self.send(request).await?;
        Ok(())
    }

    async fn clear_values(&self, range: &A1Range) -> SheetsResult<()> {
        let request = self
            .http
            .post(format!("{}:clear", self.values_url(range)))
            .json(&json!({}));
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::Rgb;

    #[test]
    fn test_repeat_cell_request_shape() {
        let format = CellFormat {
            rows: (0, 1),
            columns: (9, 17),
            background: Rgb { red: 0.9, green: 0.7, blue: 0.7 },
            bold: true,
            font_size: Some(12),
            centered: true,
        };
        let request = repeat_cell(42, &format);
        let inner = &request["repeatCell"];
        assert_eq!(inner["range"]["sheetId"], 42);
        assert_eq!(inner["range"]["endColumnIndex"], 17);
        assert_eq!(inner["cell"]["userEnteredFormat"]["textFormat"]["fontSize"], 12);
        assert_eq!(
            inner["fields"],
            "userEnteredFormat(backgroundColor,textFormat,horizontalAlignment)"
        );
    }

    #[test]
    fn test_reply_properties_reads_new_sheet() {
        let replies = vec![json!({
            "duplicateSheet": { "properties": { "sheetId": 7, "title": "Tiger TKD", "hidden": true } }
        })];
        let info = reply_properties(&replies, "duplicateSheet").unwrap();
        assert_eq!(info, SheetInfo { sheet_id: 7, title: "Tiger TKD".into(), hidden: true });
        assert!(reply_properties(&replies, "addSheet").is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(json!("A1")), "A1");
        assert_eq!(cell_text(json!(110)), "110");
        assert_eq!(cell_text(Value::Null), "");
    }
}
