use crate::analysis::{self, DocumentContent, FieldChange};
use crate::desk::DocumentDesk;
use crate::errors::{AppError, AppResult};
use crate::facets::FilterEvent;
use crate::models::{
    AnalyzeDocumentPayload, EditDocumentRequest, ExportDelimitedPayload, TagSuggestionsRequest, UploadDocumentsPayload,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeRequest {
    #[serde(default)]
    pub id: Value,
    pub cmd: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BridgeResponse {
    fn success(id: Value, data: Value) -> Self {
        Self {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(id: Value, error: String) -> Self {
        Self {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

pub async fn dispatch(desk: &DocumentDesk, request: BridgeRequest) -> BridgeResponse {
    let BridgeRequest { id, cmd, args } = request;
    match invoke(desk, &cmd, args).await {
        Ok(data) => BridgeResponse::success(id, data),
        Err(error) => {
            tracing::warn!(cmd = %cmd, error = %error, "command failed");
            BridgeResponse::failure(id, to_client_error(error))
        }
    }
}

async fn invoke(desk: &DocumentDesk, cmd: &str, args: Value) -> AppResult<Value> {
    match cmd {
        "upload_documents" => {
            let payload: UploadDocumentsPayload = parse_args(args)?;
            to_value(desk.upload_documents(payload.names).await?)
        }
        "list_documents" => to_value(desk.list_documents()?.as_slice()),
        "get_document" => {
            let id = args
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| AppError::BadRequest("args.id is required".to_string()))?;
            to_value(desk.get_document(id)?)
        }
        "edit_document" => {
            let payload: EditDocumentRequest = parse_args(args)?;
            to_value(desk.edit_document(payload)?)
        }
        "filter_event" => {
            let event: FilterEvent = parse_args(args)?;
            to_value(desk.apply_filter_event(event)?)
        }
        "current_view" => to_value(desk.current_view()?),
        "tag_suggestions" => {
            let payload: TagSuggestionsRequest = parse_args(args)?;
            to_value(desk.tag_suggestions(&payload.search)?)
        }
        "get_settings" => to_value(desk.settings()),
        "analysis_fields" => to_value(desk.analysis_fields()?),
        "update_analysis_fields" => {
            let change: FieldChange = parse_args(args)?;
            to_value(desk.update_analysis_fields(change)?)
        }
        "analyze_document" => {
            let payload: AnalyzeDocumentPayload = parse_args(args)?;
            let content = DocumentContent::decode(&payload.content, payload.encoding, payload.mime_type.as_deref())?;
            to_value(desk.analyze_document(content, payload.num_pages.unwrap_or(1)).await?)
        }
        "export_delimited" => {
            let payload: ExportDelimitedPayload = parse_args(args)?;
            let fields = analysis::fields_from_object(&payload.fields);
            to_value(desk.export_delimited(&fields).await?)
        }
        other => Err(AppError::NotFound(format!("unknown command '{}'", other))),
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> AppResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    Ok(serde_json::from_value(args)?)
}

fn to_value<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|error| AppError::Internal(error.to_string()))
}

/// Handles one request line. Blank lines produce no response.
pub async fn handle_line(desk: &DocumentDesk, line: &str) -> Option<BridgeResponse> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<BridgeRequest>(line) {
        Ok(request) => Some(dispatch(desk, request).await),
        Err(error) => {
            tracing::warn!(error = %error, "malformed bridge request");
            Some(BridgeResponse::failure(
                Value::Null,
                to_client_error(AppError::BadRequest(error.to_string())),
            ))
        }
    }
}

/// Serves JSON-lines requests until the reader reaches end of input.
pub async fn serve<R, W>(desk: &DocumentDesk, reader: R, mut writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let Some(response) = handle_line(desk, &line).await else {
            continue;
        };
        let mut encoded = serde_json::to_string(&response).map_err(|error| AppError::Internal(error.to_string()))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

pub fn to_client_error(error: impl std::fmt::Display) -> String {
    error.to_string()
}
