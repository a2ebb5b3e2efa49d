use serde::{Deserialize, Serialize};
use crate::books::dto::BookDto;

// Outcome of a bulk import: the service reports at least how many records landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub count: u64,
}

// Exported catalog payload, already encoded in the requested format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub content: String,
}

// Catalog state after the server reverted its most recent mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoSnapshot {
    pub remaining_undos: u64,
    pub books: Vec<BookDto>,
}

// ResponseData is the closed set of payload shapes the catalog service sends
// back, one variant per operation family. A 2xx body outside this set is
// reported as a malformed payload, not trusted downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Books(Vec<BookDto>),
    Book(BookDto),
    Import(ImportOutcome),
    Export(ExportDocument),
    Undo(UndoSnapshot),
}

impl ResponseData {
    pub fn as_books(&self) -> Option<&[BookDto]> {
        match self {
            ResponseData::Books(books) => Some(books.as_slice()),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&BookDto> {
        match self {
            ResponseData::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_export(&self) -> Option<&ExportDocument> {
        match self {
            ResponseData::Export(doc) => Some(doc),
            _ => None,
        }
    }
}

// ApiResponse is the uniform outcome of every catalog operation. Exactly one
// of {success with meaningful data} or {failure with an error message} holds;
// status_code is set whenever an HTTP response was received at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<ResponseData>,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
}

impl ApiResponse {
    pub fn ok(status_code: u16, data: Option<ResponseData>) -> ApiResponse {
        ApiResponse {
            success: true,
            data,
            status_code: Some(status_code),
            error_message: None,
        }
    }

    pub fn http_error(status_code: u16, message: &str) -> ApiResponse {
        ApiResponse {
            success: false,
            data: None,
            status_code: Some(status_code),
            error_message: Some(message.to_string()),
        }
    }

    // Transport-level failure: no response was received, so no status code.
    pub fn transport_error(message: &str) -> ApiResponse {
        ApiResponse {
            success: false,
            data: None,
            status_code: None,
            error_message: Some(message.to_string()),
        }
    }

    // Short human-readable line for the presentation layer to surface.
    // Returns None for successful responses.
    pub fn failure_summary(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let status = match self.status_code {
            Some(code) => code.to_string(),
            None => "Connection error".to_string(),
        };
        let detail = self.error_message.as_deref().unwrap_or("Unexpected error");
        Some(format!("Request failed ({}): {}", status, detail))
    }
}
