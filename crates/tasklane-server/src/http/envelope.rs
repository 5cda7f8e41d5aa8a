//! Response envelope.
//!
//! Every HTTP response body has the same shape:
//!
//! ```json
//! {
//!   "success": true,
//!   "code": 200,
//!   "in_modal": false,
//!   "data": { "has_paginate": 0, "results": [] },
//!   "message": [{ "id": "all", "content": "" }]
//! }
//! ```
//!
//! `data` grows pagination fields for paged results. Message ids are
//! `"all"` for global messages or a field name for validation errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::db::Page;
use crate::i18n::Translator;
use crate::validation::FieldErrors;

/// Message id used for messages that are not tied to a field.
pub const GLOBAL_MESSAGE_ID: &str = "all";

/// One `{id, content}` message entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub content: String,
}

impl Message {
    pub fn global(content: impl Into<String>) -> Self {
        Self {
            id: GLOBAL_MESSAGE_ID.to_string(),
            content: content.into(),
        }
    }
}

/// Result data handed to `Envelope::success`, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No data.
    Empty,
    /// A single object.
    Item(Value),
    /// A plain array. A non-empty array is nested as a single result.
    Array(Vec<Value>),
    /// A collection whose elements are the results.
    Collection(Vec<Value>),
    /// A page of results with its metadata.
    Page(Page<Value>),
}

impl Payload {
    pub fn item<T: Serialize>(item: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::Item(serde_json::to_value(item)?))
    }

    pub fn collection<T: Serialize>(items: &[T]) -> Result<Self, serde_json::Error> {
        let items = items
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Collection(items))
    }

    pub fn page<T: Serialize>(page: Page<T>) -> Result<Self, serde_json::Error> {
        Ok(Self::Page(page.try_map(|item| serde_json::to_value(&item))?))
    }
}

impl From<Option<Value>> for Payload {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Array(items)) => Self::Array(items),
            Some(item) => Self::Item(item),
        }
    }
}

/// Page fields for a fully counted page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullPage {
    pub has_paginate: u8,
    pub total_data: u64,
    pub current_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub first_page_url: String,
    pub last_page: u64,
    pub last_page_url: String,
    pub next_page_url: String,
    pub prev_page_url: String,
    pub path: String,
    pub per_page: u64,
    pub results: Vec<Value>,
}

/// Page fields for a page without a total count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimalPage {
    pub has_paginate: u8,
    pub current_page: u64,
    pub first_page_url: String,
    pub next_page_url: String,
    pub prev_page_url: String,
    pub path: String,
    pub per_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub results: Vec<Value>,
}

/// Page fields without URLs, for infinite-scroll clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_data: Option<u64>,
    pub current_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    pub per_page: u64,
    pub results: Vec<Value>,
}

/// Page fields for resource collections: counters only, no URLs or totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourcePage {
    pub has_paginate: u8,
    pub current_page: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub per_page: u64,
    pub results: Vec<Value>,
}

/// The `data` block of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DataBlock {
    Plain { has_paginate: u8, results: Vec<Value> },
    Full(FullPage),
    Minimal(MinimalPage),
    Compact(CompactPage),
    Resource(ResourcePage),
    Results { results: Vec<Value> },
}

impl DataBlock {
    /// Unpaginated block with no results.
    pub fn empty() -> Self {
        Self::plain(Vec::new())
    }

    pub fn plain(results: Vec<Value>) -> Self {
        Self::Plain {
            has_paginate: 0,
            results,
        }
    }

    /// Normalize any payload shape.
    pub fn from_payload(payload: Payload) -> Self {
        match payload {
            Payload::Empty => Self::empty(),
            Payload::Item(item) => Self::plain(vec![item]),
            Payload::Array(items) if items.is_empty() => Self::empty(),
            Payload::Array(items) => Self::plain(vec![Value::Array(items)]),
            Payload::Collection(items) => Self::plain(items),
            Payload::Page(page) => Self::from_page(page),
        }
    }

    /// Full or minimal page fields, depending on whether the page is counted.
    pub fn from_page(page: Page<Value>) -> Self {
        let from = page.from();
        let to = page.to();
        let first_page_url = page.first_page_url();
        let next_page_url = page.next_page_url().unwrap_or_default();
        let prev_page_url = page.prev_page_url().unwrap_or_default();

        match (page.total, page.last_page(), page.last_page_url()) {
            (Some(total), Some(last_page), Some(last_page_url)) => Self::Full(FullPage {
                has_paginate: 1,
                total_data: total,
                current_page: page.current_page,
                from,
                to,
                first_page_url,
                last_page,
                last_page_url,
                next_page_url,
                prev_page_url,
                path: page.path,
                per_page: page.per_page,
                results: page.items,
            }),
            _ => Self::Minimal(MinimalPage {
                has_paginate: 1,
                current_page: page.current_page,
                first_page_url,
                next_page_url,
                prev_page_url,
                path: page.path,
                per_page: page.per_page,
                from,
                to,
                results: page.items,
            }),
        }
    }

    /// Results of this block, whatever its shape.
    pub fn results(&self) -> &[Value] {
        match self {
            Self::Plain { results, .. } | Self::Results { results } => results,
            Self::Full(page) => &page.results,
            Self::Minimal(page) => &page.results,
            Self::Compact(page) => &page.results,
            Self::Resource(page) => &page.results,
        }
    }
}

/// Normalized response wrapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub code: u16,
    pub in_modal: bool,
    pub data: DataBlock,
    pub message: Vec<Message>,
}

impl Envelope {
    fn new(success: bool, code: StatusCode, data: DataBlock, message: Vec<Message>) -> Self {
        Self {
            success,
            code: code.as_u16(),
            in_modal: false,
            data,
            message,
        }
    }

    /// Successful response carrying `data`, code 200.
    pub fn success(data: impl Into<Payload>, message: impl Into<String>) -> Self {
        Self::new(
            true,
            StatusCode::OK,
            DataBlock::from_payload(data.into()),
            vec![Message::global(message)],
        )
    }

    /// Single global message with no data, code 406 and `success: false`
    /// unless adjusted.
    pub fn message(text: impl Into<String>) -> Self {
        Self::new(
            false,
            StatusCode::NOT_ACCEPTABLE,
            DataBlock::empty(),
            vec![Message::global(text)],
        )
    }

    /// Validation failure, code 422: one message per field carrying the
    /// field's first error.
    pub fn validation_failure(errors: &FieldErrors) -> Self {
        let message = errors
            .iter()
            .filter_map(|(field, messages)| {
                messages.first().map(|first| Message {
                    id: field.to_string(),
                    content: first.clone(),
                })
            })
            .collect();
        Self::new(
            false,
            StatusCode::UNPROCESSABLE_ENTITY,
            DataBlock::empty(),
            message,
        )
    }

    /// Paged results with full pagination fields, code 200. Pages without a
    /// total count get the minimal field set instead.
    pub fn paginated_success(page: Page<Value>, message: impl Into<String>) -> Self {
        Self::new(
            true,
            StatusCode::OK,
            DataBlock::from_page(page),
            vec![Message::global(message)],
        )
    }

    /// Paged results with counts but no URLs, code 200.
    pub fn minimal_paginated_success(page: Page<Value>, message: impl Into<String>) -> Self {
        let data = DataBlock::Compact(CompactPage {
            total_data: page.total,
            current_page: page.current_page,
            from: page.from(),
            to: page.to(),
            last_page: page.last_page(),
            per_page: page.per_page,
            results: page.items,
        });
        Self::new(true, StatusCode::OK, data, vec![Message::global(message)])
    }

    /// Paged resource collection with counters only, code 200.
    pub fn resource_paginated_success(page: Page<Value>, message: impl Into<String>) -> Self {
        let data = DataBlock::Resource(ResourcePage {
            has_paginate: 1,
            current_page: page.current_page,
            from: page.from(),
            to: page.to(),
            per_page: page.per_page,
            results: page.items,
        });
        Self::new(true, StatusCode::OK, data, vec![Message::global(message)])
    }

    /// Bare results for "load more" clients, code 200.
    pub fn load_more_success(results: Vec<Value>, message: impl Into<String>) -> Self {
        Self::new(
            true,
            StatusCode::OK,
            DataBlock::Results { results },
            vec![Message::global(message)],
        )
    }

    /// Generic failure, code 500, with the localized server error text.
    pub fn server_error(translator: &Translator) -> Self {
        Self::new(
            false,
            StatusCode::INTERNAL_SERVER_ERROR,
            DataBlock::empty(),
            vec![Message::global(translator.get("messages.server_error"))],
        )
    }

    pub fn with_code(mut self, code: StatusCode) -> Self {
        self.code = code.as_u16();
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn in_modal(mut self, in_modal: bool) -> Self {
        self.in_modal = in_modal;
        self
    }

    /// HTTP status matching `code`.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}
