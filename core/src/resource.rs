//! Declarative operation table for the data-pool resource.
//!
//! # Design
//! Each named operation maps to an `OperationDescriptor`: HTTP method, URL
//! template, expected response shape and an optional response transform.
//! The table is a `const`, built at compile time and never mutated, so
//! every call reads the same configuration.

use url::Url;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Template for JSON operations on the collection and on single pools.
pub const RESOURCE_URL: &str = "/api/data-pools/:id";
/// Template for the CSV export of a single pool.
pub const CSV_URL: &str = "/api/data-pools/:id.csv";
/// Server-side generation endpoint.
pub const GENERATE_URL: &str = "/api/data-pools/generate";

const ID_PLACEHOLDER: &str = ":id";

/// URL path pattern with at most one `:id` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlTemplate(&'static str);

impl UrlTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    pub fn has_id(&self) -> bool {
        self.0.contains(ID_PLACEHOLDER)
    }

    /// Resolve the template against `base`.
    ///
    /// The first segment carrying `:id` gets `id` substituted once and is
    /// percent-encoded as a single path segment. Without an id that segment
    /// is dropped, which yields the collection URL. A substituted segment of
    /// `.` or `..` is rejected: the path would collapse onto another resource.
    pub fn resolve(&self, base: &Url, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(base.to_string()))?;
            segments.pop_if_empty();

            let mut substituted = false;
            for segment in self.0.split('/').filter(|s| !s.is_empty()) {
                if !substituted && segment.contains(ID_PLACEHOLDER) {
                    substituted = true;
                    if let Some(id) = id {
                        let resolved = segment.replacen(ID_PLACEHOLDER, id, 1);
                        if resolved == "." || resolved == ".." {
                            return Err(ApiError::InvalidUrl(format!(
                                "id {id:?} resolves to a dot segment"
                            )));
                        }
                        segments.push(&resolved);
                    }
                    continue;
                }
                segments.push(segment);
            }
        }
        Ok(url)
    }
}

/// What a successful response body is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON array of entities.
    Array,
    /// A single JSON entity.
    Object,
    /// A single JSON entity or an empty body.
    OptionalObject,
    /// Raw text handed back untouched (CSV).
    Raw,
    /// No meaningful body.
    Empty,
}

/// Post-processing applied to the response body before shaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTransform {
    None,
    /// Decode the body from its text form; an empty body passes through
    /// as "no entity" without a parse attempt.
    DecodeJsonText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Query,
    Get,
    Create,
    Generate,
    Update,
    Delete,
    Download,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Query,
        Operation::Get,
        Operation::Create,
        Operation::Generate,
        Operation::Update,
        Operation::Delete,
        Operation::Download,
    ];

    pub fn descriptor(self) -> &'static OperationDescriptor {
        &OPERATIONS[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub method: HttpMethod,
    pub url_template: UrlTemplate,
    pub shape: ResponseShape,
    pub transform: ResponseTransform,
    /// Whether the operation targets a single pool and needs an id.
    pub requires_id: bool,
}

impl OperationDescriptor {
    /// True when an empty body is a valid "no entity" result.
    pub fn accepts_empty_body(&self) -> bool {
        matches!(self.shape, ResponseShape::OptionalObject | ResponseShape::Empty)
            || self.transform == ResponseTransform::DecodeJsonText
    }
}

// Indexed by `Operation as usize`; order must match the enum.
static OPERATIONS: [OperationDescriptor; 7] = [
    OperationDescriptor {
        name: "query",
        method: HttpMethod::Get,
        url_template: UrlTemplate::new(RESOURCE_URL),
        shape: ResponseShape::Array,
        transform: ResponseTransform::None,
        requires_id: false,
    },
    OperationDescriptor {
        name: "get",
        method: HttpMethod::Get,
        url_template: UrlTemplate::new(RESOURCE_URL),
        shape: ResponseShape::Object,
        transform: ResponseTransform::DecodeJsonText,
        requires_id: true,
    },
    OperationDescriptor {
        name: "create",
        method: HttpMethod::Post,
        url_template: UrlTemplate::new(RESOURCE_URL),
        shape: ResponseShape::Object,
        transform: ResponseTransform::None,
        requires_id: false,
    },
    OperationDescriptor {
        name: "generate",
        method: HttpMethod::Post,
        url_template: UrlTemplate::new(GENERATE_URL),
        shape: ResponseShape::Object,
        transform: ResponseTransform::None,
        requires_id: false,
    },
    OperationDescriptor {
        name: "update",
        method: HttpMethod::Put,
        url_template: UrlTemplate::new(RESOURCE_URL),
        shape: ResponseShape::OptionalObject,
        transform: ResponseTransform::None,
        requires_id: true,
    },
    OperationDescriptor {
        name: "delete",
        method: HttpMethod::Delete,
        url_template: UrlTemplate::new(RESOURCE_URL),
        shape: ResponseShape::Empty,
        transform: ResponseTransform::None,
        requires_id: true,
    },
    OperationDescriptor {
        name: "download",
        method: HttpMethod::Get,
        url_template: UrlTemplate::new(CSV_URL),
        shape: ResponseShape::Raw,
        transform: ResponseTransform::None,
        requires_id: true,
    },
];
