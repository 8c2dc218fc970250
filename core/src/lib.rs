//! Client core for the data-pool REST resource.
//!
//! # Overview
//! A fixed table maps each named operation (query, get, create, generate,
//! update, delete, download) to an HTTP method, a URL template and a
//! response shape. `DataPoolClient` turns that table into `HttpRequest`
//! values and parses `HttpResponse` values without touching the network;
//! `DataPoolService` pairs it with a `Transport` to expose async calls.
//!
//! # Design
//! - `DataPoolClient` is stateless; it holds only the base URL.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the core is testable without a server.
//! - Failures are never retried or logged here; they surface as `ApiError`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod service;
pub mod transport;
pub mod types;

pub use client::DataPoolClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use resource::{Operation, OperationDescriptor, ResponseShape, ResponseTransform, UrlTemplate};
pub use service::DataPoolService;
pub use transport::{Transport, UreqTransport};
pub use types::{ColumnSpec, CsvDocument, DataPool, GenerateDataPool, QueryParams};
