//! Async data-access object over a `Transport`.
//!
//! Every method is one round-trip: build the request, execute it, parse the
//! response. The service holds no mutable state, so any number of calls can
//! be in flight at once and they complete in whatever order the server
//! answers.

use crate::client::DataPoolClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::Operation;
use crate::transport::{Transport, UreqTransport};
use crate::types::{CsvDocument, DataPool, GenerateDataPool, QueryParams};

#[derive(Debug, Clone)]
pub struct DataPoolService<T: Transport> {
    client: DataPoolClient,
    transport: T,
}

impl DataPoolService<UreqTransport> {
    pub fn from_config(config: ClientConfig) -> Self {
        Self::new(
            DataPoolClient::from_url(config.base_url),
            UreqTransport::new(config.timeout),
        )
    }
}

impl<T: Transport> DataPoolService<T> {
    pub fn new(client: DataPoolClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DataPoolClient {
        &self.client
    }

    pub async fn query(&self, params: &QueryParams) -> Result<Vec<DataPool>, ApiError> {
        let request = self.client.build_query(params)?;
        let response = self.round_trip(Operation::Query, request).await?;
        self.client.parse_query(response)
    }

    /// `Ok(None)` when the server returned an empty body for `id`.
    pub async fn get(&self, id: &str) -> Result<Option<DataPool>, ApiError> {
        let request = self.client.build_get(id)?;
        let response = self.round_trip(Operation::Get, request).await?;
        self.client.parse_get(response)
    }

    pub async fn create(&self, pool: &DataPool) -> Result<DataPool, ApiError> {
        let request = self.client.build_create(pool)?;
        let response = self.round_trip(Operation::Create, request).await?;
        self.client.parse_create(response)
    }

    pub async fn generate(&self, input: &GenerateDataPool) -> Result<DataPool, ApiError> {
        let request = self.client.build_generate(input)?;
        let response = self.round_trip(Operation::Generate, request).await?;
        self.client.parse_generate(response)
    }

    pub async fn update(&self, id: &str, pool: &DataPool) -> Result<Option<DataPool>, ApiError> {
        let request = self.client.build_update(id, pool)?;
        let response = self.round_trip(Operation::Update, request).await?;
        self.client.parse_update(response)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete(id)?;
        let response = self.round_trip(Operation::Delete, request).await?;
        self.client.parse_delete(response)
    }

    pub async fn download(&self, id: &str) -> Result<CsvDocument, ApiError> {
        let request = self.client.build_download(id)?;
        let response = self.round_trip(Operation::Download, request).await?;
        self.client.parse_download(response)
    }

    async fn round_trip(
        &self,
        operation: Operation,
        request: HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        let name = operation.descriptor().name;
        tracing::debug!(operation = name, method = %request.method, url = %request.url, "data-pool request");
        let response = self.transport.execute(request).await?;
        tracing::debug!(operation = name, status = response.status, "data-pool response");
        Ok(response)
    }
}
