use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod faker;

/// Upper bound on rows a single generate request may ask for.
pub const MAX_GENERATED_RECORDS: u32 = 10_000;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataPool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
}

#[derive(Deserialize)]
pub struct GenerateDataPool {
    pub name: String,
    pub records: u32,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Deserialize)]
pub struct PoolFilter {
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("data pool not found")]
    NotFound,
    #[error("a new data pool cannot already have an id")]
    IdExists,
    #[error("unknown data type: {0}")]
    UnknownDataType(String),
    #[error("requested {0} records, limit is {max}", max = MAX_GENERATED_RECORDS)]
    TooManyRecords(u32),
    #[error("csv export failed: {0}")]
    Csv(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::IdExists
            | ServerError::UnknownDataType(_)
            | ServerError::TooManyRecords(_) => StatusCode::BAD_REQUEST,
            ServerError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type Db = Arc<RwLock<BTreeMap<String, DataPool>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route(
            "/api/data-pools",
            get(list_pools).post(create_pool).put(update_pool_from_body),
        )
        .route("/api/data-pools/generate", post(generate_pool))
        .route(
            "/api/data-pools/{id}",
            get(get_pool).put(update_pool).delete(delete_pool),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_pools(State(db): State<Db>, Query(filter): Query<PoolFilter>) -> Json<Vec<DataPool>> {
    let pools = db.read().await;
    let matching = pools
        .values()
        .filter(|pool| match (&filter.name, &pool.name) {
            (None, _) => true,
            (Some(wanted), Some(name)) => name.contains(wanted.as_str()),
            (Some(_), None) => false,
        })
        .cloned()
        .collect();
    Json(matching)
}

async fn insert_new(db: &Db, mut pool: DataPool) -> Response {
    let id = Uuid::new_v4().to_string();
    pool.id = Some(id.clone());
    db.write().await.insert(id.clone(), pool.clone());
    tracing::debug!(%id, "created data pool");
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/data-pools/{id}"))],
        Json(pool),
    )
        .into_response()
}

async fn create_pool(
    State(db): State<Db>,
    Json(pool): Json<DataPool>,
) -> Result<Response, ServerError> {
    if pool.id.is_some() {
        return Err(ServerError::IdExists);
    }
    Ok(insert_new(&db, pool).await)
}

async fn generate_pool(
    State(db): State<Db>,
    Json(request): Json<GenerateDataPool>,
) -> Result<Response, ServerError> {
    if request.records > MAX_GENERATED_RECORDS {
        return Err(ServerError::TooManyRecords(request.records));
    }
    let data_types: Vec<&str> = request.columns.iter().map(|c| c.data_type.as_str()).collect();
    let rows = faker::generate_rows(&data_types, request.records as usize)?;
    let pool = DataPool {
        id: None,
        name: Some(request.name),
        description: None,
        columns: request.columns.into_iter().map(|c| c.name).collect(),
        rows,
    };
    Ok(insert_new(&db, pool).await)
}

/// `GET /api/data-pools/{id}` also serves `{id}.csv` exports; the router
/// cannot match a suffix inside a segment.
async fn get_pool(State(db): State<Db>, Path(id): Path<String>) -> Result<Response, ServerError> {
    let pools = db.read().await;
    if let Some(stripped) = id.strip_suffix(".csv") {
        let pool = pools.get(stripped).ok_or(ServerError::NotFound)?;
        return render_csv(pool);
    }
    let pool = pools.get(&id).cloned().ok_or(ServerError::NotFound)?;
    Ok(Json(pool).into_response())
}

fn render_csv(pool: &DataPool) -> Result<Response, ServerError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !pool.columns.is_empty() {
        writer
            .write_record(&pool.columns)
            .map_err(|e| ServerError::Csv(e.to_string()))?;
    }
    for row in &pool.rows {
        writer
            .write_record(row)
            .map_err(|e| ServerError::Csv(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ServerError::Csv(e.to_string()))?;
    let filename = pool.name.as_deref().or(pool.id.as_deref()).unwrap_or("data-pool");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}.csv\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Saves are upserts: a pool that does not exist yet is stored under `id`.
async fn update_pool(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(mut pool): Json<DataPool>,
) -> Json<DataPool> {
    pool.id = Some(id.clone());
    db.write().await.insert(id, pool.clone());
    Json(pool)
}

/// `PUT /api/data-pools` without an id in the path falls back to create when
/// the body carries no id either.
async fn update_pool_from_body(State(db): State<Db>, Json(pool): Json<DataPool>) -> Response {
    match pool.id.clone() {
        Some(id) => {
            db.write().await.insert(id, pool.clone());
            Json(pool).into_response()
        }
        None => insert_new(&db, pool).await,
    }
}

async fn delete_pool(State(db): State<Db>, Path(id): Path<String>) -> StatusCode {
    db.write().await.remove(&id);
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_without_id_omits_field() {
        let pool = DataPool {
            name: Some("Test".to_string()),
            ..DataPool::default()
        };
        let json = serde_json::to_value(&pool).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["name"], "Test");
        assert_eq!(json["columns"], serde_json::json!([]));
    }

    #[test]
    fn pool_accepts_minimal_body() {
        let pool: DataPool = serde_json::from_str("{}").unwrap();
        assert!(pool.id.is_none());
        assert!(pool.rows.is_empty());
    }

    #[test]
    fn generate_request_reads_camel_case_columns() {
        let input: GenerateDataPool = serde_json::from_str(
            r#"{"name":"people","records":3,"columns":[{"name":"first","dataType":"name.firstName"}]}"#,
        )
        .unwrap();
        assert_eq!(input.records, 3);
        assert_eq!(input.columns[0].data_type, "name.firstName");
    }

    #[test]
    fn generate_request_rejects_missing_records() {
        let result: Result<GenerateDataPool, _> =
            serde_json::from_str(r#"{"name":"people","columns":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let pool = DataPool {
            id: Some("p1".to_string()),
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec!["1".to_string(), "x, y".to_string()]],
            ..DataPool::default()
        };
        let response = render_csv(&pool).unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"p1.csv\""
        );
    }
}
