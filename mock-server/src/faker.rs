//! Deterministic fake values for `POST /api/data-pools/generate`.
//!
//! Data types use the `category.kind` keys the generator UI sends. Values
//! depend only on the row index so tests can assert on them.

use crate::ServerError;

const FIRST_NAMES: &[&str] = &["Ana", "Luis", "Maria", "Jorge", "Sofia", "Diego", "Lucia", "Pablo"];
const LAST_NAMES: &[&str] = &["Garcia", "Lopez", "Martinez", "Hernandez", "Perez", "Ramirez"];
const CITIES: &[&str] = &["Mexico City", "Puebla", "Monterrey", "Guadalajara", "Oaxaca"];
const WORDS: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta"];

pub const SUPPORTED_TYPES: &[&str] = &[
    "name.firstName",
    "name.lastName",
    "name.fullName",
    "address.city",
    "internet.emailAddress",
    "number.digit",
    "lorem.word",
];

fn pick(list: &[&str], index: usize) -> String {
    list[index % list.len()].to_string()
}

/// One value of `data_type` for row `index`.
pub fn generate(data_type: &str, index: usize) -> Result<String, ServerError> {
    let value = match data_type {
        "name.firstName" => pick(FIRST_NAMES, index),
        "name.lastName" => pick(LAST_NAMES, index),
        "name.fullName" => format!("{} {}", pick(FIRST_NAMES, index), pick(LAST_NAMES, index)),
        "address.city" => pick(CITIES, index),
        "internet.emailAddress" => format!(
            "{}.{}{index}@example.com",
            pick(FIRST_NAMES, index).to_lowercase(),
            pick(LAST_NAMES, index).to_lowercase()
        ),
        "number.digit" => (index % 10).to_string(),
        "lorem.word" => pick(WORDS, index),
        other => return Err(ServerError::UnknownDataType(other.to_string())),
    };
    Ok(value)
}

/// `n` rows with one value per entry of `data_types`.
pub fn generate_rows(data_types: &[&str], n: usize) -> Result<Vec<Vec<String>>, ServerError> {
    if let Some(unknown) = data_types.iter().find(|t| !SUPPORTED_TYPES.contains(*t)) {
        return Err(ServerError::UnknownDataType((*unknown).to_string()));
    }
    (0..n)
        .map(|i| data_types.iter().map(|t| generate(t, i)).collect())
        .collect()
}
