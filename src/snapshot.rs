use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::authz::Resource;
use crate::errors::{AppError, AppResult};
use crate::models::{Comment, Project, Task, User};

/// A requesting user and one loaded resource, as stored in a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub user: User,
    pub resource: Resource,
}

/// The resource stays raw here: serde buffers internally tagged enums, which
/// would hide the path of any error inside it.
#[derive(Deserialize)]
struct RawSnapshot {
    user: User,
    resource: Value,
}

impl Snapshot {
    pub fn from_json(input: &str) -> AppResult<Self> {
        let mut de = serde_json::Deserializer::from_str(input);
        let raw: RawSnapshot = serde_path_to_error::deserialize(&mut de).map_err(|err| invalid_at(err.path(), err.inner()))?;
        // reject trailing content after the document
        de.end()?;

        Ok(Snapshot {
            user: raw.user,
            resource: resource_from_value(raw.resource)?,
        })
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => AppError::not_found(format!("snapshot {} not found", path.display())),
            _ => AppError::internal(format!("failed to read {}: {err}", path.display())),
        })?;
        Self::from_json(&contents)
    }
}

fn resource_from_value(value: Value) -> AppResult<Resource> {
    let kind = match value.get("kind") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(AppError::bad_request("invalid snapshot at resource.kind: expected a string")),
        None => return Err(AppError::bad_request("invalid snapshot at resource.kind: missing field")),
    };

    match kind.as_str() {
        "project" => resource_body::<Project>(value).map(Resource::Project),
        "task" => resource_body::<Task>(value).map(Resource::Task),
        "comment" => resource_body::<Comment>(value).map(Resource::Comment),
        other => Err(AppError::bad_request(format!(
            "invalid snapshot at resource.kind: unknown resource kind `{other}`"
        ))),
    }
}

fn resource_body<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let path = if path == "." { "resource".to_string() } else { format!("resource.{path}") };
        AppError::bad_request(format!("invalid snapshot at {path}: {}", err.inner()))
    })
}

fn invalid_at(path: &serde_path_to_error::Path, err: &serde_json::Error) -> AppError {
    AppError::bad_request(format!("invalid snapshot at {path}: {err}"))
}
