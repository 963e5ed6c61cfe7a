//! # Backend: the seam to the hosted backend service
//!
//! Every controller in the `api` crate talks to persistence, authentication,
//! file storage and remote procedures through the [`Backend`] trait. Two
//! implementations live in this crate:
//!
//! - [`crate::RestBackend`]: the production client over the service's HTTP API.
//! - [`crate::MemoryBackend`]: in-process tables for tests and local demos.
//!
//! The trait returns plain `impl Future`s without a `Send` bound so the same
//! code runs on the browser's single-threaded executor.
//!
//! The free functions at the bottom ([`fetch`], [`fetch_one`], [`insert_one`],
//! [`insert_many`]) add typed decoding on top of the row-level calls.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::{SessionUser, UserMetadata};
use crate::query::{from_rows, to_row, Filter, Query, Row};

/// Async interface to the hosted backend service.
pub trait Backend {
    // --- auth ---
    fn current_user(&self) -> impl Future<Output = Result<Option<SessionUser>, StoreError>>;
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> impl Future<Output = Result<SessionUser, StoreError>>;
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<SessionUser, StoreError>>;
    fn sign_out(&self) -> impl Future<Output = Result<(), StoreError>>;

    // --- tables ---
    fn select(&self, query: &Query) -> impl Future<Output = Result<Vec<Row>, StoreError>>;
    fn insert(
        &self,
        table: &str,
        rows: Vec<Row>,
    ) -> impl Future<Output = Result<Vec<Row>, StoreError>>;
    fn update(
        &self,
        table: &str,
        patch: Row,
        filters: &[Filter],
    ) -> impl Future<Output = Result<Vec<Row>, StoreError>>;
    fn delete(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl Future<Output = Result<(), StoreError>>;

    // --- storage ---
    fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;
    fn public_url(&self, bucket: &str, path: &str) -> String;
    fn list(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>>;
    fn remove(
        &self,
        bucket: &str,
        paths: &[String],
    ) -> impl Future<Output = Result<(), StoreError>>;

    // --- remote procedures ---
    fn rpc(&self, function: &str, args: Value) -> impl Future<Output = Result<Value, StoreError>>;
}

/// Run a read and decode every row.
pub async fn fetch<T: DeserializeOwned, B: Backend>(
    backend: &B,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    from_rows(backend.select(query).await?)
}

/// Run a read limited to one row and decode it, if any.
pub async fn fetch_one<T: DeserializeOwned, B: Backend>(
    backend: &B,
    query: &Query,
) -> Result<Option<T>, StoreError> {
    let query = query.clone().limit(1);
    Ok(fetch::<T, B>(backend, &query).await?.into_iter().next())
}

/// Insert one record and decode the stored row.
pub async fn insert_one<T: Serialize, R: DeserializeOwned, B: Backend>(
    backend: &B,
    table: &str,
    record: &T,
) -> Result<R, StoreError> {
    let rows = backend.insert(table, vec![to_row(record)?]).await?;
    from_rows::<R>(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(format!("{table}: insert returned no row")))
}

/// Insert a batch of records in one call. An empty batch is a no-op.
pub async fn insert_many<T: Serialize, B: Backend>(
    backend: &B,
    table: &str,
    records: &[T],
) -> Result<usize, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let rows = records.iter().map(to_row).collect::<Result<Vec<_>, _>>()?;
    let stored = backend.insert(table, rows).await?;
    Ok(stored.len())
}
