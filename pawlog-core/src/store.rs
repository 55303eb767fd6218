//! Façade over the hosted document store.
//!
//! Documents live under hierarchical paths (`users/{uid}`,
//! `users/{uid}/puppies/{id}/record/...`) and are read and written as plain
//! JSON field mappings. Every operation issues exactly one remote call and
//! reports its outcome through [`crate::Error`]; nothing is retried.

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Plain field mapping, written and read as-is.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Addresses a location in the store: a collection path plus an optional
/// document id. No validation beyond what the backing store enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRef {
    path: String,
    id: Option<String>,
}

impl StoreRef {
    /// Reference to a collection.
    pub fn collection(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: None,
        }
    }

    /// Reference to a document inside a collection.
    pub fn document(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: Some(id.into()),
        }
    }

    /// The `users` collection.
    pub fn users() -> Self {
        Self::collection("users")
    }

    /// A single user profile document.
    pub fn user(uid: &str) -> Self {
        Self::document("users", uid)
    }

    /// A user's puppy collection.
    pub fn puppies(uid: &str) -> Self {
        Self::collection(format!("users/{uid}/puppies"))
    }

    /// A single puppy profile document.
    pub fn puppy(uid: &str, puppy_id: &str) -> Self {
        Self::document(format!("users/{uid}/puppies"), puppy_id)
    }

    /// A puppy's walk-record collection.
    pub fn records(uid: &str, puppy_id: &str) -> Self {
        Self::collection(format!("users/{uid}/puppies/{puppy_id}/record"))
    }

    /// A single walk-record document.
    pub fn record(uid: &str, puppy_id: &str, record_id: &str) -> Self {
        Self::document(format!("users/{uid}/puppies/{puppy_id}/record"), record_id)
    }

    /// Collection path, without any document id.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Full path of the addressed location. With an id this is the document
    /// path, without one it is the collection path itself.
    pub fn full_path(&self) -> String {
        match &self.id {
            Some(id) => format!("{}/{}", self.path, id),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Display for StoreRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_path())
    }
}

/// Body returned when the store assigns the document id itself.
#[derive(Debug, Deserialize)]
struct CreatedDoc {
    id: String,
}

/// Thin client for the document store. Holds one shared connection pool;
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    http: Client,
    base_url: String,
}

impl DocumentStore {
    /// Build a store client against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, r: &StoreRef) -> String {
        format!("{}/{}", self.base_url, r.full_path())
    }

    /// Fetch and decode a single document.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_one<T: DeserializeOwned>(&self, r: &StoreRef) -> Result<T> {
        let res = self.http.get(self.url(r)).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(r.full_path()));
        }
        if !status.is_success() {
            return Err(Error::api("store fetch", status, &body));
        }

        serde_json::from_str(&body).map_err(|e| Error::decode("store document", e))
    }

    /// Fetch a collection and decode every document in order. The first
    /// document that fails to decode fails the whole call.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_all<T: DeserializeOwned>(&self, r: &StoreRef) -> Result<Vec<T>> {
        let res = self.http.get(self.url(r)).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::api("store list", status, &body));
        }

        let docs: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| Error::decode("store collection", e))?;

        let mut objects = Vec::with_capacity(docs.len());
        for doc in docs {
            let object =
                serde_json::from_value(doc).map_err(|e| Error::decode("store document", e))?;
            objects.push(object);
        }

        debug!(count = objects.len(), path = %r, "fetched collection");
        Ok(objects)
    }

    /// Add a document to a collection, letting the store assign the id.
    /// Returns the assigned id.
    #[instrument(skip(self, fields), level = "debug")]
    pub async fn create(&self, r: &StoreRef, fields: &Fields) -> Result<String> {
        let res = self.http.post(self.url(r)).json(fields).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(Error::api("store create", status, &body));
        }

        let created: CreatedDoc =
            serde_json::from_str(&body).map_err(|e| Error::decode("store create response", e))?;

        debug!(id = %created.id, path = %r, "created document");
        Ok(created.id)
    }

    /// Write a typed payload at a document path, replacing whatever is there.
    #[instrument(skip(self, value), level = "debug")]
    pub async fn replace<T: Serialize + ?Sized>(&self, r: &StoreRef, value: &T) -> Result<()> {
        let res = self.http.put(self.url(r)).json(value).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await?;
            return Err(Error::api("store replace", status, &body));
        }

        Ok(())
    }

    /// Write a raw field mapping at a document path, replacing the document.
    pub async fn put_fields(&self, r: &StoreRef, fields: &Fields) -> Result<()> {
        self.replace(r, fields).await
    }

    /// Merge a partial field mapping into an existing document.
    #[instrument(skip(self, fields), level = "debug")]
    pub async fn update(&self, r: &StoreRef, fields: &Fields) -> Result<()> {
        let res = self.http.patch(self.url(r)).json(fields).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(r.full_path()));
        }
        if !status.is_success() {
            return Err(Error::api("store update", status, &body));
        }

        Ok(())
    }

    /// Delete the addressed document.
    #[instrument(skip(self), level = "debug")]
    pub async fn delete(&self, r: &StoreRef) -> Result<()> {
        let res = self.http.delete(self.url(r)).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await?;
            return Err(Error::api("store delete", status, &body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refs_build_the_documented_paths() {
        assert_eq!(StoreRef::users().full_path(), "users");
        assert_eq!(StoreRef::user("u1").full_path(), "users/u1");
        assert_eq!(StoreRef::puppies("u1").full_path(), "users/u1/puppies");
        assert_eq!(StoreRef::puppy("u1", "p1").full_path(), "users/u1/puppies/p1");
        assert_eq!(
            StoreRef::records("u1", "p1").full_path(),
            "users/u1/puppies/p1/record"
        );
        assert_eq!(
            StoreRef::record("u1", "p1", "r1").full_path(),
            "users/u1/puppies/p1/record/r1"
        );
    }

    #[test]
    fn collection_ref_has_no_id() {
        let r = StoreRef::puppies("u1");
        assert_eq!(r.id(), None);
        assert_eq!(r.path(), "users/u1/puppies");
    }

    #[test]
    fn document_ref_exposes_its_id() {
        let r = StoreRef::puppy("u1", "puppy1");
        assert_eq!(r.id(), Some("puppy1"));
        assert_eq!(r.to_string(), "users/u1/puppies/puppy1");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = DocumentStore::new("http://localhost:8080/").unwrap();
        assert_eq!(store.url(&StoreRef::user("u1")), "http://localhost:8080/users/u1");
    }
}
