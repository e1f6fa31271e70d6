use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use super::Repository;
use crate::error::{GardenError, Result};
use crate::model::{Flower, JournalEntry};

/// Client for the garden HTTP API (`src/bin/server.rs`).
pub struct RemoteStore {
    base: String,
    client: Client,
}

impl RemoteStore {
    /// `base` is the server root, e.g. `http://127.0.0.1:5000`.
    pub fn new(base: &str) -> Result<Self> {
        Self::with_timeout(base, Duration::from_secs(5))
    }

    pub fn with_timeout(base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let resp = self.client.get(self.url(path)).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let resp = self.client.get(self.url(path)).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(resp.error_for_status()?.json()?))
    }

    fn post<T: serde::Serialize + DeserializeOwned>(&self, path: &str, body: &T) -> Result<T> {
        let resp = self.client.post(self.url(path)).json(body).send()?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<serde_json::Value>()
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());
            return Err(GardenError::Remote(format!("{path}: {message}")));
        }
        Ok(resp.json()?)
    }
}

impl Repository for RemoteStore {
    fn journal_entries(&self) -> Result<Vec<JournalEntry>> {
        self.get_list("/api/journal/entries")
    }

    fn journal_entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        self.get_one(&format!("/api/journal/entries/{id}"))
    }

    fn save_journal_entry(&self, entry: JournalEntry) -> Result<JournalEntry> {
        self.post("/api/journal/entries", &entry)
    }

    fn flowers(&self) -> Result<Vec<Flower>> {
        self.get_list("/api/flowers")
    }

    fn flower(&self, id: &str) -> Result<Option<Flower>> {
        self.get_one(&format!("/api/flowers/{id}"))
    }

    fn save_flower(&self, flower: Flower) -> Result<Flower> {
        self.post("/api/flowers", &flower)
    }
}
