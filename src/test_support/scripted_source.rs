//! In-memory [`CatalogSource`] with scripted responses for controller tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::catalog::{CatalogError, CatalogSource};
use crate::work::{Author, Work};

/// How the scripted source answers a detail lookup.
#[derive(Debug, Clone)]
pub enum DetailScript {
    /// Resolves immediately with the work.
    Found(Work),
    /// Resolves immediately with `NotFound`.
    Missing,
    /// Never resolves.
    Never,
    /// Resolves with the work after the delay.
    After(Duration, Work),
}

/// A catalog source whose every answer is fixed up front.
#[derive(Debug)]
pub struct ScriptedSource {
    listing: Result<Vec<Work>, CatalogError>,
    title_search: Result<Vec<Work>, CatalogError>,
    year_search: Result<Vec<Work>, CatalogError>,
    detail: DetailScript,
    title_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            listing: Ok(Vec::new()),
            title_search: Ok(Vec::new()),
            year_search: Ok(Vec::new()),
            detail: DetailScript::Missing,
            title_gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_listing(mut self, works: Vec<Work>) -> Self {
        self.listing = Ok(works);
        self
    }

    pub fn with_title_search(mut self, result: Result<Vec<Work>, CatalogError>) -> Self {
        self.title_search = result;
        self
    }

    pub fn with_year_search(mut self, result: Result<Vec<Work>, CatalogError>) -> Self {
        self.year_search = result;
        self
    }

    pub fn with_detail(mut self, detail: DetailScript) -> Self {
        self.detail = detail;
        self
    }

    /// Holds every title search until the gate is notified.
    pub fn with_title_gate(mut self, gate: Arc<Notify>) -> Self {
        self.title_gate = Some(gate);
        self
    }

    /// Calls received so far, as `operation:argument` strings.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn try_list_works(&self, subject: &str) -> Result<Vec<Work>, CatalogError> {
        self.record(format!("list:{subject}"));
        self.listing.clone()
    }

    async fn fetch_work(&self, id: &str) -> Result<Work, CatalogError> {
        self.record(format!("work:{id}"));
        match &self.detail {
            DetailScript::Found(work) => Ok(work.clone()),
            DetailScript::Missing => Err(CatalogError::not_found(id, 3)),
            DetailScript::Never => std::future::pending().await,
            DetailScript::After(delay, work) => {
                tokio::time::sleep(*delay).await;
                Ok(work.clone())
            }
        }
    }

    async fn try_search_by_title(&self, title: &str) -> Result<Vec<Work>, CatalogError> {
        self.record(format!("title:{title}"));
        if let Some(gate) = &self.title_gate {
            gate.notified().await;
        }
        self.title_search.clone()
    }

    async fn try_search_by_year(&self, year: i32) -> Result<Vec<Work>, CatalogError> {
        self.record(format!("year:{year}"));
        self.year_search.clone()
    }
}

/// Builds an enriched work with one author.
pub fn sample_work(id: &str, title: &str, year: Option<i32>) -> Work {
    let mut work = Work::new(id, title);
    work.first_publish_year = year;
    work.authors = vec![Author::new("Test Author")];
    crate::catalog::enrich(work)
}
