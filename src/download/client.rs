use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::snapshot::{ACTIVITIES_FILE, FOOTPRINTS_FILE, LOCATIONS_FILE, RECIPES_FILE};
use crate::ui::Ui;

pub const BASE_URL: &str = "https://lca.aau.dk";

/// Consecutive failed pages tolerated while walking numbered pages
const MAX_PAGE_FAILURES: u32 = 5;

/// How an endpoint hands out its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// `{results, next, count}` envelopes linked by `next`
    Cursor,
    /// Bare arrays behind `?page=N`, ending with an empty page or a 404
    Numbered,
    /// One bare array
    Single,
}

/// API path and paging style for a snapshot file
pub fn endpoint(file: &str) -> Option<(&'static str, Paging)> {
    match file {
        FOOTPRINTS_FILE => Some(("/api/footprint/", Paging::Cursor)),
        RECIPES_FILE => Some(("/api/recipes/", Paging::Numbered)),
        LOCATIONS_FILE => Some(("/api/locations/", Paging::Cursor)),
        ACTIVITIES_FILE => Some(("/api/activity-names/", Paging::Single)),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct CursorPage {
    results: Vec<Value>,
    next: Option<String>,
    #[serde(default)]
    count: Option<u64>,
}

pub struct BonsaiClient {
    client: Client,
    base_url: String,
    token: String,
}

impl BonsaiClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("food-footprint")
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
            token: token.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch every row behind the endpoint for a snapshot file
    pub fn fetch_table(&self, file: &str, ui: &mut impl Ui) -> Result<Vec<Value>> {
        let Some((path, paging)) = endpoint(file) else {
            bail!("No API endpoint for {}", file);
        };
        let url = format!("{}{}", self.base_url, path);

        let rows = match paging {
            Paging::Cursor => self.fetch_cursor_pages(&url, ui)?,
            Paging::Numbered => self.fetch_numbered_pages(&url, ui)?,
            Paging::Single => self.fetch_single(&url)?,
        };

        info!(file, rows = rows.len(), "Fetched table");
        Ok(rows)
    }

    fn get(&self, url: &str, page: Option<u32>) -> Result<Response> {
        let mut request = self
            .client
            .get(url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/json");
        if let Some(page) = page {
            request = request.query(&[("page", page)]);
        }
        request
            .send()
            .with_context(|| format!("Failed to request {}", url))
    }

    fn fetch_cursor_pages(&self, url: &str, ui: &mut impl Ui) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut next = Some(url.to_string());
        let mut pages = 0u32;

        while let Some(page_url) = next {
            let response = self.get(&page_url, None)?;
            let status = response.status();
            if !status.is_success() {
                bail!("{} returned {}", page_url, status);
            }

            let page: CursorPage = response
                .json()
                .with_context(|| format!("Failed to parse page from {}", page_url))?;

            rows.extend(page.results);
            pages += 1;
            ui.set_progress(rows.len() as u64, page.count.unwrap_or(0), page_label(pages, rows.len()));
            next = page.next;
        }

        Ok(rows)
    }

    fn fetch_numbered_pages(&self, url: &str, ui: &mut impl Ui) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut page = 1u32;
        let mut failures = 0u32;

        loop {
            let response = self.get(url, Some(page))?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                break;
            }
            if !status.is_success() {
                failures += 1;
                warn!(url, page, %status, "Skipping page");
                if failures >= MAX_PAGE_FAILURES {
                    bail!("{} failed {} pages in a row, last status {}", url, failures, status);
                }
                page += 1;
                continue;
            }
            failures = 0;

            let body: Value = response
                .json()
                .with_context(|| format!("Failed to parse page {} from {}", page, url))?;
            match body {
                Value::Array(items) if !items.is_empty() => rows.extend(items),
                _ => break,
            }

            ui.set_progress(rows.len() as u64, 0, page_label(page, rows.len()));
            page += 1;
        }

        Ok(rows)
    }

    fn fetch_single(&self, url: &str) -> Result<Vec<Value>> {
        let response = self.get(url, None)?;
        let status = response.status();
        if !status.is_success() {
            bail!("{} returned {}", url, status);
        }

        match response
            .json::<Value>()
            .with_context(|| format!("Failed to parse response from {}", url))?
        {
            Value::Array(items) => Ok(items),
            other => bail!("{} returned a non-array body: {}", url, other),
        }
    }
}

fn page_label(page: u32, rows: usize) -> String {
    format!("page {} ({} rows)", page, rows)
}
