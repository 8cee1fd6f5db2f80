//! In-memory stand-ins for the tracking service and the remediation action.

use crate::client::TrackerApi;
use crate::errors::{Result, TrackerError};
use crate::remediation::Remediation;
use crate::types::{CreatedResource, ImportScan, ListResponse, ResourceId, ResourceKind, ResourceRef};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Probe,
    List(ResourceKind, Vec<(String, String)>),
    Create(ResourceKind, serde_json::Value),
    Import(ImportScan),
}

struct Record {
    id: u64,
    name: String,
    // Owning product, engagements only.
    product: Option<String>,
}

impl Record {
    // Same filtering the service applies to list queries.
    fn matches(&self, filter: &[(&str, String)]) -> bool {
        filter.iter().all(|(key, value)| match *key {
            "name" => self.name == *value,
            "product" => self.product.as_ref() == Some(value),
            _ => true,
        })
    }
}

#[derive(Default)]
struct State {
    products: Vec<Record>,
    engagements: Vec<Record>,
    calls: Vec<Call>,
    probe_results: VecDeque<bool>,
}

/// Answers like the service would for an otherwise idle instance. New products
/// get ids from 42 and new engagements from 7.
pub struct FakeTracker {
    state: Mutex<State>,
    lookup_status: Option<StatusCode>,
    create_status: Option<StatusCode>,
    phantom_count: Option<u64>,
}

impl FakeTracker {
    pub fn new() -> Self {
        FakeTracker {
            state: Mutex::new(State::default()),
            lookup_status: None,
            create_status: None,
            phantom_count: None,
        }
    }

    pub fn with_product(self, id: u64, name: &str) -> Self {
        self.state.lock().unwrap().products.push(Record {
            id,
            name: name.to_string(),
            product: None,
        });
        self
    }

    pub fn with_engagement(self, id: u64, product: u64, name: &str) -> Self {
        self.state.lock().unwrap().engagements.push(Record {
            id,
            name: name.to_string(),
            product: Some(product.to_string()),
        });
        self
    }

    /// Probe outcomes in order; probes succeed once these run out.
    pub fn with_probe_results(self, results: impl IntoIterator<Item = bool>) -> Self {
        self.state.lock().unwrap().probe_results = results.into_iter().collect();
        self
    }

    pub fn with_lookup_status(mut self, status: StatusCode) -> Self {
        self.lookup_status = Some(status);
        self
    }

    pub fn with_create_status(mut self, status: StatusCode) -> Self {
        self.create_status = Some(status);
        self
    }

    /// Lookups report `count` matches but list none.
    pub fn with_phantom_count(mut self, count: u64) -> Self {
        self.phantom_count = Some(count);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn probe(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Probe);
        match state.probe_results.pop_front() {
            Some(false) => Err(TrackerError::ServiceUnavailable("connection refused".into())),
            _ => Ok(()),
        }
    }

    async fn list(&self, kind: ResourceKind, filter: &[(&str, String)]) -> Result<ListResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List(
            kind,
            filter
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        ));

        if let Some(status) = self.lookup_status {
            return Err(TrackerError::LookupFailed {
                kind,
                status,
                body: String::new(),
            });
        }
        if let Some(count) = self.phantom_count {
            return Ok(ListResponse {
                count,
                results: vec![],
            });
        }

        let records = match kind {
            ResourceKind::Product => &state.products,
            ResourceKind::Engagement => &state.engagements,
        };
        let results: Vec<ResourceRef> = records
            .iter()
            .filter(|record| record.matches(filter))
            .map(|record| ResourceRef {
                id: ResourceId(record.id),
            })
            .collect();

        Ok(ListResponse {
            count: results.len() as u64,
            results,
        })
    }

    async fn create(
        &self,
        kind: ResourceKind,
        payload: &serde_json::Value,
    ) -> Result<CreatedResource> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(kind, payload.clone()));

        if let Some(status) = self.create_status {
            return Err(TrackerError::CreationFailed {
                kind,
                status,
                body: String::new(),
            });
        }

        let name = payload["name"].as_str().unwrap_or_default().to_string();
        let (records, first_id, product) = match kind {
            ResourceKind::Product => (&mut state.products, 42, None),
            ResourceKind::Engagement => (
                &mut state.engagements,
                7,
                Some(payload["product"].to_string()),
            ),
        };
        let id = records.iter().map(|r| r.id + 1).max().unwrap_or(first_id);
        records.push(Record { id, name, product });

        Ok(CreatedResource { id: ResourceId(id) })
    }

    async fn import_scan(&self, scan: ImportScan) -> Result<()> {
        self.state.lock().unwrap().calls.push(Call::Import(scan));
        Ok(())
    }
}

pub struct FakeRemediation {
    exit_code: Option<i32>,
    runs: AtomicUsize,
}

impl FakeRemediation {
    pub fn succeeding() -> Self {
        FakeRemediation {
            exit_code: None,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn failing(code: i32) -> Self {
        FakeRemediation {
            exit_code: Some(code),
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Remediation for FakeRemediation {
    async fn start(&self) -> Result<()> {
        self.runs.fetch_add(1, Ordering::Relaxed);
        match self.exit_code {
            Some(code) => Err(TrackerError::RemediationFailed {
                code: Some(code),
                stderr: "compose file not found".into(),
            }),
            None => Ok(()),
        }
    }
}
