// src/warehouse/view_model.rs
//! View-model for the candidate warehouse. Owns the authoritative list
//! fetched from the service and a derived projection; every table, compare
//! and export operation works from these two, never from the wire.

use anyhow::Result;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::CandidateRecord;
use crate::warehouse::export::projection_to_csv;
use crate::warehouse::filter::{apply_filters, FilterState};
use crate::warehouse::stats::ProjectionStats;

/// Ties a fetch result to the `begin_load` call that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
}

/// What became of a completed load.
#[derive(Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The authoritative list was replaced with this many records.
    Applied(usize),
    /// A newer load was requested while this one was in flight; the
    /// result was dropped.
    Superseded,
}

pub struct WarehouseViewModel {
    client: ApiClient,
    candidates: Vec<CandidateRecord>,
    projection: Vec<CandidateRecord>,
    filter: FilterState,
    load_seq: u64,
    loading: bool,
}

impl WarehouseViewModel {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            candidates: Vec::new(),
            projection: Vec::new(),
            filter: FilterState::default(),
            load_seq: 0,
            loading: false,
        }
    }

    /// Authoritative list, exactly as last fetched.
    pub fn candidates(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    /// Current filtered, sorted projection.
    pub fn projection(&self) -> &[CandidateRecord] {
        &self.projection
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// True while a load is outstanding, from `begin_load` until the
    /// matching (latest) `complete_load`.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a load. The ticket must be handed back to `complete_load`
    /// together with the fetch result.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_seq += 1;
        self.loading = true;
        LoadTicket { seq: self.load_seq }
    }

    /// Apply a finished fetch. Only the most recently issued ticket may
    /// change state, so overlapping loads resolve last-requested-wins
    /// instead of last-resolved-wins. A failed current load clears both
    /// lists and reports the error.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CandidateRecord>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        if ticket.seq != self.load_seq {
            warn!(
                "Discarding superseded load result (ticket {}, current {})",
                ticket.seq, self.load_seq
            );
            return Ok(LoadOutcome::Superseded);
        }
        self.loading = false;

        match result {
            Ok(records) => {
                let count = records.len();
                self.candidates = records;
                self.refresh_projection();
                info!("Loaded {} candidate records", count);
                Ok(LoadOutcome::Applied(count))
            }
            Err(err) => {
                self.candidates.clear();
                self.projection.clear();
                Err(err)
            }
        }
    }

    /// Fetch the candidate list and replace the authoritative state.
    /// Returns the number of records loaded.
    pub async fn load(&mut self) -> Result<usize, ApiError> {
        let ticket = self.begin_load();
        let result = self.client.fetch_candidates().await;
        match self.complete_load(ticket, result)? {
            LoadOutcome::Applied(count) => Ok(count),
            LoadOutcome::Superseded => Ok(self.candidates.len()),
        }
    }

    /// Recompute the projection from the authoritative list under the
    /// given filter state.
    pub fn apply_filters(&mut self, filter: FilterState) -> &[CandidateRecord] {
        self.filter = filter;
        self.refresh_projection();
        &self.projection
    }

    /// Look a record up by id in the authoritative list. A comparison
    /// target stays resolvable even when the current filter hides it.
    pub fn compare(&self, candidate_id: &str) -> Option<&CandidateRecord> {
        self.candidates
            .iter()
            .find(|c| c.candidate_id == candidate_id)
    }

    /// Delete a candidate on the server, then reload the whole list. No
    /// local removal happens; the reload is what reflects the change. A
    /// failed delete leaves all state untouched so the caller may retry.
    /// Confirmation of intent is the caller's job.
    pub async fn remove(&mut self, candidate_id: &str) -> Result<usize, ApiError> {
        self.client.delete_candidate(candidate_id).await?;
        info!("Deleted candidate {}, reloading list", candidate_id);
        self.load().await
    }

    /// CSV bytes for the current projection, `None` when the projection
    /// is empty and there is nothing to export.
    pub fn export_csv(&self) -> Result<Option<Vec<u8>>> {
        if self.projection.is_empty() {
            warn!("Nothing to export, projection is empty");
            return Ok(None);
        }
        projection_to_csv(&self.projection).map(Some)
    }

    /// Summary numbers over the current projection.
    pub fn stats(&self) -> ProjectionStats {
        ProjectionStats::from_records(&self.projection)
    }

    fn refresh_projection(&mut self) {
        self.projection = apply_filters(&self.candidates, &self.filter);
    }
}
