//! Current-domain DNS record list coordination.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use dns_console_gateway::{
    BatchDeleteRequest, BatchDeleteResult, CreateDnsRecordRequest, DnsGateway, DnsRecord,
    DnsRecordType, RecordQueryParams, UpdateDnsRecordRequest,
};

use crate::error::{CoreError, CoreResult};
use crate::types::{RecordListSnapshot, RecordTarget};

/// Fixed page size for record list fetches.
pub const RECORD_PAGE_SIZE: u32 = 20;

#[derive(Default)]
struct RecordListState {
    /// Accumulated page window for the current target.
    records: Vec<DnsRecord>,
    /// The (account, domain) pair the list belongs to.
    target: Option<RecordTarget>,
    /// Bumped on every first-page fetch. A commit applies only if its
    /// captured generation is still current.
    generation: u64,
    loading: bool,
    loading_more: bool,
    deleting: bool,
    batch_deleting: bool,
    /// Highest page fetched (0 before the first successful fetch).
    page: u32,
    has_more: bool,
    total_count: u32,
    keyword: Option<String>,
    record_type: Option<DnsRecordType>,
    /// Selected record IDs; always a subset of the loaded list.
    selected: HashSet<String>,
    select_mode: bool,
    error: Option<String>,
}

impl RecordListState {
    fn is_current(&self, account_id: &str, domain_id: &str) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.matches(account_id, domain_id))
    }

    /// Keep the selection a subset of the loaded list.
    fn prune_selection(&mut self) {
        let loaded: HashSet<&str> = self.records.iter().map(|r| r.id.as_str()).collect();
        self.selected.retain(|id| loaded.contains(id.as_str()));
    }
}

/// Maintains exactly one "current" paginated, searchable, filterable record
/// list for one (account, domain) pair, plus the batch-selection workflow.
///
/// Unlike the domain cache, there is only a single list here, so a slow
/// response for an abandoned target would corrupt whatever the user is now
/// viewing. Every commit is therefore gated on a generation counter captured
/// at issue time and compared fresh at commit time: stale responses are
/// silently dropped, never applied, retried or queued.
pub struct RecordListCoordinator {
    gateway: Arc<dyn DnsGateway>,
    state: RwLock<RecordListState>,
}

impl RecordListCoordinator {
    /// Create a coordinator with an empty list.
    #[must_use]
    pub fn new(gateway: Arc<dyn DnsGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(RecordListState::default()),
        }
    }

    /// Fetch page 1 for a (account, domain) pair with search/filter.
    ///
    /// Switching domains clears the list and the selection immediately, so
    /// stale rows are never shown under a new heading; a same-domain
    /// search/filter change keeps the previous list visible while the new
    /// page loads. A failed fetch sets the `error` field instead of
    /// propagating — the caller re-renders from the snapshot.
    pub async fn fetch_records(
        &self,
        account_id: &str,
        domain_id: &str,
        keyword: Option<String>,
        record_type: Option<DnsRecordType>,
    ) {
        let target = RecordTarget::new(account_id, domain_id);
        let generation = {
            let mut state = self.state.write().await;
            if state.target.as_ref() != Some(&target) {
                // 切换域名：立即清空，避免新标题下出现旧数据
                state.records.clear();
                state.total_count = 0;
                state.page = 0;
                state.has_more = false;
                state.selected.clear();
                state.select_mode = false;
            }
            state.target = Some(target.clone());
            state.keyword.clone_from(&keyword);
            state.record_type.clone_from(&record_type);
            state.loading = true;
            state.error = None;
            state.generation += 1;
            state.generation
        };

        let params = RecordQueryParams {
            page: 1,
            page_size: RECORD_PAGE_SIZE,
            keyword,
            record_type,
        };
        let result = self.gateway.list_records(account_id, domain_id, &params).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            // 用户已切走，过期响应静默丢弃
            log::debug!("Discarding stale record fetch for domain {domain_id}");
            return;
        }
        state.loading = false;
        match result {
            Ok(page) => {
                state.records = page.items;
                state.page = page.page;
                state.has_more = page.has_more;
                state.total_count = page.total_count;
                state.prune_selection();
            }
            Err(e) => {
                state.error = Some(e.to_string());
            }
        }
    }

    /// Fetch the next page for the current target and append it.
    ///
    /// No-op unless the target is still current, further pages exist, and no
    /// load-more is already in flight. A failed continuation is logged, not
    /// surfaced — it must not disturb an otherwise working view.
    pub async fn fetch_more_records(&self, account_id: &str, domain_id: &str) {
        let (generation, params) = {
            let mut state = self.state.write().await;
            if state.loading_more
                || !state.has_more
                || !state.is_current(account_id, domain_id)
            {
                return;
            }
            state.loading_more = true;
            let params = RecordQueryParams {
                page: state.page + 1,
                page_size: RECORD_PAGE_SIZE,
                keyword: state.keyword.clone(),
                record_type: state.record_type.clone(),
            };
            (state.generation, params)
        };

        let result = self.gateway.list_records(account_id, domain_id, &params).await;

        let mut state = self.state.write().await;
        // 该标志由本次在途请求独占，无论结果如何都要释放
        state.loading_more = false;
        if state.generation != generation {
            log::debug!("Discarding stale load-more response for domain {domain_id}");
            return;
        }
        match result {
            Ok(page) => {
                state.records.extend(page.items);
                state.page = page.page;
                state.has_more = page.has_more;
                state.total_count = page.total_count;
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Load more records failed for {domain_id}: {e}");
                } else {
                    log::error!("Load more records failed for {domain_id}: {e}");
                }
            }
        }
    }

    /// Create a record and append it to the list optimistically.
    ///
    /// The local list is updated from the mutation's own response rather than
    /// a refetch, so ordering relative to the backend's sort is approximate.
    /// The commit is skipped when the user has navigated away from the
    /// record's domain in the meantime; the created record is returned either
    /// way.
    pub async fn create_record(
        &self,
        account_id: &str,
        request: &CreateDnsRecordRequest,
    ) -> CoreResult<DnsRecord> {
        let record = self.gateway.create_record(account_id, request).await?;

        let mut state = self.state.write().await;
        if state.is_current(account_id, &record.domain_id) {
            state.records.push(record.clone());
            state.total_count += 1;
        }
        Ok(record)
    }

    /// Update a record, replacing it in place by ID.
    ///
    /// The record's list position is preserved and the total count is
    /// unchanged. The commit is skipped when the target has changed.
    pub async fn update_record(
        &self,
        account_id: &str,
        record_id: &str,
        request: &UpdateDnsRecordRequest,
    ) -> CoreResult<DnsRecord> {
        let record = self
            .gateway
            .update_record(account_id, record_id, request)
            .await?;

        let mut state = self.state.write().await;
        if state.is_current(account_id, &record.domain_id) {
            if let Some(slot) = state.records.iter_mut().find(|r| r.id == record_id) {
                *slot = record.clone();
            }
        }
        Ok(record)
    }

    /// Delete a record and remove it from the list.
    ///
    /// The total count is decremented with a floor of zero, defensive against
    /// count/list divergence. The `deleting` flag is set for the duration but
    /// is deliberately not a reentrancy guard (matching the batch-only
    /// single-flight policy).
    pub async fn delete_record(
        &self,
        account_id: &str,
        record_id: &str,
        domain_id: &str,
    ) -> CoreResult<()> {
        {
            let mut state = self.state.write().await;
            state.deleting = true;
        }

        let result = self
            .gateway
            .delete_record(account_id, record_id, domain_id)
            .await;

        let mut state = self.state.write().await;
        state.deleting = false;
        match result {
            Ok(()) => {
                if state.is_current(account_id, domain_id) {
                    state.records.retain(|r| r.id != record_id);
                    state.total_count = state.total_count.saturating_sub(1);
                    state.selected.remove(record_id);
                }
                Ok(())
            }
            Err(e) => Err(CoreError::Gateway(e)),
        }
    }

    /// Delete every selected record in one call.
    ///
    /// Returns `Ok(None)` when the selection is empty or a batch delete is
    /// already in flight. Per-record failures arrive inside a success result:
    /// only IDs absent from the failure list are removed locally and counted
    /// against the total. The selection and select-mode are cleared after the
    /// attempt regardless of outcome — the user's intent is consumed by it.
    pub async fn batch_delete_records(
        &self,
        account_id: &str,
        domain_id: &str,
    ) -> CoreResult<Option<BatchDeleteResult>> {
        let record_ids = {
            let mut state = self.state.write().await;
            if state.selected.is_empty() || state.batch_deleting {
                return Ok(None);
            }
            state.batch_deleting = true;
            let mut ids: Vec<String> = state.selected.iter().cloned().collect();
            ids.sort();
            ids
        };

        let request = BatchDeleteRequest {
            domain_id: domain_id.to_string(),
            record_ids: record_ids.clone(),
        };
        let result = self.gateway.batch_delete_records(account_id, &request).await;

        let mut state = self.state.write().await;
        state.batch_deleting = false;
        state.selected.clear();
        state.select_mode = false;

        match result {
            Ok(outcome) => {
                let failed: HashSet<&str> = outcome
                    .failures
                    .iter()
                    .map(|f| f.record_id.as_str())
                    .collect();
                if state.is_current(account_id, domain_id) {
                    let deleted: HashSet<&str> = record_ids
                        .iter()
                        .map(String::as_str)
                        .filter(|id| !failed.contains(id))
                        .collect();
                    state.records.retain(|r| !deleted.contains(r.id.as_str()));
                    let removed = u32::try_from(deleted.len()).unwrap_or(u32::MAX);
                    state.total_count = state.total_count.saturating_sub(removed);
                }
                Ok(Some(outcome))
            }
            Err(e) => Err(CoreError::Gateway(e)),
        }
    }

    // ===== Batch selection =====

    /// Toggle batch-selection mode. The selection is cleared on entering and
    /// on leaving.
    pub async fn toggle_select_mode(&self) {
        let mut state = self.state.write().await;
        state.select_mode = !state.select_mode;
        state.selected.clear();
    }

    /// Toggle one record's selection. IDs not present in the loaded list are
    /// ignored, keeping the selection a subset of what is visible.
    pub async fn toggle_record_selection(&self, record_id: &str) {
        let mut state = self.state.write().await;
        if !state.records.iter().any(|r| r.id == record_id) {
            return;
        }
        if !state.selected.remove(record_id) {
            state.selected.insert(record_id.to_string());
        }
    }

    /// Select every currently loaded record.
    ///
    /// Pages not yet fetched are not included: with pagination, "all" means
    /// "all visible so far".
    pub async fn select_all_records(&self) {
        let mut state = self.state.write().await;
        state.selected = state.records.iter().map(|r| r.id.clone()).collect();
    }

    /// Drop the selection without leaving select mode.
    pub async fn clear_selection(&self) {
        self.state.write().await.selected.clear();
    }

    // ===== Getters (pure projections, no side effects) =====

    /// Point-in-time view of the whole coordinator state.
    pub async fn snapshot(&self) -> RecordListSnapshot {
        let state = self.state.read().await;
        RecordListSnapshot {
            records: state.records.clone(),
            target: state.target.clone(),
            loading: state.loading,
            loading_more: state.loading_more,
            deleting: state.deleting,
            batch_deleting: state.batch_deleting,
            page: state.page,
            has_more: state.has_more,
            total_count: state.total_count,
            keyword: state.keyword.clone(),
            record_type: state.record_type.clone(),
            selected: state.selected.clone(),
            select_mode: state.select_mode,
            error: state.error.clone(),
        }
    }

    /// Loaded records for the current target.
    pub async fn records(&self) -> Vec<DnsRecord> {
        self.state.read().await.records.clone()
    }

    /// Selected record IDs.
    pub async fn selected_ids(&self) -> HashSet<String> {
        self.state.read().await.selected.clone()
    }

    /// Whether a first-page fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Whether further pages exist for the current target.
    pub async fn has_more(&self) -> bool {
        self.state.read().await.has_more
    }

    /// Total record count reported by the backend for the current query.
    pub async fn total_count(&self) -> u32 {
        self.state.read().await.total_count
    }

    /// Error message from the last failed first-page fetch, if any.
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
