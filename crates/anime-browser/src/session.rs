//! Browsing session controller.
//!
//! Orchestrates fetch, filter, paginate and present in response to user
//! triggers and pushes the results to a [`Renderer`]. Every search or filter
//! change runs the full pipeline and swaps in a new working set; page
//! navigation only re-slices the set already held.

use crate::filter::apply_filters;
use crate::paginate::{self, PaginationMeta};
use crate::present::{CardProjection, Formatter};
use crate::render::Renderer;
use kitsu_client::{CatalogSource, FetchError};
use shared::{CatalogRecord, FilterCriteria};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Empty-state message shown when nothing matches
pub const NO_RESULTS_MESSAGE: &str = "No anime found. Try a different search or filter.";

/// Default number of cards per page
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(size) => size,
    None => unreachable!(),
};

/// Where the session is in its load cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    /// Working set holds at least one record
    Ready,
    /// Load succeeded but nothing matched
    Empty,
    /// Load failed; carries the user-visible message
    Error(String),
}

impl SessionStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready)
    }
}

/// Errors from selecting a record for the detail view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("No record with id {0} in the current results")]
    NotFound(String),
}

/// Current browsing state
#[derive(Debug, Clone)]
pub struct SessionState {
    pub search_term: String,
    pub criteria: FilterCriteria,
    /// 1-based, always within `1..=total_pages`
    pub current_page: usize,
    pub page_size: NonZeroUsize,
    /// Filtered records pages are sliced from. Replaced, never edited.
    pub working_set: Arc<[CatalogRecord]>,
}

impl SessionState {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            search_term: String::new(),
            criteria: FilterCriteria::default(),
            current_page: 1,
            page_size,
            working_set: Arc::from(Vec::new()),
        }
    }

    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.working_set.len(), self.page_size)
    }
}

/// Token for one in-flight load. Only the most recently issued ticket is
/// allowed to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    token: u64,
    search_term: String,
    criteria: FilterCriteria,
}

impl LoadTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Search term to send, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        Some(self.search_term.as_str()).filter(|t| !t.is_empty())
    }
}

/// The current page as card projections plus navigation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub cards: Vec<CardProjection>,
    pub meta: PaginationMeta,
}

/// Owns the session state and drives the catalog pipeline
pub struct SessionController<S, R> {
    source: S,
    renderer: R,
    formatter: Formatter,
    session: SessionState,
    status: SessionStatus,
    latest_token: u64,
}

impl<S, R> SessionController<S, R>
where
    S: CatalogSource,
    R: Renderer,
{
    /// Create a controller in the `Idle` state with an empty session
    pub fn new(source: S, renderer: R, formatter: Formatter, page_size: NonZeroUsize) -> Self {
        Self {
            source,
            renderer,
            formatter,
            session: SessionState::new(page_size),
            status: SessionStatus::Idle,
            latest_token: 0,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// New search with the current filter inputs
    pub async fn on_search_submitted(&mut self, term: &str) -> &SessionStatus {
        let criteria = self.session.criteria.clone();
        self.load(term, criteria).await
    }

    /// New filter inputs with the current search term
    pub async fn on_filter_changed(&mut self, criteria: FilterCriteria) -> &SessionStatus {
        let term = self.session.search_term.clone();
        self.load(&term, criteria).await
    }

    /// Run the full pipeline: fetch, filter, then render page 1 or an empty state
    pub async fn load(&mut self, term: &str, criteria: FilterCriteria) -> &SessionStatus {
        let ticket = self.begin_load(term, criteria);
        let result = self.source.fetch_catalog(ticket.search_term()).await;
        self.complete_load(ticket, result);
        &self.status
    }

    /// Record new search inputs, enter `Loading` and issue a ticket.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self, term: &str, criteria: FilterCriteria) -> LoadTicket {
        self.latest_token += 1;

        self.session.search_term = term.trim().to_string();
        self.session.criteria = criteria;
        self.session.current_page = 1;
        self.status = SessionStatus::Loading;

        info!(
            token = self.latest_token,
            search = %self.session.search_term,
            status_filter = ?self.session.criteria.status,
            rating_filter = ?self.session.criteria.rating,
            "Loading catalog"
        );
        self.renderer.render_loading(true);

        LoadTicket {
            token: self.latest_token,
            search_term: self.session.search_term.clone(),
            criteria: self.session.criteria.clone(),
        }
    }

    /// Apply the outcome of the load `ticket` was issued for.
    ///
    /// Returns false, changing nothing, when a newer load has been started.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<CatalogRecord>, FetchError>,
    ) -> bool {
        if ticket.token != self.latest_token {
            debug!(
                token = ticket.token,
                latest = self.latest_token,
                "Discarding stale catalog response"
            );
            return false;
        }

        self.renderer.render_loading(false);

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                error!(search = %ticket.search_term, error = %e, "Error loading anime");
                let message = format!("Failed to load anime: {}", e);
                self.renderer.render_empty(&message);
                self.status = SessionStatus::Error(message);
                return true;
            }
        };

        let fetched = records.len();
        let filtered = apply_filters(&records, &ticket.criteria);
        info!(fetched, matched = filtered.len(), "Catalog loaded");

        self.session.working_set = Arc::from(filtered);
        self.session.current_page = 1;

        if self.session.working_set.is_empty() {
            self.status = SessionStatus::Empty;
            self.renderer.render_empty(NO_RESULTS_MESSAGE);
        } else {
            self.status = SessionStatus::Ready;
            self.render_current_page();
        }
        true
    }

    /// Go back one page. Returns whether the page changed.
    pub fn on_page_previous(&mut self) -> bool {
        let target = paginate::previous_page(self.session.current_page);
        self.move_to_page(target)
    }

    /// Go forward one page. Returns whether the page changed.
    pub fn on_page_next(&mut self) -> bool {
        let target = paginate::next_page(self.session.current_page, self.session.total_pages());
        self.move_to_page(target)
    }

    /// Show the detail view for a record in the working set
    pub fn on_record_selected(&mut self, id: &str) -> Result<(), SelectError> {
        let Some(record) = self.session.working_set.iter().find(|r| r.id == id) else {
            warn!(id = %id, "Selected record not in current results");
            return Err(SelectError::NotFound(id.to_string()));
        };

        let detail = self.formatter.detail(record);
        debug!(id = %id, title = %detail.title, "Showing record details");
        self.renderer.render_detail(&detail);
        Ok(())
    }

    /// Card projections and pagination state for the current page
    pub fn current_page(&self) -> PageView {
        let page = paginate::paginate(
            &self.session.working_set[..],
            self.session.current_page,
            self.session.page_size,
        );
        PageView {
            cards: page.items.iter().map(|r| self.formatter.card(r)).collect(),
            meta: page.meta(),
        }
    }

    fn move_to_page(&mut self, target: usize) -> bool {
        if !self.status.is_ready() {
            debug!(status = ?self.status, "Ignoring page change outside ready state");
            return false;
        }

        let target = paginate::clamp_page(target, self.session.total_pages());
        if target == self.session.current_page {
            return false;
        }

        debug!(from = self.session.current_page, to = target, "Changing page");
        self.session.current_page = target;
        self.render_current_page();
        true
    }

    fn render_current_page(&mut self) {
        let view = self.current_page();
        self.renderer.render_list(&view.cards, &view.meta);
        self.renderer.scroll_to_top();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::DetailProjection;
    use async_trait::async_trait;
    use shared::AnimeStatus;

    struct StaticSource(Vec<CatalogRecord>);

    #[async_trait]
    impl CatalogSource for StaticSource {
        async fn fetch_catalog(
            &self,
            _search_term: Option<&str>,
        ) -> Result<Vec<CatalogRecord>, FetchError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct CountingRenderer {
        lists: usize,
        empties: Vec<String>,
        details: Vec<DetailProjection>,
        scrolls: usize,
        loading: Vec<bool>,
    }

    impl Renderer for CountingRenderer {
        fn render_list(&mut self, _cards: &[CardProjection], _meta: &PaginationMeta) {
            self.lists += 1;
        }

        fn render_empty(&mut self, message: &str) {
            self.empties.push(message.to_string());
        }

        fn render_detail(&mut self, detail: &DetailProjection) {
            self.details.push(detail.clone());
        }

        fn render_loading(&mut self, loading: bool) {
            self.loading.push(loading);
        }

        fn scroll_to_top(&mut self) {
            self.scrolls += 1;
        }
    }

    fn records(n: usize) -> Vec<CatalogRecord> {
        (1..=n)
            .map(|i| {
                let mut record = CatalogRecord::new(i.to_string());
                record.attributes.status = Some(AnimeStatus::Finished);
                record
            })
            .collect()
    }

    fn controller(n: usize) -> SessionController<StaticSource, CountingRenderer> {
        SessionController::new(
            StaticSource(records(n)),
            CountingRenderer::default(),
            Formatter::default(),
            DEFAULT_PAGE_SIZE,
        )
    }

    #[test]
    fn test_new_session_defaults() {
        let controller = controller(0);
        assert_eq!(controller.status(), &SessionStatus::Idle);
        assert_eq!(controller.session().search_term, "");
        assert!(controller.session().criteria.is_empty());
        assert_eq!(controller.session().current_page, 1);
        assert_eq!(controller.session().page_size.get(), 12);
    }

    #[tokio::test]
    async fn test_page_navigation_within_ready() {
        let mut controller = controller(25);
        controller.on_search_submitted("").await;
        assert!(controller.status().is_ready());
        assert_eq!(controller.renderer().lists, 1);

        assert!(!controller.on_page_previous());
        assert!(controller.on_page_next());
        assert!(controller.on_page_next());
        assert!(!controller.on_page_next());
        assert_eq!(controller.session().current_page, 3);
        assert_eq!(controller.current_page().cards.len(), 1);

        assert!(controller.on_page_previous());
        assert_eq!(controller.session().current_page, 2);
        assert_eq!(controller.renderer().lists, 4);
        assert_eq!(controller.renderer().scrolls, 4);
    }

    #[tokio::test]
    async fn test_search_resets_page() {
        let mut controller = controller(25);
        controller.on_search_submitted("").await;
        controller.on_page_next();
        assert_eq!(controller.session().current_page, 2);

        controller.on_search_submitted("  bebop ").await;
        assert_eq!(controller.session().current_page, 1);
        assert_eq!(controller.session().search_term, "bebop");
    }

    #[tokio::test]
    async fn test_paging_ignored_when_empty() {
        let mut controller = controller(0);
        controller.on_search_submitted("nothing").await;
        assert_eq!(controller.status(), &SessionStatus::Empty);
        assert!(!controller.on_page_next());
        assert_eq!(controller.renderer().empties, vec![NO_RESULTS_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_loading_indicator_brackets_fetch() {
        let mut controller = controller(3);
        controller.on_search_submitted("").await;
        assert_eq!(controller.renderer().loading, vec![true, false]);
    }

    #[tokio::test]
    async fn test_record_selection() {
        let mut controller = controller(3);
        controller.on_search_submitted("").await;

        assert!(controller.on_record_selected("2").is_ok());
        assert_eq!(controller.renderer().details[0].id, "2");
        assert_eq!(
            controller.on_record_selected("99"),
            Err(SelectError::NotFound("99".to_string()))
        );
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = controller(0);
        let first = controller.begin_load("one", FilterCriteria::default());
        let second = controller.begin_load("two", FilterCriteria::default());
        assert!(second.token() > first.token());

        assert!(!controller.complete_load(first, Ok(records(5))));
        assert_eq!(controller.status(), &SessionStatus::Loading);
        assert!(controller.session().working_set.is_empty());

        assert!(controller.complete_load(second, Ok(records(2))));
        assert!(controller.status().is_ready());
        assert_eq!(controller.session().working_set.len(), 2);
        assert_eq!(controller.session().search_term, "two");
    }

    #[test]
    fn test_ticket_search_term() {
        let mut controller = controller(0);
        assert_eq!(controller.begin_load("   ", FilterCriteria::default()).search_term(), None);
        assert_eq!(
            controller.begin_load("naruto", FilterCriteria::default()).search_term(),
            Some("naruto")
        );
    }
}
