//! List store orchestration: load lifecycle, search, paging and the page
//! view model handed to renderers.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use noticeboard_core::{
    classify, filter_records, normalize_query, paginate, results_summary, sort_by_distance,
    sort_initial, Bucket, PageModel, Record,
};
use noticeboard_source::{LoadError, TableSource};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

pub mod config;
pub mod debounce;

pub use config::{ConfigOverrides, ListConfig, Variant};
pub use debounce::Debouncer;

pub const CRATE_NAME: &str = "noticeboard-store";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadState {
    Empty,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a load is already in progress")]
    LoadInProgress,
    #[error("load ticket {0} is stale")]
    StaleTicket(u64),
    #[error("list is not ready (state {0:?})")]
    NotReady(LoadState),
    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: usize, total_pages: usize },
    #[error("no record with id `{0}`")]
    UnknownRecord(String),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Arrow-key page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
}

impl FromStr for NavKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowLeft" | "left" => Ok(Self::Left),
            "ArrowRight" | "right" => Ok(Self::Right),
            other => Err(format!("unknown navigation key `{other}`")),
        }
    }
}

/// Receives "view more" actions. No navigation semantics are implied.
pub trait ViewMoreHook: Send + Sync {
    fn view_more(&self, record: &Record);
}

#[derive(Debug, Default)]
pub struct LogViewMore;

impl ViewMoreHook for LogViewMore {
    fn view_more(&self, record: &Record) {
        info!(id = record.id.as_deref().unwrap_or(""), title = %record.title, "view more requested");
    }
}

/// Proof that a load was started; only the latest ticket can complete it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Renderer-facing severity of the search notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchNotice {
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub bucket: Option<Bucket>,
    pub display_date: String,
    pub record: Record,
}

/// Consecutive entries sharing a bucket. Ungrouped pages have one section
/// without a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: Option<String>,
    pub entries: Vec<PageEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub state: LoadState,
    pub query: String,
    pub item_noun: String,
    pub page: PageModel,
    pub show_controls: bool,
    pub entries: Vec<PageEntry>,
    pub total_results: usize,
    pub summary: String,
    pub notice: Option<SearchNotice>,
    pub banner: Option<String>,
}

impl PageView {
    pub fn sections(&self) -> Vec<Section> {
        let mut out: Vec<Section> = Vec::new();
        for entry in &self.entries {
            let label = entry.bucket.map(|b| b.label().to_string());
            match out.last_mut() {
                Some(section) if section.label == label => section.entries.push(entry.clone()),
                _ => out.push(Section {
                    label,
                    entries: vec![entry.clone()],
                }),
            }
        }
        out
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Empty | LoadState::Loading)
    }
}

pub struct ListStore {
    config: ListConfig,
    state: LoadState,
    all_records: Vec<Record>,
    filtered_records: Vec<Record>,
    current_page: usize,
    raw_query: String,
    banner: Option<String>,
    generation: u64,
    clock: fn() -> DateTime<Utc>,
    view_more: Arc<dyn ViewMoreHook>,
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("state", &self.state)
            .field("all_records", &self.all_records.len())
            .field("filtered_records", &self.filtered_records.len())
            .field("current_page", &self.current_page)
            .field("query", &self.raw_query)
            .finish()
    }
}

impl ListStore {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            state: LoadState::Empty,
            all_records: Vec::new(),
            filtered_records: Vec::new(),
            current_page: 1,
            raw_query: String::new(),
            banner: None,
            generation: 0,
            clock: Utc::now,
            view_more: Arc::new(LogViewMore),
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_view_more(mut self, hook: Arc<dyn ViewMoreHook>) -> Self {
        self.view_more = hook;
        self
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn all_records(&self) -> &[Record] {
        &self.all_records
    }

    pub fn filtered_records(&self) -> &[Record] {
        &self.filtered_records
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn query(&self) -> &str {
        &self.raw_query
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn total_pages(&self) -> usize {
        noticeboard_core::total_pages(self.filtered_records.len(), self.config.page_size)
    }

    /// Enter `Loading`. Rejected while another load is outstanding.
    pub fn begin_load(&mut self) -> Result<LoadTicket, StoreError> {
        if self.state == LoadState::Loading {
            return Err(StoreError::LoadInProgress);
        }
        self.generation += 1;
        self.state = LoadState::Loading;
        Ok(LoadTicket(self.generation))
    }

    /// Finish the load started by `ticket`. An active query is re-applied to
    /// the new records. On failure the previous record sets are kept and the
    /// load banner is raised.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Record>, LoadError>,
    ) -> Result<usize, StoreError> {
        if self.state != LoadState::Loading || ticket.0 != self.generation {
            return Err(StoreError::StaleTicket(ticket.0));
        }
        match result {
            Ok(mut records) => {
                let fetched = records.len();
                records.retain(Record::has_title);
                sort_initial(&mut records, (self.clock)());
                info!(fetched, kept = records.len(), "records loaded");
                self.all_records = records;
                self.state = LoadState::Ready;
                self.refilter();
                self.current_page = 1;
                self.banner = None;
                Ok(self.all_records.len())
            }
            Err(err) => {
                error!(error = %err, "loading {}s failed", self.config.item_noun);
                self.banner = Some(format!(
                    "Failed to load {}s. Please try again later.",
                    self.config.item_noun
                ));
                self.state = LoadState::Failed;
                Err(StoreError::Load(err))
            }
        }
    }

    /// Fetch from `source` while holding the store exclusively.
    pub async fn load(&mut self, source: &dyn TableSource) -> Result<usize, StoreError> {
        let ticket = self.begin_load()?;
        info!(location = %source.location(), "loading table");
        let result = source.fetch_table().await;
        self.complete_load(ticket, result)
    }

    /// Re-derive the filtered set for `raw_query` and return to page 1.
    /// Failures are logged and surfaced as a banner; the store stays usable.
    pub fn search(&mut self, raw_query: &str) -> Result<usize, StoreError> {
        match self.apply_search(raw_query) {
            Ok(count) => Ok(count),
            Err(err) => {
                warn!(error = %err, query = raw_query, "filtering failed");
                // A pending or failed load owns the banner.
                if !matches!(self.state, LoadState::Loading | LoadState::Failed) {
                    self.banner = Some(format!(
                        "An error occurred while filtering {}s.",
                        self.config.item_noun
                    ));
                }
                Err(err)
            }
        }
    }

    fn apply_search(&mut self, raw_query: &str) -> Result<usize, StoreError> {
        self.ensure_ready()?;
        self.raw_query = raw_query.trim().to_string();
        self.refilter();
        self.current_page = 1;
        self.banner = None;
        Ok(self.filtered_records.len())
    }

    fn refilter(&mut self) {
        let query = normalize_query(&self.raw_query);
        let mut filtered = filter_records(&self.all_records, &query, self.config.filter_scope);
        sort_by_distance(&mut filtered, (self.clock)());
        debug!(query = %query, matched = filtered.len(), "filter applied");
        self.filtered_records = filtered;
    }

    pub fn goto_page(&mut self, page: usize) -> Result<(), StoreError> {
        self.ensure_ready()?;
        let total_pages = self.total_pages();
        let out_of_range = page == 0 || (self.config.bounds_checked_pagination && page > total_pages);
        if out_of_range {
            return Err(StoreError::PageOutOfRange { page, total_pages });
        }
        self.current_page = page;
        Ok(())
    }

    /// Step one page with the arrow keys. Returns whether the page changed;
    /// boundaries and disabled keyboard navigation are silent no-ops.
    pub fn navigate(&mut self, key: NavKey) -> Result<bool, StoreError> {
        self.ensure_ready()?;
        if !self.config.keyboard_navigation {
            return Ok(false);
        }
        let target = match key {
            NavKey::Left if self.current_page > 1 => self.current_page - 1,
            NavKey::Right if self.current_page < self.total_pages() => self.current_page + 1,
            _ => return Ok(false),
        };
        self.goto_page(target)?;
        Ok(true)
    }

    /// Forward a "view more" action for the record carrying `id`.
    pub fn view_more(&self, id: &str) -> Result<(), StoreError> {
        let record = self
            .all_records
            .iter()
            .find(|r| r.id.as_deref() == Some(id))
            .ok_or_else(|| StoreError::UnknownRecord(id.to_string()))?;
        self.view_more.view_more(record);
        Ok(())
    }

    pub fn page_view(&self) -> PageView {
        let now = (self.clock)();
        let page = paginate(
            self.filtered_records.len(),
            self.config.page_size,
            self.current_page,
        );
        let entries = self.filtered_records[page.start_index..page.end_index]
            .iter()
            .map(|record| PageEntry {
                bucket: self
                    .config
                    .grouping_enabled
                    .then(|| classify(record.instant(), now)),
                display_date: record.display_date(),
                record: record.clone(),
            })
            .collect();

        let total_results = self.filtered_records.len();
        let noun = &self.config.item_noun;
        let notice = (!self.raw_query.is_empty() && self.state == LoadState::Ready).then(|| {
            if total_results > 0 {
                SearchNotice {
                    level: NoticeLevel::Info,
                    text: format!("Found {}", results_summary(total_results, noun)),
                }
            } else {
                SearchNotice {
                    level: NoticeLevel::Warning,
                    text: format!("No {noun}s found matching your search"),
                }
            }
        });

        PageView {
            state: self.state,
            query: self.raw_query.clone(),
            item_noun: noun.clone(),
            show_controls: page.shows_controls(self.config.hide_single_page_controls),
            page,
            entries,
            total_results,
            summary: results_summary(total_results, noun),
            notice,
            banner: self.banner.clone(),
        }
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.state == LoadState::Ready {
            Ok(())
        } else {
            Err(StoreError::NotReady(self.state))
        }
    }
}

/// Load into a shared store without holding the lock across the fetch.
///
/// The fetch runs on its own task, so the load still reaches `Ready` or
/// `Failed` when the caller is dropped mid-fetch.
pub async fn load_shared(
    store: &Arc<Mutex<ListStore>>,
    source: Arc<dyn TableSource>,
) -> Result<usize, StoreError> {
    let ticket = store.lock().await.begin_load()?;
    let task_store = Arc::clone(store);
    let task = tokio::spawn(async move {
        info!(location = %source.location(), "loading table");
        let result = source.fetch_table().await;
        task_store.lock().await.complete_load(ticket, result)
    });
    match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            let err = LoadError::Unavailable(format!("load task ended: {err}"));
            store.lock().await.complete_load(ticket, Err(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use async_trait::async_trait;
    use noticeboard_source::FixtureSource;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration as StdDuration;
    use tokio::sync::Notify;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn day(offset: i64) -> String {
        (fixed_now() + Duration::days(offset)).to_rfc3339()
    }

    fn scenario_records() -> Vec<Record> {
        vec![
            Record::new("Exam Notice").with_date(day(0)).with_id("1"),
            Record::new("Holiday").with_date(day(10)).with_id("2"),
            Record::new("").with_date(day(0)).with_id("3"),
        ]
    }

    fn many_records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!("Item {i:02}")).with_date(day(-(i as i64))).with_id(i.to_string()))
            .collect()
    }

    fn store(config: ListConfig) -> ListStore {
        ListStore::new(config).with_clock(fixed_now)
    }

    async fn ready_store(config: ListConfig, records: Vec<Record>) -> ListStore {
        let mut store = store(config);
        store.load(&FixtureSource::records(records)).await.expect("load");
        store
    }

    #[tokio::test]
    async fn load_discards_untitled_and_orders_by_closeness() {
        let store = ready_store(ListConfig::default(), scenario_records()).await;
        assert_eq!(store.state(), LoadState::Ready);
        assert_eq!(store.all_records().len(), 2);
        assert_eq!(store.filtered_records()[0].title, "Exam Notice");
        assert_eq!(store.current_page(), 1);
        assert!(store.all_records().iter().all(Record::has_title));
    }

    #[tokio::test]
    async fn search_narrows_and_resets_page() {
        let mut store = ready_store(ListConfig::default(), scenario_records()).await;
        let count = store.search("  Holiday ").expect("search");
        assert_eq!(count, 1);
        assert_eq!(store.filtered_records()[0].title, "Holiday");
        assert_eq!(store.query(), "Holiday");
        assert_eq!(store.all_records().len(), 2);

        store.search("").expect("clear");
        assert_eq!(store.filtered_records().len(), 2);
    }

    #[tokio::test]
    async fn empty_query_round_trip_keeps_content() {
        let records = many_records(5);
        let mut store = ready_store(ListConfig::default(), records.clone()).await;
        store.search("").expect("search");
        let mut got = store.filtered_records().to_vec();
        let mut want = records;
        got.sort_by(|a, b| a.title.cmp(&b.title));
        want.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_records_and_raises_banner() {
        let mut store = ready_store(ListConfig::default(), scenario_records()).await;
        let err = store.load(&FixtureSource::failing("connection refused")).await.unwrap_err();
        assert!(matches!(err, StoreError::Load(_)));
        assert_eq!(store.state(), LoadState::Failed);
        assert_eq!(store.filtered_records().len(), 2);
        assert_eq!(
            store.banner(),
            Some("Failed to load announcements. Please try again later.")
        );
    }

    #[tokio::test]
    async fn failed_first_load_leaves_empty_list_and_can_retry() {
        let mut store = store(ListConfig::default());
        assert!(store.load(&FixtureSource::failing("dns")).await.is_err());
        assert!(store.filtered_records().is_empty());
        assert!(!store.banner().unwrap_or_default().is_empty());

        assert!(store.search("x").is_err());
        assert!(store.banner().unwrap_or_default().starts_with("Failed to load"));

        store.load(&FixtureSource::records(scenario_records())).await.expect("retry");
        assert_eq!(store.state(), LoadState::Ready);
        assert_eq!(store.banner(), None);
    }

    #[test]
    fn second_begin_load_is_rejected_until_completion() {
        let mut store = store(ListConfig::default());
        let first = store.begin_load().expect("first");
        assert!(matches!(store.begin_load(), Err(StoreError::LoadInProgress)));
        store.complete_load(first, Ok(scenario_records())).expect("complete");
        assert!(matches!(
            store.complete_load(first, Ok(vec![])),
            Err(StoreError::StaleTicket(_))
        ));
        assert!(store.begin_load().is_ok());
    }

    #[test]
    fn search_before_load_is_guarded() {
        let mut store = store(ListConfig::default());
        let err = store.search("exam").unwrap_err();
        assert!(matches!(err, StoreError::NotReady(LoadState::Empty)));
        assert_eq!(
            store.banner(),
            Some("An error occurred while filtering announcements.")
        );
    }

    #[tokio::test]
    async fn bounds_checked_paging_rejects_out_of_range() {
        let mut store = ready_store(ListConfig::default(), many_records(25)).await;
        store.goto_page(3).expect("page 3");
        let view = store.page_view();
        assert_eq!((view.page.start_index, view.page.end_index), (20, 25));
        assert_eq!(view.entries.len(), 5);

        assert!(matches!(
            store.goto_page(4),
            Err(StoreError::PageOutOfRange { page: 4, total_pages: 3 })
        ));
        assert!(store.goto_page(0).is_err());
        assert_eq!(store.current_page(), 3);
    }

    #[tokio::test]
    async fn unchecked_paging_applies_any_positive_page() {
        let config = ListConfig::for_variant(Variant::Flat);
        let mut store = ready_store(config, many_records(12)).await;
        store.goto_page(9).expect("unchecked");
        assert_eq!(store.current_page(), 9);
        assert!(store.page_view().entries.is_empty());
        assert!(store.goto_page(0).is_err());
    }

    #[tokio::test]
    async fn arrow_keys_stop_at_boundaries() {
        let mut store = ready_store(ListConfig::default(), many_records(25)).await;
        assert!(!store.navigate(NavKey::Left).expect("left"));
        assert!(store.navigate(NavKey::Right).expect("right"));
        assert!(store.navigate(NavKey::Right).expect("right"));
        assert!(!store.navigate(NavKey::Right).expect("at end"));
        assert_eq!(store.current_page(), 3);
    }

    #[tokio::test]
    async fn arrow_keys_ignored_in_flat_variant() {
        let mut store = ready_store(ListConfig::for_variant(Variant::Flat), many_records(25)).await;
        assert!(!store.navigate(NavKey::Right).expect("right"));
        assert_eq!(store.current_page(), 1);
    }

    #[tokio::test]
    async fn grouped_view_emits_sections_in_sorted_order() {
        let records = vec![
            Record::new("Today").with_date(day(0)),
            Record::new("Tomorrow").with_date(day(1)),
            Record::new("Yesterday").with_date(day(-1)),
            Record::new("Last Week").with_date(day(-9)),
            Record::new("Ancient").with_date("1999-01-01"),
        ];
        let store = ready_store(ListConfig::default(), records).await;
        let view = store.page_view();
        let labels = view
            .sections()
            .into_iter()
            .map(|s| s.label.unwrap_or_default())
            .collect::<Vec<_>>();
        assert_eq!(labels, vec!["Today", "Upcoming", "This Week", "This Month", "Older"]);
    }

    #[tokio::test]
    async fn flat_view_has_single_unlabelled_section() {
        let store = ready_store(ListConfig::for_variant(Variant::Flat), many_records(4)).await;
        let view = store.page_view();
        let sections = view.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].label, None);
        assert!(view.show_controls);
    }

    #[tokio::test]
    async fn notice_reflects_query_results() {
        let mut store = ready_store(ListConfig::default(), scenario_records()).await;
        assert_eq!(store.page_view().notice, None);

        store.search("exam").expect("search");
        let view = store.page_view();
        assert_eq!(view.summary, "1 announcement");
        assert_eq!(
            view.notice,
            Some(SearchNotice {
                level: NoticeLevel::Info,
                text: "Found 1 announcement".into()
            })
        );

        store.search("zzz").expect("search");
        let notice = store.page_view().notice.expect("notice");
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.text, "No announcements found matching your search");
    }

    #[derive(Default)]
    struct Recorder(StdMutex<Vec<String>>);

    impl ViewMoreHook for Recorder {
        fn view_more(&self, record: &Record) {
            self.0.lock().unwrap().push(record.title.clone());
        }
    }

    #[tokio::test]
    async fn view_more_is_forwarded_to_hook() {
        let hook = Arc::new(Recorder::default());
        let mut store = store(ListConfig::default()).with_view_more(hook.clone());
        store.load(&FixtureSource::records(scenario_records())).await.expect("load");

        store.view_more("2").expect("known id");
        assert!(matches!(store.view_more("3"), Err(StoreError::UnknownRecord(_))));
        assert_eq!(*hook.0.lock().unwrap(), vec!["Holiday".to_string()]);
    }

    /// Holds every fetch until the gate is opened.
    struct GatedSource {
        gate: Arc<Notify>,
        records: Vec<Record>,
    }

    #[async_trait]
    impl TableSource for GatedSource {
        fn location(&self) -> String {
            "gated".to_string()
        }

        async fn fetch_table(&self) -> Result<Vec<Record>, LoadError> {
            self.gate.notified().await;
            Ok(self.records.clone())
        }
    }

    fn gated() -> (Arc<Notify>, Arc<dyn TableSource>) {
        let gate = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            records: scenario_records(),
        });
        (gate, source)
    }

    async fn wait_for_state(shared: &Mutex<ListStore>, want: LoadState) {
        tokio::time::timeout(StdDuration::from_secs(5), async {
            while shared.lock().await.state() != want {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("state reached");
    }

    #[tokio::test]
    async fn shared_load_releases_lock_during_fetch() {
        let shared = Arc::new(Mutex::new(store(ListConfig::default())));
        let (gate, source) = gated();

        let first = tokio::spawn({
            let shared = shared.clone();
            let source = source.clone();
            async move { load_shared(&shared, source).await }
        });
        wait_for_state(&shared, LoadState::Loading).await;

        assert!(shared.try_lock().is_ok());
        assert!(matches!(
            load_shared(&shared, source.clone()).await,
            Err(StoreError::LoadInProgress)
        ));
        assert_eq!(shared.lock().await.page_view().state, LoadState::Loading);

        gate.notify_one();
        assert_eq!(first.await.expect("join").expect("load"), 2);
        assert_eq!(shared.lock().await.state(), LoadState::Ready);
    }

    #[tokio::test]
    async fn dropped_caller_does_not_strand_load() {
        let shared = Arc::new(Mutex::new(store(ListConfig::default())));
        let (gate, source) = gated();

        let cancelled =
            tokio::time::timeout(StdDuration::from_millis(50), load_shared(&shared, source.clone())).await;
        assert!(cancelled.is_err());

        gate.notify_one();
        wait_for_state(&shared, LoadState::Ready).await;

        let mut store = shared.lock().await;
        assert_eq!(store.search("holiday").expect("search"), 1);
        assert!(store.begin_load().is_ok());
    }

    #[tokio::test]
    async fn search_during_reload_keeps_banner_clear() {
        let mut store = ready_store(ListConfig::default(), scenario_records()).await;
        let ticket = store.begin_load().expect("reload");
        assert!(matches!(
            store.search("exam"),
            Err(StoreError::NotReady(LoadState::Loading))
        ));
        assert_eq!(store.banner(), None);

        store.complete_load(ticket, Ok(scenario_records())).expect("complete");
        assert_eq!(store.search("exam").expect("search"), 1);
    }

    #[tokio::test]
    async fn reload_reapplies_active_query() {
        let mut store = ready_store(ListConfig::default(), many_records(25)).await;
        store.search("item 1").expect("search");
        assert_eq!(store.filtered_records().len(), 10);

        let mut more = many_records(25);
        more.push(Record::new("Item 1 Addendum").with_date(day(0)));
        store.load(&FixtureSource::records(more)).await.expect("reload");

        assert_eq!(store.query(), "item 1");
        assert_eq!(store.filtered_records().len(), 11);
        assert_eq!(store.current_page(), 1);
        let notice = store.page_view().notice.expect("notice");
        assert_eq!(notice.text, "Found 11 announcements");
    }

    #[test]
    fn nav_key_names() {
        assert_eq!("ArrowLeft".parse::<NavKey>(), Ok(NavKey::Left));
        assert_eq!("right".parse::<NavKey>(), Ok(NavKey::Right));
        assert!("up".parse::<NavKey>().is_err());
    }
}
