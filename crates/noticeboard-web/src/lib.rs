//! Axum + Askama web UI for Noticeboard.

use std::sync::Arc;

use anyhow::Context;
use askama::Template;
use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use noticeboard_source::{source_for_location, TableSource};
use noticeboard_store::{
    load_shared, ListConfig, ListStore, NavKey, NoticeLevel, PageView, Section, StoreError,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub const CRATE_NAME: &str = "noticeboard-web";

const APP_CSS: &str = include_str!("../assets/app.css");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ListStore>>,
    pub source: Arc<dyn TableSource>,
}

impl AppState {
    pub fn new(store: ListStore, source: Arc<dyn TableSource>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            source,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    heading: String,
    item_noun: String,
    query: String,
    debounce_ms: u64,
    keyboard_navigation: bool,
    list_html: String,
}

#[derive(Debug, Clone)]
struct PageLink {
    number: usize,
    active: bool,
}

#[derive(Template)]
#[template(path = "list_partial.html")]
struct ListPartialTemplate {
    item_noun: String,
    loading: bool,
    banner: Option<String>,
    notice_class: String,
    notice_text: Option<String>,
    empty: bool,
    sections: Vec<Section>,
    show_controls: bool,
    bounded_links: bool,
    links: Vec<PageLink>,
    previous: Option<usize>,
    next: Option<usize>,
    total_pages: usize,
}

impl ListPartialTemplate {
    fn from_view(view: &PageView, bounded_links: bool) -> Self {
        let (notice_class, notice_text) = match &view.notice {
            Some(notice) => {
                let class = match notice.level {
                    NoticeLevel::Info => "alert-info",
                    NoticeLevel::Warning => "alert-warning",
                };
                (class.to_string(), Some(notice.text.clone()))
            }
            None => (String::new(), None),
        };
        Self {
            item_noun: view.item_noun.clone(),
            loading: view.is_loading(),
            banner: view.banner.clone(),
            notice_class,
            notice_text,
            empty: view.total_results == 0,
            sections: view.sections(),
            show_controls: view.show_controls,
            bounded_links,
            links: view
                .page
                .page_numbers
                .iter()
                .map(|&number| PageLink {
                    number,
                    active: number == view.page.current_page,
                })
                .collect(),
            previous: view.page.previous,
            next: view.page.next,
            total_pages: view.page.total_pages,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/items", get(list_handler))
        .route("/items/{id}/view-more", post(view_more_handler))
        .route("/search", get(search_handler))
        .route("/page/{page}", get(page_handler))
        .route("/nav/{key}", post(nav_handler))
        .route("/reload", post(reload_handler))
        .route("/api/page", get(page_json_handler))
        .route("/assets/static/app.css", get(app_css_handler))
        .with_state(Arc::new(state))
}

/// Start the server for `config` and kick off the initial load in the
/// background.
pub async fn serve(config: ListConfig) -> anyhow::Result<()> {
    let source = source_for_location(&config.csv_url, config.http_config())?;
    let port = config.web_port;
    let state = AppState::new(ListStore::new(config), source);

    let loader = state.clone();
    tokio::spawn(async move {
        if let Err(err) = load_shared(&loader.store, loader.source.clone()).await {
            warn!(error = %err, "initial load failed");
        }
    });

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {port}"))?;
    info!(port, "serving noticeboard");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    let config = store.config();
    let list_html = match render_list(&store).render() {
        Ok(html) => html,
        Err(err) => return server_error(anyhow::anyhow!(err.to_string())),
    };
    render_html(IndexTemplate {
        heading: heading_for(&config.item_noun),
        item_noun: config.item_noun.clone(),
        query: store.query().to_string(),
        debounce_ms: config.debounce_ms,
        keyboard_navigation: config.keyboard_navigation,
        list_html,
    })
}

async fn list_handler(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    render_html(render_list(&store))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let mut store = state.store.lock().await;
    // Failures are already on the banner.
    let _ = store.search(query.q.as_deref().unwrap_or_default());
    render_html(render_list(&store))
}

async fn page_handler(State(state): State<Arc<AppState>>, AxumPath(page): AxumPath<usize>) -> Response {
    let mut store = state.store.lock().await;
    if let Err(err) = store.goto_page(page) {
        debug!(error = %err, "page change ignored");
    }
    render_html(render_list(&store))
}

async fn nav_handler(State(state): State<Arc<AppState>>, AxumPath(key): AxumPath<String>) -> Response {
    let key = match key.parse::<NavKey>() {
        Ok(key) => key,
        Err(err) => return (StatusCode::BAD_REQUEST, Html(err)).into_response(),
    };
    let mut store = state.store.lock().await;
    if let Err(err) = store.navigate(key) {
        debug!(error = %err, "navigation ignored");
    }
    render_html(render_list(&store))
}

async fn reload_handler(State(state): State<Arc<AppState>>) -> Response {
    if let Err(err) = load_shared(&state.store, state.source.clone()).await {
        warn!(error = %err, "reload failed");
    }
    let store = state.store.lock().await;
    render_html(render_list(&store))
}

async fn view_more_handler(State(state): State<Arc<AppState>>, AxumPath(id): AxumPath<String>) -> Response {
    let store = state.store.lock().await;
    match store.view_more(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(StoreError::UnknownRecord(_)) => {
            (StatusCode::NOT_FOUND, Html("Record not found".to_string())).into_response()
        }
        Err(err) => server_error(err.into()),
    }
}

async fn page_json_handler(State(state): State<Arc<AppState>>) -> Response {
    let store = state.store.lock().await;
    Json(store.page_view()).into_response()
}

async fn app_css_handler() -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], APP_CSS).into_response()
}

fn render_list(store: &ListStore) -> ListPartialTemplate {
    ListPartialTemplate::from_view(&store.page_view(), store.config().bounds_checked_pagination)
}

/// `announcement` -> `Announcements`.
fn heading_for(noun: &str) -> String {
    let mut chars = noun.chars();
    match chars.next() {
        Some(first) => format!("{}{}s", first.to_uppercase(), chars.as_str()),
        None => "Items".to_string(),
    }
}

fn render_html<T: Template>(tpl: T) -> Response {
    match tpl.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => server_error(anyhow::anyhow!(err.to_string())),
    }
}

fn server_error(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("Server error: {}", err)),
    )
        .into_response()
}
