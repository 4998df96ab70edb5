use crate::browse::{
    BrowseSession, FilterMode, FilterState, PaginationControls, SearchScope, SupportMode,
};
use crate::catalogue::{CatalogueClient, GameRecord};
use crate::config::Config;
use crate::controls::{ControlGroup, FilterControl, FilterControls};
use crate::purchase::{self, PurchaseTracker};
use crate::render::{CardView, Profile, NO_GAMES_MESSAGE};
use crate::storage::MemoryStore;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Skeleton cards the page shows while the catalogue loads.
const SKELETON_CARDS: usize = 24;

// --- State ---

/// Shared server state. The catalogue slot stays `None` until the
/// background fetch completes.
#[derive(Clone)]
pub struct AppState {
    catalogue: Arc<RwLock<Option<Arc<Vec<GameRecord>>>>>,
    config: Arc<Config>,
    profile: Profile,
    page_size: usize,
}

impl AppState {
    pub fn new(config: Config, profile: Profile, page_size: usize) -> Self {
        Self {
            catalogue: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            profile,
            page_size: page_size.max(1),
        }
    }

    pub async fn install(&self, records: Vec<GameRecord>) {
        tracing::info!(count = records.len(), "catalogue ready for web UI");
        *self.catalogue.write().await = Some(Arc::new(records));
    }

    /// Fetch the catalogue in the background; requests see the loading
    /// state until it lands.
    pub fn spawn_load(&self, client: CatalogueClient) -> tokio::task::JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let records = client.fetch_catalogue().await;
            state.install(records).await;
        })
    }

    async fn records(&self) -> Option<Arc<Vec<GameRecord>>> {
        self.catalogue.read().await.clone()
    }
}

// --- Models ---

#[derive(Debug, Deserialize)]
struct ViewQuery {
    #[serde(default)]
    q: String,
    name: Option<bool>,
    appid: Option<bool>,
    support: Option<String>,
    mode: Option<String>,
    genre: Option<String>,
    page: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SidebarEntry {
    appid: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct ViewResponse {
    loading: bool,
    profile: Profile,
    total_games: usize,
    total_matches: usize,
    page: usize,
    cards: Vec<CardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<PaginationControls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sidebar: Option<Vec<SidebarEntry>>,
    skeletons: usize,
}

#[derive(Debug, Deserialize)]
struct ControlsQuery {
    support: Option<String>,
    mode: Option<String>,
    genre: Option<String>,
}

#[derive(Debug, Serialize)]
struct ControlsResponse {
    loading: bool,
    skeletons: usize,
    support: Vec<FilterControl>,
    category: Vec<FilterControl>,
}

#[derive(Debug, Deserialize)]
struct ContactLinkQuery {
    plan: Option<String>,
    receipt: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactLinkResponse {
    link: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ReceiptQuery {
    url: String,
}

#[derive(Debug, Serialize)]
struct ReceiptResponse {
    receipt: Option<String>,
}

#[derive(Debug, Serialize)]
struct SettingsResponse {
    profile: Profile,
    page_size: usize,
    plans: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn parse_mode(mode: Option<&str>, genre: Option<&str>) -> Result<FilterMode, String> {
    let raw = mode.unwrap_or("all");
    FilterMode::parse(raw, genre).ok_or_else(|| match genre {
        Some(label) if raw.eq_ignore_ascii_case("genre") => format!("Unknown genre: {label}"),
        _ => format!("Unknown filter mode: {raw}"),
    })
}

fn parse_support(support: Option<&str>) -> Result<SupportMode, String> {
    let raw = support.unwrap_or("all");
    SupportMode::parse(raw).ok_or_else(|| format!("Unknown support filter: {raw}"))
}

// --- Handlers ---

async fn catalogue_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> axum::response::Response {
    let mode = match parse_mode(query.mode.as_deref(), query.genre.as_deref()) {
        Ok(mode) => mode,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };
    let support = match parse_support(query.support.as_deref()) {
        Ok(support) => support,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let Some(records) = state.records().await else {
        return (
            StatusCode::OK,
            Json(ViewResponse {
                loading: true,
                profile: state.profile,
                total_games: 0,
                total_matches: 0,
                page: 1,
                cards: Vec::new(),
                pagination: None,
                message: None,
                sidebar: None,
                skeletons: SKELETON_CARDS,
            }),
        )
            .into_response();
    };

    let scope = SearchScope::new(query.name.unwrap_or(true), query.appid.unwrap_or(true));
    let filter = FilterState::default()
        .with_query(&query.q)
        .with_scope(scope)
        .with_support(support)
        .with_mode(mode);
    let mut session = BrowseSession::with_state(records, state.page_size, filter);

    let requested = query.page.unwrap_or(1);
    if session.total_pages() > 0 || requested != 1 {
        if let Err(err) = session.go_to_page(requested) {
            return error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
        }
    }

    let page_records = session.page_records();
    let cards = CardView::project_page(&page_records, state.profile, &state.config.images);
    let sidebar = state.profile.shows_sidebar().then(|| {
        page_records
            .iter()
            .map(|record| SidebarEntry {
                appid: record.appid.clone(),
                name: record.name.clone(),
            })
            .collect()
    });

    (
        StatusCode::OK,
        Json(ViewResponse {
            loading: false,
            profile: state.profile,
            total_games: session.records().len(),
            total_matches: session.total_matches(),
            page: session.current_page(),
            message: cards.is_empty().then_some(NO_GAMES_MESSAGE),
            cards,
            pagination: session.pagination(),
            sidebar,
            skeletons: 0,
        }),
    )
        .into_response()
}

async fn catalogue_controls(
    State(state): State<AppState>,
    Query(query): Query<ControlsQuery>,
) -> axum::response::Response {
    let mut controls = FilterControls::new(state.profile);
    if let Some(records) = state.records().await {
        controls.reconcile(&records);
    }

    if query.support.is_some() {
        match parse_support(query.support.as_deref()) {
            Ok(support) => controls.activate_support(support),
            Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
        }
    }
    if query.mode.is_some() {
        match parse_mode(query.mode.as_deref(), query.genre.as_deref()) {
            Ok(mode) => {
                controls.activate_mode(&mode);
            }
            Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
        }
    }

    (
        StatusCode::OK,
        Json(ControlsResponse {
            loading: !controls.is_loaded(),
            skeletons: controls.skeletons(),
            support: controls.row(ControlGroup::Support).into_iter().cloned().collect(),
            category: controls.row(ControlGroup::Category).into_iter().cloned().collect(),
        }),
    )
        .into_response()
}

async fn contact_link(
    State(state): State<AppState>,
    Query(query): Query<ContactLinkQuery>,
) -> axum::response::Response {
    let mut tracker =
        PurchaseTracker::new(MemoryStore::default(), state.config.purchase.contact_base_url.clone());

    let outcome = (|| -> anyhow::Result<String> {
        if let Some(plan) = &query.plan {
            tracker.select_plan(plan)?;
        }
        if let Some(receipt) = &query.receipt {
            tracker.save_receipt(receipt)?;
        }
        tracker.contact_link()
    })();

    match outcome {
        Ok(link) => (
            StatusCode::OK,
            Json(ContactLinkResponse {
                link,
                message: purchase::contact_message(
                    tracker.plan().as_deref(),
                    tracker.receipt().as_deref(),
                ),
            }),
        )
            .into_response(),
        Err(err) => error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

async fn receipt_from_url(Query(query): Query<ReceiptQuery>) -> Json<ReceiptResponse> {
    Json(ReceiptResponse {
        receipt: purchase::receipt_from_url(&query.url),
    })
}

async fn settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        profile: state.profile,
        page_size: state.page_size,
        plans: state.config.purchase.plans.clone(),
    })
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/settings", get(settings))
        .route("/api/catalogue/view", get(catalogue_view))
        .route("/api/catalogue/controls", get(catalogue_controls))
        .route("/api/purchase/contact-link", get(contact_link))
        .route("/api/purchase/receipt", get(receipt_from_url))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;

    async fn spawn_server(app: Router) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, handle)
    }

    fn scenario_records() -> Vec<GameRecord> {
        let mut alpha = GameRecord::sample("100", "Alpha");
        alpha.downloads = 5;
        alpha.requires_membership = true;
        alpha.online_supported = "Yes".to_string();
        alpha.primary_genre = Some("4".to_string());

        let mut beta = GameRecord::sample("200", "Beta");
        beta.downloads = 10;
        beta.primary_genre = Some("1".to_string());

        vec![alpha, beta]
    }

    async fn loaded_state(records: Vec<GameRecord>, page_size: usize) -> AppState {
        let state = AppState::new(Config::default(), Profile::Full, page_size);
        state.install(records).await;
        state
    }

    async fn get_json(addr: SocketAddr, path: &str) -> (StatusCode, Value) {
        let response = reqwest::get(format!("http://{addr}{path}")).await.unwrap();
        let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
        (status, response.json().await.unwrap())
    }

    fn appids(body: &Value) -> Vec<String> {
        body["cards"]
            .as_array()
            .unwrap()
            .iter()
            .map(|card| card["appid"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn view_applies_search_scope_and_modes() {
        let state = loaded_state(scenario_records(), 50).await;
        let (addr, handle) = spawn_server(api_routes(state)).await;

        let (status, body) = get_json(addr, "/api/catalogue/view?q=ALP&appid=false").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(appids(&body), vec!["100"]);

        let (_, body) = get_json(addr, "/api/catalogue/view?support=online").await;
        assert_eq!(appids(&body), vec!["100"]);

        let (_, body) =
            get_json(addr, "/api/catalogue/view?support=online&mode=most_downloaded").await;
        assert_eq!(appids(&body), vec!["100"]);

        let (status, _) = get_json(addr, "/api/catalogue/view?mode=online").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = get_json(addr, "/api/catalogue/view?mode=most_downloaded").await;
        assert_eq!(appids(&body), vec!["200", "100"]);
        assert_eq!(body["total_games"], 2);
        assert_eq!(body["pagination"]["jump_label"], "of 1 [Enter]");
        assert_eq!(body["sidebar"][0]["name"], "Beta");

        let (_, body) = get_json(addr, "/api/catalogue/view?mode=genre&genre=casual").await;
        assert_eq!(appids(&body), vec!["100"]);
        assert_eq!(body["cards"][0]["denuvo"], true);

        handle.abort();
    }

    #[tokio::test]
    async fn view_rejects_out_of_range_page() {
        let records: Vec<GameRecord> = (0..120)
            .map(|i| GameRecord::sample(&i.to_string(), &format!("Game {i}")))
            .collect();
        let state = loaded_state(records, 50).await;
        let (addr, handle) = spawn_server(api_routes(state)).await;

        let (status, body) = get_json(addr, "/api/catalogue/view?page=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cards"].as_array().unwrap().len(), 20);
        assert_eq!(body["pagination"]["window"], serde_json::json!([1, 2, 3]));

        let (status, body) = get_json(addr, "/api/catalogue/view?page=4").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("page 4"));

        handle.abort();
    }

    #[tokio::test]
    async fn empty_view_reports_no_games() {
        let state = loaded_state(scenario_records(), 50).await;
        let (addr, handle) = spawn_server(api_routes(state)).await;

        let (status, body) = get_json(addr, "/api/catalogue/view?q=zzz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], NO_GAMES_MESSAGE);
        assert!(body.get("pagination").is_none());

        let (status, _) = get_json(addr, "/api/catalogue/view?mode=sideways").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        handle.abort();
    }

    #[tokio::test]
    async fn controls_show_skeletons_until_loaded() {
        let state = AppState::new(Config::default(), Profile::Full, 50);
        let (addr, handle) = spawn_server(api_routes(state.clone())).await;

        let (_, body) = get_json(addr, "/api/catalogue/controls").await;
        assert_eq!(body["loading"], true);
        assert_eq!(body["skeletons"], 16);
        assert_eq!(body["support"].as_array().unwrap().len(), 3);
        assert_eq!(body["category"].as_array().unwrap().len(), 1);

        let (_, view) = get_json(addr, "/api/catalogue/view").await;
        assert_eq!(view["loading"], true);

        state.install(scenario_records()).await;
        let (_, body) =
            get_json(addr, "/api/catalogue/controls?support=bypass&mode=denuvo").await;
        assert_eq!(body["skeletons"], 0);
        let labels = |row: &str| -> Vec<String> {
            body[row]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["label"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(
            labels("support"),
            vec!["All", "Online Supported", "Bypass Supported"]
        );
        assert_eq!(
            labels("category"),
            vec!["All", "⬇ Most Downloaded ⬇", "Action", "Casual", "Denuvo"]
        );
        assert_eq!(body["support"][2]["active"], true);
        assert_eq!(body["support"][2]["group"], "support");
        assert_eq!(body["category"][4]["active"], true);
        assert_eq!(body["category"][4]["key"], "denuvo");
        assert_eq!(body["category"][0]["active"], false);

        handle.abort();
    }

    #[tokio::test]
    async fn background_load_fills_catalogue() {
        let backend = Router::new().route(
            "/api/games",
            get(|| async { Json(serde_json::json!([{"appid": "1", "name": "One"}])) }),
        );
        let (backend_addr, backend_handle) = spawn_server(backend).await;

        let state = AppState::new(Config::default(), Profile::Compact, 50);
        state
            .spawn_load(CatalogueClient::with_url(format!("http://{backend_addr}/api/games")))
            .await
            .unwrap();

        let (addr, handle) = spawn_server(api_routes(state)).await;
        let (_, body) = get_json(addr, "/api/catalogue/view").await;
        assert_eq!(body["loading"], false);
        assert_eq!(appids(&body), vec!["1"]);
        assert!(body.get("sidebar").is_none());

        handle.abort();
        backend_handle.abort();
    }

    #[tokio::test]
    async fn contact_link_and_receipt_endpoints() {
        let state = AppState::new(Config::default(), Profile::Full, 50);
        let (addr, handle) = spawn_server(api_routes(state)).await;

        let (status, body) =
            get_json(addr, "/api/purchase/contact-link?plan=Yearly&receipt=%20R1%20").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Hi Barry, I am interested in Steam Unlock Onennabe (Plan: Yearly | Receipt: R1)."
        );
        assert!(body["link"]
            .as_str()
            .unwrap()
            .starts_with("https://wa.me/60138254541?text="));

        let (_, body) = get_json(addr, "/api/purchase/contact-link").await;
        assert_eq!(
            body["message"],
            "Hi Barry, I am interested in Steam Unlock Onennabe."
        );

        let target = "https://shop.test/thanks?token=T&tx=TX1";
        let url = reqwest::Url::parse_with_params(
            &format!("http://{addr}/api/purchase/receipt"),
            &[("url", target)],
        )
        .unwrap();
        let body: Value = reqwest::get(url).await.unwrap().json().await.unwrap();
        assert_eq!(body["receipt"], "TX1");

        handle.abort();
    }

    #[tokio::test]
    async fn settings_expose_profile_and_plans() {
        let state = AppState::new(Config::default(), Profile::Compact, 25);
        let (addr, handle) = spawn_server(api_routes(state)).await;

        let (_, body) = get_json(addr, "/api/settings").await;
        assert_eq!(body["profile"], "compact");
        assert_eq!(body["page_size"], 25);
        assert_eq!(body["plans"][0], "Monthly");

        handle.abort();
    }
}
