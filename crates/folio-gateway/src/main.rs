//! Folio Gateway — serves the portfolio at the configured bind address (default 127.0.0.1:8000).
//! Landing + projects pages, the contact form forwarder, and the orbit layout JSON.

use axum::{
    body::Body,
    extract::{ConnectInfo, Form, Query, State},
    http::{HeaderMap, Request, StatusCode, Uri},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use folio_core::{
    compute_layout, compute_layout_checked,
    pages::{render_contact_form, render_landing, render_not_found, render_orbits, render_projects},
    Breakpoints, ContactDispatcher, ContactError, ContactFormView, ContactMessage, MotionPreference,
    OrbitalLayout, Portfolio, RenderOptions, ScreenSize, SiteConfig, WebhookConfig,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Client hint carrying the layout viewport width in CSS pixels.
const VIEWPORT_WIDTH_HINT: &str = "sec-ch-viewport-width";

const GENERIC_CONTACT_ERROR: &str = "Something went wrong sending your message. Please try again later.";

struct AppState {
    portfolio: Portfolio,
    /// One precomputed layout per screen bucket.
    layouts: HashMap<ScreenSize, OrbitalLayout>,
    dispatcher: ContactDispatcher,
    breakpoints: Breakpoints,
    orbit_seed: Option<u64>,
    assets_dir: String,
}

impl AppState {
    fn new(portfolio: Portfolio, dispatcher: ContactDispatcher, orbit_seed: Option<u64>, assets_dir: String) -> Self {
        let layouts = ScreenSize::ALL
            .into_iter()
            .map(|screen| {
                let layout = compute_layout(&portfolio.tech, screen, screen.ring_limit(), orbit_seed);
                (screen, layout)
            })
            .collect();
        Self {
            portfolio,
            layouts,
            dispatcher,
            breakpoints: Breakpoints::default(),
            orbit_seed,
            assets_dir,
        }
    }

    fn layout(&self, screen: ScreenSize) -> OrbitalLayout {
        self.layouts
            .get(&screen)
            .cloned()
            .unwrap_or_else(|| OrbitalLayout::empty(screen))
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    #[serde(default)]
    screen: Option<String>,
    #[serde(default)]
    motion: Option<String>,
    #[serde(default)]
    year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OrbitQuery {
    #[serde(default)]
    screen: Option<String>,
    /// Ring count override; non-positive values give an empty layout.
    #[serde(default)]
    rings: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[folio-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SiteConfig::load()?;
    let content_path = config.content_path();
    let portfolio = Portfolio::load(content_path.as_deref())?;

    let webhook = WebhookConfig::from_env(config.webhook_timeout());
    if !webhook.is_complete() {
        tracing::warn!(
            "[folio-gateway] TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set; contact form submissions will fail"
        );
    }
    let dispatcher = ContactDispatcher::new(webhook)?;

    let state = Arc::new(AppState::new(
        portfolio,
        dispatcher,
        config.orbit_seed,
        resolve_assets_dir(&config.assets_dir),
    ));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("[folio-gateway] Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Configured directory if it exists, else the assets shipped next to this crate.
fn resolve_assets_dir(configured: &str) -> String {
    if Path::new(configured).is_dir() {
        return configured.to_string();
    }
    let bundled = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");
    tracing::info!("[folio-gateway] {} not found, serving assets from {}", configured, bundled);
    bundled.to_string()
}

fn build_router(state: Arc<AppState>) -> Router {
    let assets = ServeDir::new(Path::new(&state.assets_dir));
    Router::new()
        .route("/health", get(health))
        .route("/", get(landing))
        .route("/projects", get(projects))
        .route("/contact", post(contact))
        .route("/fragments/stack", get(stack_fragment))
        .route("/api/v1/orbits", get(orbits))
        .nest_service("/assets", assets)
        .fallback(not_found)
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
}

async fn log_requests(
    connect: Option<ConnectInfo<SocketAddr>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    match connect {
        Some(ConnectInfo(addr)) => tracing::info!(
            peer = %addr,
            status = response.status().as_u16(),
            "{} {}",
            method,
            path
        ),
        None => tracing::info!(status = response.status().as_u16(), "{} {}", method, path),
    }
    response
}

async fn health() -> &'static str {
    "OK"
}

/// `?motion=reduced` or the `Sec-CH-Prefers-Reduced-Motion: reduce` client hint.
fn motion_preference(query: &PageQuery, headers: &HeaderMap) -> MotionPreference {
    let from_query = query
        .motion
        .as_deref()
        .is_some_and(|m| m.trim().eq_ignore_ascii_case("reduced"));
    let from_hint = headers
        .get("sec-ch-prefers-reduced-motion")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("reduce"));
    if from_query || from_hint {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    }
}

fn render_options(state: &AppState, query: &PageQuery, headers: &HeaderMap) -> RenderOptions {
    RenderOptions {
        motion: motion_preference(query, headers),
        breakpoints: state.breakpoints,
        ..RenderOptions::default()
    }
}

/// Bucket for a page request: `?screen=` first, then the viewport-width client hint, else desktop.
/// An unknown `?screen=` falls through rather than failing the page.
fn requested_screen(state: &AppState, query: &PageQuery, headers: &HeaderMap) -> ScreenSize {
    query
        .screen
        .as_deref()
        .and_then(|s| s.parse::<ScreenSize>().ok())
        .or_else(|| {
            headers
                .get(VIEWPORT_WIDTH_HINT)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| state.breakpoints.classify_hint(v))
        })
        .unwrap_or_default()
}

/// Landing page. Asks Chromium browsers for the viewport hint on later requests;
/// everyone else is corrected by the script swapping the stage.
async fn landing(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Response {
    let layout = state.layout(requested_screen(&state, &query, &headers));
    let opts = render_options(&state, &query, &headers);
    (
        [("accept-ch", "Sec-CH-Viewport-Width"), ("vary", "Sec-CH-Viewport-Width")],
        Html(render_landing(
            &state.portfolio,
            &layout,
            &ContactFormView::default(),
            &opts,
        )),
    )
        .into_response()
}

/// Just the orbit stage for one bucket; the script swaps it in when the window crosses a breakpoint.
async fn stack_fragment(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Html<String> {
    let layout = state.layout(requested_screen(&state, &query, &headers));
    let opts = render_options(&state, &query, &headers);
    Html(render_orbits(&layout, &opts))
}

async fn projects(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Html<String> {
    let opts = render_options(&state, &query, &headers);
    Html(render_projects(&state.portfolio, query.year.as_deref(), &opts))
}

/// POST /contact: forward to the webhook and re-render the form.
/// htmx requests get the form fragment (always 200 so it swaps); plain posts get the whole landing page.
async fn contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(msg): Form<ContactMessage>,
) -> Response {
    let (status, view) = match state.dispatcher.send(&msg).await {
        Ok(()) => (StatusCode::OK, ContactFormView::sent()),
        Err(e) => {
            tracing::warn!(error = %e, "[folio-gateway] Contact submission failed");
            let status = if e.is_invalid_input() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            (status, ContactFormView::failed(msg, contact_error_text(&e)))
        }
    };

    if headers.contains_key("hx-request") {
        return Html(render_contact_form(&view)).into_response();
    }

    let opts = render_options(&state, &PageQuery::default(), &headers);
    let layout = state.layout(requested_screen(&state, &PageQuery::default(), &headers));
    (
        status,
        Html(render_landing(&state.portfolio, &layout, &view, &opts)),
    )
        .into_response()
}

fn contact_error_text(e: &ContactError) -> String {
    match e {
        ContactError::Invalid { field, reason } => format!("Please check your {}: {}.", field, reason),
        _ => GENERIC_CONTACT_ERROR.to_string(),
    }
}

/// Layout JSON for a screen bucket; default desktop. `?rings=` recomputes with that ring count.
async fn orbits(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OrbitQuery>,
) -> Result<Json<OrbitalLayout>, (StatusCode, String)> {
    let screen = match query.screen.as_deref() {
        Some(s) => s
            .parse::<ScreenSize>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?,
        None => ScreenSize::default(),
    };
    let layout = match query.rings {
        Some(rings) => compute_layout_checked(&state.portfolio.tech, screen, rings, state.orbit_seed),
        None => state.layout(screen),
    };
    Ok(Json(layout))
}

async fn not_found(uri: Uri) -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render_not_found(uri.path())))
}
