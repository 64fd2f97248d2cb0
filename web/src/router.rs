use crate::{controller::health_check_controller, middleware::auth::require_auth, params, AppState};
use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::controller::{
    campaign, campaign_controller, ingestion_controller, user_session_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Chronicler API"
        ),
        paths(
            campaign_controller::index,
            campaign_controller::read,
            campaign_controller::create,
            campaign_controller::update,
            campaign_controller::delete,
            campaign::game_session_controller::index,
            campaign::game_session_controller::read,
            campaign::game_session_controller::delete,
            campaign::wiki_entry_controller::index,
            campaign::wiki_entry_controller::create,
            campaign::wiki_entry_controller::read,
            campaign::wiki_entry_controller::update,
            campaign::wiki_entry_controller::delete,
            campaign::wiki_entry_controller::suggestions,
            ingestion_controller::upload,
            ingestion_controller::transcribe,
            ingestion_controller::recap,
            ingestion_controller::ingest,
            user_session_controller::login,
            user_session_controller::delete,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                domain::campaigns::Model,
                domain::game_sessions::Model,
                domain::users::Model,
                domain::wiki_entries::Model,
                domain::user::Credentials,
                domain::ingestion::IngestReport,
                domain::wiki_merge::MergedEntry,
                domain::wiki_tree::WikiTreeNode,
                params::ingestion::TranscribeParams,
                params::ingestion::RecapParams,
                params::ingestion::IngestParams,
                params::wiki_entry::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "chronicler", description = "Tabletop RPG Session Chronicler API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(campaign_routes(app_state.clone()))
        .merge(game_session_routes(app_state.clone()))
        .merge(wiki_entry_routes(app_state.clone()))
        .merge(ingestion_routes(app_state.clone()))
        .merge(health_routes())
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi2.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

pub fn campaign_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/campaigns", get(campaign_controller::index))
        .route("/campaigns", post(campaign_controller::create))
        .route("/campaigns/:id", get(campaign_controller::read))
        .route("/campaigns/:id", put(campaign_controller::update))
        .route("/campaigns/:id", delete(campaign_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn game_session_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/campaigns/:campaign_id/sessions",
            get(campaign::game_session_controller::index),
        )
        .route(
            "/campaigns/:campaign_id/sessions/:session_id",
            get(campaign::game_session_controller::read),
        )
        .route(
            "/campaigns/:campaign_id/sessions/:session_id",
            delete(campaign::game_session_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn wiki_entry_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/campaigns/:campaign_id/wiki",
            get(campaign::wiki_entry_controller::index),
        )
        .route(
            "/campaigns/:campaign_id/wiki",
            post(campaign::wiki_entry_controller::create),
        )
        .route(
            "/campaigns/:campaign_id/wiki/:entry_id",
            get(campaign::wiki_entry_controller::read),
        )
        .route(
            "/campaigns/:campaign_id/wiki/:entry_id",
            put(campaign::wiki_entry_controller::update),
        )
        .route(
            "/campaigns/:campaign_id/wiki/:entry_id",
            delete(campaign::wiki_entry_controller::delete),
        )
        .route(
            "/campaigns/:campaign_id/wiki/:entry_id/suggestions",
            post(campaign::wiki_entry_controller::suggestions),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

/// Routes for the upload -> transcribe -> recap -> ingest pipeline
fn ingestion_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sessions/upload", post(ingestion_controller::upload))
        .route(
            "/sessions/transcribe",
            post(ingestion_controller::transcribe),
        )
        .route("/sessions/recap", post(ingestion_controller::recap))
        .route("/sessions/ingest", post(ingestion_controller::ingest))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

pub fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/logout", delete(user_session_controller::delete))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

pub fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

// This will serve static files that we can use as a "fallback" for when the server panics
pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./"))
}
