//! Short link endpoints
//!
//! Every handler resolves the caller through the identity provider first and
//! attaches the identity cookie to the response when one was just issued.
//! JSON bodies are parsed by the `web::Json` extractor; malformed ones are
//! turned into 400s by the `JsonConfig` registered on the app.

use crate::auth::Identity;
use crate::core::deletion::ShortId;
use crate::core::links::short_id_for;
use crate::server::state::AppState;
use crate::utils::error::{Result, ShortenerError};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Header carrying the client address as seen by the fronting proxy
pub const REAL_IP_HEADER: &str = "X-Real-IP";

/// Configure short link routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/shorten", web::post().to(shorten))
            .route("/shorten/batch", web::post().to(shorten_batch))
            .route("/internal/stats", web::get().to(stats))
            .service(
                web::resource("/user/urls")
                    .route(web::get().to(user_urls))
                    .route(web::delete().to(delete_urls)),
            ),
    )
    .route("/", web::post().to(shorten_text))
    .route("/{id}", web::get().to(follow));
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenRequest {
    #[serde(alias = "URL")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub correlation_id: String,
    pub original_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub correlation_id: String,
    pub short_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLink {
    pub short_url: String,
    pub original_url: String,
}

/// `POST /api/shorten`: 201 with the short URL, 409 if it already exists
async fn shorten(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ShortenRequest>,
) -> Result<HttpResponse> {
    let identity = state.identity.identify(&req)?;
    let (status, result) = create_link(&state, &identity, body.into_inner().url)?;

    Ok(with_identity(
        HttpResponse::build(status).json(ShortenResponse { result }),
        &identity,
    ))
}

/// `POST /`: plain-text URL in, plain-text short URL out
async fn shorten_text(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: String,
) -> Result<HttpResponse> {
    let identity = state.identity.identify(&req)?;
    let (status, result) = create_link(&state, &identity, body.trim().to_string())?;

    Ok(with_identity(
        HttpResponse::build(status)
            .content_type("text/plain; charset=utf-8")
            .body(result),
        &identity,
    ))
}

/// `POST /api/shorten/batch`: shorten many URLs, echoing each correlation id.
///
/// Every URL is checked before any is stored. URLs that were already
/// shortened are reported like new ones.
async fn shorten_batch(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<Vec<BatchItem>>,
) -> Result<HttpResponse> {
    let identity = state.identity.identify(&req)?;
    let items = body.into_inner();
    if items.is_empty() {
        return Err(ShortenerError::bad_request("Batch is empty"));
    }

    let ids = items
        .iter()
        .map(|item| short_id_for(&item.original_url))
        .collect::<Result<Vec<_>>>()?;

    let base_url = state.config.server().base_url();
    let mut results = Vec::with_capacity(items.len());
    for (item, id) in items.into_iter().zip(ids) {
        let short_url = format!("{}{}", base_url, id);
        state
            .store
            .insert(id, item.original_url, identity.user.clone())?;
        results.push(BatchResult {
            correlation_id: item.correlation_id,
            short_url,
        });
    }
    debug!(links = results.len(), "Batch shortened");

    Ok(with_identity(
        HttpResponse::Created().json(results),
        &identity,
    ))
}

/// `GET /api/user/urls`: the caller's live links, 204 when there are none
async fn user_urls(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let identity = state.identity.identify(&req)?;
    let base_url = state.config.server().base_url();

    let links: Vec<UserLink> = state
        .store
        .links_for(&identity.user)
        .into_iter()
        .map(|record| UserLink {
            short_url: format!("{}{}", base_url, record.short_id),
            original_url: record.original_url,
        })
        .collect();

    let response = if links.is_empty() {
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::Ok().json(links)
    };
    Ok(with_identity(response, &identity))
}

/// `DELETE /api/user/urls`: body is a JSON array of short ids.
///
/// Responds 202 as soon as every batch is queued. Ownership is checked later
/// by the workers, so ids the caller does not own are silently skipped.
async fn delete_urls(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<Vec<ShortId>>,
) -> Result<HttpResponse> {
    let identity = state.identity.identify(&req)?;

    let batches = state
        .deletion
        .delete_batch(body.into_inner(), identity.user.clone())
        .await?;
    debug!(batches, "Deletion accepted");

    Ok(with_identity(HttpResponse::Accepted().finish(), &identity))
}

/// `GET /api/internal/stats`: link and user totals, for the trusted subnet only
async fn stats(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse> {
    let subnet = state
        .trusted_subnet
        .ok_or_else(|| ShortenerError::forbidden("Statistics are disabled"))?;

    let client = req
        .headers()
        .get(REAL_IP_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<IpAddr>().ok())
        .ok_or_else(|| ShortenerError::forbidden("Client address unknown"))?;

    if !subnet.contains(&client) {
        debug!(%client, "Statistics refused outside trusted subnet");
        return Err(ShortenerError::forbidden("Client is not in the trusted subnet"));
    }

    Ok(HttpResponse::Ok().json(state.store.stats()))
}

/// `GET /{id}`: 307 to the original URL, 410 if deleted, 404 if unknown
async fn follow(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = ShortId::new(path.into_inner());
    let original = state.store.get(&id)?;

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, original))
        .finish())
}

/// Store `url` for the caller; 201 when new, 409 when it already exists
fn create_link(
    state: &AppState,
    identity: &Identity,
    url: String,
) -> Result<(StatusCode, String)> {
    let id = short_id_for(&url)?;
    let short_url = format!("{}{}", state.config.server().base_url(), id);

    let status = if state.store.insert(id, url, identity.user.clone())? {
        StatusCode::CREATED
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, short_url))
}

fn with_identity(mut response: HttpResponse, identity: &Identity) -> HttpResponse {
    if let Some(cookie) = &identity.issued {
        if let Err(e) = response.add_cookie(cookie) {
            warn!(error = %e, "Failed to attach identity cookie");
        }
    }
    response
}
