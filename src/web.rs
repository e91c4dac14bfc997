//! HTTP routes. Maps `LookupResult` onto status codes and JSON bodies.

use actix_web::{get, web, HttpResponse, Responder};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::cache;
use crate::lookup::LookupService;
use crate::username::UNKNOWN_USERNAME;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
pub struct FollowersQuery {
    user_id: Option<String>,
}

/// Register every route on an actix `App`; `LookupService` must be in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(health_check)
        .service(followers_by_path)
        .service(followers_by_query)
        .service(clear_cache)
        .service(cache_stats);
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(INDEX_HTML)
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json("Server is running")
}

#[get("/api/followers/{user_id}")]
async fn followers_by_path(path: web::Path<String>, service: web::Data<LookupService>) -> HttpResponse {
    let raw = path.into_inner();
    match raw.trim().parse::<i64>() {
        Ok(user_id) => respond_with_lookup(user_id, service).await,
        Err(e) => {
            warn!("Invalid user ID format: {}", raw);
            HttpResponse::BadRequest().json(json!({
                "error": "Invalid user ID format",
                "message": e.to_string()
            }))
        }
    }
}

#[get("/api/followers")]
async fn followers_by_query(query: web::Query<FollowersQuery>, service: web::Data<LookupService>) -> HttpResponse {
    let raw = match query.into_inner().user_id {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Missing user_id parameter",
                "message": "Please provide a user_id query parameter"
            }))
        }
    };

    match raw.trim().parse::<i64>() {
        Ok(user_id) => respond_with_lookup(user_id, service).await,
        Err(_) => HttpResponse::BadRequest().json(json!({
            "error": "Invalid user_id format",
            "message": "user_id must be a valid integer"
        })),
    }
}

#[get("/api/cache/clear")]
async fn clear_cache() -> impl Responder {
    cache::clear();
    HttpResponse::Ok().json(json!({ "message": "Cache cleared successfully" }))
}

#[get("/api/cache/stats")]
async fn cache_stats() -> impl Responder {
    HttpResponse::Ok().json(cache::stats())
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Endpoint not found",
        "message": "The requested endpoint does not exist"
    }))
}

async fn respond_with_lookup(user_id: i64, service: web::Data<LookupService>) -> HttpResponse {
    info!("Received request for user ID: {}", user_id);

    let id = match u64::try_from(user_id) {
        Ok(id) if id > 0 => id,
        _ => {
            warn!("Invalid user ID: {}", user_id);
            return HttpResponse::BadRequest().json(json!({
                "error": "Invalid user ID",
                "message": "User ID must be a positive integer"
            }));
        }
    };

    // the lookup blocks on outbound HTTP and the rate-limit pause
    let result = match web::block(move || service.lookup(id)).await {
        Ok(result) => result,
        Err(e) => {
            error!("Unexpected error for user {}: {}", id, e);
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error",
                "message": "An unexpected error occurred while processing your request"
            }));
        }
    };

    if result.success {
        info!("Successfully scraped followers for user {}: {:?}", id, result.followers);
        HttpResponse::Ok().json(json!({
            "user_id": id,
            "followers": result.followers,
            "username": result.username.as_deref().unwrap_or(UNKNOWN_USERNAME),
            "timestamp": result.timestamp
        }))
    } else {
        error!("Failed to scrape user {}: {:?}", id, result.error);
        HttpResponse::NotFound().json(json!({
            "error": result.error,
            "user_id": id
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedFetch;
    use crate::config::Config;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    const IDENTITY: &str = "https://users.roblox.com/v1/users/156";
    const COUNT: &str = "https://friends.roblox.com/v1/users/156/followers/count";
    const PROFILE: &str = "https://www.roblox.com/users/156/profile";

    fn lookup_data(fetch: ScriptedFetch) -> web::Data<LookupService> {
        let config = Config::from_lookup(|_| None).unwrap();
        web::Data::new(LookupService::new(Arc::new(fetch), &config))
    }

    fn happy_fetch() -> ScriptedFetch {
        ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"name":"builderman"}"#)
            .respond(COUNT, 200, r#"{"count":1234}"#)
    }

    async fn get(data: web::Data<LookupService>, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure)
                .default_service(web::route().to(not_found)),
        )
        .await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_web::test]
    async fn test_success_envelope() {
        let (status, body) = get(lookup_data(happy_fetch()), "/api/followers/156").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user_id"], 156);
        assert_eq!(body["followers"], 1234);
        assert_eq!(body["username"], "builderman");
        assert!(body["timestamp"].is_string());
        assert!(body.get("success").is_none());
    }

    #[actix_web::test]
    async fn test_query_parameter_route() {
        let (status, body) = get(lookup_data(happy_fetch()), "/api/followers?user_id=156").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["followers"], 1234);
    }

    #[actix_web::test]
    async fn test_failure_maps_to_404() {
        let fetch = ScriptedFetch::new().respond(PROFILE, 200, "User not found");
        let (status, body) = get(lookup_data(fetch), "/api/followers/156").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "User not found", "user_id": 156}));
    }

    #[actix_web::test]
    async fn test_rejects_bad_ids() {
        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/followers/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user ID");

        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/followers/-3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user ID");

        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/followers/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user ID format");

        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/followers").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing user_id parameter");

        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/followers?user_id=x1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid user_id format");
    }

    #[actix_web::test]
    async fn test_cache_endpoints() {
        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/cache/clear").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Cache cleared successfully");

        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/cache/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cache_enabled"], false);
        assert_eq!(body["total_entries"], 0);
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let (status, body) = get(lookup_data(ScriptedFetch::new()), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Endpoint not found");
    }
}
