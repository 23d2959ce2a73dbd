use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use log::{info, warn};
use serde_json::json;
use std::time::{Duration, Instant};

use magnet_courier::app_state::AppState;
use magnet_courier::config::Config;
use magnet_courier::delivery::DeliveryClient;
use magnet_courier::extractor;
use magnet_courier::metrics::MetricsTracker;
use magnet_courier::models::{CollectRequest, DeliveryResult, SendRequest};
use magnet_courier::payload;
use magnet_courier::settings::SettingsStore;

#[post("/collect")]
async fn collect(body: web::Json<CollectRequest>) -> impl Responder {
    if body.html.trim().is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(json!({ "ok": false, "error": "page content unavailable" }));
    }

    let metadata = extractor::extract(&body.html, &body.page_url);
    if metadata.magnet_link.is_none() {
        warn!("No magnet link found on {}", body.page_url);
    }
    HttpResponse::Ok().json(metadata)
}

#[post("/send")]
async fn send(data: web::Data<AppState>, body: web::Json<SendRequest>) -> impl Responder {
    let stored = data.settings.lock().unwrap().snapshot();

    let resolved = match payload::build(&body, &stored) {
        Ok(r) => r,
        Err(e) => {
            return HttpResponse::BadRequest().json(DeliveryResult::failure(e.to_string()));
        }
    };

    info!(
        "Delivering \"{}\" to {} (category {})",
        resolved.payload.title, resolved.url, resolved.payload.category
    );

    let started = Instant::now();
    let result = data.delivery.deliver(&resolved.url, &resolved.payload).await;

    if result.ok {
        data.metrics
            .record_success(&resolved.url, started.elapsed(), result.unconfirmed);
    } else {
        let error = result.error.as_deref().unwrap_or("unknown error");
        warn!("Delivery to {} failed: {}", resolved.url, error);
        data.metrics.record_failure(&resolved.url, error);
    }

    HttpResponse::Ok().json(result)
}

#[get("/settings")]
async fn get_settings(data: web::Data<AppState>) -> impl Responder {
    let snapshot = data.settings.lock().unwrap().snapshot();
    HttpResponse::Ok().json(snapshot)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    nas_url: Option<String>,
    nas_token: Option<String>,
    category: Option<String>,
}

#[post("/settings")]
async fn save_settings(
    data: web::Data<AppState>,
    body: web::Json<SettingsUpdate>,
) -> impl Responder {
    let store = data.settings.lock().unwrap();

    let outcome = (|| {
        if let Some(url) = &body.nas_url {
            store.set_nas_url(url.trim())?;
        }
        if let Some(token) = &body.nas_token {
            store.set_nas_token(token.trim())?;
        }
        if let Some(category) = &body.category {
            store.set_category(category.trim())?;
        }
        Ok::<_, rusqlite::Error>(())
    })();

    match outcome {
        Ok(()) => HttpResponse::Ok().json(json!({ "ok": true })),
        Err(e) => {
            warn!("Settings update failed: {}", e);
            HttpResponse::InternalServerError()
                .json(json!({ "ok": false, "error": e.to_string() }))
        }
    }
}

#[get("/health")]
async fn health(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "ok": true,
        "delivery": {
            "timeoutSecs": data.config.delivery.timeout_secs,
            "authScheme": data.config.delivery.auth_scheme,
        }
    }))
}

#[get("/metrics")]
async fn metrics(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(data.metrics.all_metrics())
}

/// Configured port plus the next ten, capped at the top of the range
fn port_range(start: u16) -> std::ops::RangeInclusive<u16> {
    start..=start.saturating_add(10)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let cfg = Config::load();

    let store = SettingsStore::open(&cfg.settings_db)
        .expect("Failed to open settings store");

    let delivery = DeliveryClient::new(
        Duration::from_secs(cfg.delivery.timeout_secs),
        cfg.delivery.auth_scheme,
    )
    .expect("Failed to create delivery client");

    info!("Delivery client initialized:");
    info!("  Timeout: {}s", cfg.delivery.timeout_secs);
    info!("  Auth scheme: {:?}", cfg.delivery.auth_scheme);

    let data = web::Data::new(AppState {
        settings: std::sync::Mutex::new(store),
        delivery,
        metrics: MetricsTracker::new(),
        config: cfg.clone(),
    });

    // Try to bind to an available port starting at the configured one
    let mut last_err: Option<std::io::Error> = None;
    for port in port_range(cfg.port) {
        let data_clone = data.clone();
        let addr = format!("{}:{}", cfg.bind_host, port);
        match HttpServer::new(move || {
            App::new()
                .app_data(data_clone.clone())
                .service(collect)
                .service(send)
                .service(get_settings)
                .service(save_settings)
                .service(health)
                .service(metrics)
        })
        .bind(&addr)
        {
            Ok(server) => {
                info!("Listening on {}", addr);
                return server.run().await;
            }
            Err(e) => {
                last_err = Some(e);
                continue;
            }
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrInUse, "No available ports")
    }))
}
