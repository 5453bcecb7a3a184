use actix_web::{web, App, HttpServer, Responder, HttpResponse, HttpRequest};
use askama::Template;
use log::{info, error};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;

use crate::color::{normalize_hex, normalize_hue};
use crate::config::Config;
use crate::scale::{Scale, ScaleOptions, format_theme_css, generate_scale_with, sanitize_palette_name};
use crate::templates::SwatchStripTemplate;

struct ScaleRequest {
    seed: String,
    name: String,
    options: ScaleOptions,
}

#[derive(Serialize)]
struct ScaleResponse<'a> {
    seed: &'a str,
    name: &'a str,
    shades: &'a Scale,
}

fn query_params(req: &HttpRequest) -> HashMap<String, String> {
    url::form_urlencoded::parse(req.query_string().as_bytes()).into_owned().collect()
}

fn parse_override(params: &HashMap<String, String>, key: &str) -> Result<Option<f64>, String> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(format!("Invalid {} override '{}': expected a finite number", key, raw)),
        },
    }
}

fn parse_scale_request(hex: &str, params: &HashMap<String, String>, config: &Config) -> Result<ScaleRequest, String> {
    let seed = normalize_hex(hex).ok_or_else(|| format!("Invalid hex color '{}'", hex))?;
    let chroma = parse_override(params, "chroma")?;
    if chroma.is_some_and(|c| c < 0.0) {
        return Err("Invalid chroma override: must not be negative".to_string());
    }
    let hue = parse_override(params, "hue")?.map(normalize_hue);
    let name = params
        .get("name")
        .and_then(|n| sanitize_palette_name(n))
        .unwrap_or_else(|| config.default_palette_name.clone());
    Ok(ScaleRequest { seed, name, options: ScaleOptions { chroma, hue } })
}

fn bad_request(message: String) -> HttpResponse {
    error!("Rejected scale request: {}", message);
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

fn build_scale(hex: &str, req: &HttpRequest, config: &Config) -> Result<(ScaleRequest, Scale), HttpResponse> {
    let params = query_params(req);
    let request = parse_scale_request(hex, &params, config).map_err(bad_request)?;
    let scale = generate_scale_with(&request.seed, request.options).map_err(|e| {
        error!("Failed to generate scale for '{}': {:#}", request.seed, e);
        HttpResponse::InternalServerError().json(json!({ "error": e.to_string() }))
    })?;
    Ok((request, scale))
}

/// Register the scale routes. Handlers expect `web::Data<Config>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/scale/{hex}", web::get().to(scale_handler))
        .route("/scale_svg/{hex}", web::get().to(scale_svg_handler))
        .route("/scale_css/{hex}", web::get().to(scale_css_handler));
}

pub async fn run_api_server() -> std::io::Result<()> {
    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);

    info!("Starting API server on {}:{}", bind.0, bind.1);
    info!("Default seed: {}, palette name: {}", config.default_color, config.default_palette_name);

    let data = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(configure)
            .route("/", web::get().to(default_scale_handler))
    })
    .bind(bind)?
    .run()
    .await
}

async fn default_scale_handler(req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let seed = config.default_color.clone();
    scale_json(&seed, &req, &config)
}

async fn scale_handler(path: web::Path<String>, req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let hex = path.into_inner();
    info!("Received /scale request for seed: {}", hex);
    scale_json(&hex, &req, &config)
}

fn scale_json(hex: &str, req: &HttpRequest, config: &Config) -> HttpResponse {
    match build_scale(hex, req, config) {
        Ok((request, scale)) => HttpResponse::Ok().json(ScaleResponse {
            seed: &request.seed,
            name: &request.name,
            shades: &scale,
        }),
        Err(response) => response,
    }
}

async fn scale_svg_handler(path: web::Path<String>, req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let hex = path.into_inner();
    info!("Received /scale_svg request for seed: {}", hex);
    let (request, scale) = match build_scale(&hex, &req, &config) {
        Ok(built) => built,
        Err(response) => return response,
    };
    let template = SwatchStripTemplate::new(&request.name, &request.seed, &scale, config.swatch_size);
    match template.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("image/svg+xml")
            .body(body),
        Err(e) => {
            error!("Template error for seed '{}': {}", request.seed, e);
            HttpResponse::InternalServerError().body(format!("Template error: {}", e))
        },
    }
}

async fn scale_css_handler(path: web::Path<String>, req: HttpRequest, config: web::Data<Config>) -> impl Responder {
    let hex = path.into_inner();
    info!("Received /scale_css request for seed: {}", hex);
    match build_scale(&hex, &req, &config) {
        Ok((request, scale)) => HttpResponse::Ok()
            .content_type("text/css; charset=utf-8")
            .body(format_theme_css(&request.name, &scale)),
        Err(response) => response,
    }
}
