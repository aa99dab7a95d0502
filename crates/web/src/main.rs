//! Façade HTTP du codec ADN
//!
//! Expose l'encodage et le décodage du cœur sur deux routes POST. Les
//! requêtes GET documentent l'API en JSON. Le travail est purement CPU:
//! chaque requête est déportée sur le pool bloquant d'actix. Chaque requête
//! reçoit un identifiant de travail consultable ensuite sur /jobs/{id}.

use actix_web::{error, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use arcadn_core::{CodecParams, CodecStats, Decoder, Encoder};

const API_NAME: &str = "arcadn";
const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// État global de l'application
struct AppState {
    jobs: RwLock<HashMap<Uuid, JobRecord>>,
}

/// Trace d'un travail d'encodage ou de décodage
#[derive(Debug, Clone, Serialize)]
struct JobRecord {
    operation: &'static str,
    status: JobStatus,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum JobStatus {
    Complete,
    Failed,
}

#[derive(Serialize)]
struct ApiInfo {
    name: &'static str,
    version: &'static str,
}

impl ApiInfo {
    fn current() -> Self {
        Self {
            name: API_NAME,
            version: API_VERSION,
        }
    }
}

#[derive(Serialize)]
struct RouteDoc {
    route: &'static str,
    verb: &'static str,
    description: &'static str,
}

#[derive(Deserialize)]
struct CodecQuery {
    /// Identifiant du paquet d'information, pilote le primer
    id: Option<String>,
}

#[derive(Serialize)]
struct EncodeResponse {
    api: ApiInfo,
    job: Uuid,
    timestamp: DateTime<Utc>,
    dna: Vec<String>,
    statistics: CodecStats,
}

fn params_for(id: Option<String>) -> CodecParams {
    match id {
        Some(id) => CodecParams::with_package_id(id),
        None => CodecParams {
            primer_length: 0,
            ..CodecParams::default()
        },
    }
}

impl AppState {
    async fn record<T>(&self, job: Uuid, operation: &'static str, result: &arcadn_core::Result<T>) {
        let record = JobRecord {
            operation,
            status: match result {
                Ok(_) => JobStatus::Complete,
                Err(_) => JobStatus::Failed,
            },
            timestamp: Utc::now(),
            error: result.as_ref().err().map(|e| e.to_string()),
        };
        self.jobs.write().await.insert(job, record);
    }
}

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "api": ApiInfo::current(),
        "description": "Encode un fichier binaire en ADN et le décode.",
        "routes": [
            RouteDoc { route: "/encode", verb: "POST", description: "corps binaire → segments ADN et statistiques" },
            RouteDoc { route: "/decode", verb: "POST", description: "texte ADN → binaire d'origine" },
            RouteDoc { route: "/jobs/{id}", verb: "GET", description: "trace d'un travail passé" },
        ],
    }))
}

#[get("/encode")]
async fn encode_doc() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "api": ApiInfo::current(),
        "description": "Encode un fichier binaire en ADN.",
        "request-verb": "POST",
        "request-body": "contenu binaire du paquet",
        "request-parameters": { "id": "identifiant du paquet [optionnel]" },
        "example": "curl --data-binary @aip.zip -X POST 'http://localhost:8080/encode?id=test:1'",
    }))
}

#[post("/encode")]
async fn encode(
    state: web::Data<AppState>,
    query: web::Query<CodecQuery>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    let job = Uuid::new_v4();
    let params = params_for(query.into_inner().id);
    info!(%job, bytes = body.len(), "requête d'encodage");

    let result = web::block(move || -> arcadn_core::Result<_> {
        let mut encoder = Encoder::new(params)?;
        let dna = encoder.encode(&body)?;
        Ok((dna, encoder.stats().clone()))
    })
    .await?;
    state.record(job, "encode", &result).await;
    let (dna, statistics) = result.map_err(error::ErrorUnprocessableEntity)?;

    Ok(HttpResponse::Ok().json(EncodeResponse {
        api: ApiInfo::current(),
        job,
        timestamp: Utc::now(),
        dna,
        statistics,
    }))
}

#[get("/decode")]
async fn decode_doc() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "api": ApiInfo::current(),
        "description": "Décode un fichier ADN (un segment par ligne, lettres A, T, G, C, encodage utf-8) vers le binaire.",
        "request-verb": "POST",
        "request-body": "texte ADN",
        "request-parameters": { "id": "identifiant du paquet [optionnel]" },
        "example": "curl --data-binary @dna.txt -X POST http://localhost:8080/decode -o aip_decoded.zip",
    }))
}

#[post("/decode")]
async fn decode(
    state: web::Data<AppState>,
    query: web::Query<CodecQuery>,
    body: web::Bytes,
) -> actix_web::Result<HttpResponse> {
    let job = Uuid::new_v4();
    let params = params_for(query.into_inner().id);
    let text = String::from_utf8(body.to_vec()).map_err(error::ErrorBadRequest)?;
    info!(%job, segments = text.lines().count(), "requête de décodage");

    let result = web::block(move || -> arcadn_core::Result<_> {
        let mut decoder = Decoder::new(params)?;
        decoder.decode(&text)
    })
    .await?;
    state.record(job, "decode", &result).await;
    let payload = result.map_err(error::ErrorUnprocessableEntity)?;

    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(payload))
}

#[get("/jobs/{id}")]
async fn job_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> actix_web::Result<HttpResponse> {
    let id = path.into_inner();
    match state.jobs.read().await.get(&id) {
        Some(record) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "api": ApiInfo::current(),
            "job": id,
            "record": record,
        }))),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "api": ApiInfo::current(),
            "error": format!("travail inconnu: {id}"),
        }))),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    arcadn_core::logging::init_logging();

    let host = std::env::var("ARCADN_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port: u16 = std::env::var("ARCADN_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    info!(%host, port, "démarrage du serveur");

    let state = web::Data::new(AppState {
        jobs: RwLock::new(HashMap::new()),
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(index)
            .service(encode_doc)
            .service(encode)
            .service(decode_doc)
            .service(decode)
            .service(job_status)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
