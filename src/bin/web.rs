//! Single binary web server: JSON REST API for organizing competitions.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::NaiveDate;
use combat_pool_web::{
    assemble_pools, generate_pool_fights, Competition, CompetitionId, CompetitionKind,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-competition entry: competition data + last activity time (for auto-cleanup).
struct CompetitionEntry {
    competition: Competition,
    last_activity: Instant,
}

/// In-memory state: many competitions by ID (sessioned). Entries are removed after inactivity.
type AppState = Data<RwLock<HashMap<CompetitionId, CompetitionEntry>>>;

/// Inactivity threshold: competitions not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateCompetitionBody {
    name: String,
    #[serde(default)]
    kind: CompetitionKind,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    owner: Option<String>,
}

#[derive(Deserialize)]
struct AddFighterBody {
    name: String,
    license: String,
    #[serde(default)]
    club: Option<String>,
}

/// One row of a CSV roster import (columns: name,license,club).
#[derive(Deserialize)]
struct CsvFighterRow {
    name: String,
    license: String,
    #[serde(default)]
    club: Option<String>,
}

#[derive(Deserialize)]
struct SetPresenceBody {
    is_present: bool,
}

#[derive(Deserialize)]
struct BulkPresenceBody {
    fighter_ids: Vec<Uuid>,
    is_present: bool,
}

#[derive(Deserialize)]
struct MinPerPoolBody {
    min_per_pool: usize,
}

#[derive(Deserialize)]
struct TargetPerPoolBody {
    target_per_pool: usize,
}

/// Path segment: competition id (e.g. /api/competitions/{id})
#[derive(Deserialize)]
struct CompetitionPath {
    id: CompetitionId,
}

/// Path segments: competition id and fighter id (e.g. /api/competitions/{id}/fighters/{fighter_id})
#[derive(Deserialize)]
struct CompetitionFighterPath {
    id: CompetitionId,
    fighter_id: Uuid,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "combat-pool-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new competition (returns it with id; client stores id for subsequent requests).
#[post("/api/competitions")]
async fn api_create_competition(state: AppState, body: Json<CreateCompetitionBody>) -> HttpResponse {
    let mut competition = Competition::new(body.name.trim(), body.kind);
    competition.date = body.date;
    competition.place = body.place.clone();
    competition.owner = body.owner.clone();
    let id = competition.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        CompetitionEntry {
            competition,
            last_activity: Instant::now(),
        },
    );
    match g.get(&id) {
        Some(entry) => HttpResponse::Ok().json(&entry.competition),
        None => HttpResponse::InternalServerError().body("state error"),
    }
}

/// Get a competition by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/competitions/{id}")]
async fn api_get_competition(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.competition)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    }
}

/// Add a fighter to the roster (roster must be open).
#[post("/api/competitions/{id}/fighters")]
async fn api_add_fighter(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<AddFighterBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.add_fighter(body.name.trim(), body.license.trim(), body.club.clone()) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Import a roster from a CSV body (columns: name,license,club).
/// All rows are staged before committing: a bad row imports nothing.
#[post("/api/competitions/{id}/fighters/import")]
async fn api_import_fighters(
    state: AppState,
    path: Path<CompetitionPath>,
    body: String,
) -> HttpResponse {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());
    let mut rows: Vec<CsvFighterRow> = Vec::new();
    for (i, record) in reader.deserialize::<CsvFighterRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("CSV row {}: {}", i + 1, e)
                }))
            }
        }
    }

    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();

    let mut staged = entry.competition.clone();
    for (i, row) in rows.iter().enumerate() {
        let club = row.club.clone().filter(|c| !c.is_empty());
        if let Err(e) = staged.add_fighter(row.name.trim(), row.license.trim(), club) {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("CSV row {}: {}", i + 1, e)
            }));
        }
    }
    let added = rows.len();
    entry.competition = staged;
    log::info!("Imported {} fighter(s) into competition {}", added, path.id);
    HttpResponse::Ok().json(&entry.competition)
}

/// Remove a fighter by id (roster must be open).
#[delete("/api/competitions/{id}/fighters/{fighter_id}")]
async fn api_remove_fighter(state: AppState, path: Path<CompetitionFighterPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.remove_fighter(path.fighter_id) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Check a fighter in or out.
#[put("/api/competitions/{id}/fighters/{fighter_id}/presence")]
async fn api_set_presence(
    state: AppState,
    path: Path<CompetitionFighterPath>,
    body: Json<SetPresenceBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.set_fighter_presence(path.fighter_id, body.is_present) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Check several fighters in or out at once.
#[put("/api/competitions/{id}/fighters/presence")]
async fn api_bulk_presence(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<BulkPresenceBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.bulk_set_presence(&body.fighter_ids, body.is_present) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Update the minimum pool size (pools below it get no fights).
#[put("/api/competitions/{id}/min-per-pool")]
async fn api_set_min_per_pool(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<MinPerPoolBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.set_min_per_pool(body.min_per_pool) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Update the preferred pool size used by assembly.
#[put("/api/competitions/{id}/target-per-pool")]
async fn api_set_target_per_pool(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Json<TargetPerPoolBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.set_target_per_pool(body.target_per_pool) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Freeze the roster (prerequisite for pool assembly).
#[post("/api/competitions/{id}/lock-roster")]
async fn api_lock_roster(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match c.lock_fighter_list() {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Distribute present fighters into pools (roster must be locked).
#[post("/api/competitions/{id}/pools/assemble")]
async fn api_assemble_pools(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match assemble_pools(c) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Generate the round-robin fight order for every assembled pool.
#[post("/api/competitions/{id}/fights/generate")]
async fn api_generate_fights(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No competition" })),
    };
    entry.last_activity = Instant::now();
    let c = &mut entry.competition;
    match generate_pool_fights(c) {
        Ok(()) => HttpResponse::Ok().json(c),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<CompetitionId, CompetitionEntry>::new()));

    // Background task: every 30 minutes, remove competitions inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive competition(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_competition)
            .service(api_get_competition)
            .service(api_add_fighter)
            .service(api_import_fighters)
            .service(api_remove_fighter)
            .service(api_bulk_presence)
            .service(api_set_presence)
            .service(api_set_min_per_pool)
            .service(api_set_target_per_pool)
            .service(api_lock_roster)
            .service(api_assemble_pools)
            .service(api_generate_fights)
    })
    .bind(bind)?
    .run()
    .await
}
