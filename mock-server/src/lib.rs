//! In-memory stand-in for the Fortnite Tracker v1 API.
//!
//! Serves the two read-only profile endpoints under `/v1`, checks the
//! `TRN-Api-Key` header, and answers errors with `{"message": ...}` bodies
//! the way the real service does.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

pub const API_KEY_HEADER: &str = "TRN-Api-Key";
pub const DEFAULT_API_KEY: &str = "abc123";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMatch {
    pub id: u64,
    pub account_id: String,
    pub playlist: String,
    pub kills: u32,
    pub matches: u32,
    pub top1: u32,
    pub score: u32,
    pub players_outlived: u32,
    pub date_collected: String,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub account_id: String,
    pub platform: String,
    pub nickname: String,
    pub wins: u32,
    pub kills: u32,
    pub matches_played: u32,
    pub recent_matches: Vec<RecentMatch>,
}

impl Player {
    /// A player with a fresh account id and two recent matches.
    pub fn new(platform: &str, nickname: &str, wins: u32, kills: u32, matches_played: u32) -> Self {
        let account_id = Uuid::new_v4().simple().to_string();
        let recent_matches = (1..=2u32)
            .map(|n| RecentMatch {
                id: u64::from(n) * 1000 + u64::from(wins),
                account_id: account_id.clone(),
                playlist: if n == 1 { "p2" } else { "p9" }.to_string(),
                kills: kills / (n + 1),
                matches: n,
                top1: u32::from(n == 1),
                score: 100 * n,
                players_outlived: 50 + n,
                date_collected: format!("2018-05-0{n}T12:00:00"),
            })
            .collect();
        Self {
            account_id,
            platform: platform.to_string(),
            nickname: nickname.to_string(),
            wins,
            kills,
            matches_played,
            recent_matches,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    players: Arc<HashMap<String, Player>>,
}

pub fn seed_players() -> Vec<Player> {
    vec![
        Player::new("pc", "ninja", 120, 2400, 600),
        Player::new("psn", "tfue", 80, 1500, 400),
    ]
}

pub fn app() -> Router {
    app_with(DEFAULT_API_KEY, seed_players())
}

pub fn app_with(api_key: &str, players: Vec<Player>) -> Router {
    let players = players
        .into_iter()
        .map(|p| (p.account_id.clone(), p))
        .collect();
    let state = AppState {
        api_key: Arc::from(api_key),
        players: Arc::new(players),
    };
    Router::new()
        .route("/v1/profile/{platform}/{nickname}", get(player_stats))
        .route("/v1/profile/account/{account_id}/matches", get(match_history))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    tracing::info!(addr = %listener.local_addr()?, "mock tracker listening");
    axum::serve(listener, app()).await
}

type Failure = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (status, Json(json!({ "message": message })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), Failure> {
    let key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if key == Some(&*state.api_key) {
        Ok(())
    } else {
        tracing::debug!("rejected request without a valid api key");
        Err(failure(StatusCode::UNAUTHORIZED, "invalid api key"))
    }
}

fn platform_long(platform: &str) -> Option<(i32, &'static str)> {
    match platform {
        "xbl" => Some((1, "Xbox")),
        "psn" => Some((2, "PlayStation")),
        "pc" => Some((3, "PC")),
        _ => None,
    }
}

fn score(label: &str, field: &str, value: u32) -> Value {
    json!({
        "label": label,
        "field": field,
        "category": "General",
        "valueInt": value,
        "value": value.to_string(),
        "rank": 1,
        "percentile": 0.5,
        "displayValue": value.to_string(),
    })
}

fn ratio(label: &str, field: &str, value: f64) -> Value {
    json!({
        "label": label,
        "field": field,
        "category": "General",
        "valueDec": value,
        "value": format!("{value:.2}"),
        "rank": 1,
        "percentile": 0.5,
        "displayValue": format!("{value:.2}"),
    })
}

fn mode_stats(player: &Player) -> Value {
    let deaths = player.matches_played.saturating_sub(player.wins).max(1);
    json!({
        "top1": score("Wins", "Top1", player.wins),
        "matches": score("Matches", "Matches", player.matches_played),
        "kills": score("Kills", "Kills", player.kills),
        "kd": ratio("K/d", "Kd", f64::from(player.kills) / f64::from(deaths)),
        "winRatio": ratio("Win %", "WinRatio", 100.0 * f64::from(player.wins) / f64::from(player.matches_played.max(1))),
    })
}

fn stats_document(player: &Player, platform_id: i32, platform_long: &str) -> Value {
    json!({
        "accountId": player.account_id,
        "platformId": platform_id,
        "platformName": player.platform,
        "platformNameLong": platform_long,
        "epicUserHandle": player.nickname,
        "stats": { "p2": mode_stats(player) },
        "lifeTimeStats": [
            { "key": "Wins", "value": player.wins.to_string() },
            { "key": "Kills", "value": player.kills.to_string() },
            { "key": "Matches Played", "value": player.matches_played.to_string() },
        ],
        "recentMatches": player.recent_matches,
    })
}

async fn player_stats(
    State(state): State<AppState>,
    Path((platform, nickname)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Value>, Failure> {
    authorize(&state, &headers)?;
    let (platform_id, long_name) =
        platform_long(&platform).ok_or_else(|| failure(StatusCode::BAD_REQUEST, "unknown platform"))?;
    state
        .players
        .values()
        .find(|p| p.platform == platform && p.nickname.eq_ignore_ascii_case(&nickname))
        .map(|p| Json(stats_document(p, platform_id, long_name)))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "not found"))
}

async fn match_history(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<RecentMatch>>, Failure> {
    authorize(&state, &headers)?;
    state
        .players
        .get(&account_id)
        .map(|p| Json(p.recent_matches.clone()))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "not found"))
}
