//! Response types of the Fortnite Tracker v1 profile endpoints.
//!
//! Every struct defaults missing fields, since the tracker omits modes a
//! player has never played and fields it has no value for.

use serde::{Deserialize, Serialize};

/// Battle Royale stats for one player on one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub account_id: String,
    pub platform_id: i32,
    pub platform_name: String,
    pub platform_name_long: String,
    pub epic_user_handle: String,
    pub stats: Stats,
    pub life_time_stats: Vec<LifeTimeStat>,
    pub recent_matches: Vec<Match>,
}

impl PlayerStats {
    /// Value of the lifetime stat named `key`, e.g. `"Wins"`.
    pub fn lifetime(&self, key: &str) -> Option<&str> {
        self.life_time_stats
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.value.as_str())
    }
}

/// Per-mode stats. `current_*` cover the current season only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    #[serde(rename = "p2")]
    pub solo: StatField,
    #[serde(rename = "p10")]
    pub duo: StatField,
    #[serde(rename = "p9")]
    pub squad: StatField,
    #[serde(rename = "ltm")]
    pub limited_time_modes: StatField,
    #[serde(rename = "curr_p2")]
    pub current_solo: StatField,
    #[serde(rename = "curr_p10")]
    pub current_duo: StatField,
    #[serde(rename = "curr_p9")]
    pub current_squad: StatField,
    #[serde(rename = "curr_ltm")]
    pub current_limited_time_modes: StatField,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatField {
    pub trn_rating: ScoreField,
    pub score: ScoreField,
    pub top1: ScoreField,
    pub top3: ScoreField,
    pub top5: ScoreField,
    pub top6: ScoreField,
    pub top10: ScoreField,
    pub top12: ScoreField,
    pub top25: ScoreField,
    pub kd: RatioField,
    pub win_ratio: RatioField,
    pub matches: ScoreField,
    pub kills: ScoreField,
    pub minutes_played: ScoreField,
    pub kpm: RatioField,
    pub kpg: RatioField,
    pub avg_time_played: RatioField,
    pub score_per_match: RatioField,
    pub score_per_min: RatioField,
}

/// An integer-valued stat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreField {
    pub label: String,
    pub field: String,
    pub category: String,
    pub value_int: i64,
    pub value: String,
    pub rank: i64,
    pub percentile: f64,
    pub display_value: String,
}

/// A decimal-valued stat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatioField {
    pub label: String,
    pub field: String,
    pub category: String,
    pub value_dec: f64,
    pub value: String,
    pub rank: i64,
    pub percentile: f64,
    pub display_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeTimeStat {
    pub key: String,
    pub value: String,
}

/// One entry of a player's match history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Match {
    pub id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account_id: String,
    pub top1: i32,
    pub top3: i32,
    pub top5: i32,
    pub top6: i32,
    pub top10: i32,
    pub top12: i32,
    pub top25: i32,
    pub date_collected: String,
    pub kills: i32,
    pub matches: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub minutes_played: i32,
    #[serde(skip_serializing_if = "is_zero")]
    pub platform: i32,
    pub players_outlived: i32,
    pub playlist: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub playlist_id: i32,
    pub score: i32,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub trn_rating: f64,
    #[serde(skip_serializing_if = "is_zero_f64")]
    pub trn_rating_change: f64,
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = r#"{
        "accountId": "4735ce9132924caf8a5b17789b40f79c",
        "platformId": 3,
        "platformName": "pc",
        "platformNameLong": "PC",
        "epicUserHandle": "Ninja",
        "stats": {
            "p2": {
                "top1": {"label": "Wins", "field": "Top1", "category": "Tops", "valueInt": 12, "value": "12", "rank": 3, "percentile": 0.1, "displayValue": "12"},
                "kd": {"label": "K/d", "field": "Kd", "category": "General", "valueDec": 4.5, "value": "4.50", "rank": 10, "percentile": 0.2, "displayValue": "4.50"}
            },
            "curr_p9": {
                "kills": {"label": "Kills", "valueInt": 30}
            }
        },
        "lifeTimeStats": [{"key": "Wins", "value": "12"}, {"key": "Kills", "value": "400"}],
        "recentMatches": [
            {"id": 1234, "accountId": "4735ce9132924caf8a5b17789b40f79c", "playlist": "p2", "kills": 5,
             "matches": 1, "top1": 1, "score": 300, "playersOutlived": 98, "dateCollected": "2018-05-01T12:00:00",
             "trnRating": 1500.5, "trnRatingChange": 12.25}
        ]
    }"#;

    #[test]
    fn decodes_tracker_document() {
        let stats: PlayerStats = serde_json::from_str(STATS).unwrap();
        assert_eq!(stats.account_id, "4735ce9132924caf8a5b17789b40f79c");
        assert_eq!(stats.platform_id, 3);
        assert_eq!(stats.epic_user_handle, "Ninja");
        assert_eq!(stats.stats.solo.top1.value_int, 12);
        assert_eq!(stats.stats.solo.top1.display_value, "12");
        assert_eq!(stats.stats.solo.kd.value_dec, 4.5);
        assert_eq!(stats.stats.current_squad.kills.value_int, 30);
        assert_eq!(stats.stats.duo, StatField::default());
        assert_eq!(stats.lifetime("Kills"), Some("400"));
        assert_eq!(stats.lifetime("Deaths"), None);

        let m = &stats.recent_matches[0];
        assert_eq!(m.id, 1234);
        assert_eq!(m.players_outlived, 98);
        assert_eq!(m.trn_rating_change, 12.25);
        assert_eq!(m.minutes_played, 0);
    }

    #[test]
    fn encode_then_decode_preserves_fields() {
        let stats: PlayerStats = serde_json::from_str(STATS).unwrap();
        let json = serde_json::to_string(&stats).unwrap();
        let back: PlayerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn zero_valued_optional_match_fields_are_omitted() {
        let m = Match {
            id: 7,
            kills: 2,
            ..Match::default()
        };
        let json = serde_json::to_value(&m).unwrap();
        assert!(json.get("accountId").is_none());
        assert!(json.get("minutesPlayed").is_none());
        assert!(json.get("trnRating").is_none());
        assert_eq!(json["kills"], 2);
        assert_eq!(json["playersOutlived"], 0);
    }
}
