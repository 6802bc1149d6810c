//! Save metadata from the top-level files of the save root

use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use serde::Deserialize;

use crate::extract::{self, EntryKind};
use crate::models::{ArchiveEntry, SaveMetadata};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct GameFile {
    organisation_name: Option<String>,
    seed: Option<i64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SaveTimestamp {
    year: i32,
    month: u32,
    day: u32,
    #[serde(default)]
    hour: u32,
    #[serde(default)]
    minute: u32,
    #[serde(default)]
    second: u32,
}

impl SaveTimestamp {
    fn to_datetime(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct MetadataFile {
    creation_date: Option<SaveTimestamp>,
    last_played_date: Option<SaveTimestamp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct MoneyFile {
    online_balance: Option<f64>,
    networth: Option<f64>,
    lifetime_earnings: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RankFile {
    rank: Option<u32>,
    tier: Option<u32>,
    #[serde(rename = "XP")]
    xp: Option<u64>,
    #[serde(rename = "TotalXP")]
    total_xp: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct TimeFile {
    elapsed_days: Option<u32>,
    playtime: Option<f64>,
}

/// Fill the metadata record from `Game`, `Metadata`, `Money`, `Rank` and
/// `Time`. Anything missing or malformed stays `None`.
pub fn parse_metadata(files: &[&ArchiveEntry]) -> SaveMetadata {
    let mut meta = SaveMetadata::default();

    for entry in files {
        let EntryKind::Global { category } = extract::classify(&entry.path) else {
            continue;
        };

        match category {
            "Game" => {
                if let Some(file) = extract::read_json::<GameFile>(entry) {
                    meta.game.organisation_name = file.organisation_name;
                    meta.game.seed = file.seed;
                }
            }
            "Metadata" => {
                if let Some(file) = extract::read_json::<MetadataFile>(entry) {
                    meta.game.creation_date = file.creation_date.and_then(SaveTimestamp::to_datetime);
                    meta.game.last_played_date =
                        file.last_played_date.and_then(SaveTimestamp::to_datetime);
                }
            }
            "Money" => {
                if let Some(file) = extract::read_json::<MoneyFile>(entry) {
                    meta.player.online_balance = file.online_balance;
                    meta.player.net_worth = file.networth;
                    meta.player.lifetime_earnings = file.lifetime_earnings;
                }
            }
            "Rank" => {
                if let Some(file) = extract::read_json::<RankFile>(entry) {
                    meta.player.rank = file.rank;
                    meta.player.tier = file.tier;
                    meta.player.xp = file.xp;
                    meta.player.total_xp = file.total_xp;
                }
            }
            "Time" => {
                if let Some(file) = extract::read_json::<TimeFile>(entry) {
                    meta.game.elapsed_days = file.elapsed_days;
                    meta.game.playtime = file.playtime;
                }
            }
            other => debug!("Ignoring global file '{}'", other),
        }
    }

    meta
}
