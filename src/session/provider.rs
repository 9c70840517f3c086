use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::LapchartError;

use super::disk_cache::ResponseCache;
use super::{LapRecord, SessionHandle, SessionKind};

const USER_AGENT: &str = concat!("lapchart/", env!("CARGO_PKG_VERSION"));

/// A source of Formula 1 session data.
///
/// Loading happens in two steps: `session` resolves the user's request to a
/// provider session, and `load_laps` fetches the lap timing for it. Only lap
/// data is ever requested; car telemetry and weather streams are not part of
/// this interface.
pub trait TelemetryProvider: Send + Sync {
    /// Resolves a year, free-text race name and session kind to a provider session.
    ///
    /// # Errors
    ///
    /// Returns `RaceNotFound` when no session matches, or any transport/decoding
    /// error raised while querying the provider.
    fn session(
        &self,
        year: i32,
        race: &str,
        kind: SessionKind,
    ) -> Result<SessionHandle, LapchartError>;

    /// Loads the lap records of a resolved session.
    fn load_laps(&self, session: &SessionHandle) -> Result<Vec<LapRecord>, LapchartError>;
}

/// `TelemetryProvider` backed by the OpenF1 REST API.
pub struct OpenF1Provider {
    base_url: String,
    client: reqwest::blocking::Client,
    cache: Option<ResponseCache>,
}

impl OpenF1Provider {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        cache_dir: Option<&Path>,
    ) -> Result<Self, LapchartError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LapchartError::ProviderRequest {
                url: base_url.to_string(),
                source: e,
            })?;
        let cache = cache_dir.map(ResponseCache::new).transpose()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            cache,
        })
    }

    fn get_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, LapchartError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        if let Some(cache) = &self.cache
            && let Some(body) = cache.load(endpoint, query)
        {
            match serde_json::from_str(&body) {
                Ok(items) => return Ok(items),
                Err(e) => {
                    // unreadable entries are dropped and fetched again
                    warn!("Discarding unreadable cache entry for {} {:?}: {}", url, query, e);
                    cache.remove(endpoint, query);
                }
            }
        }

        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .map_err(|e| LapchartError::ProviderRequest {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        // OpenF1 answers 404 when a filter matches nothing
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("No results for {} {:?}", url, query);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(LapchartError::ProviderStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|e| LapchartError::ProviderRequest {
                url: url.clone(),
                source: e,
            })?;
        let items = serde_json::from_str(&body).map_err(|e| LapchartError::ProviderDecode {
            url: url.clone(),
            source: e,
        })?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.store(endpoint, query, &body)
        {
            warn!("Could not cache response from {}: {}", url, e);
        }
        Ok(items)
    }
}

impl TelemetryProvider for OpenF1Provider {
    fn session(
        &self,
        year: i32,
        race: &str,
        kind: SessionKind,
    ) -> Result<SessionHandle, LapchartError> {
        let sessions: Vec<OpenF1Session> = self.get_list(
            "sessions",
            &[
                ("year", year.to_string()),
                ("session_name", provider_session_name(kind).to_string()),
            ],
        )?;

        if let Some(session) = sessions.iter().find(|s| s.matches(race)) {
            return Ok(session.handle(year, kind));
        }

        // fall back to the event names, e.g. "Italian Grand Prix"
        let meetings: Vec<OpenF1Meeting> =
            self.get_list("meetings", &[("year", year.to_string())])?;
        let meeting_keys: Vec<u32> = meetings
            .iter()
            .filter(|m| m.matches(race))
            .map(|m| m.meeting_key)
            .collect();

        sessions
            .iter()
            .find(|s| s.meeting_key.is_some_and(|k| meeting_keys.contains(&k)))
            .map(|s| s.handle(year, kind))
            .ok_or_else(|| LapchartError::RaceNotFound {
                year,
                race: race.to_string(),
                kind: kind.to_string(),
            })
    }

    fn load_laps(&self, session: &SessionHandle) -> Result<Vec<LapRecord>, LapchartError> {
        let query = [("session_key", session.key.to_string())];

        let drivers: Vec<OpenF1Driver> = self.get_list("drivers", &query)?;
        let acronyms: HashMap<u32, String> = drivers
            .into_iter()
            .filter_map(|d| Some((d.driver_number, d.name_acronym?)))
            .collect();

        let laps: Vec<OpenF1Lap> = self.get_list("laps", &query)?;
        info!(
            "Loaded {} laps for {} drivers from session {} ({})",
            laps.len(),
            acronyms.len(),
            session.key,
            session.name
        );
        Ok(laps
            .into_iter()
            .map(|lap| lap.into_record(&acronyms))
            .collect())
    }
}

fn provider_session_name(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Race => "Race",
        SessionKind::Qualifying => "Qualifying",
        SessionKind::FP1 => "Practice 1",
        SessionKind::FP2 => "Practice 2",
        SessionKind::FP3 => "Practice 3",
    }
}

/// Case-insensitive match of the user's race text against any of the candidate names
fn matches_race<'a>(race: &str, candidates: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = race.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    candidates
        .into_iter()
        .map(str::to_lowercase)
        .any(|candidate| candidate.contains(&needle))
}

fn seconds_to_duration(seconds: Option<f64>) -> Option<Duration> {
    seconds
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64)
}

#[derive(Deserialize, Debug, Clone)]
struct OpenF1Session {
    session_key: u32,
    meeting_key: Option<u32>,
    location: Option<String>,
    country_name: Option<String>,
    circuit_short_name: Option<String>,
}

impl OpenF1Session {
    fn matches(&self, race: &str) -> bool {
        matches_race(
            race,
            [&self.location, &self.circuit_short_name, &self.country_name]
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
    }

    fn handle(&self, year: i32, kind: SessionKind) -> SessionHandle {
        SessionHandle {
            key: self.session_key,
            year,
            kind,
            name: self
                .location
                .clone()
                .or_else(|| self.circuit_short_name.clone())
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
struct OpenF1Meeting {
    meeting_key: u32,
    meeting_name: Option<String>,
    meeting_official_name: Option<String>,
}

impl OpenF1Meeting {
    fn matches(&self, race: &str) -> bool {
        matches_race(
            race,
            [&self.meeting_name, &self.meeting_official_name]
                .into_iter()
                .flatten()
                .map(String::as_str),
        )
    }
}

#[derive(Deserialize, Debug, Clone)]
struct OpenF1Driver {
    driver_number: u32,
    name_acronym: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
struct OpenF1Lap {
    driver_number: Option<u32>,
    lap_number: Option<u32>,
    lap_duration: Option<f64>,
    duration_sector_1: Option<f64>,
    duration_sector_2: Option<f64>,
    duration_sector_3: Option<f64>,
    is_pit_out_lap: Option<bool>,
}

impl OpenF1Lap {
    fn into_record(self, acronyms: &HashMap<u32, String>) -> LapRecord {
        LapRecord {
            driver: self.driver_number.map(|number| {
                acronyms
                    .get(&number)
                    .cloned()
                    .unwrap_or_else(|| number.to_string())
            }),
            lap_number: self.lap_number,
            lap_time: seconds_to_duration(self.lap_duration),
            sector_times: [
                seconds_to_duration(self.duration_sector_1),
                seconds_to_duration(self.duration_sector_2),
                seconds_to_duration(self.duration_sector_3),
            ],
            is_pit_out_lap: self.is_pit_out_lap,
        }
    }
}
