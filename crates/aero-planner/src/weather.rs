//! Airport weather store.
//!
//! Reports are held in an explicit store handed to whoever needs them rather
//! than in shared global state.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wind {
    pub direction_deg: u16,
    pub speed_kt: u16,
    pub gust_kt: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// When the observation was made; pruning ages reports from here.
    pub observed_at: DateTime<Utc>,
    pub metar: Option<String>,
    pub taf: Option<String>,
    pub wind: Option<Wind>,
    pub visibility_sm: Option<f64>,
    pub ceiling_ft: Option<u32>,
    pub temperature_c: Option<f64>,
    pub altimeter_inhg: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
}

impl FlightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        }
    }
}

impl WeatherReport {
    /// FAA flight category from ceiling and visibility. Missing values count
    /// as unrestricted.
    pub fn flight_category(&self) -> FlightCategory {
        let ceiling = self.ceiling_ft.unwrap_or(u32::MAX);
        let visibility = self.visibility_sm.unwrap_or(f64::INFINITY);

        if ceiling < 500 || visibility < 1.0 {
            FlightCategory::Lifr
        } else if ceiling < 1_000 || visibility < 3.0 {
            FlightCategory::Ifr
        } else if ceiling <= 3_000 || visibility <= 5.0 {
            FlightCategory::Mvfr
        } else {
            FlightCategory::Vfr
        }
    }
}

/// Source of current weather for an airport.
pub trait WeatherSource {
    fn fetch(&self, airport_id: &str) -> Option<WeatherReport>;
}

/// Fixed report for every airport, for offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherSource;

impl WeatherSource for StaticWeatherSource {
    fn fetch(&self, airport_id: &str) -> Option<WeatherReport> {
        Some(WeatherReport {
            observed_at: Utc::now(),
            metar: Some(format!(
                "{} 152253Z 24028G35KT 10SM FEW030 BKN250 18/08 A3001",
                airport_id
            )),
            taf: Some(format!(
                "{} 152200Z 1522/1624 24025G35KT P6SM FEW030 BKN250 FM160600 24020G30KT P6SM SCT030 BKN250",
                airport_id
            )),
            wind: Some(Wind {
                direction_deg: 240,
                speed_kt: 28,
                gust_kt: Some(35),
            }),
            visibility_sm: Some(10.0),
            ceiling_ft: Some(3_000),
            temperature_c: Some(18.0),
            altimeter_inhg: Some(30.01),
        })
    }
}

/// Current weather keyed by airport identifier (case-insensitive).
#[derive(Debug, Default)]
pub struct WeatherStore {
    reports: DashMap<String, WeatherReport>,
}

impl WeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `report` unless a newer observation is already held.
    pub fn insert(&self, airport_id: &str, report: WeatherReport) {
        let id = normalize(airport_id);
        if let Some(current) = self.reports.get(&id) {
            if current.observed_at > report.observed_at {
                tracing::debug!(airport = %id, "Ignoring older weather observation");
                return;
            }
        }
        self.reports.insert(id, report);
    }

    pub fn get(&self, airport_id: &str) -> Option<WeatherReport> {
        self.reports
            .get(&normalize(airport_id))
            .map(|entry| entry.value().clone())
    }

    /// Fetch a fresh report from `source` and store it.
    pub fn refresh(&self, source: &dyn WeatherSource, airport_id: &str) -> Option<WeatherReport> {
        let id = normalize(airport_id);
        match source.fetch(&id) {
            Some(report) => {
                tracing::debug!(airport = %id, "Weather report refreshed");
                self.insert(&id, report.clone());
                Some(report)
            }
            None => {
                tracing::debug!(airport = %id, "No weather available");
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Drop observations older than `max_age` at `now`, then the stalest
    /// airports until at most `max_entries` remain. Returns how many were
    /// dropped.
    pub fn prune(&self, max_entries: usize, max_age: Duration, now: DateTime<Utc>) -> usize {
        let before = self.reports.len();
        self.reports
            .retain(|_, report| now.signed_duration_since(report.observed_at) <= max_age);

        let excess = self.reports.len().saturating_sub(max_entries);
        if excess > 0 {
            let mut by_age: Vec<(String, DateTime<Utc>)> = self
                .reports
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().observed_at))
                .collect();
            by_age.sort_by_key(|(_, observed_at)| *observed_at);
            for (id, _) in by_age.into_iter().take(excess) {
                self.reports.remove(&id);
            }
        }

        let removed = before.saturating_sub(self.reports.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.reports.len(), "Pruned weather reports");
        }
        removed
    }
}

fn normalize(airport_id: &str) -> String {
    airport_id.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoWeather;

    impl WeatherSource for NoWeather {
        fn fetch(&self, _airport_id: &str) -> Option<WeatherReport> {
            None
        }
    }

    #[test]
    fn refresh_stores_by_normalized_id() {
        let store = WeatherStore::new();
        let report = store.refresh(&StaticWeatherSource, " ksfo ").unwrap();
        assert!(report.metar.as_deref().unwrap().starts_with("KSFO "));
        assert_eq!(store.get("KSFO"), Some(report.clone()));
        assert_eq!(store.get("ksfo"), Some(report));
        assert!(store.get("KSJC").is_none());
    }

    #[test]
    fn missing_weather_keeps_previous_report() {
        let store = WeatherStore::new();
        store.refresh(&StaticWeatherSource, "KOAK");
        assert!(store.refresh(&NoWeather, "KOAK").is_none());
        assert!(store.get("KOAK").is_some());
    }

    #[test]
    fn flight_categories() {
        let mut report = StaticWeatherSource.fetch("KSFO").unwrap();
        assert_eq!(report.flight_category(), FlightCategory::Mvfr);
        report.ceiling_ft = None;
        assert_eq!(report.flight_category(), FlightCategory::Vfr);
        report.visibility_sm = Some(2.0);
        assert_eq!(report.flight_category(), FlightCategory::Ifr);
        report.ceiling_ft = Some(400);
        assert_eq!(report.flight_category().as_str(), "LIFR");
    }

    fn observed(minutes_ago: i64, now: DateTime<Utc>) -> WeatherReport {
        let mut report = StaticWeatherSource.fetch("XXXX").unwrap();
        report.observed_at = now - Duration::minutes(minutes_ago);
        report
    }

    #[test]
    fn older_observation_does_not_replace_newer() {
        let now = Utc::now();
        let store = WeatherStore::new();
        store.insert("KSFO", observed(5, now));
        store.insert("KSFO", observed(65, now));
        assert_eq!(store.get("KSFO").unwrap().observed_at, now - Duration::minutes(5));
    }

    #[test]
    fn prune_evicts_stalest_down_to_capacity() {
        let now = Utc::now();
        let store = WeatherStore::new();
        for (id, age) in [("KSFO", 10), ("KSJC", 40), ("KOAK", 5), ("KSQL", 25)] {
            store.insert(id, observed(age, now));
        }
        assert_eq!(store.prune(10, Duration::hours(1), now), 0);
        assert_eq!(store.prune(2, Duration::hours(1), now), 2);
        assert_eq!(store.len(), 2);
        assert!(store.get("KSFO").is_some());
        assert!(store.get("KOAK").is_some());
    }

    #[test]
    fn prune_drops_expired_observations() {
        let now = Utc::now();
        let store = WeatherStore::new();
        store.insert("KRNO", observed(90, now));
        store.insert("KTRK", observed(30, now));
        assert_eq!(store.prune(10, Duration::hours(1), now), 1);
        assert!(store.get("KRNO").is_none());
        assert_eq!(store.len(), 1);
    }
}
