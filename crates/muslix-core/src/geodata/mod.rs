//! Geodata lookups against the OpenPLZ locality API
//!
//! Two operations back the location decision engine: postal code →
//! (city, state) and city name → candidate list. The service is the only
//! network dependency of this crate and its responses are treated as
//! untrusted: every field is optional on the wire and gets validated
//! before use. Network failure, a non-2xx status and unparseable JSON
//! stay distinguishable for logging; callers map all three to per-note
//! error outcomes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GeodataConfig;
use crate::error::{MuslixError, Result};

/// The only base URL the resolver may talk to. Requests targeting any
/// other host indicate a defect, not a data problem.
pub const API_BASE_URL: &str = "https://openplzapi.org/de";

/// A postal-code resolution: the locality name plus its federal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlace {
    pub city: String,
    pub state: String,
}

/// One plausible resolution for a city name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityCandidate {
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Lookup operations needed by the decision engine. Implemented by
/// [`OpenPlzClient`] for production and by in-memory fakes in tests.
pub trait GeodataResolver {
    /// Resolve a 5-digit postal code to its locality and state.
    /// `Ok(None)` means the service answered but had no usable record.
    fn lookup_by_postal_code(&self, code: &str) -> Result<Option<ResolvedPlace>>;

    /// List every locality matching a city name. No deduplication here;
    /// ranking and dedup are the caller's concern.
    fn lookup_by_city_name(&self, name: &str) -> Result<Vec<CityCandidate>>;
}

/// Wire shape of one locality record. Everything is optional: the
/// service occasionally omits fields and must not be able to break us.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalityRecord {
    name: Option<String>,
    postal_code: Option<String>,
    federal_state: Option<FederalStateRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FederalStateRecord {
    name: Option<String>,
}

impl LocalityRecord {
    fn state_name(&self) -> Option<&str> {
        self.federal_state
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .filter(|s| !s.is_empty())
    }

    fn city_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }
}

/// Blocking HTTP client for the OpenPLZ API
pub struct OpenPlzClient {
    agent: ureq::Agent,
}

impl OpenPlzClient {
    pub fn new(config: &GeodataConfig) -> Self {
        let user_agent = format!(
            "muslix/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        );
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&user_agent)
            .build();

        Self { agent }
    }

    /// Build a request URL under the approved base. Anything else is a
    /// programming error and fails loudly.
    fn endpoint(path: &str) -> String {
        let url = format!("{}/{}", API_BASE_URL, path);
        assert!(
            url.starts_with(API_BASE_URL),
            "geodata request must target {}, got {}",
            API_BASE_URL,
            url
        );
        url
    }

    fn get_localities(&self, query_key: &str, query_value: &str) -> Result<Vec<LocalityRecord>> {
        let url = Self::endpoint("Localities");
        debug!(%url, key = query_key, value = query_value, "geodata_request");

        let response = self
            .agent
            .get(&url)
            .query(query_key, query_value)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => MuslixError::GeodataStatus { status },
                ureq::Error::Transport(transport) => MuslixError::GeodataNetwork {
                    reason: transport.to_string(),
                },
            })?;

        let body = response
            .into_string()
            .map_err(|err| MuslixError::GeodataNetwork {
                reason: err.to_string(),
            })?;

        serde_json::from_str(&body).map_err(|err| MuslixError::GeodataParse {
            reason: err.to_string(),
        })
    }
}

/// Whether `code` is a well-formed German postal code (exactly 5 digits)
pub fn is_valid_postal_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

impl GeodataResolver for OpenPlzClient {
    fn lookup_by_postal_code(&self, code: &str) -> Result<Option<ResolvedPlace>> {
        if !is_valid_postal_code(code) {
            return Err(MuslixError::InvalidPostalCode {
                code: code.to_string(),
            });
        }

        let records = self.get_localities("postalCode", code)?;
        let place = records.iter().find_map(|record| {
            let city = record.city_name()?;
            let state = record.state_name()?;
            Some(ResolvedPlace {
                city: city.to_string(),
                state: state.to_string(),
            })
        });

        if place.is_none() {
            debug!(code, "geodata_empty_result");
        }
        Ok(place)
    }

    fn lookup_by_city_name(&self, name: &str) -> Result<Vec<CityCandidate>> {
        // `.query` URL-encodes the name
        let records = self.get_localities("name", name)?;

        let candidates: Vec<CityCandidate> = records
            .iter()
            .filter_map(|record| {
                let city = record.city_name()?;
                let state = record.state_name()?;
                // A missing postal code is tolerable; a missing state is not
                let postal_code = record.postal_code.clone().unwrap_or_default();
                Some(CityCandidate {
                    city: city.to_string(),
                    state: state.to_string(),
                    postal_code,
                })
            })
            .collect();

        if candidates.len() < records.len() {
            warn!(
                name,
                dropped = records.len() - candidates.len(),
                "geodata_records_missing_fields"
            );
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postal_code_validation() {
        assert!(is_valid_postal_code("10115"));
        assert!(is_valid_postal_code("80331"));
        assert!(!is_valid_postal_code("1234"));
        assert!(!is_valid_postal_code("123456"));
        assert!(!is_valid_postal_code("1011a"));
        assert!(!is_valid_postal_code(""));
        assert!(!is_valid_postal_code("۱۲۳۴۵"));
    }

    #[test]
    fn test_invalid_postal_code_is_rejected_before_any_request() {
        let client = OpenPlzClient::new(&GeodataConfig::default());
        let result = client.lookup_by_postal_code("abc");
        assert!(matches!(
            result,
            Err(MuslixError::InvalidPostalCode { .. })
        ));
    }

    #[test]
    fn test_endpoint_stays_on_approved_host() {
        let url = OpenPlzClient::endpoint("Localities");
        assert!(url.starts_with("https://openplzapi.org/de/"));
    }

    #[test]
    fn test_locality_record_defensive_parsing() {
        // Fully populated record
        let record: LocalityRecord = serde_json::from_str(
            r#"{"name":"Köln","postalCode":"50667","federalState":{"name":"Nordrhein-Westfalen"}}"#,
        )
        .unwrap();
        assert_eq!(record.city_name(), Some("Köln"));
        assert_eq!(record.state_name(), Some("Nordrhein-Westfalen"));

        // Missing nested state name
        let record: LocalityRecord =
            serde_json::from_str(r#"{"name":"Köln","federalState":{}}"#).unwrap();
        assert_eq!(record.state_name(), None);

        // Empty object
        let record: LocalityRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.city_name(), None);
        assert_eq!(record.state_name(), None);

        // Unknown extra fields are ignored
        let record: LocalityRecord = serde_json::from_str(
            r#"{"name":"Mainz","municipality":{"key":"07315"},"federalState":{"name":"Rheinland-Pfalz","key":"07"}}"#,
        )
        .unwrap();
        assert_eq!(record.state_name(), Some("Rheinland-Pfalz"));
    }

    #[test]
    fn test_empty_string_fields_count_as_missing() {
        let record: LocalityRecord =
            serde_json::from_str(r#"{"name":"","federalState":{"name":""}}"#).unwrap();
        assert_eq!(record.city_name(), None);
        assert_eq!(record.state_name(), None);
    }
}
