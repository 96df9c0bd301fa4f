//! The `profile` service: player stats and match history.

use bone_core::{ApiError, ClientHandle, HttpMethod, JsonDecoder, Service};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::types::{Match, PlayerStats};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Read-only access to tracker profiles. Must be registered on a client
/// before use.
#[derive(Debug, Default)]
pub struct ProfileService {
    client: Option<ClientHandle>,
}

impl ProfileService {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&ClientHandle, ApiError> {
        self.client
            .as_ref()
            .ok_or_else(|| ApiError::UnboundService(crate::PROFILE_SERVICE.to_string()))
    }

    /// Lifetime and recent stats for `nickname` on `platform` (`pc`, `xbl`,
    /// `psn`).
    pub fn stats(&self, platform: impl AsRef<str>, nickname: &str) -> Result<PlayerStats, ApiError> {
        let client = self.client()?;
        let path = format!("profile/{}/{}", segment(platform.as_ref())?, segment(nickname)?);
        let req = client.new_request(HttpMethod::Get, &path, &[])?;
        let resp = client.dispatch::<PlayerStats, _>(&req, &JsonDecoder)?;
        tracing::debug!(nickname, status = resp.status, "fetched player stats");
        Ok(resp.into_body())
    }

    /// Recent matches of the account `account_id`.
    pub fn match_history(&self, account_id: &str) -> Result<Vec<Match>, ApiError> {
        let client = self.client()?;
        let path = format!("profile/account/{}/matches", segment(account_id)?);
        let req = client.new_request(HttpMethod::Get, &path, &[])?;
        let resp = client.dispatch::<Vec<Match>, _>(&req, &JsonDecoder)?;
        Ok(resp.into_body())
    }
}

impl Service for ProfileService {
    fn bind(&mut self, client: ClientHandle) {
        self.client = Some(client);
    }
}

/// Encode `raw` as exactly one path segment. Dot segments are rejected
/// because URL resolution collapses them, escaped or not.
fn segment(raw: &str) -> Result<String, ApiError> {
    if matches!(raw, "" | "." | "..") {
        return Err(ApiError::Url(format!("invalid path segment {raw:?}")));
    }
    Ok(utf8_percent_encode(raw, SEGMENT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use bone_core::{HttpRequest, HttpResponse};

    fn recording_client(
        status: u16,
        body: &'static str,
    ) -> (Arc<Mutex<Vec<HttpRequest>>>, bone_core::Client) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let builder = crate::builder("abc123").transport(move |req: &HttpRequest| -> Result<HttpResponse, ApiError> {
            log.lock().unwrap().push(req.clone());
            Ok(HttpResponse::from_bytes(status, body))
        });
        (seen, crate::from_builder(builder).unwrap())
    }

    #[test]
    fn stats_issues_authenticated_get() {
        let (seen, client) = recording_client(200, r#"{"epicUserHandle":"ninja","platformName":"pc"}"#);
        let stats = crate::profile(&client).unwrap().stats("pc", "ninja").unwrap();
        assert_eq!(stats.epic_user_handle, "ninja");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, "https://api.fortnitetracker.com/v1/profile/pc/ninja");
        assert_eq!(seen[0].header("TRN-Api-Key"), Some("abc123"));
        assert_eq!(seen[0].header("User-Agent"), Some(crate::USER_AGENT));
    }

    #[test]
    fn stats_not_found_surfaces_message_and_status() {
        let (_, client) = recording_client(404, r#"{"message":"not found"}"#);
        let err = crate::profile(&client).unwrap().stats("pc", "ninja").unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), Some("not found"));
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn match_history_path_uses_account_id() {
        let (seen, client) = recording_client(200, r#"[{"id":1,"kills":3},{"id":2,"kills":0}]"#);
        let matches = crate::profile(&client)
            .unwrap()
            .match_history("4735ce9132924caf8a5b17789b40f79c")
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].kills, 3);
        assert_eq!(
            seen.lock().unwrap()[0].url,
            "https://api.fortnitetracker.com/v1/profile/account/4735ce9132924caf8a5b17789b40f79c/matches"
        );
    }

    #[test]
    fn nickname_is_escaped_as_one_segment() {
        let (seen, client) = recording_client(200, "{}");
        crate::profile(&client)
            .unwrap()
            .stats(crate::Platform::Psn, "dr lupo/2?")
            .unwrap();
        assert_eq!(
            seen.lock().unwrap()[0].url,
            "https://api.fortnitetracker.com/v1/profile/psn/dr%20lupo%2F2%3F"
        );
    }

    #[test]
    fn backslash_cannot_split_the_nickname() {
        let (seen, client) = recording_client(200, "{}");
        crate::profile(&client).unwrap().stats("pc", "a\\b").unwrap();
        assert_eq!(
            seen.lock().unwrap()[0].url,
            "https://api.fortnitetracker.com/v1/profile/pc/a%5Cb"
        );
    }

    #[test]
    fn dot_and_empty_segments_are_rejected_before_sending() {
        let (seen, client) = recording_client(200, "{}");
        let profiles = crate::profile(&client).unwrap();
        for nickname in ["..", ".", ""] {
            let err = profiles.stats("pc", nickname).unwrap_err();
            assert!(matches!(err, ApiError::Url(_)), "{nickname:?}");
        }
        assert!(matches!(profiles.match_history(".."), Err(ApiError::Url(_))));
        assert!(matches!(profiles.stats("..", "ninja"), Err(ApiError::Url(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn unbound_service_is_an_error() {
        let err = ProfileService::new().match_history("abc").unwrap_err();
        assert!(matches!(err, ApiError::UnboundService(ref name) if name == "profile"));
    }
}
