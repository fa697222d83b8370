// src/auth/mod.rs — OAuth helpers: scopes, authorize URL, random identifiers
//
// The token exchanges themselves live on SpotifyClient; this module holds the
// pure pieces of the authorization-code flow.

use url::Url;

use crate::infra::config::SpotifyConfig;

/// Scopes requested on login. Playback read/write plus enough profile access
/// to greet the user in /api/spotify/status.
pub const SCOPES: &[&str] = &[
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-library-modify",
    "user-read-email",
    "user-read-private",
];

/// Build the provider authorize URL for a login redirect.
pub fn authorize_url(accounts_base: &str, spotify: &SpotifyConfig, state: &str) -> String {
    let mut url = Url::parse(accounts_base)
        .unwrap_or_else(|_| Url::parse("https://accounts.spotify.com").unwrap());
    url.set_path("/authorize");
    url.query_pairs_mut()
        .append_pair("client_id", &spotify.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &spotify.redirect_uri)
        .append_pair("scope", &SCOPES.join(" "))
        .append_pair("show_dialog", "true")
        .append_pair("state", state);
    url.to_string()
}

/// Random state parameter for the authorize redirect.
pub fn random_state() -> String {
    generate_random_string(32)
}

/// Mint an opaque session id for the session cookie.
pub fn mint_session_id() -> String {
    generate_random_string(48)
}

/// Generate a cryptographically random URL-safe string of the given length.
/// Uses the `getrandom` crate for the OS CSPRNG and rejection sampling to
/// avoid modular bias.
fn generate_random_string(len: usize) -> String {
    // 66 characters — use rejection sampling since 256 % 66 != 0
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
    // floor(256 / 66) * 66 = 198. Reject bytes >= 198.
    const REJECT_THRESHOLD: u8 = (256 - (256 % CHARSET.len() as u16)) as u8;

    let mut result = String::with_capacity(len);

    // Process in batches to minimize getrandom calls
    let mut buf = vec![0u8; len * 2];
    while result.len() < len {
        getrandom::getrandom(&mut buf)
            .expect("getrandom failed: OS CSPRNG unavailable — cannot mint session identifiers");

        for &b in &buf {
            if result.len() >= len {
                break;
            }
            if b < REJECT_THRESHOLD {
                result.push(CHARSET[(b as usize) % CHARSET.len()] as char);
            }
        }
    }

    result
}
