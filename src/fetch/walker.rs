//! Redirect chain walker.
//!
//! Drives repeated single requests through [`HttpClient::execute`] and
//! decides, per response, whether to follow, stop, or fail. Only 301 and 302
//! are treated as follow-able; 303/307/308 are terminal. Cycle detection
//! compares the literal resolved URL strings with no normalization, so two
//! URLs differing only by case or a trailing slash are distinct.

use std::collections::HashSet;

use reqwest::StatusCode;
use reqwest::header::LOCATION;
use tokio::time::Instant;
use tracing::debug;

use super::client::{FetchMethod, HttpClient};
use super::error::FetchError;

/// Walks a redirect chain starting at `start_url`.
///
/// The hop budget bounds the number of redirects *followed*, not the number
/// of requests issued: the first request is always attempted, and with
/// `max_redirects = 0` a redirecting first response exhausts the budget so
/// the next hop fails rather than the first request.
///
/// Returns the terminal response together with the ordered list of redirect
/// target URLs, one entry per followed hop.
///
/// # Errors
///
/// Propagates executor errors, plus [`FetchError::TooManyRedirects`] when the
/// budget is exhausted mid-chain, [`FetchError::RedirectCycle`] when a URL is
/// revisited, and [`FetchError::BadRedirect`] when a 301/302 carries no
/// usable Location header.
pub async fn walk(
    client: &HttpClient,
    method: FetchMethod,
    start_url: &str,
    max_redirects: i64,
    follow_redirects: bool,
    deadline: Instant,
) -> Result<(reqwest::Response, Vec<String>), FetchError> {
    // Capacity hint only; clamped so an absurd budget cannot overflow the
    // allocator before the first request is even issued.
    let capacity = usize::try_from(max_redirects).unwrap_or(0).min(32) + 1;
    let mut visited: HashSet<String> = HashSet::with_capacity(capacity);
    let mut chain: Vec<String> = Vec::new();
    let mut remaining = max_redirects;
    let mut current = start_url.to_string();

    loop {
        if remaining < 0 {
            return Err(FetchError::TooManyRedirects {
                limit: max_redirects,
            });
        }

        visited.insert(current.clone());

        let response = client.execute(method, &current, deadline).await?;

        if !follow_redirects || !is_followable(response.status()) {
            debug!(url = %current, status = response.status().as_u16(), hops = chain.len(), "terminal response");
            return Ok((response, chain));
        }

        let next = resolve_location(&response, &current)?;

        // Checked before the next round trip so a same-URL loop costs nothing.
        if visited.contains(&next) {
            return Err(FetchError::RedirectCycle { url: next });
        }

        debug!(from = %current, to = %next, remaining, "following redirect");

        chain.push(next.clone());
        remaining -= 1;
        current = next;
    }
}

/// Only 301 and 302 are followed; 303/307/308 are deliberately terminal.
fn is_followable(status: StatusCode) -> bool {
    status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND
}

/// Resolves a response's Location header against the URL that produced it.
fn resolve_location(response: &reqwest::Response, current: &str) -> Result<String, FetchError> {
    let location = response
        .headers()
        .get(LOCATION)
        .ok_or_else(|| FetchError::bad_redirect(current, "missing Location header"))?;

    let location = location
        .to_str()
        .map_err(|_| FetchError::bad_redirect(current, "Location header is not valid UTF-8"))?;

    let resolved = response
        .url()
        .join(location)
        .map_err(|_| FetchError::bad_redirect(current, format!("unresolvable Location {location:?}")))?;

    Ok(resolved.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_301_and_302_are_followable() {
        assert!(is_followable(StatusCode::MOVED_PERMANENTLY));
        assert!(is_followable(StatusCode::FOUND));
        assert!(!is_followable(StatusCode::SEE_OTHER));
        assert!(!is_followable(StatusCode::TEMPORARY_REDIRECT));
        assert!(!is_followable(StatusCode::PERMANENT_REDIRECT));
        assert!(!is_followable(StatusCode::OK));
        assert!(!is_followable(StatusCode::NOT_FOUND));
    }
}
