//! Hakuna time-tracking integration.
//!
//! Hakuna has no public API for time entries, so this client drives the web
//! app the way a browser does:
//! - Logging in through the sign-in form and keeping the session cookie
//! - Reading a day's entries from its HTML page
//! - Creating entries by posting the new-entry form with the CSRF token

pub mod html;

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use reqwest::{StatusCode, Url};
use thiserror::Error;
use wt_core::{Interval, ReferenceZone, ValidationError};

/// Default request timeout for page loads and form posts.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const CSRF_HEADER: &str = "X-CSRF-Token";

/// Hakuna client errors.
#[derive(Debug, Error)]
pub enum HakunaError {
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// A page answered with something other than 200 OK.
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    /// A page did not contain what we scrape from it.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A recorded entry could not be turned into an interval.
    #[error("invalid entry on {date}: {source}")]
    InvalidEntry {
        date: NaiveDate,
        #[source]
        source: ValidationError,
    },
    /// Entries are per day; an interval spanning midnight cannot be entered.
    #[error("entry {interval} crosses midnight in the reference timezone")]
    CrossesMidnight { interval: Interval },
}

/// Login credentials.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// A logged-in Hakuna session.
pub struct Client {
    http: reqwest::Client,
    entries_url: Url,
    csrf_token: String,
    zone: ReferenceZone,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("entries_url", &self.entries_url.as_str())
            .field("csrf_token", &"[REDACTED]")
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Signs in at `base_uri`.
    ///
    /// The first form on the landing page is submitted with every prefilled
    /// input kept and `username`/`password` filled in. The page reached after
    /// signing in is the time-entries page and carries the CSRF token.
    pub async fn login(
        base_uri: &str,
        credentials: &Credentials,
        zone: ReferenceZone,
    ) -> Result<Self, HakunaError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(HakunaError::ClientBuild)?;

        tracing::debug!(base_uri, "loading sign-in page");
        let response = expect_ok(http.get(base_uri).send().await?)?;
        let landing_url = response.url().clone();
        let body = response.text().await?;
        let form = html::first_form(&body)
            .ok_or_else(|| HakunaError::InvalidResponse("sign-in page has no form".into()))?;
        let action = landing_url
            .join(&form.action)
            .map_err(|err| HakunaError::InvalidResponse(format!("bad form action: {err}")))?;

        let fields = login_fields(form.inputs, credentials);
        tracing::debug!(%action, username = %credentials.username, "signing in");
        let response = expect_ok(http.post(action).form(&fields).send().await?)?;
        let entries_url = response.url().clone();
        let body = response.text().await?;
        let csrf_token = html::csrf_token(&body)
            .ok_or_else(|| HakunaError::InvalidResponse("missing csrf-token meta tag".into()))?;

        Ok(Self {
            http,
            entries_url,
            csrf_token,
            zone,
        })
    }

    /// Returns the intervals already recorded on `date`.
    pub async fn entries(&self, date: NaiveDate) -> Result<Vec<Interval>, HakunaError> {
        tracing::info!("Getting entries on {date} ...");

        let url = format!(
            "{}/date/{}",
            self.entries_url.as_str().trim_end_matches('/'),
            date.format("%Y-%m-%d")
        );
        let response = expect_ok(self.http.get(&url).send().await?)?;
        let body = response.text().await?;
        let times = html::timestamps(&body).map_err(HakunaError::InvalidResponse)?;

        times
            .into_iter()
            .map(|(start, end)| {
                let localize = |time: NaiveTime| {
                    self.zone.localize(date, time).ok_or_else(|| {
                        HakunaError::InvalidResponse(format!("{date} {time} does not exist locally"))
                    })
                };
                Interval::new(localize(start)?, localize(end)?)
                    .map_err(|source| HakunaError::InvalidEntry { date, source })
            })
            .collect()
    }

    /// Records `interval` as a new time entry.
    pub async fn enter_time(&self, interval: &Interval) -> Result<(), HakunaError> {
        tracing::info!("Adding entry {interval} ...");

        let start = self.zone.convert(&interval.start());
        let end = self.zone.convert(&interval.end());
        let fields = entry_fields(start, end).ok_or(HakunaError::CrossesMidnight {
            interval: *interval,
        })?;

        expect_ok(
            self.http
                .post(self.entries_url.clone())
                .header(CSRF_HEADER, &self.csrf_token)
                .form(&fields)
                .send()
                .await?,
        )?;
        Ok(())
    }
}

fn expect_ok(response: reqwest::Response) -> Result<reqwest::Response, HakunaError> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(response)
    } else {
        Err(HakunaError::Status {
            url: response.url().to_string(),
            status,
        })
    }
}

/// Sign-in form fields: prefilled inputs that have a value, plus credentials.
fn login_fields(
    inputs: Vec<(String, Option<String>)>,
    credentials: &Credentials,
) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = inputs
        .into_iter()
        .filter(|(name, _)| name != "username" && name != "password")
        .filter_map(|(name, value)| Some((name, value?)))
        .collect();
    fields.push(("username".into(), credentials.username.clone()));
    fields.push(("password".into(), credentials.password.clone()));
    fields
}

/// New-entry form fields, or `None` if the bounds fall on different dates.
fn entry_fields(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> Option<Vec<(&'static str, String)>> {
    let date = start.date_naive();
    if end.date_naive() != date {
        return None;
    }
    Some(vec![
        ("utf8", "\u{2713}".to_string()),
        ("time_entry[start_time]", start.format("%H:%M").to_string()),
        ("time_entry[end_time]", end.format("%H:%M").to_string()),
        ("time_entry[time_type_id]", "1".to_string()),
        ("time_entry[project_id]", String::new()),
        ("time_entry[start_date]", date.format("%Y-%m-%d").to_string()),
        ("time_entry[note]", String::new()),
        ("commit", "Speichern".to_string()),
    ])
}
