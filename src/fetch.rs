use crate::atcoder::Submission;
use crate::config::Config;
use crate::sources::ContributionWeek;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("merge-grass/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

const LOGIN_QUERY: &str = "query { viewer { login } }";
const CONTRIBUTIONS_QUERY: &str = "query { viewer { contributionsCollection { contributionCalendar { weeks { firstDay contributionDays { date contributionCount } } } } } }";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("AtCoder user name is empty")]
    EmptyUser,
    #[error("{what} request failed: {source}")]
    Request {
        what: &'static str,
        source: reqwest::Error,
    },
    #[error("{what} returned no data: {message}")]
    Payload { what: &'static str, message: String },
}

/// Remote data the grass is built from.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// GitHub login of the token's owner.
    async fn login(&self, token: &str) -> Result<String, FetchError>;

    async fn contributions(&self, token: &str) -> Result<Vec<ContributionWeek>, FetchError>;

    /// Every submission of an AtCoder user, in feed order.
    async fn submissions(&self, user: &str) -> Result<Vec<Submission>, FetchError>;
}

/// Talks to the GitHub GraphQL API and the AtCoder Problems results feed.
pub struct HttpSource {
    client: reqwest::Client,
    github_graphql_url: String,
    atcoder_api_url: String,
}

impl HttpSource {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| FetchError::Request {
                what: "HTTP client",
                source,
            })?;

        Ok(Self {
            client,
            github_graphql_url: config.github_graphql_url.clone(),
            atcoder_api_url: config.atcoder_api_url.clone(),
        })
    }

    async fn viewer<T: DeserializeOwned>(&self, token: &str, query: &str) -> Result<T, FetchError> {
        let github = |source| FetchError::Request {
            what: "GitHub",
            source,
        };
        let response = self
            .client
            .post(&self.github_graphql_url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(github)?;
        let body: GraphQlResponse<Viewer<T>> = response.json().await.map_err(github)?;

        match body.data {
            Some(data) => Ok(data.viewer),
            None => Err(FetchError::Payload {
                what: "GitHub",
                message: body
                    .errors
                    .into_iter()
                    .map(|err| err.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

#[async_trait]
impl ActivitySource for HttpSource {
    async fn login(&self, token: &str) -> Result<String, FetchError> {
        let viewer: LoginViewer = self.viewer(token, LOGIN_QUERY).await?;
        Ok(viewer.login)
    }

    async fn contributions(&self, token: &str) -> Result<Vec<ContributionWeek>, FetchError> {
        let viewer: ContributionsViewer = self.viewer(token, CONTRIBUTIONS_QUERY).await?;
        let weeks = viewer.contributions_collection.contribution_calendar.weeks;
        debug!(weeks = weeks.len(), "fetched GitHub contribution calendar");
        Ok(weeks)
    }

    async fn submissions(&self, user: &str) -> Result<Vec<Submission>, FetchError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(FetchError::EmptyUser);
        }
        let atcoder = |source| FetchError::Request {
            what: "AtCoder Problems",
            source,
        };
        let submissions: Vec<Submission> = self
            .client
            .get(&self.atcoder_api_url)
            .query(&[("user", user)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(atcoder)?
            .json()
            .await
            .map_err(atcoder)?;
        debug!(user, count = submissions.len(), "fetched AtCoder submissions");
        Ok(submissions)
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Viewer<T> {
    viewer: T,
}

#[derive(Debug, Deserialize)]
struct LoginViewer {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsViewer {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
struct ContributionCalendar {
    weeks: Vec<ContributionWeek>,
}
