use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::SamplerError,
    sample_request::SampleRequest,
    sample_set::{SampleRecord, SampleSet},
    sampler::Sampler,
};

pub const SAMPLER_URL_ENV_VAR: &str = "VELO_SAMPLER_URL";
pub const SAMPLER_TOKEN_ENV_VAR: &str = "VELO_SAMPLER_TOKEN";

#[derive(Deserialize)]
struct SubmitProblemResponse {
    job_id: String,
}

#[derive(Deserialize)]
struct RemoteSampleSet {
    records: Vec<SampleRecord>,
}

#[derive(Deserialize)]
struct ProblemStatusResponse {
    status: String,
    sample_set: Option<RemoteSampleSet>,
}

#[derive(Clone, Debug)]
pub struct RemoteSamplerParams {
    pub endpoint: String,
    pub token: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl RemoteSamplerParams {
    /// Reads the endpoint and token from the environment. An explicit
    /// endpoint takes precedence over the environment variable.
    pub fn from_env(endpoint: Option<String>) -> Result<Self, SamplerError> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => std::env::var(SAMPLER_URL_ENV_VAR)
                .map_err(|_| SamplerError::MissingConfiguration(SAMPLER_URL_ENV_VAR.into()))?,
        };
        let token = std::env::var(SAMPLER_TOKEN_ENV_VAR)
            .map_err(|_| SamplerError::MissingConfiguration(SAMPLER_TOKEN_ENV_VAR.into()))?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            token,
            poll_interval: Duration::from_millis(500),
            max_poll_attempts: 240, // two minutes at the default interval
        })
    }
}

/// Client for a remote solver service that queues problems and is polled
/// until a sample set is available.
pub struct RemoteSampler {
    params: RemoteSamplerParams,
    client: reqwest::Client,
}

impl RemoteSampler {
    pub fn new(params: RemoteSamplerParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn problems_url(&self) -> String {
        format!("{}/problems", self.params.endpoint)
    }

    async fn submit(&self, request: &SampleRequest) -> Result<String, SamplerError> {
        let response = self
            .client
            .post(self.problems_url())
            .bearer_auth(&self.params.token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SamplerError::Api { status, message });
        }

        let submitted: SubmitProblemResponse = response.json().await?;
        info!(
            job_id = %submitted.job_id,
            label = request.label.as_deref().unwrap_or_default(),
            "RemoteSampler: submitted problem"
        );

        Ok(submitted.job_id)
    }

    async fn get_sample_set(&self, job_id: &str) -> Result<Option<SampleSet>, SamplerError> {
        let url = format!("{}/{}", self.problems_url(), job_id);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.params.token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(SamplerError::Api { status, message });
        }

        let body: ProblemStatusResponse = response.json().await?;

        match body.status.as_str() {
            "completed" => Ok(Some(SampleSet::from_records(
                body.sample_set
                    .map(|sample_set| sample_set.records)
                    .unwrap_or_default(),
            ))),
            "pending" | "in_progress" => Ok(None),
            other => Err(SamplerError::JobFailed(other.to_string())),
        }
    }

    async fn poll_until_completed(&self, job_id: &str) -> Result<SampleSet, SamplerError> {
        for attempt in 1..=self.params.max_poll_attempts {
            debug!(
                "RemoteSampler: polling for job completion {}/{}",
                attempt, self.params.max_poll_attempts
            );
            if let Some(sample_set) = self.get_sample_set(job_id).await? {
                return Ok(sample_set);
            }

            tokio::time::sleep(self.params.poll_interval).await;
        }

        Err(SamplerError::Timeout(self.params.max_poll_attempts))
    }
}

impl Sampler for RemoteSampler {
    async fn sample(&self, request: SampleRequest) -> Result<SampleSet, SamplerError> {
        request.validate()?;

        let job_id = self.submit(&request).await?;
        self.poll_until_completed(&job_id).await
    }
}
