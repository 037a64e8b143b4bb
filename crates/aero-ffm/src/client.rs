//! FFM planning service client.

use aero_core::{FeasibilityRequest, FeasibilityResponse};
use reqwest::{Client, Url};

use crate::config::FfmConfig;
use crate::error::FfmError;

const PLAN_PATH: &str = "v1/plan";

/// How a plan request is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Built-in (or fixture) plan, no network I/O.
    Mock,
    /// `POST <base>/v1/plan` against the configured service.
    Network,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Mock => "mock",
            PlanMode::Network => "network",
        }
    }
}

/// Client for the flight-feasibility/mission planning service.
///
/// Both modes return the same [`FeasibilityResponse`] shape. No retries are
/// performed here.
pub struct FfmClient {
    client: Client,
    config: FfmConfig,
}

impl FfmClient {
    pub fn new(config: FfmConfig) -> Result<Self, FfmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FfmError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, FfmError> {
        Self::new(FfmConfig::from_env())
    }

    pub fn config(&self) -> &FfmConfig {
        &self.config
    }

    /// Mode used by [`FfmClient::plan_with_default_mode`].
    pub fn default_mode(&self) -> PlanMode {
        if self.config.use_mock {
            PlanMode::Mock
        } else {
            PlanMode::Network
        }
    }

    pub async fn plan_with_default_mode(
        &self,
        request: &FeasibilityRequest,
    ) -> Result<FeasibilityResponse, FfmError> {
        self.plan(request, self.default_mode()).await
    }

    /// Request a feasibility plan.
    pub async fn plan(
        &self,
        request: &FeasibilityRequest,
        mode: PlanMode,
    ) -> Result<FeasibilityResponse, FfmError> {
        match mode {
            PlanMode::Mock => self.plan_mock().await,
            PlanMode::Network => self.plan_network(request).await,
        }
    }

    async fn plan_mock(&self) -> Result<FeasibilityResponse, FfmError> {
        let Some(path) = self.config.mock_response_path.as_ref() else {
            return Ok(FeasibilityResponse::canned());
        };

        let data = tokio::fs::read(path).await.map_err(|source| FfmError::Fixture {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&data).map_err(FfmError::Schema)
    }

    async fn plan_network(
        &self,
        request: &FeasibilityRequest,
    ) -> Result<FeasibilityResponse, FfmError> {
        let url = self.plan_url()?;
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::debug!(
            url = %url,
            request_id = %request_id,
            points = request.route.len(),
            "Submitting feasibility request"
        );

        let response = self
            .client
            .post(url)
            .header("X-Request-ID", &request_id)
            .json(request)
            .send()
            .await
            .map_err(FfmError::Transport)?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                request_id = %request_id,
                "FFM service rejected plan request"
            );
            return Err(FfmError::service(status, &body));
        }

        let bytes = response.bytes().await.map_err(FfmError::Transport)?;
        let plan: FeasibilityResponse =
            serde_json::from_slice(&bytes).map_err(FfmError::Schema)?;

        tracing::info!(
            request_id = %request_id,
            polyline_points = plan.polyline.len(),
            leg_risks = plan.leg_risks.len(),
            "Received feasibility plan"
        );
        Ok(plan)
    }

    fn plan_url(&self) -> Result<Url, FfmError> {
        let base = self
            .config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FfmError::Configuration("no FFM base URL configured".to_string()))?;

        let mut base = Url::parse(base)
            .map_err(|e| FfmError::Configuration(format!("invalid FFM base URL {base:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(PLAN_PATH)
            .map_err(|e| FfmError::Configuration(format!("invalid FFM plan URL: {e}")))
    }
}
