use super::Tool;
use crate::error::{Result, ToolError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://wttr.in";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Parameters for weather queries
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WeatherParams {
    /// City or geographic location name (e.g. "Paris", "San Francisco")
    pub location: String,
    /// Temperature unit, defaults to celsius
    #[serde(default)]
    pub unit: Option<TemperatureUnit>,
}

/// Temperature units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

/// Current weather conditions for a resolved location
#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Location name as resolved by the provider
    pub location: String,
    pub temperature: f64,
    pub unit: TemperatureUnit,
    /// Short textual description, e.g. "Partly cloudy"
    pub condition: String,
}

/// A tool that fetches current weather conditions from wttr.in.
///
/// One outbound GET per invocation, 10 second timeout, no retry. Results
/// depend on live data, so repeated calls for the same location may differ.
#[derive(Debug, Clone)]
pub struct WeatherTool {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherTool {
    /// Create a tool pointing at the default provider
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a tool pointing at a custom provider base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request timeout (defaults to 10 seconds)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Tool for WeatherTool {
    fn name(&self) -> &'static str {
        "get_weather"
    }

    fn description(&self) -> &'static str {
        "Retrieve the current weather conditions for a location"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or geographic location name"
                },
                "unit": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"],
                    "description": "Temperature unit, defaults to celsius"
                }
            },
            "required": ["location"]
        })
    }

    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> Pin<
        Box<
            dyn std::future::Future<Output = std::result::Result<serde_json::Value, ToolError>>
                + Send
                + '_,
        >,
    > {
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let params: WeatherParams = serde_json::from_value(parameters)
                .map_err(|err| ToolError::InvalidArgument(format!("invalid parameters: {}", err)))?;

            let location = params.location.trim();
            if location.is_empty() {
                return Err(ToolError::InvalidArgument(
                    "location must be a non-empty string".to_string(),
                ));
            }
            let unit = params.unit.unwrap_or(TemperatureUnit::Celsius);

            let report = fetch_report(&client, &base_url, location, timeout).await?;
            let result = map_report(report, location, unit)?;

            Ok(serde_json::to_value(result)?)
        })
    }
}

/// Subset of the wttr.in `j1` response the tool cares about
#[derive(Debug, Deserialize)]
struct ProviderReport {
    current_condition: Vec<CurrentCondition>,
    #[serde(default)]
    nearest_area: Vec<NearestArea>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    // wttr.in encodes temperatures as strings
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct NearestArea {
    #[serde(rename = "areaName", default)]
    area_name: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

fn provider_url(base_url: &str, location: &str) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base_url)
        .map_err(|err| ToolError::InvalidArgument(format!("invalid provider URL: {}", err)))?;
    // push() percent-encodes '/', '?', '#', spaces, and non-ASCII, so the
    // location always stays a single path segment
    url.path_segments_mut()
        .map_err(|_| ToolError::InvalidArgument("provider URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(location);
    url.set_query(Some("format=j1"));
    Ok(url)
}

async fn fetch_report(
    client: &Client,
    base_url: &str,
    location: &str,
    timeout: Duration,
) -> Result<ProviderReport> {
    let url = provider_url(base_url, location)?;

    debug!(%url, "querying weather provider");
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| {
            warn!(error = %err, "weather provider unreachable");
            ToolError::UpstreamUnavailable(err.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "weather provider returned an error status");
        return Err(ToolError::UpstreamError {
            status: Some(status.as_u16()),
            message: format!("provider returned status {}", status),
        });
    }

    response.json::<ProviderReport>().await.map_err(|err| {
        // The deadline can also fire mid-body; that is still an
        // availability failure, not a malformed response
        if err.is_timeout() || err.is_connect() {
            warn!(error = %err, "weather provider unreachable");
            ToolError::UpstreamUnavailable(err.to_string())
        } else {
            ToolError::UpstreamError {
                status: None,
                message: format!("unparseable provider response: {}", err),
            }
        }
    })
}

fn map_report(
    report: ProviderReport,
    requested: &str,
    unit: TemperatureUnit,
) -> Result<WeatherResult> {
    let current = report
        .current_condition
        .first()
        .ok_or_else(|| ToolError::UpstreamError {
            status: None,
            message: "provider response is missing current conditions".to_string(),
        })?;

    let raw_temp = match unit {
        TemperatureUnit::Celsius => &current.temp_c,
        TemperatureUnit::Fahrenheit => &current.temp_f,
    };
    let temperature: f64 = raw_temp.parse().map_err(|_| ToolError::UpstreamError {
        status: None,
        message: format!("provider returned a non-numeric temperature: {:?}", raw_temp),
    })?;

    let condition = current
        .weather_desc
        .first()
        .map(|desc| desc.value.clone())
        .unwrap_or_default();

    // Fall back to the requested name when the provider resolves no area
    let location = report
        .nearest_area
        .first()
        .and_then(|area| area.area_name.first())
        .map(|name| name.value.clone())
        .unwrap_or_else(|| requested.to_string());

    Ok(WeatherResult {
        location,
        temperature,
        unit,
        condition,
    })
}
