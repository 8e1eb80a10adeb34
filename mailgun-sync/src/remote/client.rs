//! Mailgun template API client

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;
use ureq::http::Response;
use ureq::{Agent, Body};

use super::{
    NewTemplate, NewVersion, RemoteTemplate, TemplateStore, VersionUpdate, VersionsEnvelope,
};
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

/// Blocking client for Mailgun's `/v3/{domain}/templates` endpoints
///
/// Credentials are checked on every call, so a missing key fails each
/// request instead of the whole run.
pub struct MailgunClient {
    agent: Agent,
    api_base: String,
    domain: Option<String>,
    username: String,
    api_key: Option<String>,
}

impl MailgunClient {
    /// Create a client from configuration
    #[must_use]
    pub fn new(config: &SyncConfig) -> Self {
        let agent_config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build();

        Self {
            agent: Agent::new_with_config(agent_config),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            domain: non_empty(config.domain.as_deref()),
            username: config.username.clone(),
            api_key: non_empty(config.api_key.as_deref()),
        }
    }

    /// `Authorization` header value for HTTP Basic auth
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MissingCredential` if no API key is configured.
    pub fn authorization(&self) -> SyncResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SyncError::MissingCredential("MAILGUN_API_KEY"))?;
        let credentials = STANDARD.encode(format!("{}:{api_key}", self.username));
        Ok(format!("Basic {credentials}"))
    }

    /// `{api_base}/v3/{domain}/templates`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MissingCredential` if no domain is configured.
    pub fn templates_url(&self) -> SyncResult<String> {
        let domain = self
            .domain
            .as_deref()
            .ok_or(SyncError::MissingCredential("MAILGUN_DOMAIN"))?;
        Ok(format!(
            "{}/v3/{}/templates",
            self.api_base,
            urlencoding::encode(domain)
        ))
    }

    /// `{api_base}/v3/{domain}/templates/{name}/versions`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MissingCredential` if no domain is configured.
    pub fn versions_url(&self, name: &str) -> SyncResult<String> {
        Ok(format!(
            "{}/{}/versions",
            self.templates_url()?,
            urlencoding::encode(name)
        ))
    }

    /// `{api_base}/v3/{domain}/templates/{name}/versions/{tag}`
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MissingCredential` if no domain is configured.
    pub fn version_url(&self, name: &str, tag: &str) -> SyncResult<String> {
        Ok(format!(
            "{}/{}",
            self.versions_url(name)?,
            urlencoding::encode(tag)
        ))
    }
}

impl TemplateStore for MailgunClient {
    fn template_versions(&self, name: &str) -> SyncResult<RemoteTemplate> {
        let authorization = self.authorization()?;
        let url = self.versions_url(name)?;
        debug!(%url, "GET template versions");

        let response = self
            .agent
            .get(&url)
            .header("Authorization", &authorization)
            .call()?;
        let body = success_body(response)?;

        let envelope: VersionsEnvelope = serde_json::from_str(&body)?;
        envelope
            .template
            .ok_or_else(|| SyncError::InvalidResponse("response has no template".to_string()))
    }

    fn create_template(&self, template: &NewTemplate) -> SyncResult<()> {
        let authorization = self.authorization()?;
        let url = self.templates_url()?;
        debug!(%url, template = %template.name, "POST template");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &authorization)
            .send_form(template.form_fields())?;
        success_body(response).map(drop)
    }

    fn create_version(&self, name: &str, version: &NewVersion) -> SyncResult<()> {
        let authorization = self.authorization()?;
        let url = self.versions_url(name)?;
        debug!(%url, tag = %version.tag, "POST template version");

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &authorization)
            .send_form(version.form_fields())?;
        success_body(response).map(drop)
    }

    fn update_version(&self, name: &str, tag: &str, update: &VersionUpdate) -> SyncResult<()> {
        let authorization = self.authorization()?;
        let url = self.version_url(name, tag)?;
        debug!(%url, "PUT template version");

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &authorization)
            .send_form(update.form_fields())?;
        success_body(response).map(drop)
    }
}

/// Read the body of a 2xx response, or turn the response into a status error
fn success_body(mut response: Response<Body>) -> SyncResult<String> {
    let status = response.status();
    let body = response.body_mut().read_to_string();

    if status.is_success() {
        return Ok(body?);
    }

    Err(SyncError::Status {
        status: status.as_u16(),
        body: body.unwrap_or_default(),
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
