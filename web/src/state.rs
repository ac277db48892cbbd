//! Shared, read-only application state.

use std::sync::Arc;

use forms_core::{ApiError, ContentClient, FieldRuleSet};

use crate::config::Config;
use crate::transport::ReqwestTransport;

/// Tunables that are not part of the content API connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub profile_path: String,
    pub max_part_bytes: usize,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile_path: "/api/profiles".to_string(),
            max_part_bytes: 500_000_000,
            max_body_bytes: 1_000_000_000,
        }
    }
}

#[derive(Debug)]
struct Inner {
    profile_rules: FieldRuleSet,
    credential_rules: FieldRuleSet,
    client: ContentClient,
    transport: ReqwestTransport,
    settings: Settings,
}

#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(client: ContentClient, transport: ReqwestTransport, settings: Settings) -> Self {
        Self {
            inner: Arc::new(Inner {
                profile_rules: FieldRuleSet::profile_registration(),
                credential_rules: FieldRuleSet::credentials(),
                client,
                transport,
                settings,
            }),
        }
    }

    /// Build the state the binary runs with. Fails on a bad API URL.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = ContentClient::new(&config.api_url)?;
        let transport = ReqwestTransport::new()?;
        Ok(Self::new(client, transport, config.settings()))
    }

    pub fn profile_rules(&self) -> &FieldRuleSet {
        &self.inner.profile_rules
    }

    pub fn credential_rules(&self) -> &FieldRuleSet {
        &self.inner.credential_rules
    }

    pub fn client(&self) -> &ContentClient {
        &self.inner.client
    }

    pub fn transport(&self) -> &ReqwestTransport {
        &self.inner.transport
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }
}
