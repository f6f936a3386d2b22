use serde::{Deserialize, Serialize};

use crate::surface::FeatureFlags;

/// Proxy/relay settings used when rewriting remote stream URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Base URL of the relay, without a trailing route (e.g. "http://localhost:4000")
    pub base_url: String,
    /// Route remote URLs through the relay
    pub enabled: bool,
    /// Route for adaptive (HLS) streams
    pub hls_route: String,
    /// Route for progressive streams
    pub generic_route: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            enabled: true,
            hls_route: "/hls".to_string(),
            generic_route: "/proxy".to_string(),
        }
    }
}

/// Configuration for resolving and presenting sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub proxy: ProxySettings,
    /// Title handed to the player surface
    pub title: String,
    /// Player features to request
    pub features: FeatureFlags,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            proxy: ProxySettings::default(),
            title: "Test Video".to_string(),
            features: FeatureFlags::default(),
        }
    }
}
