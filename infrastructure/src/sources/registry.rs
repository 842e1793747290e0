//! Named sources built from configuration

use super::command::CommandSource;
use super::timeout::TimeoutSource;
use crate::config::{ConfigError, FileConfig, FileRolesConfig};
use mos_application::config::SourceRoster;
use mos_application::ports::answer_source::SharedSource;
use mos_domain::Role;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Every configured source, by name
///
/// A source listed under several roles is built once and shared.
#[derive(Default)]
pub struct SourceRegistry {
    sources: BTreeMap<String, SharedSource>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a [`CommandSource`] for every `[sources.<name>]` entry.
    ///
    /// Sources with a timeout (their own or `mos.timeout_secs`) are wrapped
    /// in a [`TimeoutSource`].
    pub fn from_config(config: &FileConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();

        for (name, entry) in &config.sources {
            if entry.command.trim().is_empty() {
                return Err(ConfigError::EmptyCommand(name.clone()));
            }

            let (capabilities, _) = entry.parse_capabilities(name);
            let command = CommandSource::new(name.as_str(), entry.command.as_str())
                .with_args(entry.args.clone())
                .with_capabilities(capabilities);

            let source: SharedSource = match entry.timeout_secs.or(config.mos.timeout_secs) {
                Some(secs) => {
                    debug!("Source {} limited to {}s per call", name, secs);
                    Arc::new(TimeoutSource::new(
                        Arc::new(command),
                        Duration::from_secs(secs),
                    ))
                }
                None => Arc::new(command),
            };
            registry.insert(name.as_str(), source);
        }

        Ok(registry)
    }

    pub fn insert(&mut self, name: impl Into<String>, source: SharedSource) {
        self.sources.insert(name.into(), source);
    }

    pub fn get(&self, name: &str) -> Option<&SharedSource> {
        self.sources.get(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve every role entry to its source
    pub fn roster(&self, roles: &FileRolesConfig) -> Result<SourceRoster, ConfigError> {
        let list = |role: Role, names: &[String]| -> Result<Vec<SharedSource>, ConfigError> {
            names.iter().map(|name| self.resolve(role, name)).collect()
        };
        let single = |role: Role, name: &Option<String>| -> Result<Option<SharedSource>, ConfigError> {
            name.as_deref().map(|name| self.resolve(role, name)).transpose()
        };

        Ok(SourceRoster {
            workers: list(Role::Worker, &roles.workers)?,
            voters: list(Role::Voter, &roles.voters)?,
            founders: list(Role::Founder, &roles.founders)?,
            president: single(Role::President, &roles.president)?,
            reranker: single(Role::Reranker, &roles.reranker)?,
        })
    }

    fn resolve(&self, role: Role, name: &str) -> Result<SharedSource, ConfigError> {
        self.sources
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UndefinedSource {
                role,
                name: name.to_string(),
            })
    }
}
