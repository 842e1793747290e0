//! Role assignment from TOML (`[roles]` section)

use mos_domain::Role;
use serde::{Deserialize, Serialize};

/// Which named sources fill which role
///
/// # Example
///
/// ```toml
/// [roles]
/// workers = ["wiki", "search", "llm"]
/// voters = ["llm", "judge"]
/// president = "llm"
/// ```
///
/// Every name must have a matching `[sources.<name>]` entry. The same
/// source may appear in several roles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRolesConfig {
    pub workers: Vec<String>,
    pub voters: Vec<String>,
    pub founders: Vec<String>,
    pub president: Option<String>,
    pub reranker: Option<String>,
}

impl FileRolesConfig {
    /// Every (role, source name) pair, in declaration order
    pub fn assignments(&self) -> Vec<(Role, &str)> {
        let lists = [
            (Role::Worker, &self.workers),
            (Role::Voter, &self.voters),
            (Role::Founder, &self.founders),
        ];

        let mut pairs: Vec<(Role, &str)> = lists
            .into_iter()
            .flat_map(|(role, names)| names.iter().map(move |n| (role, n.as_str())))
            .collect();
        if let Some(president) = &self.president {
            pairs.push((Role::President, president));
        }
        if let Some(reranker) = &self.reranker {
            pairs.push((Role::Reranker, reranker));
        }
        pairs
    }

    /// Number of names assigned to `role`
    pub fn count(&self, role: Role) -> usize {
        match role {
            Role::Worker => self.workers.len(),
            Role::Voter => self.voters.len(),
            Role::Founder => self.founders.len(),
            Role::President => usize::from(self.president.is_some()),
            Role::Reranker => usize::from(self.reranker.is_some()),
        }
    }
}
