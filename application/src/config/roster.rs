//! Source assignment per role

use crate::ports::answer_source::SharedSource;
use mos_domain::Role;

/// Ordered sources for each role
///
/// Order matters: it is the order in which workers are reported, voters are
/// tallied and founders speak.
#[derive(Clone, Default)]
pub struct SourceRoster {
    pub workers: Vec<SharedSource>,
    pub voters: Vec<SharedSource>,
    pub founders: Vec<SharedSource>,
    pub president: Option<SharedSource>,
    pub reranker: Option<SharedSource>,
}

impl SourceRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: Vec<SharedSource>) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_voters(mut self, voters: Vec<SharedSource>) -> Self {
        self.voters = voters;
        self
    }

    pub fn with_founders(mut self, founders: Vec<SharedSource>) -> Self {
        self.founders = founders;
        self
    }

    pub fn with_president(mut self, president: SharedSource) -> Self {
        self.president = Some(president);
        self
    }

    pub fn with_reranker(mut self, reranker: SharedSource) -> Self {
        self.reranker = Some(reranker);
        self
    }

    /// Number of sources filling `role`
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

impl std::fmt::Debug for SourceRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn names(sources: &[SharedSource]) -> Vec<&str> {
            sources.iter().map(|s| s.name()).collect()
        }

        f.debug_struct("SourceRoster")
            .field("workers", &names(&self.workers))
            .field("voters", &names(&self.voters))
            .field("founders", &names(&self.founders))
            .field("president", &self.president.as_ref().map(|s| s.name()))
            .field("reranker", &self.reranker.as_ref().map(|s| s.name()))
            .finish()
    }
}
