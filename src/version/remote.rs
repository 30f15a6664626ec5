//! Filtering the versions a collector offers

use tracing::debug;

use crate::collector::Collector;
use crate::error::Error;
use crate::version::collection::Collection;
use crate::version::constraint::Constraint;
use crate::version::finder::LATEST;
use crate::version::types::Version;

/// Filter selecting the stable channel
pub const STABLE: &str = "stable";
/// Filter selecting the unstable channel
pub const UNSTABLE: &str = "unstable";
/// Filter selecting archived releases
pub const ARCHIVED: &str = "archived";

/// Which remote versions to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteFilter {
    Stable,
    Unstable,
    Archived,
    /// Everything the collector knows
    All,
    /// Only the highest version
    Latest,
    /// Everything satisfying a constraint expression
    Constraint(Constraint),
}

impl std::str::FromStr for RemoteFilter {
    type Err = Error;

    /// `stable`, `unstable`, `archived`, `latest`, empty for everything, or
    /// a constraint expression (`InvalidConstraint` when it does not parse)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = s.trim();
        Ok(match filter {
            STABLE => RemoteFilter::Stable,
            UNSTABLE => RemoteFilter::Unstable,
            ARCHIVED => RemoteFilter::Archived,
            "" => RemoteFilter::All,
            LATEST => RemoteFilter::Latest,
            expression => RemoteFilter::Constraint(expression.parse()?),
        })
    }
}

/// List the remote versions selected by `filter`, sorted ascending
pub fn list_remote(collector: &dyn Collector, filter: &RemoteFilter) -> Result<Vec<Version>, Error> {
    match filter {
        RemoteFilter::Stable => collector.stable_versions(),
        RemoteFilter::Unstable => collector.unstable_versions(),
        RemoteFilter::Archived => collector.archived_versions(),
        RemoteFilter::All => collector.all_versions(),
        RemoteFilter::Latest => {
            let versions = Collection::new(collector.all_versions()?);
            Ok(versions.latest().cloned().into_iter().collect())
        }
        RemoteFilter::Constraint(constraint) => {
            let versions: Vec<Version> = collector
                .all_versions()?
                .into_iter()
                .filter(|v| v.match_constraint(constraint))
                .collect();
            debug!("{} versions satisfy the constraint", versions.len());
            Ok(versions)
        }
    }
}
