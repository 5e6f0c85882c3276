//! Organisation membership lookups for classifiers.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::github::error::SweepError;
use crate::github::gateway::RepositoryGateway;
use crate::github::models::{OwnerKind, PullRequest};

/// How a login relates to the repository owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRole {
    /// The login is the personal account owning the repository.
    Owner,
    /// The login is a member of the owning organisation.
    Member,
}

/// Logins recognised as belonging to one repository owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    members: BTreeMap<String, MemberRole>,
}

impl Membership {
    /// Membership of a personal account: exactly the owner.
    #[must_use]
    pub fn personal(owner: &str) -> Self {
        Self {
            members: BTreeMap::from([(owner.to_owned(), MemberRole::Owner)]),
        }
    }

    /// Membership of an organisation from its member logins.
    #[must_use]
    pub fn organisation<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            members: logins
                .into_iter()
                .map(|login| (login.into(), MemberRole::Member))
                .collect(),
        }
    }

    /// Returns true when `login` is a member.
    #[must_use]
    pub fn contains(&self, login: &str) -> bool {
        self.members.contains_key(login)
    }

    /// Role of `login`, if a member.
    #[must_use]
    pub fn role(&self, login: &str) -> Option<MemberRole> {
        self.members.get(login).copied()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true when nobody is a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over logins in sorted order.
    pub fn logins(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

async fn load<G>(gateway: &G, owner: &str, kind: OwnerKind) -> Result<Membership, SweepError>
where
    G: RepositoryGateway + ?Sized,
{
    match kind {
        OwnerKind::User => Ok(Membership::personal(owner)),
        OwnerKind::Organization => {
            let logins = gateway.organization_members(owner).await?;
            debug!(owner, members = logins.len(), "loaded organisation members");
            Ok(Membership::organisation(logins))
        }
    }
}

/// Builds the membership of the owner shared by `pulls`.
///
/// Empty input yields an empty membership without any remote call.
///
/// # Errors
///
/// Returns [`SweepError::MixedOwners`] when the pull requests belong to more
/// than one owner, or the gateway error from the member listing.
pub async fn membership_of<G, T>(gateway: &G, pulls: &[T]) -> Result<Membership, SweepError>
where
    G: RepositoryGateway + ?Sized,
    T: AsRef<PullRequest> + Sync,
{
    let Some((owner, kind)) = shared_owner(pulls)? else {
        return Ok(Membership::default());
    };
    load(gateway, &owner, kind).await
}

fn shared_owner<T: AsRef<PullRequest>>(
    pulls: &[T],
) -> Result<Option<(String, OwnerKind)>, SweepError> {
    let mut repositories = pulls.iter().map(|pull| &pull.as_ref().repository);
    let Some(first) = repositories.next() else {
        return Ok(None);
    };
    if let Some(other) = repositories.find(|repository| repository.owner != first.owner) {
        return Err(SweepError::MixedOwners {
            expected: first.owner.clone(),
            found: other.owner.clone(),
        });
    }
    Ok(Some((first.owner.clone(), first.owner_kind)))
}

/// Memberships loaded once per owner for the lifetime of one run.
#[derive(Debug, Default)]
pub struct MembershipCache {
    loaded: HashMap<String, Membership>,
}

impl MembershipCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the membership for the owner of `pulls`, loading it on first
    /// use.
    ///
    /// # Errors
    ///
    /// As [`membership_of`].
    pub async fn membership_for<G, T>(
        &mut self,
        gateway: &G,
        pulls: &[T],
    ) -> Result<Membership, SweepError>
    where
        G: RepositoryGateway + ?Sized,
        T: AsRef<PullRequest> + Sync,
    {
        let Some((owner, kind)) = shared_owner(pulls)? else {
            return Ok(Membership::default());
        };
        if let Some(cached) = self.loaded.get(&owner) {
            return Ok(cached.clone());
        }
        let membership = load(gateway, &owner, kind).await?;
        self.loaded.insert(owner, membership.clone());
        Ok(membership)
    }
}
