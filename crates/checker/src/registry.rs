//! The compiled-in table of tracked resources.
//!
//! Policy data, not state: the registry is defined once at startup and only
//! supports enumeration and lookup. The entries mirror the deployment this
//! checker was built for — ceph-ansible and kolla-ansible release branches
//! plus the published images of those builds.

use std::collections::BTreeMap;

use crate::identifiers::{
    BranchName, ImageName, ParameterName, RepositoryId, ResourceId, TagName, VersionLabel,
};
use crate::types::{ResourceSpec, TargetSpec, UpstreamRef};

/// Immutable id → [`ResourceSpec`] mapping with deterministic iteration order.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    entries: BTreeMap<ResourceId, ResourceSpec>,
}

impl ResourceRegistry {
    /// Builds a registry from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (ResourceId, ResourceSpec)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// The built-in resource table.
    pub fn builtin() -> Self {
        Self::from_entries([
            git(
                "ceph-luminous",
                "ceph/ceph-ansible",
                "stable-3.2",
                "docker-ceph-ansible",
                "luminous",
                "CEPH_VERSION",
            ),
            git(
                "ceph-nautilus",
                "ceph/ceph-ansible",
                "stable-4.0",
                "docker-ceph-ansible",
                "nautilus",
                "CEPH_VERSION",
            ),
            git(
                "ceph-master",
                "ceph/ceph-ansible",
                "master",
                "docker-ceph-ansible",
                "master",
                "CEPH_VERSION",
            ),
            git(
                "openstack-queens",
                "openstack/kolla-ansible",
                "stable/queens",
                "docker-kolla-ansible",
                "queens",
                "OPENSTACK_VERSION",
            ),
            git(
                "openstack-rocky",
                "openstack/kolla-ansible",
                "stable/rocky",
                "docker-kolla-ansible",
                "rocky",
                "OPENSTACK_VERSION",
            ),
            git(
                "openstack-stein",
                "openstack/kolla-ansible",
                "stable/stein",
                "docker-kolla-ansible",
                "stein",
                "OPENSTACK_VERSION",
            ),
            git(
                "openstack-master",
                "openstack/kolla-ansible",
                "master",
                "docker-kolla-ansible",
                "master",
                "OPENSTACK_VERSION",
            ),
            image(
                "image-ceph-ansible",
                "osism/ceph-ansible",
                "latest",
                "testbed",
                "latest",
                "CEPH_ANSIBLE_VERSION",
            ),
            image(
                "image-kolla-ansible",
                "osism/kolla-ansible",
                "latest",
                "testbed",
                "latest",
                "KOLLA_ANSIBLE_VERSION",
            ),
        ])
    }

    /// Looks up a resource by id.
    pub fn get(&self, id: &ResourceId) -> Option<&ResourceSpec> {
        self.entries.get(id)
    }

    /// Iterates all entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceId, &ResourceSpec)> {
        self.entries.iter()
    }

    /// Number of tracked resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Registry literals are validated by the tests below; empty strings cannot
// reach a release build.

fn git(
    id: &str,
    repository: &str,
    branch: &str,
    target_repository: &str,
    version: &str,
    parameter: &str,
) -> (ResourceId, ResourceSpec) {
    (
        ResourceId::new(id).expect("resource id literal"),
        ResourceSpec {
            upstream: UpstreamRef::Git {
                repository: RepositoryId::new(repository).expect("repository literal"),
                branch: BranchName::new(branch).expect("branch literal"),
            },
            target: target(target_repository, version, parameter),
        },
    )
}

fn image(
    id: &str,
    image: &str,
    tag: &str,
    target_repository: &str,
    version: &str,
    parameter: &str,
) -> (ResourceId, ResourceSpec) {
    (
        ResourceId::new(id).expect("resource id literal"),
        ResourceSpec {
            upstream: UpstreamRef::Image {
                image: ImageName::new(image).expect("image literal"),
                tag: TagName::new(tag).expect("tag literal"),
            },
            target: target(target_repository, version, parameter),
        },
    )
}

fn target(repository: &str, version: &str, parameter: &str) -> TargetSpec {
    TargetSpec {
        repository: RepositoryId::new(repository).expect("target repository literal"),
        version: VersionLabel::new(version).expect("version literal"),
        parameter: ParameterName::new(parameter).expect("parameter literal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_well_formed() {
        let registry = ResourceRegistry::builtin();
        assert!(!registry.is_empty());
        for (id, spec) in registry.iter() {
            assert!(!id.as_str().is_empty());
            assert!(!spec.target.repository.as_str().is_empty());
            assert!(!spec.target.version.as_str().is_empty());
            assert!(!spec.target.parameter.as_str().is_empty());
        }
    }

    #[test]
    fn builtin_registry_iterates_in_id_order() {
        let registry = ResourceRegistry::builtin();
        let ids: Vec<&str> = registry.iter().map(|(id, _)| id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn lookup_by_id_returns_the_matching_spec() {
        let registry = ResourceRegistry::builtin();
        let id = ResourceId::new("ceph-nautilus").unwrap();
        let spec = registry.get(&id).unwrap();
        match &spec.upstream {
            UpstreamRef::Git { repository, branch } => {
                assert_eq!(repository.as_str(), "ceph/ceph-ansible");
                assert_eq!(branch.as_str(), "stable-4.0");
            }
            other => panic!("expected a git upstream, got {other:?}"),
        }
    }
}
