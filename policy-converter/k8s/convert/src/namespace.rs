use crate::{
    calico::{Profile, Rule},
    k8s::{self, ResourceExt},
    mk_metadata, Converter, Error, Result, NAMESPACE_LABEL_PREFIX, NAMESPACE_PROFILE_NAME_PREFIX,
};
use tracing::instrument;

// === impl Converter ===

impl Converter {
    /// Converts a namespace into the profile shared by all endpoints in that namespace.
    ///
    /// The profile allows all traffic, and applies the namespace's labels, prefixed, to its
    /// endpoints so that namespace selectors can match them.
    #[instrument(skip(self, ns), fields(name = ?ns.metadata.name))]
    pub fn namespace_to_profile(&self, ns: &k8s::Namespace) -> Profile {
        let labels_to_apply = ns
            .labels()
            .iter()
            .map(|(k, v)| (format!("{}{}", NAMESPACE_LABEL_PREFIX, k), v.clone()))
            .collect();

        let name = format!(
            "{}{}",
            NAMESPACE_PROFILE_NAME_PREFIX,
            ns.metadata.name.as_deref().unwrap_or_default()
        );
        Profile {
            metadata: mk_metadata(&ns.metadata, name),
            ingress_rules: vec![Rule::allow()],
            egress_rules: vec![Rule::allow()],
            labels_to_apply,
        }
    }

    /// Returns the name of the namespace backing a profile.
    pub fn profile_name_to_namespace<'n>(&self, profile: &'n str) -> Result<&'n str> {
        profile
            .strip_prefix(NAMESPACE_PROFILE_NAME_PREFIX)
            .ok_or_else(|| Error::NotNamespaceProfile(profile.to_string()))
    }
}
