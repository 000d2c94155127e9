//! Converts Kubernetes manifests into Calico resources.
//!
//! Reads YAML manifests (multiple documents per input, `List` kinds included), converts every
//! `NetworkPolicy`, `Pod`, `Namespace` and `Node` it finds, and writes the resulting Calico
//! resources as JSON or YAML.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod args;
mod document;

pub use self::{
    args::{Args, OutputFormat},
    document::{convert_manifests, render, Document, Resource, API_VERSION},
};
pub use calico_policy_converter_core as calico;
pub use calico_policy_converter_k8s_api as k8s;
pub use calico_policy_converter_k8s_convert as convert;
