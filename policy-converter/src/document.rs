use crate::{
    calico,
    convert::{is_valid_workload_endpoint, Converter},
    k8s, OutputFormat,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};

/// The API version of every emitted Calico resource.
pub const API_VERSION: &str = "projectcalico.org/v3";

/// A converted resource, ready to be written out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "apiVersion")]
    pub api_version: &'static str,

    #[serde(flatten)]
    pub resource: Resource,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Resource {
    NetworkPolicy(calico::NetworkPolicy),
    WorkloadEndpoint(calico::WorkloadEndpoint),
    Profile(calico::Profile),
    Node(calico::Node),
}

/// Converts every supported resource in a YAML stream.
///
/// Documents are converted in order. `List` documents are flattened. Pods that do not have a
/// workload endpoint and documents of unsupported kinds are skipped.
pub fn convert_manifests(converter: &Converter, manifests: &str) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for (i, doc) in serde_yaml::Deserializer::from_str(manifests).enumerate() {
        let value =
            Value::deserialize(doc).with_context(|| format!("document {} is not valid YAML", i))?;
        convert_value(converter, value, &mut documents)
            .with_context(|| format!("failed to convert document {}", i))?;
    }
    Ok(documents)
}

fn convert_value(converter: &Converter, value: Value, out: &mut Vec<Document>) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value
        .get("kind")
        .and_then(Value::as_str)
        .context("resource does not have a kind")?
        .to_string();

    let resource = match kind.as_str() {
        "NetworkPolicy" => {
            let np = serde_yaml::from_value::<k8s::NetworkPolicy>(value)?;
            Resource::NetworkPolicy(converter.network_policy(&np)?)
        }

        "Pod" => {
            let pod = serde_yaml::from_value::<k8s::Pod>(value)?;
            if !is_valid_workload_endpoint(&pod) {
                return Ok(());
            }
            Resource::WorkloadEndpoint(converter.workload_endpoint(&pod)?)
        }

        "Namespace" => {
            let ns = serde_yaml::from_value::<k8s::Namespace>(value)?;
            Resource::Profile(converter.namespace_to_profile(&ns))
        }

        "Node" => {
            let node = serde_yaml::from_value::<k8s::Node>(value)?;
            Resource::Node(converter.k8s_node_to_calico(&node)?)
        }

        kind if kind.ends_with("List") => {
            let items = match value.get("items") {
                Some(Value::Sequence(items)) => items.clone(),
                Some(Value::Null) | None => vec![],
                Some(_) => anyhow::bail!("{} items must be a sequence", kind),
            };
            debug!(%kind, items = items.len(), "Flattening list");
            for (i, item) in items.into_iter().enumerate() {
                convert_value(converter, item, out)
                    .with_context(|| format!("failed to convert item {}", i))?;
            }
            return Ok(());
        }

        kind => {
            warn!(%kind, "Skipping unsupported resource");
            return Ok(());
        }
    };

    out.push(Document {
        api_version: API_VERSION,
        resource,
    });
    Ok(())
}

/// Renders documents as a JSON array or as a YAML stream.
pub fn render(documents: &[Document], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(documents)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Yaml => {
            let mut yaml = String::new();
            for doc in documents {
                yaml.push_str("---\n");
                yaml.push_str(&serde_yaml::to_string(doc)?);
            }
            Ok(yaml)
        }
    }
}
