use crate::{
    calico::{Clause, SelectorExpr, LABEL_ORCHESTRATOR, ORCHESTRATOR_KUBERNETES},
    k8s::labels::{Operator, Selector},
};

/// Indicates what a label selector selects over.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectorKind {
    /// Pod selectors are scoped to Kubernetes-managed endpoints.
    Pod,

    /// Namespace selectors match the labels of namespace profiles and are not scoped.
    Namespace,
}

/// Matches endpoints created from Kubernetes pods.
pub(crate) fn kubernetes_endpoints() -> Clause {
    Clause::equals(LABEL_ORCHESTRATOR, ORCHESTRATOR_KUBERNETES)
}

/// Compiles a label selector into a Calico selector expression.
///
/// Exact matches are emitted in key order and expressions in source order, so compiling equal
/// selectors always yields identical strings.
pub fn compile_selector(selector: &Selector, kind: SelectorKind) -> String {
    let mut expr = SelectorExpr::default();
    if kind == SelectorKind::Pod {
        expr.push(kubernetes_endpoints());
    }

    expr.extend(
        selector
            .match_labels()
            .iter()
            .map(|(key, value)| Clause::equals(key, value)),
    );

    expr.extend(selector.match_expressions().iter().map(|e| {
        let key = e.key().to_string();
        match e.operator() {
            Operator::In => Clause::In {
                key,
                values: e.values().to_vec(),
            },
            Operator::NotIn => Clause::NotIn {
                key,
                values: e.values().to_vec(),
            },
            Operator::Exists => Clause::Has(key),
            Operator::DoesNotExist => Clause::NotHas(key),
        }
    }));

    expr.to_string()
}
