//! Reference graph checks.
//!
//! Every `Ref`, `Fn::GetAtt`, `Fn::Sub` placeholder, and `DependsOn` entry
//! must name a declared resource or an `AWS::` pseudo parameter.
//! Resource-to-resource edges must form a DAG, since the provisioning engine
//! derives creation order from them.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};
use crate::expr::sub_references;
use crate::template::Template;

/// Prefix of CloudFormation pseudo parameters such as `AWS::Region`.
const PSEUDO_PREFIX: &str = "AWS::";

/// All entity names referenced by intrinsic functions inside `value`.
#[must_use]
pub fn references(value: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect(value, &mut found);
    found
}

fn collect(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            if map.len() == 1 {
                if let Some(target) = map.get("Ref").and_then(Value::as_str) {
                    found.insert(target.to_owned());
                    return;
                }
                if let Some(args) = map.get("Fn::GetAtt") {
                    let target = match args {
                        Value::Array(items) => items.first().and_then(Value::as_str),
                        Value::String(dotted) => dotted.split('.').next(),
                        _ => None,
                    };
                    if let Some(target) = target {
                        found.insert(target.to_owned());
                    }
                    return;
                }
                if let Some(args) = map.get("Fn::Sub") {
                    collect_sub(args, found);
                    return;
                }
            }
            for nested in map.values() {
                collect(nested, found);
            }
        }
        Value::Array(items) => {
            for nested in items {
                collect(nested, found);
            }
        }
        _ => {}
    }
}

fn collect_sub(args: &Value, found: &mut BTreeSet<String>) {
    match args {
        Value::String(template) => found.extend(sub_references(template)),
        Value::Array(items) => {
            let local: BTreeSet<&str> = items
                .get(1)
                .and_then(Value::as_object)
                .map(|vars| vars.keys().map(String::as_str).collect())
                .unwrap_or_default();
            if let Some(template) = items.first().and_then(Value::as_str) {
                found.extend(
                    sub_references(template)
                        .into_iter()
                        .filter(|name| !local.contains(name.as_str())),
                );
            }
            if let Some(vars) = items.get(1) {
                collect(vars, found);
            }
        }
        _ => {}
    }
}

/// Direct resource dependencies of each resource: references plus `DependsOn`.
///
/// Pseudo parameters are not nodes and are left out.
#[must_use]
pub fn dependencies(template: &Template) -> BTreeMap<&str, BTreeSet<String>> {
    template
        .resources
        .iter()
        .map(|(id, resource)| {
            let mut deps = references(&resource.properties);
            deps.extend(resource.depends_on.iter().cloned());
            deps.retain(|d| template.resources.contains_key(d));
            (id.as_str(), deps)
        })
        .collect()
}

/// Check that all references resolve and that resource dependencies are acyclic.
pub fn validate(template: &Template) -> TemplateResult<()> {
    for (id, resource) in &template.resources {
        let mut targets = references(&resource.properties);
        targets.extend(resource.depends_on.iter().cloned());
        ensure_declared(template, id, &targets)?;
    }

    for (name, output) in &template.outputs {
        let value = serde_json::to_value(&output.value).map_err(|source| {
            TemplateError::Serialize {
                logical_id: name.clone(),
                source,
            }
        })?;
        ensure_declared(template, name, &references(&value))?;
    }

    let graph = dependencies(template);
    if let Some(cycle) = find_cycle(&graph) {
        return Err(TemplateError::DependencyCycle(cycle));
    }

    debug!(
        resources = template.resources.len(),
        outputs = template.outputs.len(),
        "template references validated"
    );
    Ok(())
}

fn ensure_declared(
    template: &Template,
    from: &str,
    targets: &BTreeSet<String>,
) -> TemplateResult<()> {
    for target in targets {
        if !target.starts_with(PSEUDO_PREFIX) && !template.declares(target) {
            return Err(TemplateError::DanglingReference {
                from: from.to_owned(),
                target: target.clone(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search; returns the first cycle found as a closed path.
fn find_cycle(graph: &BTreeMap<&str, BTreeSet<String>>) -> Option<Vec<String>> {
    let mut marks: BTreeMap<&str, Mark> = BTreeMap::new();
    let mut path: Vec<&str> = Vec::new();

    for &start in graph.keys() {
        if marks.contains_key(start) {
            continue;
        }
        if let Some(cycle) = visit(start, graph, &mut marks, &mut path) {
            return Some(cycle);
        }
    }
    None
}

fn visit<'a>(
    node: &'a str,
    graph: &'a BTreeMap<&str, BTreeSet<String>>,
    marks: &mut BTreeMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    marks.insert(node, Mark::Visiting);
    path.push(node);

    if let Some(edges) = graph.get(node) {
        for next in edges {
            match marks.get(next.as_str()) {
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|n| *n == next.as_str()).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        path[start..].iter().map(|n| (*n).to_owned()).collect();
                    cycle.push(next.clone());
                    return Some(cycle);
                }
                Some(Mark::Done) => {}
                None => {
                    if let Some(cycle) = visit(next.as_str(), graph, marks, path) {
                        return Some(cycle);
                    }
                }
            }
        }
    }

    path.pop();
    marks.insert(node, Mark::Done);
    None
}
