// src/tasks/graph.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, TaskwireError};
use crate::tasks::registry::TaskRegistry;

/// Check that every referenced task exists and that no task (transitively)
/// invokes itself.
pub fn validate_registry(registry: &TaskRegistry) -> Result<()> {
    validate_references(registry)?;
    validate_acyclic(registry)?;
    Ok(())
}

fn validate_references(registry: &TaskRegistry) -> Result<()> {
    for task in registry.tasks() {
        for dep in task.kind.references() {
            if registry.get(dep).is_none() {
                return Err(TaskwireError::ConfigError(format!(
                    "task '{}' references unknown task '{}'",
                    task.name, dep
                )));
            }
            if dep == task.name {
                return Err(TaskwireError::TaskCycle(format!(
                    "task '{}' invokes itself",
                    task.name
                )));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(registry: &TaskRegistry) -> Result<()> {
    // Edge direction: parent -> constituent.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in registry.tasks() {
        graph.add_node(task.name.as_str());
    }
    for task in registry.tasks() {
        for dep in task.kind.references() {
            graph.add_edge(task.name.as_str(), dep, ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(TaskwireError::TaskCycle(format!(
            "cycle detected involving task '{}'",
            cycle.node_id()
        ))),
    }
}
