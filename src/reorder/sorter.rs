//! Depth-first linearization of a [`DependencyGraph`].

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::ent_framework::MetadataProvider;
use crate::error::ReorderResult;
use crate::reorder::graph::DependencyGraph;

/// A dependency edge that was ignored because it closed a cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CycleEdge {
    pub from: String,
    pub to: String,
}

/// Output of a sorter run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linearized {
    pub tables: Vec<String>,
    pub cycles: Vec<CycleEdge>,
}

/// Places every table after the tables it depends on.
///
/// A table is marked placed before its dependencies are visited, so a cycle
/// re-entering it stops there. The table reached first in a cycle is emitted
/// after the rest of the cycle, and the closing edge is reported in
/// [`Linearized::cycles`] instead of being honored.
#[derive(Debug, Default)]
pub struct Sorter {
    placed: HashSet<String>,
    emitted: HashSet<String>,
    ordered: Vec<String>,
    cycles: Vec<CycleEdge>,
}

impl Sorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linearize<P: MetadataProvider + ?Sized>(
        mut self,
        graph: &mut DependencyGraph<'_, P>,
    ) -> ReorderResult<Linearized> {
        // The explicit list can grow while we walk it: on-demand parses append to it
        let mut next = 0;
        while next < graph.explicit().len() {
            let table = graph.explicit()[next].clone();
            self.insert(graph, &table)?;
            next += 1;
        }

        Ok(Linearized {
            tables: self.ordered,
            cycles: self.cycles,
        })
    }

    fn insert<P: MetadataProvider + ?Sized>(
        &mut self,
        graph: &mut DependencyGraph<'_, P>,
        table: &str,
    ) -> ReorderResult<()> {
        if !self.placed.insert(table.to_string()) {
            return Ok(());
        }

        let depends = graph
            .record(table)
            .map(|record| record.depends.clone())
            .unwrap_or_default();

        for dep in &depends {
            if !graph.contains(&dep.table) {
                if !graph.auto_add() {
                    debug!(table, dependency = %dep.table, "skipping unlisted dependency");
                    continue;
                }
                graph.parse(&dep.descriptor(), true)?;
                if !graph.contains(&dep.table) {
                    warn!(
                        table,
                        model = %dep.model,
                        expected = %dep.table,
                        "dependency resolved to a different table"
                    );
                    continue;
                }
            } else if !graph.auto_add() && !graph.is_explicit(&dep.table) {
                debug!(table, dependency = %dep.table, "skipping unlisted dependency");
                continue;
            }

            if self.placed.contains(&dep.table) && !self.emitted.contains(&dep.table) {
                debug!(from = table, to = %dep.table, "dependency cycle, edge ignored");
                self.cycles.push(CycleEdge {
                    from: table.to_string(),
                    to: dep.table.clone(),
                });
            }
            self.insert(graph, &dep.table)?;
        }

        self.emitted.insert(table.to_string());
        self.ordered.push(table.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::ModelDescriptor;
    use crate::reorder::testing::{belongs_to, model, MapProvider};

    fn linearize(provider: &MapProvider, models: &[&str], auto_add: bool) -> Linearized {
        let mut graph = DependencyGraph::new(provider, auto_add);
        for name in models {
            graph.parse(&ModelDescriptor::model(name), true).unwrap();
        }
        Sorter::new().linearize(&mut graph).unwrap()
    }

    #[test]
    fn test_chain() {
        let provider = MapProvider::new(vec![
            model("Region", "regions", vec![]),
            model("Customer", "customers", vec![belongs_to("region", "Region", "regions")]),
            model("Order", "orders", vec![belongs_to("customer", "Customer", "customers")]),
        ]);

        let out = linearize(&provider, &["Order", "Customer", "Region"], false);
        assert_eq!(out.tables, vec!["regions", "customers", "orders"]);
        assert!(out.cycles.is_empty());
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let provider = MapProvider::new(vec![
            model("Employee", "employees", vec![belongs_to("department", "Department", "departments")]),
            model("Department", "departments", vec![belongs_to("head", "Employee", "employees")]),
        ]);

        let out = linearize(&provider, &["Employee", "Department"], true);
        assert_eq!(out.tables, vec!["departments", "employees"]);
        assert_eq!(
            out.cycles,
            vec![CycleEdge {
                from: "departments".to_string(),
                to: "employees".to_string(),
            }]
        );
    }

    #[test]
    fn test_auto_add_parses_on_demand() {
        let provider = MapProvider::new(vec![
            model("Customer", "customers", vec![]),
            model("Order", "orders", vec![belongs_to("customer", "Customer", "customers")]),
        ]);

        let out = linearize(&provider, &["Order"], true);
        assert_eq!(out.tables, vec!["customers", "orders"]);
    }

    #[test]
    fn test_missing_dependency_fails_with_auto_add() {
        let provider = MapProvider::new(vec![model(
            "Order",
            "orders",
            vec![belongs_to("customer", "Customer", "customers")],
        )]);

        let mut graph = DependencyGraph::new(&provider, true);
        graph.parse(&ModelDescriptor::model("Order"), true).unwrap();
        assert!(Sorter::new().linearize(&mut graph).is_err());
    }
}
