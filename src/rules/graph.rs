//! Driver → dependents graph.
//!
//! An edge `d → f` exists when any branch of driver `d` shows field `f`.
//! The graph must be acyclic; hiding a field hides everything reachable
//! from it.

use std::collections::{BTreeSet, HashMap};

use crate::error::FormError;

use super::types::DriverRules;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Dependents per driver, in first-seen order.
    edges: HashMap<String, Vec<String>>,
    /// Drivers in declaration order.
    drivers: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph and reject cycles.
    pub fn from_drivers(drivers: &[DriverRules]) -> Result<Self, FormError> {
        let mut graph = Self::default();
        for driver in drivers {
            graph.drivers.push(driver.driver.clone());
            let deps = graph.edges.entry(driver.driver.clone()).or_default();
            for (_, actions) in driver.branches() {
                for field in &actions.show {
                    if !deps.contains(field) {
                        deps.push(field.clone());
                    }
                }
            }
        }
        graph.check_acyclic()?;
        Ok(graph)
    }

    pub fn dependents(&self, field: &str) -> &[String] {
        self.edges.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The field plus every field reachable from it, depth-first.
    pub fn subtree(&self, field: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = BTreeSet::new();
        self.collect_subtree(field, &mut out, &mut seen);
        out
    }

    fn collect_subtree(&self, field: &str, out: &mut Vec<String>, seen: &mut BTreeSet<String>) {
        if !seen.insert(field.to_string()) {
            return;
        }
        out.push(field.to_string());
        for dep in self.dependents(field) {
            self.collect_subtree(dep, out, seen);
        }
    }

    /// Drivers ordered so every driver comes after the drivers that show it.
    pub fn driver_order(&self) -> Vec<String> {
        let mut indegree: HashMap<&str, usize> =
            self.drivers.iter().map(|d| (d.as_str(), 0)).collect();
        for deps in self.edges.values() {
            for dep in deps {
                if let Some(n) = indegree.get_mut(dep.as_str()) {
                    *n += 1;
                }
            }
        }

        let mut order = Vec::with_capacity(self.drivers.len());
        let mut ready: Vec<&str> = self
            .drivers
            .iter()
            .map(String::as_str)
            .filter(|d| indegree[d] == 0)
            .collect();
        // Pop from the front to keep declaration order among peers.
        while !ready.is_empty() {
            let driver = ready.remove(0);
            order.push(driver.to_string());
            for dep in self.dependents(driver) {
                if let Some(n) = indegree.get_mut(dep.as_str()) {
                    *n -= 1;
                    if *n == 0 {
                        ready.push(dep.as_str());
                    }
                }
            }
        }
        order
    }

    /// Longest chain of edges starting at any driver.
    pub fn depth(&self) -> usize {
        fn longest(graph: &DependencyGraph, field: &str) -> usize {
            graph
                .dependents(field)
                .iter()
                .map(|d| 1 + longest(graph, d))
                .max()
                .unwrap_or(0)
        }
        self.drivers.iter().map(|d| longest(self, d)).max().unwrap_or(0)
    }

    fn check_acyclic(&self) -> Result<(), FormError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            graph: &'a DependencyGraph,
            field: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<(), FormError> {
            match marks.get(field) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => return Err(FormError::DependencyCycle(field.to_string())),
                None => {}
            }
            marks.insert(field, Mark::Visiting);
            for dep in graph.dependents(field) {
                visit(graph, dep, marks)?;
            }
            marks.insert(field, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        for driver in &self.drivers {
            visit(self, driver, &mut marks)?;
        }
        Ok(())
    }
}
