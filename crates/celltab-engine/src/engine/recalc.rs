//! Recalculation ordering and circular dependency detection.
//!
//! When a cell changes, everything that transitively depends on it must be
//! re-evaluated, and in an order where no cell is visited before a cell it
//! reads. A depth-first walk over *dependents* edges produces that order;
//! meeting a cell that is already on the active traversal path means the
//! changed cell participates in a cycle, which is reported before any
//! value is touched.

use std::collections::{HashSet, VecDeque};

use crate::error::CycleError;

use super::graph::DependencyGraph;

/// Compute the re-evaluation order for everything reachable from `name`
/// through dependents edges. The returned sequence starts with `name`
/// itself and never lists a cell before one it depends on.
///
/// Runs in O(V + E) over the reachable subgraph.
pub fn recalculation_order(
    name: &str,
    graph: &DependencyGraph,
) -> Result<Vec<String>, CycleError> {
    let mut on_path = HashSet::new();
    let mut finished = HashSet::new();
    let mut order = VecDeque::new();
    visit(name, graph, &mut on_path, &mut finished, &mut order)?;
    Ok(order.into())
}

/// Post-order DFS: a node is prepended to `order` only after every cell
/// that depends on it has been, so reading the final order front to back
/// is safe for sequential re-evaluation.
fn visit(
    cell: &str,
    graph: &DependencyGraph,
    on_path: &mut HashSet<String>,
    finished: &mut HashSet<String>,
    order: &mut VecDeque<String>,
) -> Result<(), CycleError> {
    on_path.insert(cell.to_string());
    for dependent in graph.dependents(cell) {
        if finished.contains(dependent) {
            continue;
        }
        if on_path.contains(dependent) {
            return Err(CycleError {
                cell: dependent.to_string(),
            });
        }
        visit(dependent, graph, on_path, finished, order)?;
    }
    on_path.remove(cell);
    finished.insert(cell.to_string());
    order.push_front(cell.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[String], name: &str) -> usize {
        order
            .iter()
            .position(|n| n == name)
            .unwrap_or_else(|| panic!("{} missing from {:?}", name, order))
    }

    #[test]
    fn test_isolated_cell_orders_alone() {
        let graph = DependencyGraph::new();
        assert_eq!(
            recalculation_order("A1", &graph),
            Ok(vec!["A1".to_string()])
        );
    }

    #[test]
    fn test_chain_orders_dependees_first() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1"); // B1 reads A1
        graph.add_dependency("B1", "C1"); // C1 reads B1
        let order = recalculation_order("A1", &graph).unwrap();
        assert_eq!(
            order,
            vec!["A1".to_string(), "B1".to_string(), "C1".to_string()]
        );
    }

    #[test]
    fn test_diamond_keeps_every_cell_after_its_dependees() {
        // B1 and C1 read A1; D1 reads both B1 and C1.
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1");
        graph.add_dependency("A1", "C1");
        graph.add_dependency("B1", "D1");
        graph.add_dependency("C1", "D1");

        let order = recalculation_order("A1", &graph).unwrap();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "A1");
        assert!(position(&order, "B1") < position(&order, "D1"));
        assert!(position(&order, "C1") < position(&order, "D1"));
    }

    #[test]
    fn test_unreachable_cells_are_not_included() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1");
        graph.add_dependency("X1", "Y1");
        let order = recalculation_order("A1", &graph).unwrap();
        assert_eq!(order, vec!["A1".to_string(), "B1".to_string()]);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "A1");
        assert_eq!(
            recalculation_order("A1", &graph),
            Err(CycleError {
                cell: "A1".to_string()
            })
        );
    }

    #[test]
    fn test_long_cycle_is_detected() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1");
        graph.add_dependency("B1", "C1");
        graph.add_dependency("C1", "A1");
        assert!(recalculation_order("A1", &graph).is_err());
        assert!(recalculation_order("B1", &graph).is_err());
    }

    #[test]
    fn test_shared_downstream_is_visited_once() {
        // Two paths reach D1; it must appear exactly once.
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1");
        graph.add_dependency("A1", "C1");
        graph.add_dependency("B1", "D1");
        graph.add_dependency("C1", "D1");
        let order = recalculation_order("A1", &graph).unwrap();
        assert_eq!(order.iter().filter(|n| *n == "D1").count(), 1);
    }

    #[test]
    fn test_cycle_not_involving_start_is_still_reported() {
        // A1 feeds a loop between B1 and C1.
        let mut graph = DependencyGraph::new();
        graph.add_dependency("A1", "B1");
        graph.add_dependency("B1", "C1");
        graph.add_dependency("C1", "B1");
        assert!(recalculation_order("A1", &graph).is_err());
    }
}
