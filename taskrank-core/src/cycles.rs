//! Cycle detection over the dependency graph of one batch.
//!
//! Nodes are task titles; an edge runs from a task to each task it depends
//! on. References to titles not in the batch are dropped. Tasks sharing a
//! title collapse into one node.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// One circular chain, closed (first title repeated at the end).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCycle {
    pub path: Vec<String>,
    pub warning: String,
}

impl DependencyCycle {
    fn new(path: Vec<String>) -> Self {
        let warning = format!("Circular dependency detected: {}", path.join(" → "));
        Self { path, warning }
    }
}

/// Index-based adjacency list built from the batch.
struct Graph<'a> {
    titles: Vec<&'a str>,
    edges: Vec<Vec<usize>>,
}

impl<'a> Graph<'a> {
    fn build(tasks: &'a [Task]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut titles = Vec::new();
        for t in tasks {
            index.entry(t.title.as_str()).or_insert_with(|| {
                titles.push(t.title.as_str());
                titles.len() - 1
            });
        }

        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); titles.len()];
        for t in tasks {
            let from = index[t.title.as_str()];
            for dep in &t.dependencies {
                if let Some(&to) = index.get(dep.as_str()) {
                    if !edges[from].contains(&to) {
                        edges[from].push(to);
                    }
                }
            }
        }

        Self { titles, edges }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// Find every distinct cycle reachable by depth-first search.
///
/// Runs in O(V + E). A cycle found again from another starting point, or in
/// reverse, is reported once.
pub fn detect_cycles(tasks: &[Task]) -> Vec<DependencyCycle> {
    let graph = Graph::build(tasks);
    let n = graph.titles.len();

    let mut mark = vec![Mark::Unvisited; n];
    let mut stack_pos: Vec<usize> = vec![0; n];
    let mut path: Vec<usize> = Vec::new();
    // (node, next edge to follow)
    let mut frames: Vec<(usize, usize)> = Vec::new();

    let mut seen: HashSet<Vec<usize>> = HashSet::new();
    let mut found = Vec::new();

    for start in 0..n {
        if mark[start] != Mark::Unvisited {
            continue;
        }

        mark[start] = Mark::OnStack;
        stack_pos[start] = path.len();
        path.push(start);
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            if next < graph.edges[node].len() {
                frame.1 += 1;
                let to = graph.edges[node][next];
                match mark[to] {
                    Mark::Unvisited => {
                        mark[to] = Mark::OnStack;
                        stack_pos[to] = path.len();
                        path.push(to);
                        frames.push((to, 0));
                    }
                    Mark::OnStack => {
                        let ring = &path[stack_pos[to]..];
                        if seen.insert(canonical(ring)) {
                            let mut titles: Vec<String> =
                                ring.iter().map(|&i| graph.titles[i].to_string()).collect();
                            titles.push(graph.titles[to].to_string());
                            found.push(DependencyCycle::new(titles));
                        }
                    }
                    Mark::Done => {}
                }
            } else {
                mark[node] = Mark::Done;
                path.pop();
                frames.pop();
            }
        }
    }

    for c in &found {
        tracing::warn!(cycle = %c.path.join(" -> "), "dependency cycle");
    }

    found
}

/// Rotation- and direction-independent key for a ring of nodes.
fn canonical(ring: &[usize]) -> Vec<usize> {
    let forward = min_rotation(ring.to_vec());
    let mut reversed = ring.to_vec();
    reversed.reverse();
    let backward = min_rotation(reversed);
    forward.min(backward)
}

fn min_rotation(mut ring: Vec<usize>) -> Vec<usize> {
    if let Some(pos) = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, v)| *v)
        .map(|(i, _)| i)
    {
        ring.rotate_left(pos);
    }
    ring
}

/// Titles that sit on at least one cycle, reported or not.
///
/// A task is on a cycle exactly when its strongly connected component has
/// more than one node, or it depends on itself.
pub fn cycle_members(tasks: &[Task]) -> HashSet<&str> {
    let graph = Graph::build(tasks);
    let component = strongly_connected(&graph);

    let mut size = vec![0usize; graph.titles.len()];
    for &c in &component {
        size[c] += 1;
    }

    (0..graph.titles.len())
        .filter(|&v| size[component[v]] > 1 || graph.edges[v].contains(&v))
        .map(|v| graph.titles[v])
        .collect()
}

const UNINDEXED: usize = usize::MAX;

/// Tarjan's algorithm without recursion. Returns a component id per node.
fn strongly_connected(graph: &Graph<'_>) -> Vec<usize> {
    let n = graph.titles.len();
    let mut index = vec![UNINDEXED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut component = vec![0usize; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut next_index = 0;
    let mut next_component = 0;

    for start in 0..n {
        if index[start] != UNINDEXED {
            continue;
        }

        index[start] = next_index;
        low[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;
        frames.push((start, 0));

        while let Some(frame) = frames.last_mut() {
            let (node, next) = *frame;
            if let Some(&to) = graph.edges[node].get(next) {
                frame.1 += 1;
                if index[to] == UNINDEXED {
                    index[to] = next_index;
                    low[to] = next_index;
                    next_index += 1;
                    stack.push(to);
                    on_stack[to] = true;
                    frames.push((to, 0));
                } else if on_stack[to] {
                    low[node] = low[node].min(index[to]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                low[parent] = low[parent].min(low[node]);
            }
            if low[node] == index[node] {
                while let Some(v) = stack.pop() {
                    on_stack[v] = false;
                    component[v] = next_component;
                    if v == node {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }

    component
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, deps: &[&str]) -> Task {
        Task {
            title: title.to_string(),
            due_date: None,
            estimated_hours: 1.0,
            importance: 5,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn test_three_node_cycle() {
        let tasks = vec![
            task("Task A", &["Task B"]),
            task("Task B", &["Task C"]),
            task("Task C", &["Task A"]),
        ];
        let cycles = detect_cycles(&tasks);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path, vec!["Task A", "Task B", "Task C", "Task A"]);
        assert_eq!(
            cycles[0].warning,
            "Circular dependency detected: Task A → Task B → Task C → Task A"
        );
    }

    #[test]
    fn test_acyclic_batch() {
        let tasks = vec![
            task("A", &["B", "C"]),
            task("B", &["C"]),
            task("C", &[]),
        ];
        assert!(detect_cycles(&tasks).is_empty());
    }

    #[test]
    fn test_two_independent_cycles() {
        let tasks = vec![
            task("A", &["B"]),
            task("B", &["A"]),
            task("X", &["Y"]),
            task("Y", &["Z"]),
            task("Z", &["X"]),
        ];
        let cycles = detect_cycles(&tasks);
        assert_eq!(cycles.len(), 2);
        assert_eq!(cycles[0].path, vec!["A", "B", "A"]);
        assert_eq!(cycles[1].path, vec!["X", "Y", "Z", "X"]);
    }

    #[test]
    fn test_dangling_references_ignored() {
        let tasks = vec![task("A", &["ghost", "B"]), task("B", &["phantom"])];
        assert!(detect_cycles(&tasks).is_empty());
    }

    #[test]
    fn test_self_dependency() {
        let cycles = detect_cycles(&[task("Solo", &["Solo"])]);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path, vec!["Solo", "Solo"]);
    }

    #[test]
    fn test_cycle_reported_once_when_entered_twice() {
        // D reaches the A-B ring but the ring is only reported once.
        let tasks = vec![
            task("A", &["B"]),
            task("B", &["A"]),
            task("D", &["A", "B"]),
        ];
        assert_eq!(detect_cycles(&tasks).len(), 1);
    }

    #[test]
    fn test_duplicate_titles_merge() {
        let tasks = vec![task("A", &["B"]), task("B", &[]), task("B", &["A"])];
        let cycles = detect_cycles(&tasks);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path, vec!["A", "B", "A"]);
    }

    #[test]
    fn test_canonical_ignores_rotation_and_direction() {
        assert_eq!(canonical(&[2, 0, 1]), canonical(&[0, 1, 2]));
        assert_eq!(canonical(&[0, 2, 1]), canonical(&[0, 1, 2]));
    }

    #[test]
    fn test_members() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"]), task("C", &["A"])];
        let members = cycle_members(&tasks);
        assert!(members.contains("A"));
        assert!(members.contains("B"));
        assert!(!members.contains("C"));
    }

    #[test]
    fn test_members_include_cycle_through_finished_node() {
        // A -> C -> B -> A is only reachable after B is already done.
        let tasks = vec![
            task("A", &["B", "C"]),
            task("B", &["A"]),
            task("C", &["B"]),
        ];
        assert_eq!(detect_cycles(&tasks).len(), 1);

        let members = cycle_members(&tasks);
        assert_eq!(members.len(), 3);
        assert!(members.contains("C"));
    }

    #[test]
    fn test_members_self_edge_and_acyclic() {
        let tasks = vec![task("Solo", &["Solo"]), task("X", &["Y"]), task("Y", &[])];
        let members = cycle_members(&tasks);
        assert_eq!(members.into_iter().collect::<Vec<_>>(), vec!["Solo"]);
    }

    #[test]
    fn test_members_long_chain_does_not_overflow() {
        let n = 50_000;
        let mut tasks: Vec<Task> = (0..n)
            .map(|i| task(&format!("t{i}"), &[format!("t{}", i + 1).as_str()]))
            .collect();
        tasks.push(task(&format!("t{n}"), &["t0"]));
        tasks.push(task("outside", &["t0"]));
        let members = cycle_members(&tasks);
        assert_eq!(members.len(), n + 1);
        assert!(!members.contains("outside"));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        let n = 50_000;
        let mut tasks: Vec<Task> = (0..n)
            .map(|i| task(&format!("t{i}"), &[format!("t{}", i + 1).as_str()]))
            .collect();
        tasks.push(task(&format!("t{n}"), &["t0"]));
        let cycles = detect_cycles(&tasks);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].path.len(), n + 2);
    }
}
