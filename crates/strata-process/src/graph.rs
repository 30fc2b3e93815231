use std::collections::{HashMap, HashSet, VecDeque};

use crate::flow::SequenceFlow;
use crate::task::Task;

/// Flow structure for traversal and analysis.
#[derive(Debug, Clone, Default)]
pub struct Graph {
  /// task_id -> outgoing flow ids, document order.
  outgoing: HashMap<String, Vec<String>>,
  /// task_id -> incoming flow ids, document order.
  incoming: HashMap<String, Vec<String>>,
  /// task_id -> downstream task ids.
  adjacency: HashMap<String, Vec<String>>,
  /// Tasks explicitly marked as joins.
  join_points: HashSet<String>,
}

impl Graph {
  /// Build a graph from tasks and flows.
  pub fn new(tasks: &[Task], flows: &[SequenceFlow]) -> Self {
    let mut outgoing: HashMap<String, Vec<String>> = HashMap::new();
    let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
    let mut adjacency: HashMap<String, Vec<String>> = HashMap::new();

    for task in tasks {
      outgoing.entry(task.task_id.clone()).or_default();
      incoming.entry(task.task_id.clone()).or_default();
      adjacency.entry(task.task_id.clone()).or_default();
    }

    for flow in flows {
      outgoing
        .entry(flow.source.clone())
        .or_default()
        .push(flow.flow_id.clone());
      incoming
        .entry(flow.target.clone())
        .or_default()
        .push(flow.flow_id.clone());
      adjacency
        .entry(flow.source.clone())
        .or_default()
        .push(flow.target.clone());
    }

    let join_points = tasks
      .iter()
      .filter(|t| t.join)
      .map(|t| t.task_id.clone())
      .collect();

    Self {
      outgoing,
      incoming,
      adjacency,
      join_points,
    }
  }

  /// Outgoing flow ids of a task, in document order.
  pub fn outgoing(&self, task_id: &str) -> &[String] {
    self
      .outgoing
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Incoming flow ids of a task, in document order.
  pub fn incoming(&self, task_id: &str) -> &[String] {
    self
      .incoming
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Downstream task ids of a task.
  pub fn downstream(&self, task_id: &str) -> &[String] {
    self
      .adjacency
      .get(task_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Whether a task was marked as an explicit join.
  pub fn is_join_point(&self, task_id: &str) -> bool {
    self.join_points.contains(task_id)
  }

  /// Whether `to` can be reached from `from` by following flows.
  /// A task reaches itself only through a loop.
  pub fn can_reach(&self, from: &str, to: &str) -> bool {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = self.downstream(from).iter().map(|s| s.as_str()).collect();

    while let Some(current) = queue.pop_front() {
      if current == to {
        return true;
      }
      if !seen.insert(current) {
        continue;
      }
      queue.extend(self.downstream(current).iter().map(|s| s.as_str()));
    }

    false
  }

  /// Breadth-first distance of every reachable task from `start`.
  pub fn distances_from(&self, start: &str) -> HashMap<String, usize> {
    let mut distances = HashMap::new();
    let mut queue = VecDeque::from([(start.to_string(), 0usize)]);

    while let Some((task_id, distance)) = queue.pop_front() {
      if distances.contains_key(&task_id) {
        continue;
      }
      for next in self.downstream(&task_id) {
        if !distances.contains_key(next) {
          queue.push_back((next.clone(), distance + 1));
        }
      }
      distances.insert(task_id, distance);
    }

    distances
  }
}
