// ordering.rs - Height ordering of obstacles

use crate::obstacle::Obstacle;

/// Indices into `obstacles`, lowest top face first. Equal tops keep their
/// input order.
pub fn order_by_height(obstacles: &[Obstacle]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..obstacles.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| obstacles[a].top().total_cmp(&obstacles[b].top()));
    order
}
