//! Face tracing on the rotation system.
//!
//! The walk state is the directed edge just traversed, `previous → current`.
//! Each step applies one of two transitions:
//! - `Bounce`: `current` is a leaf (one distinct neighbor, necessarily
//!   `previous`), so the walk reverses along the same edge.
//! - `Turn(k)`: leave `current` along the entry that follows `previous` in
//!   `current`'s angular order, `k` being that entry's position.
//!
//! On a symmetric rotation system both transitions map directed edges to
//! directed edges injectively, so the walk cycles through one face and comes
//! back to the start node within `directed_edge_count` steps. The step bound is
//! still checked; hitting it means the rotation system is malformed.

use super::rotation::RotationSystem;
use super::types::NodeIx;
use crate::geom::{next_index, normalize_angle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Bounce,
    Turn(usize),
}

/// Index-level walk failure; the finder turns it into a `FinderError` with ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WalkError {
    Isolated { node: NodeIx },
    /// `from` does not list `to` among its neighbors.
    MissingReverse { from: NodeIx, to: NodeIx },
    Diverged { start: NodeIx, steps: usize },
}

#[derive(Clone, Copy, Debug)]
struct WalkState {
    previous: NodeIx,
    current: NodeIx,
}

impl WalkState {
    fn transition(&self, rot: &RotationSystem) -> Result<Transition, WalkError> {
        let links = rot.unique_links(self.current);
        let missing = WalkError::MissingReverse {
            from: self.current,
            to: self.previous,
        };
        match links {
            [] => Err(WalkError::Isolated { node: self.current }),
            [only] if only.to == self.previous => Ok(Transition::Bounce),
            [_] => Err(missing),
            _ => {
                let back = links
                    .iter()
                    .position(|e| e.to == self.previous)
                    .ok_or(missing)?;
                Ok(Transition::Turn(next_index(back, links.len())))
            }
        }
    }

    fn apply(&mut self, rot: &RotationSystem, t: Transition) {
        match t {
            Transition::Bounce => {
                std::mem::swap(&mut self.previous, &mut self.current);
            }
            Transition::Turn(k) => {
                let next = rot.unique_links(self.current)[k].to;
                self.previous = self.current;
                self.current = next;
            }
        }
    }
}

/// First neighbor of `start` strictly counter-clockwise of `start_angle`,
/// wrapping to the lowest-angle neighbor. `None` only for a node without links.
pub(crate) fn first_hop(rot: &RotationSystem, start: NodeIx, start_angle: f64) -> Option<NodeIx> {
    let links = rot.links_by_angle(start);
    let theta = normalize_angle(start_angle);
    links
        .iter()
        .find(|e| e.angle > theta)
        .or_else(|| links.first())
        .map(|e| e.to)
}

/// Trace the face that the ray from `start` at `start_angle` points into.
///
/// Returns the visited nodes: the first is the node reached by the first hop,
/// the last is `start`.
pub(crate) fn trace_face(
    rot: &RotationSystem,
    start: NodeIx,
    start_angle: f64,
) -> Result<Vec<NodeIx>, WalkError> {
    let first = first_hop(rot, start, start_angle).ok_or(WalkError::Isolated { node: start })?;
    let mut state = WalkState {
        previous: start,
        current: first,
    };
    let mut poly = vec![first];
    let bound = rot.directed_edge_count();
    while state.current != start {
        if poly.len() > bound {
            return Err(WalkError::Diverged {
                start,
                steps: poly.len(),
            });
        }
        let t = state.transition(rot)?;
        state.apply(rot, t);
        poly.push(state.current);
    }
    Ok(poly)
}
