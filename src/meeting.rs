use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Distance, Vertex};

/// A vertex settled by one direction of a bidirectional search, together
/// with its accumulated distance from that direction's origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettledVertex {
    pub vertex: Vertex,
    pub distance: Distance,
}

impl SettledVertex {
    pub fn new(vertex: Vertex, distance: Distance) -> SettledVertex {
        SettledVertex { vertex, distance }
    }
}

/// Positions of the best meeting vertex in the forward and backward settled
/// sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeetingPoint {
    pub forward_index: usize,
    pub backward_index: usize,
}

/// Finds the position pair whose summed distance is minimal among all
/// vertices settled by both directions, or `None` if either sequence is
/// empty or no vertex is shared.
///
/// Both sequences must be strictly ascending by vertex and summed distances
/// must not overflow. Neither is checked in release builds.
///
/// When several shared vertices have the same summed distance, the one
/// reached first during the merge wins.
pub fn find_meeting_point(
    forward: &[SettledVertex],
    backward: &[SettledVertex],
) -> Option<MeetingPoint> {
    debug_assert_ascending(forward);
    debug_assert_ascending(backward);

    let mut meeting_point_and_distance: Option<(MeetingPoint, Distance)> = None;

    let mut forward_index = 0;
    let mut backward_index = 0;

    while forward_index < forward.len() && backward_index < backward.len() {
        let forward_entry = forward[forward_index];
        let backward_entry = backward[backward_index];

        match forward_entry.vertex.cmp(&backward_entry.vertex) {
            Ordering::Less => forward_index += 1,
            Ordering::Equal => {
                let current_distance = meeting_point_and_distance
                    .map(|(_meeting_point, distance)| distance)
                    .unwrap_or(Distance::MAX);
                let alternative_distance = forward_entry.distance + backward_entry.distance;
                if alternative_distance < current_distance {
                    meeting_point_and_distance = Some((
                        MeetingPoint {
                            forward_index,
                            backward_index,
                        },
                        alternative_distance,
                    ));
                }

                forward_index += 1;
                backward_index += 1;
            }
            Ordering::Greater => backward_index += 1,
        }
    }

    meeting_point_and_distance.map(|(meeting_point, _distance)| meeting_point)
}

/// Branch-free alternative to [`find_meeting_point`], returning the same
/// result for every input.
///
/// The merge loop advances its cursors and updates the running best with
/// mask arithmetic instead of data-dependent conditional control flow, so
/// the executed instruction stream does not depend on where the matches
/// occur. Same preconditions as [`find_meeting_point`].
pub fn find_meeting_point_branchless(
    forward: &[SettledVertex],
    backward: &[SettledVertex],
) -> Option<MeetingPoint> {
    debug_assert_ascending(forward);
    debug_assert_ascending(backward);

    // Distances are widened to u64 so a real sum never collides with the
    // u64::MAX sentinel.
    let mut best_distance = u64::MAX;
    let mut best_forward_index = 0;
    let mut best_backward_index = 0;

    let mut forward_index = 0;
    let mut backward_index = 0;

    while forward_index < forward.len() && backward_index < backward.len() {
        let forward_entry = forward[forward_index];
        let backward_entry = backward[backward_index];

        let less = (forward_entry.vertex < backward_entry.vertex) as usize;
        let greater = (forward_entry.vertex > backward_entry.vertex) as usize;
        let equal = 1 - less - greater;

        let alternative_distance = forward_entry.distance as u64 + backward_entry.distance as u64;

        // All-ones when this entry pair improves the running best, all-zeros
        // otherwise. Strictly-less keeps the first equal-distance candidate.
        let improved = equal as u64 & (alternative_distance < best_distance) as u64;
        let select = improved.wrapping_neg();
        let select_index = select as usize;

        best_distance = (alternative_distance & select) | (best_distance & !select);
        best_forward_index = (forward_index & select_index) | (best_forward_index & !select_index);
        best_backward_index =
            (backward_index & select_index) | (best_backward_index & !select_index);

        forward_index += less + equal;
        backward_index += greater + equal;
    }

    (best_distance != u64::MAX).then(|| MeetingPoint {
        forward_index: best_forward_index,
        backward_index: best_backward_index,
    })
}

fn debug_assert_ascending(entries: &[SettledVertex]) {
    debug_assert!(
        entries
            .windows(2)
            .all(|window| window[0].vertex < window[1].vertex),
        "settled sequence is not strictly ascending"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(entries: &[(Vertex, Distance)]) -> Vec<SettledVertex> {
        entries
            .iter()
            .map(|&(vertex, distance)| SettledVertex::new(vertex, distance))
            .collect()
    }

    fn both_variants(
        forward: &[SettledVertex],
        backward: &[SettledVertex],
    ) -> Option<MeetingPoint> {
        let meeting_point = find_meeting_point(forward, backward);
        assert_eq!(
            meeting_point,
            find_meeting_point_branchless(forward, backward)
        );
        meeting_point
    }

    #[test]
    fn empty_input() {
        let backward = settled(&[(1, 3), (5, 2), (9, 1)]);

        assert_eq!(both_variants(&[], &backward), None);
        assert_eq!(both_variants(&backward, &[]), None);
        assert_eq!(both_variants(&[], &[]), None);
    }

    #[test]
    fn no_shared_vertex() {
        let forward = settled(&[(0, 4), (2, 1), (4, 9)]);
        let backward = settled(&[(1, 3), (3, 2), (5, 1), (7, 8)]);

        assert_eq!(both_variants(&forward, &backward), None);
    }

    #[test]
    fn single_shared_vertex() {
        let forward = settled(&[(3, 1), (8, 2)]);
        let backward = settled(&[(8, 5), (20, 1)]);

        assert_eq!(
            both_variants(&forward, &backward),
            Some(MeetingPoint {
                forward_index: 1,
                backward_index: 0,
            })
        );
    }

    #[test]
    fn picks_smaller_sum_over_earlier_match() {
        let forward = settled(&[(2, 4), (5, 10), (9, 7)]);
        let backward = settled(&[(1, 3), (5, 2), (9, 1), (12, 30)]);

        // Vertex 5 meets with 10 + 2 = 12, vertex 9 with 7 + 1 = 8.
        assert_eq!(
            both_variants(&forward, &backward),
            Some(MeetingPoint {
                forward_index: 2,
                backward_index: 2,
            })
        );
    }

    #[test]
    fn equal_sums_keep_first_match() {
        let forward = settled(&[(1, 5), (4, 7)]);
        let backward = settled(&[(1, 10), (4, 8)]);

        // Both shared vertices sum to 15; the merge reaches vertex 1 first.
        assert_eq!(
            both_variants(&forward, &backward),
            Some(MeetingPoint {
                forward_index: 0,
                backward_index: 0,
            })
        );
    }

    #[test]
    fn unbalanced_lengths_stay_in_bounds() {
        let forward = settled(&[(7, 1)]);
        let backward = settled(&[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]);

        assert_eq!(both_variants(&forward, &backward), None);
        assert_eq!(both_variants(&backward, &forward), None);

        // Match on the very last entry of both sequences.
        let forward = settled(&[(2, 3), (9, 4)]);
        let backward = settled(&[(9, 6)]);
        assert_eq!(
            both_variants(&forward, &backward),
            Some(MeetingPoint {
                forward_index: 1,
                backward_index: 0,
            })
        );
    }
}
