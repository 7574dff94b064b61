use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    meeting::{find_meeting_point, MeetingPoint, SettledVertex},
    utility::get_progressbar,
    Distance, Vertex,
};

/// The vertices settled by one direction of a bidirectional search, ordered
/// by vertex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSolution {
    entries: Vec<SettledVertex>,
}

impl PartialSolution {
    /// Builds a partial solution from settled vertices in any order.
    pub fn from_settled(entries: Vec<SettledVertex>) -> PartialSolution {
        let entries = entries
            .into_iter()
            .sorted_unstable_by_key(|entry| entry.vertex)
            .collect_vec();
        debug_assert_unique(&entries);

        PartialSolution { entries }
    }

    /// Builds a partial solution from entries already ascending by vertex.
    pub fn from_sorted(entries: Vec<SettledVertex>) -> PartialSolution {
        debug_assert_unique(&entries);

        PartialSolution { entries }
    }

    pub fn entries(&self) -> &[SettledVertex] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn vertex(&self, index: usize) -> Vertex {
        self.entries[index].vertex
    }

    pub fn distance(&self, index: usize) -> Distance {
        self.entries[index].distance
    }
}

fn debug_assert_unique(entries: &[SettledVertex]) {
    debug_assert!(
        entries
            .windows(2)
            .all(|window| window[0].vertex < window[1].vertex),
        "two settled entries for the same vertex?!"
    );
}

/// Upward and downward partial solutions rooted at a single query endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpDownPair {
    pub up: PartialSolution,
    pub down: PartialSolution,
}

impl UpDownPair {
    pub fn new(up: PartialSolution, down: PartialSolution) -> UpDownPair {
        UpDownPair { up, down }
    }

    /// Locates the best meeting point of the two solutions.
    pub fn meeting(&self) -> Option<MeetingPoint> {
        find_meeting_point(self.up.entries(), self.down.entries())
    }

    /// Resolves the meeting point to its vertex and the full up-plus-down
    /// distance.
    pub fn meeting_vertex_and_distance(&self) -> Option<(Vertex, Distance)> {
        let meeting_point = self.meeting()?;

        let vertex = self.up.vertex(meeting_point.forward_index);
        let distance = self.up.distance(meeting_point.forward_index)
            + self.down.distance(meeting_point.backward_index);

        Some((vertex, distance))
    }
}

/// Resolves many independent queries in parallel.
pub fn meeting_distances(pairs: &[UpDownPair]) -> Vec<Option<(Vertex, Distance)>> {
    pairs
        .par_iter()
        .progress_with(get_progressbar(
            "Merging up and down solutions",
            pairs.len() as u64,
        ))
        .map(|pair| pair.meeting_vertex_and_distance())
        .collect()
}
