use std::collections::VecDeque;

use crate::records::PointRecord;

/// Landed points in arrival order, capped with oldest-first eviction.
#[derive(Debug, Clone)]
pub struct LandedPoints {
    cap: usize,
    points: VecDeque<PointRecord>,
}

impl LandedPoints {
    /// A `cap` of zero is treated as one.
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            cap,
            points: VecDeque::with_capacity(cap),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends `point`, returning whatever fell off the front.
    pub fn push(&mut self, point: PointRecord) -> Vec<PointRecord> {
        self.points.push_back(point);
        let overflow = self.points.len().saturating_sub(self.cap);
        self.points.drain(..overflow).collect()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PointRecord> + '_ {
        self.points.iter()
    }

    pub fn newest(&self) -> Option<&PointRecord> {
        self.points.back()
    }
}

impl<'a> IntoIterator for &'a LandedPoints {
    type Item = &'a PointRecord;
    type IntoIter = std::collections::vec_deque::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
