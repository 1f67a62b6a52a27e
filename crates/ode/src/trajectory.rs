use serde::Serialize;

/// Location of a terminal event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventHit {
    pub t: f64,
    pub y: Vec<f64>,
}

/// Accepted integration samples: `t` strictly increasing, one state per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
    pub event: Option<EventHit>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Component `index` of every sample.
    pub fn series(&self, index: usize) -> Vec<f64> {
        self.y.iter().map(|state| state[index]).collect()
    }

    pub fn last_state(&self) -> Option<&[f64]> {
        self.y.last().map(Vec::as_slice)
    }

    pub fn last_time(&self) -> Option<f64> {
        self.t.last().copied()
    }

    /// |t_last − t_first|.
    pub fn span(&self) -> f64 {
        match (self.t.first(), self.t.last()) {
            (Some(a), Some(b)) => (b - a).abs(),
            _ => 0.0,
        }
    }

    /// Appends `other`, skipping its first sample when it repeats our last time.
    pub fn extend(&mut self, other: Trajectory) {
        let skip = match (self.t.last(), other.t.first()) {
            (Some(a), Some(b)) if b <= a => 1,
            _ => 0,
        };
        self.t.extend(other.t.into_iter().skip(skip));
        self.y.extend(other.y.into_iter().skip(skip));
        if other.event.is_some() {
            self.event = other.event;
        }
    }
}
