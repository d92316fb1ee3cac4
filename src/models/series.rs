use serde::{Deserialize, Serialize};

/// Simulated state values, one per record of the source table, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedSeries {
    pub values: Vec<f64>,
}

impl SimulatedSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Last simulated value.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

impl From<Vec<f64>> for SimulatedSeries {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}
