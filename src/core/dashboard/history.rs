use std::collections::VecDeque;

const DEFAULT_SERIES_CAPACITY: usize = 60;

/// One chart point: a short time label and its value
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Sliding window of chart points, oldest dropped first
#[derive(Debug, Clone)]
pub struct BoundedSeries {
    capacity: usize,
    points: VecDeque<SeriesPoint>,
}

impl BoundedSeries {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SERIES_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push<S: Into<String>>(&mut self, label: S, value: f64) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(SeriesPoint {
            label: label.into(),
            value,
        });
    }

    /// Change the window size, dropping the oldest points if it shrinks
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn points(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// (x, y) pairs for a chart dataset, x being the point's position in the window
    pub fn as_chart_data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value))
            .collect()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.points.front().map(|p| p.label.as_str())
    }

    pub fn last_label(&self) -> Option<&str> {
        self.points.back().map(|p| p.label.as_str())
    }
}

impl Default for BoundedSeries {
    fn default() -> Self {
        Self::new()
    }
}
