use std::collections::HashMap;

use super::reaction_network::pool::{Name, Pool};

/// The sampled concentration trajectory of every species in a network, plus
/// the matching sample times.
///
/// Every series and the time axis always have the same length, and the time
/// axis is strictly increasing starting at 0. The history is append-only
/// while simulating; only an `initialize` override resets a single series
/// back to one element.
#[derive(Debug, Clone)]
pub struct History {
    series: HashMap<Name, Vec<f64>>,
    time: Vec<f64>,
}

impl History {
    /// Starts a history with one entry per species equal to its current pool
    /// value, at time 0.
    pub(crate) fn new(pool: &Pool) -> Self {
        let mut series = HashMap::new();
        for species in pool.species() {
            series.insert(species.clone(), vec![pool.concentration(species)]);
        }

        Self {
            series,
            time: vec![0.0],
        }
    }

    /// Replaces one species' series with a single-element sequence
    pub(crate) fn reset_series(&mut self, species: &Name, concentration: f64) {
        self.series.insert(species.clone(), vec![concentration]);
    }

    /// Appends the current pool and elapsed time as one sample. A pool
    /// species without a series is a defect in the engine, not bad input.
    pub(crate) fn record(&mut self, pool: &Pool, time: f64) {
        for species in pool.species() {
            self.series
                .get_mut(species)
                .expect("pool species missing from the history")
                .push(pool.concentration(species));
        }
        self.time.push(time);
    }

    /// Concentration samples for one species, oldest first
    pub fn get_series(&self, species: &Name) -> Option<&[f64]> {
        self.series.get(species).map(Vec::as_slice)
    }

    /// Sample times, strictly increasing from 0
    pub fn get_time(&self) -> &[f64] {
        &self.time
    }

    /// Number of samples, the initial state included
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Species names sorted for stable presentation
    pub fn sorted_species(&self) -> Vec<&Name> {
        let mut names: Vec<&Name> = self.series.keys().collect();
        names.sort();
        names
    }
}
