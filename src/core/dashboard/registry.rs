use std::time::Instant;

use super::probe::{Probe, ProbeId};

/// Ordered set of probes. Registration order is the refresh and resize order.
#[derive(Default)]
pub struct ProbeRegistry {
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, probe: Box<dyn Probe>) -> ProbeId {
        let id = ProbeId(self.probes.len());
        log::debug!("Registered probe '{}' as {:?}", probe.name(), id);
        self.probes.push(probe);
        id
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn get(&self, id: ProbeId) -> Option<&dyn Probe> {
        self.probes.get(id.0).map(|p| p.as_ref())
    }

    pub fn find(&self, name: &str) -> Option<ProbeId> {
        self.probes.iter().position(|p| p.name() == name).map(ProbeId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProbeId, &dyn Probe)> {
        self.probes
            .iter()
            .enumerate()
            .map(|(i, p)| (ProbeId(i), p.as_ref()))
    }

    /// Refresh every probe in registration order
    pub fn refresh_all(&mut self, now: Instant) {
        for probe in &mut self.probes {
            probe.refresh(now);
        }
    }

    /// Resize every probe in registration order, each with its own slot width
    pub fn resize_all<F>(&mut self, height: u16, mut slot_width: F)
    where
        F: FnMut(ProbeId) -> u16,
    {
        for (i, probe) in self.probes.iter_mut().enumerate() {
            probe.on_resize(slot_width(ProbeId(i)), height);
        }
    }
}
