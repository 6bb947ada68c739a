use crate::fx::effects::{
    Biquad, Echo, Fuzz, Identity, NaturalEcho, RecursiveEcho, Reverb, Tremolo, Wah,
};
use crate::fx::{Effect, Processor, ProcessorConfig};

pub const IDENTITY_NAME: &str = "Identity";

/// Builds an effect for the given sample rate.
pub type Factory = fn(usize) -> Box<dyn Effect>;

/// One selectable effect. `priority` only orders the menu.
#[derive(Clone, Copy)]
pub struct Entry {
    pub priority: u32,
    pub name: &'static str,
    pub factory: Factory,
}

impl Entry {
    pub const fn new(priority: u32, name: &'static str, factory: Factory) -> Self {
        Self {
            priority,
            name,
            factory,
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("priority", &self.priority)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered effect catalog. Index 0 is always the identity effect; the rest
/// follow in ascending priority.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut catalog: Vec<Entry> = entries
            .into_iter()
            .filter(|e| e.name != IDENTITY_NAME)
            .collect();
        catalog.sort_by_key(|e| e.priority);

        let mut all = Vec::with_capacity(catalog.len() + 1);
        all.push(Entry::new(0, IDENTITY_NAME, |_| Box::new(Identity::new())));
        all.extend(catalog);

        Self { entries: all }
    }

    /// The built-in guitar effects.
    pub fn catalog() -> Self {
        Self::new([
            Entry::new(10, "Echo", |rate| Box::new(Echo::new(rate))),
            Entry::new(20, "RecursiveEcho", |rate| Box::new(RecursiveEcho::new(rate))),
            Entry::new(30, "NaturalEcho", |rate| Box::new(NaturalEcho::new(rate))),
            Entry::new(40, "Reverb", |rate| Box::new(Reverb::new(rate))),
            Entry::new(50, "Biquad", |_| Box::new(Biquad::new())),
            Entry::new(60, "Fuzz", |_| Box::new(Fuzz::new())),
            Entry::new(70, "Wah", |rate| Box::new(Wah::new(rate))),
            Entry::new(80, "Tremolo", |rate| Box::new(Tremolo::new(rate))),
        ])
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn name(&self, index: usize) -> Option<&'static str> {
        self.entries.get(index).map(|e| e.name)
    }

    pub fn priority(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|e| e.priority)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Case-insensitive lookup by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Build a fresh processor for `index`, or `None` if there is no such entry.
    pub fn construct(&self, index: usize, config: ProcessorConfig) -> Option<Processor> {
        let entry = self.entries.get(index)?;
        let effect = (entry.factory)(config.sample_rate);

        Some(Processor::new(entry.name, config, effect))
    }

    /// Build the pass-through processor held at index 0.
    pub fn construct_identity(&self, config: ProcessorConfig) -> Processor {
        self.construct(0, config)
            .unwrap_or_else(|| Processor::new(IDENTITY_NAME, config, Box::new(Identity::new())))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::Sample;

    fn config() -> ProcessorConfig {
        ProcessorConfig::new(16_000, 1).unwrap()
    }

    #[test]
    fn catalog_has_identity_first() {
        let registry = Registry::catalog();
        assert_eq!(registry.count(), 9);
        assert_eq!(registry.name(0), Some(IDENTITY_NAME));

        let processor = registry.construct(0, config()).unwrap();
        assert_eq!(processor.name(), IDENTITY_NAME);
        assert_eq!(processor.max_delay(), 1);

        let identity = registry.construct_identity(config());
        assert_eq!(identity.name(), IDENTITY_NAME);
        assert_eq!(identity.config(), config());
    }

    #[test]
    fn catalog_is_sorted_by_priority() {
        let registry = Registry::catalog();
        let priorities: Vec<u32> = (0..registry.count())
            .map(|i| registry.priority(i).unwrap())
            .collect();
        assert!(priorities.windows(2).all(|w| w[0] < w[1]));

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "Identity",
                "Echo",
                "RecursiveEcho",
                "NaturalEcho",
                "Reverb",
                "Biquad",
                "Fuzz",
                "Wah",
                "Tremolo"
            ]
        );
    }

    #[test]
    fn ordering_ignores_insertion_order() {
        let registry = Registry::new([
            Entry::new(80, "Tremolo", |rate| Box::new(Tremolo::new(rate))),
            Entry::new(10, "Echo", |rate| Box::new(Echo::new(rate))),
            Entry::new(60, "Fuzz", |_| Box::new(Fuzz::new())),
            Entry::new(0, IDENTITY_NAME, |_| Box::new(Fuzz::new())),
        ]);

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["Identity", "Echo", "Fuzz", "Tremolo"]);

        // A caller-supplied "Identity" never displaces the built-in one.
        let mut identity = registry.construct(0, config()).unwrap();
        let big: Sample = 1.0e9;
        assert_eq!(identity.process(big), big);
    }

    #[test]
    fn out_of_range_index_constructs_nothing() {
        let registry = Registry::catalog();
        assert!(registry.construct(registry.count(), config()).is_none());
        assert!(registry.name(99).is_none());
    }

    #[test]
    fn index_of_is_case_insensitive() {
        let registry = Registry::catalog();
        assert_eq!(registry.index_of("wah"), Some(7));
        assert_eq!(registry.index_of("IDENTITY"), Some(0));
        assert_eq!(registry.index_of("flanger"), None);
    }

    #[test]
    fn every_effect_is_silent_on_silence() {
        let registry = Registry::catalog();
        for index in 0..registry.count() {
            let mut processor = registry.construct(index, config()).unwrap();
            for n in 0..20_000 {
                let out = processor.process(0.0);
                assert_eq!(out, 0.0, "{} produced {out} at sample {n}", processor.name());
            }
        }
    }
}
