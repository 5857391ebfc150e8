//! Command bundles and the registry built from them.
//!
//! A registry is an ordered list of bundles. Lookups scan the bundles in
//! order, so a name defined by an earlier bundle hides the same name in a
//! later one.

use super::definitions::Command;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named, described group of commands.
#[derive(Clone)]
pub struct Bundle {
    description: String,
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl Bundle {
    /// Creates an empty bundle.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commands: BTreeMap::new(),
        }
    }

    /// Adds a command, replacing any earlier one with the same name.
    pub fn with(mut self, name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        self.insert(name, command);
        self
    }

    /// Adds a command, replacing any earlier one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, command: Arc<dyn Command>) {
        self.commands.insert(name.into(), command);
    }

    /// Human-readable description used as the help heading.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Looks up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.commands.get(name)
    }

    /// Commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Arc<dyn Command>)> {
        self.commands.iter().map(|(name, cmd)| (name.as_str(), cmd))
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if the bundle has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("description", &self.description)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A source of commands, e.g. a plugin.
pub trait CommandProvider {
    /// Description of the bundle this provider contributes.
    fn description(&self) -> String;

    /// Commands in the order the provider defines them.
    fn commands(&self) -> Vec<(String, Arc<dyn Command>)>;
}

/// Ordered collection of bundles used to resolve command names.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    bundles: Vec<Bundle>,
}

impl CommandRegistry {
    /// Creates a registry from bundles in priority order.
    pub fn from_bundles(bundles: Vec<Bundle>) -> Self {
        Self { bundles }
    }

    /// Creates a registry holding a single bundle.
    pub fn from_map(
        description: impl Into<String>,
        commands: impl IntoIterator<Item = (String, Arc<dyn Command>)>,
    ) -> Self {
        let mut bundle = Bundle::new(description);
        for (name, command) in commands {
            bundle.insert(name, command);
        }
        Self::from_bundles(vec![bundle])
    }

    /// Builds one bundle per provider, keeping the providers' order.
    ///
    /// Within a provider a later duplicate name replaces an earlier one.
    pub fn discover<'a, I>(providers: I) -> Self
    where
        I: IntoIterator<Item = &'a dyn CommandProvider>,
    {
        let bundles = providers
            .into_iter()
            .map(|provider| {
                let mut bundle = Bundle::new(provider.description());
                for (name, command) in provider.commands() {
                    bundle.insert(name, command);
                }
                bundle
            })
            .collect();
        Self::from_bundles(bundles)
    }

    /// Appends a bundle with the lowest priority.
    pub fn push(&mut self, bundle: Bundle) {
        self.bundles.push(bundle);
    }

    /// Bundles in priority order.
    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    /// Finds a command. The first bundle that defines `name` wins.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.bundles.iter().find_map(|bundle| bundle.get(name))
    }

    /// The effective command set: every visible name in name order.
    pub fn commands(&self) -> BTreeMap<&str, &Arc<dyn Command>> {
        let mut merged = BTreeMap::new();
        for bundle in &self.bundles {
            for (name, command) in bundle.commands() {
                merged.entry(name).or_insert(command);
            }
        }
        merged
    }

    /// Returns true if no bundle contains any command.
    pub fn is_empty(&self) -> bool {
        self.bundles.iter().all(Bundle::is_empty)
    }
}
