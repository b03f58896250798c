//! Handler group discovery
//!
//! [`ModuleTree`] models the module graph handler groups live in: module
//! paths are nodes holding exported groups plus edges to child modules or
//! aliases (which may point back up and form cycles). [`GroupCollector`]
//! walks it depth-first from one package and returns each group once.

use std::collections::{BTreeMap, HashSet};

use meete_domain::error::{Error, Result};
use tracing::debug;

use super::group::{GroupDescriptor, HANDLER_GROUPS, HandlerGroupEntry};
use crate::di::CapabilityKey;

const PATH_SEPARATOR: &str = "::";

/// Edge from a module to a module reachable under a name
#[derive(Debug, Clone)]
enum Edge {
    /// Declared child module
    Module,
    /// Alias naming another module anywhere in the tree
    Alias(String),
}

/// One module: its child edges and the groups it exports
///
/// Kept apart so a group named like a child module never hides it.
#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Edge>,
    groups: BTreeMap<String, &'static HandlerGroupEntry>,
}

/// Module graph holding handler group exports
#[derive(Debug, Default)]
pub struct ModuleTree {
    modules: BTreeMap<String, Node>,
}

impl ModuleTree {
    /// Empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree holding every group of [`HANDLER_GROUPS`]
    pub fn from_registry() -> Self {
        Self::from_entries(HANDLER_GROUPS.iter())
    }

    /// Tree exporting each entry under its name in its module
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'static HandlerGroupEntry>,
    {
        let mut tree = Self::new();
        for entry in entries {
            tree.export(entry.module, entry.name, entry);
        }
        tree
    }

    /// Add `path` and its ancestors
    pub fn add_module(&mut self, path: &str) -> &mut Self {
        let mut current = String::new();
        for part in path.split(PATH_SEPARATOR).filter(|part| !part.is_empty()) {
            let parent = current.clone();
            if !current.is_empty() {
                current.push_str(PATH_SEPARATOR);
            }
            current.push_str(part);
            self.modules.entry(current.clone()).or_default();
            if !parent.is_empty() {
                self.modules
                    .entry(parent)
                    .or_default()
                    .children
                    .entry(part.to_string())
                    .or_insert(Edge::Module);
            }
        }
        self
    }

    /// Export `entry` from `module` under `name`
    ///
    /// Exporting one group under several names or modules models a
    /// re-export.
    pub fn export(&mut self, module: &str, name: &str, entry: &'static HandlerGroupEntry) -> &mut Self {
        self.add_module(module);
        self.modules
            .entry(module.to_string())
            .or_default()
            .groups
            .insert(name.to_string(), entry);
        self
    }

    /// Make `target` reachable from `module` under `alias`
    pub fn link(&mut self, module: &str, alias: &str, target: &str) -> &mut Self {
        self.add_module(module);
        self.add_module(target);
        self.modules
            .entry(module.to_string())
            .or_default()
            .children
            .insert(alias.to_string(), Edge::Alias(target.to_string()));
        self
    }

    /// Whether `path` is a known module
    pub fn contains(&self, path: &str) -> bool {
        self.modules.contains_key(path)
    }
}

/// Depth-first collector of handler groups
#[derive(Debug, Clone, Default)]
pub struct GroupCollector {
    ignored_namespaces: Vec<String>,
}

impl GroupCollector {
    /// Collector skipping modules rooted in `ignored_namespaces`
    pub fn new<I, S>(ignored_namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_namespaces: ignored_namespaces.into_iter().map(Into::into).collect(),
        }
    }

    /// Every group reachable from `package`, each exactly once
    ///
    /// Order is depth-first: a module's own groups by name, then its
    /// children by name.
    pub fn collect(&self, tree: &ModuleTree, package: &str) -> Result<Vec<GroupDescriptor>> {
        if !tree.contains(package) {
            return Err(Error::not_found(format!("Handler package '{package}'")));
        }

        let mut visited = HashSet::new();
        let mut seen_handlers = HashSet::new();
        let mut groups = Vec::new();
        self.walk(tree, package, &mut visited, &mut seen_handlers, &mut groups)?;

        debug!(package, groups = groups.len(), "Handler groups collected");
        Ok(groups)
    }

    fn walk(
        &self,
        tree: &ModuleTree,
        module: &str,
        visited: &mut HashSet<String>,
        seen_handlers: &mut HashSet<CapabilityKey>,
        groups: &mut Vec<GroupDescriptor>,
    ) -> Result<()> {
        if self.is_ignored(module) || !visited.insert(module.to_string()) {
            return Ok(());
        }
        let Some(node) = tree.modules.get(module) else {
            return Ok(());
        };

        for entry in node.groups.values() {
            let descriptor = (entry.describe)()?;
            if seen_handlers.insert(descriptor.handler) {
                groups.push(descriptor);
            }
        }
        for (name, edge) in &node.children {
            let child = match edge {
                Edge::Module => format!("{module}{PATH_SEPARATOR}{name}"),
                Edge::Alias(target) => target.clone(),
            };
            self.walk(tree, &child, visited, seen_handlers, groups)?;
        }
        Ok(())
    }

    fn is_ignored(&self, module: &str) -> bool {
        let root = module.split(PATH_SEPARATOR).next().unwrap_or(module);
        self.ignored_namespaces.iter().any(|ignored| ignored == root)
    }
}
