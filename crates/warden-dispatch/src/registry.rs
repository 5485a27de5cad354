//! The immutable command registry and the reflective help surface.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::command::CommandSpec;
use crate::error::RegistryError;
use crate::provider::CapabilityProvider;

/// A registered command: its declaration plus the provider that executes it.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// The command declaration.
    pub spec: CommandSpec,
    /// The provider bound at registration.
    pub provider: Arc<dyn CapabilityProvider>,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Immutable name -> descriptor map built once at startup.
///
/// Duplicate names and malformed names are fatal configuration errors at
/// construction, never runtime errors.
pub struct CommandRegistry {
    commands: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    /// Build the registry by enumerating every provider's declarations.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateCommand`] when two declarations collide,
    /// [`RegistryError::InvalidName`] when a name is not `category.action`.
    pub fn new(providers: Vec<Arc<dyn CapabilityProvider>>) -> Result<Self, RegistryError> {
        let mut commands = HashMap::new();
        for provider in providers {
            for spec in provider.declarations() {
                let name = spec.name.clone();
                let (category, action) = name.split_once('.').unwrap_or(("", ""));
                if category.is_empty() || action.is_empty() {
                    return Err(RegistryError::InvalidName { name });
                }
                let descriptor = CommandDescriptor {
                    spec,
                    provider: Arc::clone(&provider),
                };
                if commands.insert(name.clone(), descriptor).is_some() {
                    return Err(RegistryError::DuplicateCommand { name });
                }
            }
        }
        tracing::debug!(count = commands.len(), "command registry built");
        Ok(Self { commands })
    }

    /// Resolve a command by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands.get(name)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All categories, sorted, deduplicated.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .commands
            .values()
            .map(|d| d.spec.category().to_string())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Declarations in one category, sorted by name.
    #[must_use]
    pub fn commands_in(&self, category: &str) -> Vec<&CommandSpec> {
        let mut specs: Vec<&CommandSpec> = self
            .commands
            .values()
            .map(|d| &d.spec)
            .filter(|s| s.category() == category)
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// The reflective discovery surface.
    ///
    /// - no topic: what categories exist
    /// - a category: what commands exist in it
    /// - a full command name: what parameters it takes
    ///
    /// Pure reflection over the descriptor map — no side effects, available
    /// even while the emergency stop is active. Returns `None` for an
    /// unknown topic.
    #[must_use]
    pub fn help(&self, topic: Option<&str>) -> Option<Value> {
        match topic {
            None => {
                let categories = self.categories();
                Some(json!({
                    "categories": categories,
                    "count": categories.len(),
                }))
            },
            Some(topic) if topic.contains('.') => self.get(topic).map(|descriptor| {
                let spec = &descriptor.spec;
                json!({
                    "name": spec.name,
                    "category": spec.category(),
                    "description": spec.description,
                    "mutating": spec.mutating,
                    "parameters": spec.params.iter().map(|p| json!({
                        "name": p.name,
                        "type": p.param_type,
                        "required": p.required,
                        "description": p.description,
                    })).collect::<Vec<_>>(),
                })
            }),
            Some(category) => {
                let specs = self.commands_in(category);
                if specs.is_empty() {
                    return None;
                }
                Some(json!({
                    "category": category,
                    "commands": specs.iter().map(|s| json!({
                        "name": s.name,
                        "description": s.description,
                        "mutating": s.mutating,
                    })).collect::<Vec<_>>(),
                    "count": specs.len(),
                }))
            },
        }
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{ParamSpec, ParamType};
    use crate::provider::{InvokeContext, ProviderError};
    use async_trait::async_trait;
    use serde_json::Map;

    struct FixedProvider {
        specs: Vec<CommandSpec>,
    }

    #[async_trait]
    impl CapabilityProvider for FixedProvider {
        fn declarations(&self) -> Vec<CommandSpec> {
            self.specs.clone()
        }

        async fn invoke(
            &self,
            _command: &str,
            _args: &Map<String, Value>,
            _ctx: &InvokeContext,
        ) -> Result<Value, ProviderError> {
            Ok(Value::Null)
        }
    }

    fn provider(specs: Vec<CommandSpec>) -> Arc<dyn CapabilityProvider> {
        Arc::new(FixedProvider { specs })
    }

    fn sample_registry() -> CommandRegistry {
        CommandRegistry::new(vec![
            provider(vec![
                CommandSpec::new("mouse.move", "Move the pointer")
                    .mutating()
                    .input_injecting()
                    .param(ParamSpec::required("x", ParamType::Integer, "X"))
                    .param(ParamSpec::required("y", ParamType::Integer, "Y")),
                CommandSpec::new("mouse.position", "Report pointer position"),
            ]),
            provider(vec![CommandSpec::new("shell.run", "Run a command")
                .mutating()
                .shell_like()
                .param(ParamSpec::required("command", ParamType::String, "Command line"))]),
        ])
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn test_duplicate_names_fatal() {
        let err = CommandRegistry::new(vec![
            provider(vec![CommandSpec::new("a.b", "one")]),
            provider(vec![CommandSpec::new("a.b", "two")]),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCommand { name } if name == "a.b"));
    }

    #[test]
    fn test_invalid_name_fatal() {
        for bad in ["noDot", "trailing.", ".leading"] {
            let err = CommandRegistry::new(vec![provider(vec![CommandSpec::new(bad, "bad")])])
                .unwrap_err();
            assert!(matches!(err, RegistryError::InvalidName { .. }), "{bad}");
        }
    }

    #[test]
    fn test_lookup_and_categories() {
        let registry = sample_registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("mouse.move").is_some());
        assert!(registry.get("mouse.teleport").is_none());
        assert_eq!(registry.categories(), vec!["mouse", "shell"]);
        assert_eq!(registry.commands_in("mouse").len(), 2);
    }

    // -----------------------------------------------------------------------
    // Help
    // -----------------------------------------------------------------------

    #[test]
    fn test_help_no_topic_lists_categories() {
        let help = sample_registry().help(None).unwrap();
        assert_eq!(help["count"], json!(2));
        assert_eq!(help["categories"], json!(["mouse", "shell"]));
    }

    #[test]
    fn test_help_category_lists_commands() {
        let help = sample_registry().help(Some("mouse")).unwrap();
        assert_eq!(help["count"], json!(2));
        assert_eq!(help["commands"][0]["name"], json!("mouse.move"));
        assert_eq!(help["commands"][0]["mutating"], json!(true));
    }

    #[test]
    fn test_help_command_lists_parameters() {
        let help = sample_registry().help(Some("mouse.move")).unwrap();
        assert_eq!(help["category"], json!("mouse"));
        assert_eq!(help["parameters"][0]["name"], json!("x"));
        assert_eq!(help["parameters"][0]["type"], json!("integer"));
        assert_eq!(help["parameters"][0]["required"], json!(true));
    }

    #[test]
    fn test_help_unknown_topic() {
        let registry = sample_registry();
        assert!(registry.help(Some("gamepad")).is_none());
        assert!(registry.help(Some("mouse.teleport")).is_none());
    }
}
