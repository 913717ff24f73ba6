//! Plugin registry for weir
//!
//! Maps configuration-supplied type names to plugin constructors, so pipeline
//! construction never touches a concrete plugin type. The registry is an
//! explicit object, populated during a defined initialization phase and
//! passed by reference into the pipeline builder; once registration is
//! complete, lookups are pure reads and entries are never removed.

use crate::error::{Result, WeirError};
use crate::input::{Input, StdinInput};
use crate::output::{NullOutput, Output, StdoutOutput};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Constructor turning a config block into an input instance
pub type InputConstructor = Box<dyn Fn(&Value) -> Result<Box<dyn Input>> + Send + Sync>;

/// Constructor turning a config block into an output instance
pub type OutputConstructor = Box<dyn Fn(&Value) -> Result<Box<dyn Output>> + Send + Sync>;

/// Registry of input and output plugin constructors
///
/// Registering the same name twice is a configuration error: silently
/// overwriting a constructor would make the winning plugin depend on module
/// initialization order.
pub struct PluginRegistry {
    inputs: HashMap<String, InputConstructor>,
    outputs: HashMap<String, OutputConstructor>,
}

impl PluginRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    /// Create a registry with the built-in plugins registered
    ///
    /// Inputs: `stdin`. Outputs: `stdout`, `null`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        // Registration of compiled-in names cannot collide.
        let _ = registry.register_input("stdin", Box::new(StdinInput::from_config));
        let _ = registry.register_output("stdout", Box::new(StdoutOutput::from_config));
        let _ = registry.register_output("null", Box::new(NullOutput::from_config));
        registry
    }

    /// Register an input constructor under `name`
    pub fn register_input(
        &mut self,
        name: impl Into<String>,
        constructor: InputConstructor,
    ) -> Result<()> {
        let name = name.into();
        if self.inputs.contains_key(&name) {
            return Err(WeirError::Config(format!(
                "input type '{name}' registered twice"
            )));
        }
        info!(input = %name, "registered input type");
        self.inputs.insert(name, constructor);
        Ok(())
    }

    /// Register an output constructor under `name`
    pub fn register_output(
        &mut self,
        name: impl Into<String>,
        constructor: OutputConstructor,
    ) -> Result<()> {
        let name = name.into();
        if self.outputs.contains_key(&name) {
            return Err(WeirError::Config(format!(
                "output type '{name}' registered twice"
            )));
        }
        info!(output = %name, "registered output type");
        self.outputs.insert(name, constructor);
        Ok(())
    }

    /// Whether an input type is registered
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Whether an output type is registered
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Construct an input of type `name` from `config`
    ///
    /// An unregistered name is a configuration error.
    pub fn build_input(&self, name: &str, config: &Value) -> Result<Box<dyn Input>> {
        let constructor = self
            .inputs
            .get(name)
            .ok_or_else(|| WeirError::Config(format!("unknown input type '{name}'")))?;
        constructor(config)
    }

    /// Construct an output of type `name` from `config`
    ///
    /// An unregistered name is a configuration error.
    pub fn build_output(&self, name: &str, config: &Value) -> Result<Box<dyn Output>> {
        let constructor = self
            .outputs
            .get(name)
            .ok_or_else(|| WeirError::Config(format!("unknown output type '{name}'")))?;
        constructor(config)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
