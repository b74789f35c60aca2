// src/models.rs

//! Declarative metadata attached to tools, commands and option properties.
//!
//! Everything here is read-only at runtime. Tool descriptors are `static` values
//! built with `const` builders; option schemas are registration tables built once
//! per options type (see `tools::cargo` for the pattern).

use crate::core::options::Options;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Custom value-to-string conversion for a property. Receives the raw stored value
/// (one element at a time for collections) and the property definition.
pub type Formatter = fn(&Value, &PropertyDef) -> String;

/// Tool-level escaping applied to every substituted value.
pub type EscapeHook = fn(&str) -> String;

/// Tool-level executable lookup, consulted before the descriptor's own strategy.
pub type ToolPathProvider = fn(&Options) -> Option<PathBuf>;

/// Structural shape a property is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// A single value.
    Scalar,
    /// An ordered list of values.
    Sequence,
    /// String keys to single values.
    Map,
    /// String keys to lists of values.
    #[serde(rename = "multimap")]
    MultiMap,
}

impl Shape {
    /// Lowercase name used in errors and schema descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
            Shape::Map => "map",
            Shape::MultiMap => "multimap",
        }
    }
}

/// Element type of a property (the value type for maps and multimaps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Text.
    String,
    /// `true` or `false`; flag formats render only when `true`.
    Bool,
    /// A whole number.
    Integer,
    /// A floating point number.
    Float,
    /// A filesystem path, stored as text.
    Path,
}

/// How a property turns into argument tokens.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentRule {
    /// Format template, e.g. `--param {key}={value}`.
    pub format: &'static str,
    /// Positive renders first, negative last, zero in store order.
    pub position: i32,
    /// Joins sequence items (or map entries) into one token.
    pub list_separator: Option<&'static str>,
    /// Joins the values of one multimap key.
    pub item_separator: Option<&'static str>,
    /// Replaces the default value conversion.
    pub formatter: Option<Formatter>,
}

impl ArgumentRule {
    /// A rule with the given format and no other settings.
    pub const fn new(format: &'static str) -> Self {
        Self {
            format,
            position: 0,
            list_separator: None,
            item_separator: None,
            formatter: None,
        }
    }

    /// Sets the position.
    pub const fn position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Sets the list separator.
    pub const fn list_separator(mut self, separator: &'static str) -> Self {
        self.list_separator = Some(separator);
        self
    }

    /// Sets the item separator.
    pub const fn item_separator(mut self, separator: &'static str) -> Self {
        self.item_separator = Some(separator);
        self
    }

    /// Sets a custom formatter.
    pub const fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

/// A declared property of an options type.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDef {
    /// Store key.
    pub key: &'static str,
    /// Declared shape.
    pub shape: Shape,
    /// Element type.
    pub kind: ValueKind,
    /// Present when the property renders to arguments.
    pub rule: Option<ArgumentRule>,
}

impl PropertyDef {
    /// A single-valued property.
    pub const fn scalar(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            shape: Shape::Scalar,
            kind,
            rule: None,
        }
    }

    /// A list property.
    pub const fn sequence(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            shape: Shape::Sequence,
            kind,
            rule: None,
        }
    }

    /// A map property.
    pub const fn map(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            shape: Shape::Map,
            kind,
            rule: None,
        }
    }

    /// A multimap property.
    pub const fn multi_map(key: &'static str, kind: ValueKind) -> Self {
        Self {
            key,
            shape: Shape::MultiMap,
            kind,
            rule: None,
        }
    }

    /// Attaches an argument rule, making the property rendered.
    pub const fn argument(mut self, rule: ArgumentRule) -> Self {
        self.rule = Some(rule);
        self
    }
}

/// How a descriptor locates its executable when nothing earlier in the chain did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStrategy {
    /// Look the executable names up on `PATH`.
    SearchPath,
    /// Look inside the configured packages directory for the descriptor's package.
    Package,
    /// The tool can only be located by overrides or providers.
    Unresolvable,
}

/// Identity of an invokable tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    /// Declared type name, e.g. `CargoTasks`. Drives the `<NAME>_EXE` env override.
    pub type_name: &'static str,
    /// Package holding the executable, for [`PathStrategy::Package`].
    pub package_id: Option<&'static str>,
    /// Candidate executable names, tried in order.
    pub executables: &'static [&'static str],
    /// Emitted first, as one token.
    pub implicit_arguments: Option<&'static str>,
    /// Applied to every substituted value.
    pub escape: Option<EscapeHook>,
    /// Custom lookup, consulted before `strategy`.
    pub tool_path_provider: Option<ToolPathProvider>,
    /// Store key holding the target framework used by package lookups.
    pub framework_property: Option<&'static str>,
    /// Last-resort lookup.
    pub strategy: PathStrategy,
}

impl ToolDescriptor {
    /// A `PATH`-searching descriptor with no executables yet.
    pub const fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            package_id: None,
            executables: &[],
            implicit_arguments: None,
            escape: None,
            tool_path_provider: None,
            framework_property: None,
            strategy: PathStrategy::SearchPath,
        }
    }

    /// Sets the executable names.
    pub const fn executables(mut self, names: &'static [&'static str]) -> Self {
        self.executables = names;
        self
    }

    /// Switches the descriptor to package lookups for `package_id`.
    pub const fn package(mut self, package_id: &'static str) -> Self {
        self.package_id = Some(package_id);
        self.strategy = PathStrategy::Package;
        self
    }

    /// Sets the tool's implicit arguments.
    pub const fn implicit_arguments(mut self, arguments: &'static str) -> Self {
        self.implicit_arguments = Some(arguments);
        self
    }

    /// Sets the escape hook.
    pub const fn escape(mut self, hook: EscapeHook) -> Self {
        self.escape = Some(hook);
        self
    }

    /// Sets the tool path provider.
    pub const fn tool_path_provider(mut self, provider: ToolPathProvider) -> Self {
        self.tool_path_provider = Some(provider);
        self
    }

    /// Sets the store key read for the target framework.
    pub const fn framework_property(mut self, key: &'static str) -> Self {
        self.framework_property = Some(key);
        self
    }

    /// Sets the path strategy.
    pub const fn strategy(mut self, strategy: PathStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Name without the conventional `Tasks` suffix, e.g. `Cargo`.
    pub fn short_name(&self) -> &'static str {
        self.type_name
            .strip_suffix(crate::constants::TOOL_TYPE_SUFFIX)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.type_name)
    }
}

/// Links an options type to the tool it drives.
#[derive(Debug, Clone, Copy)]
pub struct CommandBinding {
    /// The tool invoked.
    pub tool: &'static ToolDescriptor,
    /// Command words after the tool's own implicit arguments, e.g. `build`.
    pub implicit_arguments: Option<&'static str>,
}

impl CommandBinding {
    /// A binding with no implicit arguments.
    pub const fn new(tool: &'static ToolDescriptor) -> Self {
        Self {
            tool,
            implicit_arguments: None,
        }
    }

    /// Sets the command words.
    pub const fn implicit_arguments(mut self, arguments: &'static str) -> Self {
        self.implicit_arguments = Some(arguments);
        self
    }
}

/// The registration table of an options type.
#[derive(Debug, Clone)]
pub struct OptionsSchema {
    /// Name of the options type.
    pub type_name: &'static str,
    /// The tool this type drives; rendering and resolving require it.
    pub binding: Option<CommandBinding>,
    /// Declared properties, in declaration order.
    pub properties: Vec<PropertyDef>,
}

impl OptionsSchema {
    /// An empty, unbound table.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            binding: None,
            properties: Vec::new(),
        }
    }

    /// Binds the table to a command.
    pub fn bind(mut self, binding: CommandBinding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Declares one more property.
    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Finds the declaration of `key`.
    pub fn find(&self, key: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Shape description of every declared key, in declaration order.
    ///
    /// This is the document external schema generators consume.
    pub fn describe(&self) -> Value {
        let properties: Vec<Value> = self
            .properties
            .iter()
            .map(|p| {
                json!({
                    "key": p.key,
                    "shape": p.shape,
                    "kind": p.kind,
                    "argument": p.rule.map(|r| json!({
                        "format": r.format,
                        "position": r.position,
                        "listSeparator": r.list_separator,
                        "itemSeparator": r.item_separator,
                        "customFormatter": r.formatter.is_some(),
                    })),
                })
            })
            .collect();

        json!({
            "type": self.type_name,
            "tool": self.binding.map(|b| b.tool.type_name),
            "properties": properties,
        })
    }
}
