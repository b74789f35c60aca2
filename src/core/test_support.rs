// src/core/test_support.rs

//! Fixture options type shared by the unit tests.

use crate::core::options::Options;
use crate::core::tool_options::ToolOptions;
use crate::models::{
    ArgumentRule, CommandBinding, OptionsSchema, PropertyDef, ToolDescriptor, ValueKind,
};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const FIRST: &str = "First";
pub(crate) const SECOND: &str = "Second";
pub(crate) const MIDDLE: &str = "Middle";
pub(crate) const SECOND_LAST: &str = "SecondLast";
pub(crate) const LAST: &str = "Last";
pub(crate) const FLAG: &str = "Flag";
pub(crate) const TOGGLE: &str = "Toggle";
pub(crate) const VERBOSITY: &str = "Verbosity";
pub(crate) const CONFIGURATION: &str = "Configuration";
pub(crate) const ITEMS: &str = "Items";
pub(crate) const JOINED: &str = "Joined";
pub(crate) const DICT: &str = "Dict";
pub(crate) const PROPERTIES: &str = "Properties";
pub(crate) const LOOKUP: &str = "Lookup";
pub(crate) const LOGGERS: &str = "Loggers";
pub(crate) const LEVEL: &str = "Level";
pub(crate) const NOTE: &str = "Note";

pub(crate) static ECHO: ToolDescriptor = ToolDescriptor::new("EchoTasks").executables(&["echo"]);

fn format_level(value: &Value, _property: &PropertyDef) -> String {
    format!("level-{}", value)
}

lazy_static! {
    static ref ECHO_SCHEMA: OptionsSchema = OptionsSchema::new("EchoSettings")
        .bind(CommandBinding::new(&ECHO))
        .property(
            PropertyDef::scalar(FIRST, ValueKind::String)
                .argument(ArgumentRule::new("{value}").position(1))
        )
        .property(
            PropertyDef::scalar(SECOND, ValueKind::String)
                .argument(ArgumentRule::new("{value}").position(2))
        )
        .property(PropertyDef::scalar(MIDDLE, ValueKind::String).argument(ArgumentRule::new("{value}")))
        .property(
            PropertyDef::scalar(SECOND_LAST, ValueKind::String)
                .argument(ArgumentRule::new("{value}").position(-2))
        )
        .property(
            PropertyDef::scalar(LAST, ValueKind::String)
                .argument(ArgumentRule::new("{value}").position(-1))
        )
        .property(PropertyDef::scalar(FLAG, ValueKind::Bool).argument(ArgumentRule::new("--flag")))
        .property(
            PropertyDef::scalar(TOGGLE, ValueKind::Bool).argument(ArgumentRule::new("--toggle={value}"))
        )
        .property(
            PropertyDef::scalar(VERBOSITY, ValueKind::Integer).argument(ArgumentRule::new("-v:{value}"))
        )
        .property(
            PropertyDef::scalar(CONFIGURATION, ValueKind::String)
                .argument(ArgumentRule::new("--configuration {value}"))
        )
        .property(
            PropertyDef::sequence(ITEMS, ValueKind::String)
                .argument(ArgumentRule::new("--param {value}"))
        )
        .property(
            PropertyDef::sequence(JOINED, ValueKind::String)
                .argument(ArgumentRule::new("--joined {value}").list_separator(","))
        )
        .property(
            PropertyDef::map(DICT, ValueKind::String)
                .argument(ArgumentRule::new("--param {key}={value}"))
        )
        .property(
            PropertyDef::map(PROPERTIES, ValueKind::String)
                .argument(ArgumentRule::new("-p:{key}={value}").item_separator(";"))
        )
        .property(
            PropertyDef::multi_map(LOOKUP, ValueKind::String)
                .argument(ArgumentRule::new("--lookup {key}={value}"))
        )
        .property(
            PropertyDef::multi_map(LOGGERS, ValueKind::String)
                .argument(ArgumentRule::new("--logger:{key};{value}").list_separator(";"))
        )
        .property(
            PropertyDef::scalar(LEVEL, ValueKind::Integer)
                .argument(ArgumentRule::new("--level {value}").formatter(format_level))
        )
        .property(PropertyDef::scalar(NOTE, ValueKind::String));
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct EchoSettings(Options);

impl ToolOptions for EchoSettings {
    fn options(&self) -> &Options {
        &self.0
    }

    fn options_mut(&mut self) -> &mut Options {
        &mut self.0
    }

    fn schema() -> &'static OptionsSchema {
        &ECHO_SCHEMA
    }
}
