//! Output projector.
//!
//! Turns the merged context into the single text an invocation prints.
//! An expression that resolves to nothing prints nothing; one that resolves
//! to an empty mapping prints `{}`.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::PathBuf;
use tracing::debug;

use crate::error::Result;
use crate::template::TemplateEngine;
use crate::vars::ConfigContext;

/// What to print
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Request {
    /// Nothing
    #[default]
    None,
    /// One expression, raw
    Var(String),
    /// One expression, as JSON
    VarJson(String),
    /// The whole context, as JSON
    PrintData,
    /// Templates rendered in order, outputs concatenated
    Templates(Vec<PathBuf>),
}

/// Renders a [`Request`] against a context
pub struct Projector<'e, 's> {
    engine: &'e TemplateEngine<'s>,
    json_indent: usize,
}

impl<'e, 's> Projector<'e, 's> {
    pub fn new(engine: &'e TemplateEngine<'s>, json_indent: usize) -> Self {
        Self {
            engine,
            json_indent,
        }
    }

    pub fn project(&self, request: &'s Request, context: &ConfigContext) -> Result<String> {
        match request {
            Request::None => Ok(String::new()),
            Request::Var(expr) => {
                let value = self.engine.eval(expr, context)?;
                if value.is_undefined() {
                    debug!(expr = %expr, "expression resolved to nothing");
                    return Ok(String::new());
                }
                Ok(format!("{}\n", value))
            }
            Request::VarJson(expr) => {
                let value = self.engine.eval(expr, context)?;
                if value.is_undefined() {
                    debug!(expr = %expr, "expression resolved to nothing");
                    return Ok(String::new());
                }
                // Through serde_json::Value so mapping keys come out sorted.
                let json = serde_json::to_value(&value)?;
                Ok(format!("{}\n", to_json(&json, self.json_indent)?))
            }
            Request::PrintData => {
                let json = serde_json::to_value(context)?;
                Ok(format!("{}\n", to_json(&json, self.json_indent)?))
            }
            Request::Templates(paths) => paths
                .iter()
                .map(|path| self.engine.render_file(path, context))
                .collect(),
        }
    }
}

/// Pretty JSON with the configured indentation
pub fn to_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
