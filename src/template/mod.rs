//! Template environment.
//!
//! One minijinja [`Environment`] serves both `-t` rendering and `-v`
//! expression evaluation, so filters and undefined handling behave the same
//! in both.

pub mod filters;

use minijinja::{Environment, UndefinedBehavior, Value};
use std::error::Error as _;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::config::{TemplatesConfig, UndefinedMode};
use crate::error::{read_source, Error, Result};
use crate::vars::ConfigContext;

/// Renders templates and evaluates variable expressions against a context
pub struct TemplateEngine<'s> {
    env: Environment<'s>,
}

impl<'s> TemplateEngine<'s> {
    /// Build an environment; `search_paths` are tried in order for includes
    pub fn new(config: &TemplatesConfig, search_paths: Vec<PathBuf>) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(config.trim_blocks);
        env.set_lstrip_blocks(config.lstrip_blocks);
        env.set_undefined_behavior(match config.undefined {
            UndefinedMode::Chainable => UndefinedBehavior::Chainable,
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
            UndefinedMode::Strict => UndefinedBehavior::Strict,
        });
        filters::register(&mut env);

        env.set_loader(move |name| {
            if !is_relative_name(name) {
                return Ok(None);
            }
            for dir in &search_paths {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return std::fs::read_to_string(&candidate).map(Some).map_err(|e| {
                        minijinja::Error::new(
                            minijinja::ErrorKind::InvalidOperation,
                            format!("cannot read {}: {}", candidate.display(), e),
                        )
                    });
                }
            }
            Ok(None)
        });

        Self { env }
    }

    /// Render a template file against the context
    pub fn render_file(&self, path: &Path, context: &ConfigContext) -> Result<String> {
        let source = read_source(path)?;
        let name = path.display().to_string();
        debug!(template = %name, "rendering template");
        self.env
            .render_named_str(&name, &source, Value::from_serialize(context))
            .map_err(|e| Error::template(&name, describe(&e)))
    }

    /// Evaluate a variable expression; the result may be undefined
    pub fn eval(&self, expr: &'s str, context: &ConfigContext) -> Result<Value> {
        let compiled = self
            .env
            .compile_expression(expr)
            .map_err(|e| Error::template(expr, describe(&e)))?;
        compiled
            .eval(Value::from_serialize(context))
            .map_err(|e| Error::template(expr, describe(&e)))
    }
}

/// Include names may not escape the search directories
fn is_relative_name(name: &str) -> bool {
    Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Error message including the chain of causes
fn describe(err: &minijinja::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}
