//! SQL script templating
//!
//! Scripts see two variables: `schema` (target schema name) and `run_date`
//! (`YYYY-MM-DD`, absent for the table definition script). Referencing any
//! other name is an error rather than an empty string.

use crate::error::{EtlError, EtlResult};
use bf_core::RunDate;
use minijinja::{context, Environment, UndefinedBehavior};
use std::path::Path;

/// Render `source` for `schema` and an optional run date.
pub fn render_sql(
    name: &str,
    source: &str,
    schema: &str,
    run_date: Option<&RunDate>,
) -> EtlResult<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let template_err = |e: minijinja::Error| EtlError::Template {
        script: name.to_string(),
        message: e.to_string(),
    };

    let template = env
        .template_from_named_str(name, source)
        .map_err(template_err)?;
    template
        .render(context! {
            schema => schema,
            run_date => run_date.map(|d| d.iso()),
        })
        .map_err(template_err)
}

/// Read a script file and render it.
pub fn render_sql_file(
    path: &Path,
    schema: &str,
    run_date: Option<&RunDate>,
) -> EtlResult<String> {
    let source = std::fs::read_to_string(path).map_err(|e| EtlError::Template {
        script: path.display().to_string(),
        message: e.to_string(),
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    log::debug!("Rendering {name}");
    render_sql(&name, &source, schema, run_date)
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
