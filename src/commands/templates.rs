//! Implementation of the `promptvault templates` commands.

use crate::context::ProjectContext;
use crate::error::{PromptError, Result};
use crate::template::{TemplateError, TemplateLoader};

/// List template filenames in the configured directory.
pub fn cmd_templates_list(ctx: &ProjectContext) -> Result<()> {
    let names = TemplateLoader::list_templates(ctx.templates_dir())?;

    if names.is_empty() {
        println!("No templates in {}.", ctx.templates_dir().display());
        return Ok(());
    }

    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Outcome of checking one template.
#[derive(Debug)]
pub struct TemplateCheck {
    pub filename: String,
    pub result: std::result::Result<CheckedTemplate, TemplateError>,
}

#[derive(Debug)]
pub struct CheckedTemplate {
    pub version: String,
    pub variables: Vec<String>,
    pub guards: Vec<String>,
}

/// Parse every template and report all of them, failing if any failed.
pub fn cmd_templates_check(ctx: &ProjectContext) -> Result<()> {
    let checks = check_templates(ctx)?;
    let failed = checks.iter().filter(|c| c.result.is_err()).count();

    for check in &checks {
        match &check.result {
            Ok(t) => {
                println!("OK    {} (version {})", check.filename, t.version);
                if !t.variables.is_empty() {
                    println!("      variables: {}", t.variables.join(", "));
                }
                if !t.guards.is_empty() {
                    println!("      guards:    {}", t.guards.join(", "));
                }
            }
            Err(e) => println!("FAIL  {}: {}", check.filename, e),
        }
    }

    println!();
    println!("{} template(s) checked, {} failed.", checks.len(), failed);

    match checks.into_iter().find_map(|c| c.result.err()) {
        Some(first) => Err(PromptError::Template(first)),
        None => Ok(()),
    }
}

/// Load each template independently so one broken file does not hide others.
pub fn check_templates(ctx: &ProjectContext) -> Result<Vec<TemplateCheck>> {
    let mut loader = TemplateLoader::new(ctx.templates_dir())?;
    let names = TemplateLoader::list_templates(loader.base_dir())?;

    Ok(names
        .into_iter()
        .map(|filename| {
            let result = loader.load(&filename).map(|t| CheckedTemplate {
                version: t.version(),
                variables: t.variables().iter().cloned().collect(),
                guards: t.guard_variables().into_iter().map(str::to_string).collect(),
            });
            TemplateCheck { filename, result }
        })
        .collect())
}
