//! Implementation of the `promptvault render` command.
//!
//! Loads a template and a context file, renders, and stores the result as a
//! snapshot filed under the topic. The prompt goes to stdout so it can be
//! piped; the snapshot path goes to stderr.

use crate::cli::RenderArgs;
use crate::context::ProjectContext;
use crate::error::{PromptError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::git::GitState;
use crate::snapshot::{SnapshotInput, create_snapshot, store_snapshot};
use crate::template::{PromptContext, RenderOptions, TemplateLoader, Variable, render_prompt};
use serde_json::json;
use std::path::PathBuf;

/// What a render produced.
#[derive(Debug)]
pub struct RenderOutcome {
    pub text: String,
    /// Hash and path of the stored snapshot, unless storing was skipped.
    pub stored: Option<(String, PathBuf)>,
}

/// Execute the `promptvault render` command.
pub fn cmd_render(ctx: &ProjectContext, args: RenderArgs) -> Result<()> {
    let outcome = render(ctx, &args)?;

    print!("{}", outcome.text);
    if !outcome.text.ends_with('\n') {
        println!();
    }

    if let Some((_, path)) = &outcome.stored {
        eprintln!("Snapshot: {}", path.display());
    }

    Ok(())
}

/// Render and, unless disabled, store a snapshot.
pub fn render(ctx: &ProjectContext, args: &RenderArgs) -> Result<RenderOutcome> {
    let mut loader = TemplateLoader::new(ctx.templates_dir())?;
    let template = loader.load(&args.template)?;

    let context_path = ctx.resolve_input(&args.context)?;
    let mut context = PromptContext::load(&context_path)?;

    let options = if args.lenient || !ctx.config.strict {
        RenderOptions::lenient()
    } else {
        RenderOptions::strict()
    };

    // Resolve the topic up front so a bad invocation prints nothing.
    let topic = if args.no_store {
        None
    } else {
        Some(resolve_topic(args, &context)?)
    };

    // A context topic.id that only names the snapshot topic counts as used.
    if topic.is_some() && args.topic.is_none() {
        let name = Variable::TopicId.name();
        if !template.variables().contains(name) && !template.guard_variables().contains(name) {
            context.unset(Variable::TopicId);
        }
    }

    let text = render_prompt(&template, &context, options)?;

    let Some(topic) = topic else {
        return Ok(RenderOutcome { text, stored: None });
    };

    let git = GitState::capture(&ctx.project_root);
    let snapshot = create_snapshot(SnapshotInput {
        rendered_text: text.clone(),
        template_name: args.template.clone(),
        template_version: template.version(),
        topic_id: topic.clone(),
        git_commit: Some(git.commit),
        git_branch: Some(git.branch),
        created_at: None,
    });

    let path = store_snapshot(&snapshot, ctx.snapshots_dir())?;

    let event = Event::new(EventAction::Store)
        .with_topic(&topic)
        .with_details(json!({
            "hash": snapshot.hash(),
            "template": args.template,
            "template_version": snapshot.metadata().template_version,
            "path": path.display().to_string(),
        }));
    append_event(ctx, &event)?;

    Ok(RenderOutcome {
        text,
        stored: Some((snapshot.hash().to_string(), path)),
    })
}

fn resolve_topic(args: &RenderArgs, context: &PromptContext) -> Result<String> {
    args.topic
        .clone()
        .or_else(|| context.get(Variable::TopicId).map(str::to_string))
        .ok_or_else(|| {
            PromptError::UserError(
                "no topic for the snapshot.\n\n\
                 Pass --topic <id>, set topic.id in the context file, \
                 or use --no-store."
                    .to_string(),
            )
        })
}
