//! Template engine for research prompts.
//!
//! This module provides:
//!
//! - **Registry**: the closed, typed set of template variables
//! - **Context**: variable values for one render
//! - **Parser**: placeholder extraction and validation
//! - **Conditional**: `{{#if}}` block parsing and resolution
//! - **Render**: strict substitution with full error lists
//! - **Loader**: directory loading with a per-instance parse cache
//!
//! # Template Syntax
//!
//! ```text
//! # Research brief: {{topic.title}}
//!
//! Investigate whether {{topic.claim}}.
//! {{#if research.depth == "deep"}}
//! Cite at least {{quality.minSources}} sources.
//! {{/if}}
//! {{#if standards.disclaimer}}{{standards.disclaimer}}{{/if}}
//! ```

mod conditional;
mod error;
mod loader;
mod parser;
mod prompt_context;
mod registry;
mod render;

pub use conditional::{
    ConditionOperator, ConditionalBlock, evaluate_condition, is_truthy, parse_conditional_blocks,
    resolve_conditionals,
};
pub use error::{ConditionalIssue, ConditionalIssueKind, LiteralIssue, TemplateError};
pub use loader::{TEMPLATE_EXTENSIONS, TemplateLoader};
pub use parser::{ParsedTemplate, extract_variables, parse_template};
pub use prompt_context::PromptContext;
pub use registry::{Variable, VariableKind, get_enum_values, get_valid_variables, is_valid_variable};
pub use render::{RenderOptions, render_prompt};
