//! docgenie: edit, preview and export persona-aware API documentation.
//!
//! The working document lives in a session store (`--store`, default
//! `.docgenie/`). Every editing subcommand loads it, applies one
//! copy-on-write edit and saves the result.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use docgenie::config::{self, EnhancerConfig};
use docgenie::edit;
use docgenie::enhance::{enhance_or_original, GeminiEnhancer};
use docgenie::model::{AuthMethod, AuthRule, CustomType, DescriptionFormat, Document, HttpMethod};
use docgenie::render::{self, export::ExportRenderer, json::JsonRenderer, Renderer};
use docgenie::slug;
use docgenie::store::{load_or_default, DocumentStore, FileStore};
use docgenie::visibility::{self, ViewState};
use docgenie::DocError;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "docgenie",
    version,
    about = "Persona-aware API documentation designer"
)]
struct Cli {
    /// Session store directory
    #[arg(long, global = true, env = "DOCGENIE_STORE", default_value = config::DEFAULT_STORE_DIR)]
    store: PathBuf,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the sample document into the store
    Init {
        /// Overwrite an existing session document
        #[arg(long)]
        force: bool,
    },
    /// Replace the session document with a JSON file
    Import { file: PathBuf },
    /// Render the session document
    Show {
        /// Output format: html, markdown, json
        #[arg(short = 'f', long, default_value = "html")]
        format: String,
        #[command(flatten)]
        view: ViewArgs,
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Write the standalone interactive HTML page
    Export {
        #[command(flatten)]
        view: ViewArgs,
        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,
    },
    /// Write the document JSON bundle (stdout when no directory is given)
    Bundle {
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// List every role in the document, or one type's perspective options
    Roles {
        #[arg(long = "type")]
        type_name: Option<String>,
    },
    /// Rewrite the description through the text-enhancement service
    Enhance(EnhanceArgs),
    SetTitle { title: String },
    SetDescription {
        text: String,
        /// Description notation: docgenie (outline) or markdown
        #[arg(long)]
        format: Option<String>,
    },
    /// Prepend a custom type
    AddType {
        name: Option<String>,
        #[arg(long)]
        definition: Option<String>,
        /// Contextual role (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Change a custom type's name or definition
    SetType {
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        definition: Option<String>,
    },
    RemoveType { name: String },
    AddRole { type_name: String, role: String },
    RemoveRole { type_name: String, role: String },
    /// Prepend an endpoint and print its id
    AddEndpoint {
        #[command(flatten)]
        fields: EndpointFields,
    },
    SetEndpoint {
        id: String,
        #[command(flatten)]
        fields: EndpointFields,
    },
    RemoveEndpoint { id: String },
    /// Append an auth rule to an endpoint
    AddRule {
        id: String,
        #[command(flatten)]
        rule: RuleFields,
    },
    /// Change the auth rule at INDEX (0-based)
    SetRule {
        id: String,
        index: usize,
        #[command(flatten)]
        rule: RuleFields,
    },
    RemoveRule { id: String, index: usize },
}

#[derive(Args)]
struct ViewArgs {
    /// Active persona
    #[arg(long, default_value = docgenie::model::DEFAULT_PERSONA)]
    persona: String,

    /// Per-type override, TYPE=ROLE (repeatable)
    #[arg(long = "perspective", value_parser = parse_perspective)]
    perspectives: Vec<(String, String)>,
}

#[derive(Args)]
struct EnhanceArgs {
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "DOCGENIE_MODEL", default_value = config::DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "DOCGENIE_API_BASE", default_value = config::DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds
    #[arg(long, env = "DOCGENIE_TIMEOUT", default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[derive(Args)]
struct EndpointFields {
    #[arg(long)]
    method: Option<String>,
    #[arg(long)]
    path: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Input arguments text; "null" for none
    #[arg(long)]
    arguments: Option<String>,
    /// Response text; "null" for none
    #[arg(long)]
    response: Option<String>,
}

#[derive(Args)]
struct RuleFields {
    #[arg(long)]
    role: Option<String>,
    /// None, Token, Cookie, OAuth2, API Key, Signature
    #[arg(long)]
    method: Option<String>,
    #[arg(long)]
    details: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let store = FileStore::new(&cli.store);
    debug!(store = %store.path().display(), "using session store");
    run(cli.command, &store)
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "docgenie=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(command: Command, store: &FileStore) -> Result<()> {
    match command {
        Command::Init { force } => {
            if store.path().exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            save(store, &Document::default())?;
            info!("initialized session document");
            Ok(())
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let doc = edit::replace_from_json(&text)
                .with_context(|| format!("failed to import {}", file.display()))?;
            save(store, &doc)
        }
        Command::Show {
            format,
            view,
            output,
        } => {
            let doc = load_or_default(store);
            let view = view_state(&doc, view)?;
            let renderer = render::create_renderer(&format)?;
            let rendered = renderer.render(&doc, &view)?;
            match output {
                Some(path) => write_file(&path, &rendered),
                None => {
                    print!("{}", rendered);
                    Ok(())
                }
            }
        }
        Command::Export { view, output } => {
            let doc = load_or_default(store);
            let view = view_state(&doc, view)?;
            let rendered = ExportRenderer.render(&doc, &view)?;
            let path = output.join(slug::export_file_name(&doc.title));
            write_file(&path, &rendered)?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Bundle { output } => {
            let doc = load_or_default(store);
            let rendered = JsonRenderer.render(&doc, &ViewState::default())?;
            match output {
                Some(dir) => {
                    let path = dir.join(slug::bundle_file_name(&doc.title));
                    write_file(&path, &rendered)?;
                    println!("{}", path.display());
                }
                None => print!("{}", rendered),
            }
            Ok(())
        }
        Command::Roles { type_name } => {
            let doc = load_or_default(store);
            let roles = match type_name {
                Some(name) => {
                    let ty = doc
                        .find_type(&name)
                        .ok_or(DocError::UnknownType(name))?;
                    visibility::perspective_roles(&doc, ty)
                }
                None => visibility::role_union(&doc),
            };
            for role in roles {
                println!("{}", role);
            }
            Ok(())
        }
        Command::Enhance(args) => {
            let doc = load_or_default(store);
            let config = EnhancerConfig {
                api_key: args.api_key,
                model: args.model,
                api_base: args.api_base,
                timeout_secs: args.timeout,
            };
            let description = match GeminiEnhancer::new(config) {
                Ok(enhancer) => enhance_or_original(&enhancer, &doc.description),
                Err(e) => {
                    warn!(error = %e, "enhancer unavailable, keeping original description");
                    doc.description.clone()
                }
            };
            save(store, &edit::set_description(&doc, &description))
        }
        Command::SetTitle { title } => update(store, |doc| Ok(edit::set_title(doc, &title))),
        Command::SetDescription { text, format } => update(store, |doc| {
            let mut next = edit::set_description(doc, &text);
            if let Some(name) = format {
                let format = DescriptionFormat::parse(&name)
                    .ok_or_else(|| DocError::UnknownFormat(name.clone()))?;
                next = edit::set_description_format(&next, format);
            }
            Ok(next)
        }),
        Command::AddType {
            name,
            definition,
            roles,
        } => update(store, |doc| {
            let mut ty = edit::new_custom_type();
            if let Some(name) = name {
                ty.name = name;
            }
            if let Some(definition) = definition {
                ty.definition = definition;
            }
            let mut next = edit::add_custom_type(doc, ty.clone());
            for role in &roles {
                next = edit::add_type_role(&next, &ty.name, role)?;
            }
            Ok(next)
        }),
        Command::SetType {
            name,
            rename,
            definition,
        } => update(store, |doc| {
            let current = doc
                .find_type(&name)
                .ok_or_else(|| DocError::UnknownType(name.clone()))?;
            let ty = CustomType {
                name: rename.unwrap_or_else(|| current.name.clone()),
                definition: definition.unwrap_or_else(|| current.definition.clone()),
                roles: current.roles.clone(),
            };
            Ok(edit::update_custom_type(doc, &name, ty)?)
        }),
        Command::RemoveType { name } => update(store, |doc| Ok(edit::remove_custom_type(doc, &name)?)),
        Command::AddRole { type_name, role } => {
            update(store, |doc| Ok(edit::add_type_role(doc, &type_name, &role)?))
        }
        Command::RemoveRole { type_name, role } => {
            update(store, |doc| Ok(edit::remove_type_role(doc, &type_name, &role)?))
        }
        Command::AddEndpoint { fields } => {
            let mut endpoint = edit::new_endpoint();
            let id = endpoint.id.clone();
            fields.apply(&mut endpoint)?;
            update(store, |doc| Ok(edit::add_endpoint(doc, endpoint)))?;
            println!("{}", id);
            Ok(())
        }
        Command::SetEndpoint { id, fields } => update(store, |doc| {
            let current = doc
                .find_endpoint(&id)
                .ok_or_else(|| DocError::UnknownEndpoint(id.clone()))?;
            let mut endpoint = current.clone();
            fields.apply(&mut endpoint)?;
            Ok(edit::update_endpoint(doc, &id, |ep| *ep = endpoint)?)
        }),
        Command::RemoveEndpoint { id } => update(store, |doc| Ok(edit::remove_endpoint(doc, &id)?)),
        Command::AddRule { id, rule } => update(store, |doc| {
            let mut next = edit::new_auth_rule();
            rule.apply(&mut next)?;
            Ok(edit::add_auth_rule(doc, &id, next)?)
        }),
        Command::SetRule { id, index, rule } => update(store, |doc| {
            let mut next = doc
                .find_endpoint(&id)
                .ok_or_else(|| DocError::UnknownEndpoint(id.clone()))?
                .auth_rules
                .get(index)
                .cloned()
                .ok_or_else(|| DocError::UnknownRule {
                    id: id.clone(),
                    index,
                })?;
            rule.apply(&mut next)?;
            Ok(edit::update_auth_rule(doc, &id, index, next)?)
        }),
        Command::RemoveRule { id, index } => {
            update(store, |doc| Ok(edit::remove_auth_rule(doc, &id, index)?))
        }
    }
}

impl EndpointFields {
    fn apply(self, endpoint: &mut docgenie::model::Endpoint) -> Result<()> {
        if let Some(method) = self.method {
            endpoint.method =
                HttpMethod::parse(&method).ok_or(DocError::InvalidMethod(method))?;
        }
        if let Some(path) = self.path {
            endpoint.path = path;
        }
        if let Some(description) = self.description {
            endpoint.description = description;
        }
        if let Some(arguments) = self.arguments {
            endpoint.arguments = Some(arguments);
        }
        if let Some(response) = self.response {
            endpoint.response = Some(response);
        }
        Ok(())
    }
}

impl RuleFields {
    fn apply(self, rule: &mut AuthRule) -> Result<()> {
        if let Some(role) = self.role {
            rule.role = role;
        }
        if let Some(method) = self.method {
            rule.method = AuthMethod::parse(&method).ok_or(DocError::InvalidMethod(method))?;
        }
        if let Some(details) = self.details {
            rule.details = if details.is_empty() { None } else { Some(details) };
        }
        Ok(())
    }
}

/// Load, apply one edit, save. A failed edit leaves the store untouched.
fn update<F>(store: &FileStore, f: F) -> Result<()>
where
    F: FnOnce(&Document) -> Result<Document>,
{
    let doc = load_or_default(store);
    let next = f(&doc)?;
    save(store, &next)
}

fn save(store: &FileStore, doc: &Document) -> Result<()> {
    store
        .save(doc)
        .with_context(|| format!("failed to save {}", store.path().display()))
}

fn view_state(doc: &Document, args: ViewArgs) -> Result<ViewState> {
    let mut view = ViewState::new(args.persona);
    for (type_name, role) in args.perspectives {
        view = view.with_perspective(type_name, role);
    }
    view.validate(doc)?;
    Ok(view)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// `TYPE=ROLE`
fn parse_perspective(s: &str) -> std::result::Result<(String, String), String> {
    let (type_name, role) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TYPE=ROLE, got '{}'", s))?;
    let (type_name, role) = (type_name.trim(), role.trim());
    if type_name.is_empty() || role.is_empty() {
        return Err(format!("expected TYPE=ROLE, got '{}'", s));
    }
    Ok((type_name.to_string(), role.to_string()))
}
