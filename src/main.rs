use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, fmt};

use strata_engine::{DEFAULT_MAX_STEPS, DataMap, Engine, HandlerRegistry, InstanceStatus, handler_fn};
use strata_process::{ActorTag, ProcessDefinition};
use strata_registry::{FsProcessRegistry, ProcessLoader};
use strata_resolver::{Resolver, StandardResolver};

/// Strata - A hierarchical process orchestration engine
#[derive(Parser)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Directory holding process sources (default: ~/.strata/processes)
  #[arg(long, global = true, env = "STRATA_PROCESSES_DIR")]
  processes_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// List every process in the registry
  List,

  /// Show a process overview, or a single element
  Show {
    process_id: String,

    /// Only show this element with its incoming and outgoing flows
    #[arg(long)]
    element: Option<String>,
  },

  /// Resolve a process and print the ids of its closed definition set
  Resolve { process_id: String },

  /// Check that a process loads and resolves, reporting every problem found
  Validate { process_id: String },

  /// Run a process with pass-through handlers, reading the payload from stdin
  Run {
    process_id: String,

    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(io::stderr)
    .init();

  let processes_dir = match cli.processes_dir {
    Some(dir) => dir,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".strata")
      .join("processes"),
  };
  let registry = FsProcessRegistry::new(processes_dir);

  let Some(command) = cli.command else {
    println!("strata - use --help to see available commands");
    return Ok(());
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async {
    match command {
      Commands::List => list(&registry).await,
      Commands::Show {
        process_id,
        element,
      } => show(&registry, &process_id, element.as_deref()).await,
      Commands::Resolve { process_id } => resolve(registry, &process_id).await,
      Commands::Validate { process_id } => validate(registry, &process_id).await,
      Commands::Run {
        process_id,
        max_steps,
      } => run(registry, &process_id, max_steps).await,
    }
  })
}

async fn list(registry: &FsProcessRegistry) -> Result<()> {
  let summaries = registry
    .list()
    .await
    .with_context(|| format!("failed to list processes in {}", registry.root().display()))?;

  println!("{}", serde_json::to_string_pretty(&summaries)?);
  Ok(())
}

async fn show(registry: &FsProcessRegistry, process_id: &str, element: Option<&str>) -> Result<()> {
  let definition = load_definition(registry, process_id).await?;

  let output = match element {
    Some(task_id) => {
      let detail = definition
        .element(task_id)
        .with_context(|| format!("element '{}' not found in process '{}'", task_id, process_id))?;
      serde_json::to_value(detail)?
    }
    None => overview(&definition),
  };

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

fn overview(definition: &ProcessDefinition) -> Value {
  json!({
    "process_id": definition.process_id(),
    "name": definition.name(),
    "executable": definition.is_executable(),
    "pools": definition.pools(),
    "pool_order": definition.pool_order(),
    "tasks": definition.display_order(),
    "flows": definition.flows(),
    "message_flows": definition.message_flows(),
    "call_targets": definition.call_targets(),
    "actors": definition.actors(),
  })
}

async fn load_definition(registry: &FsProcessRegistry, process_id: &str) -> Result<ProcessDefinition> {
  registry
    .load(process_id)
    .await
    .with_context(|| format!("failed to load process '{}'", process_id))?
    .with_context(|| format!("process '{}' not found in {}", process_id, registry.root().display()))
}

async fn resolve(registry: FsProcessRegistry, process_id: &str) -> Result<()> {
  let resolver = StandardResolver::new(registry);
  let closed_set = resolver
    .resolve(process_id)
    .await
    .context("failed to resolve process")?;

  let ids: Vec<&str> = closed_set.process_ids().collect();
  println!("{}", serde_json::to_string_pretty(&ids)?);
  Ok(())
}

async fn validate(registry: FsProcessRegistry, process_id: &str) -> Result<()> {
  let resolver = StandardResolver::new(registry);
  let report = validation_report(&resolver, process_id).await;
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}

/// `{process_id, valid, errors}` for a process.
///
/// An executable process must resolve. A non-executable one only needs each
/// of its call targets to load.
async fn validation_report(resolver: &StandardResolver<FsProcessRegistry>, process_id: &str) -> Value {
  let mut errors = Vec::new();

  match resolver.loader().load(process_id).await {
    Ok(Some(definition)) if definition.is_executable() => {
      if let Err(e) = resolver.resolve(process_id).await {
        errors.push(e.to_string());
      }
    }
    Ok(Some(definition)) => {
      for target in definition.call_targets() {
        match resolver.loader().load(target).await {
          Ok(Some(_)) => {}
          Ok(None) => errors.push(format!("call target '{target}' not found")),
          Err(e) => errors.push(e.to_string()),
        }
      }
    }
    Ok(None) => errors.push(format!("process '{process_id}' not found")),
    Err(e) => errors.push(e.to_string()),
  }

  json!({
    "process_id": process_id,
    "valid": errors.is_empty(),
    "errors": errors,
  })
}

async fn run(registry: FsProcessRegistry, process_id: &str, max_steps: usize) -> Result<()> {
  let payload = read_payload_from_stdin()?;

  let mut handlers = HandlerRegistry::new();
  for actor in ActorTag::ALL {
    handlers.register(actor, handler_fn(|_, data| Ok(data)));
  }

  let engine = Engine::new(StandardResolver::new(registry), handlers);
  let closed_set = engine
    .resolve(process_id)
    .await
    .context("failed to resolve process")?;
  eprintln!("Resolved {} process(es)", closed_set.len());

  let mut instance = engine
    .start(Arc::new(closed_set), payload)
    .context("failed to start workflow")?;
  engine.run_instance(&mut instance, max_steps).await;

  let mut output = json!({
    "instance_id": instance.instance_id(),
    "status": instance.status(),
    "steps": instance.steps_taken(),
  });
  if let Some(data) = instance.global_data() {
    output["global_data"] = Value::Object(data.clone());
  }
  if let Some(reason) = instance.failure_reason() {
    output["failure_reason"] = Value::String(reason.to_string());
  }
  println!("{}", serde_json::to_string_pretty(&output)?);

  match instance.status() {
    InstanceStatus::Completed => Ok(()),
    InstanceStatus::Failed => bail!("workflow '{}' failed", process_id),
    InstanceStatus::Running => bail!("workflow '{}' did not finish", process_id),
  }
}

fn read_payload_from_stdin() -> Result<DataMap> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    return Ok(DataMap::new());
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read payload from stdin")?;

  if input.trim().is_empty() {
    return Ok(DataMap::new());
  }

  match serde_json::from_str(&input).context("failed to parse payload JSON from stdin")? {
    Value::Object(map) => Ok(map),
    other => bail!("payload must be a JSON object, got {}", other),
  }
}
