//! The `ollacode <task>` flow.

use crate::commands::init_logging;
use crate::ui::{display, TerminalObserver};
use ollacode_core::{Agent, AgentSettings, Config, CoreError, CoreResult};
use ollacode_provider::OllamaClient;
use ollacode_sandbox::{PathSandbox, TerminalConfirmer};
use ollacode_tools::{ToolContext, ToolDispatcher};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Run one task in `cwd` and report how it ended.
pub async fn run_task(cwd: &Path, task: &str, overrides: Config) -> anyhow::Result<ExitCode> {
    let settings = match load_settings(cwd, overrides).await {
        Ok(settings) => settings,
        Err(e) => {
            display::error(&e.troubleshooting());
            return Ok(ExitCode::FAILURE);
        }
    };

    let log_file = init_logging(settings.debug);
    info!(
        cwd = %cwd.display(),
        model = %settings.model,
        log_file = ?log_file,
        "Starting ollacode"
    );

    execute(cwd, task, settings).await
}

/// Merge file and environment config with the CLI flags.
pub async fn load_settings(cwd: &Path, overrides: Config) -> CoreResult<AgentSettings> {
    let (config, _sources) = Config::load(Some(cwd)).await?;
    Ok(config.merge(overrides).resolved())
}

/// Check the backend, then drive the agent to a terminal state.
pub async fn execute(cwd: &Path, task: &str, settings: AgentSettings) -> anyhow::Result<ExitCode> {
    let client = match OllamaClient::new(&settings.ollama_base_url) {
        Ok(client) => client,
        Err(e) => {
            display::error(&CoreError::from(e).troubleshooting());
            return Ok(ExitCode::FAILURE);
        }
    };

    if !client.validate_connection().await {
        warn!(url = %client.base_url(), "Ollama is not reachable");
        display::ollama_connection_help(client.base_url());
        return Ok(ExitCode::FAILURE);
    }

    if !client.has_model(&settings.model).await {
        warn!(model = %settings.model, "Model not available");
        display::model_not_found(&settings.model);
        return Ok(ExitCode::FAILURE);
    }

    display::user_task(task);

    let sandbox = PathSandbox::new(cwd)?;
    let ctx = ToolContext::new(sandbox, Arc::new(TerminalConfirmer::new()))
        .with_command_timeout(settings.command_timeout);
    let dispatcher = Arc::new(ToolDispatcher::with_builtins(ctx));

    let mut agent = Agent::new(Arc::new(client), dispatcher, settings);
    let mut observer = TerminalObserver::new();
    let outcome = agent.run(task, &mut observer).await;
    observer.finish();

    info!(
        success = outcome.success,
        iterations = outcome.iterations,
        error = ?outcome.error,
        "Agent run finished"
    );
    display::final_result(outcome.success, &outcome.message);

    Ok(exit_code(outcome.success))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
