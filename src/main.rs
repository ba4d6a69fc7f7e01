//! CI toolbox entrypoint.
//!
//! This binary bundles two small maintenance jobs: bootstrapping a pinned
//! dotnet tool from source on a Windows runner, and linting GitHub Actions
//! workflow files. Each job maps to a subcommand; see `--help`.

use actions_toolbox::cli::{BootstrapArgs, Cli, Command, LintArgs};
use actions_toolbox::config::{SpecOverrides, ToolSpec};
use actions_toolbox::dirs::SystemBaseDirs;
use actions_toolbox::error::Result;
use actions_toolbox::exec::SystemCommandExecutor;
use actions_toolbox::lint::remote::{ActionRegistry, GithubRegistry};
use actions_toolbox::lint::{self, LintOptions};
use actions_toolbox::output::write_stderr_line;
use actions_toolbox::pipeline::{BootstrapContext, run_bootstrap};
use clap::Parser;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let exit_code = match &cli.command {
        Command::Bootstrap(args) => {
            let result = run_bootstrap_command(args, &mut stderr);
            exit_code_for_run_result(result, &mut stderr)
        }
        Command::Lint(args) => run_lint_command(args, &mut stderr),
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run_bootstrap_command(args: &BootstrapArgs, stderr: &mut dyn Write) -> Result<()> {
    let overrides = SpecOverrides {
        repo_url: args.repo.clone(),
        commit: args.commit.clone(),
        package_id: args.package.clone(),
        sdk: args.sdk.clone(),
    };
    let spec = ToolSpec::resolve(args.config.as_deref(), &overrides)?;

    let context = BootstrapContext {
        spec: &spec,
        quiet: args.quiet,
        dry_run: args.dry_run,
    };
    run_bootstrap(&context, &SystemCommandExecutor, &SystemBaseDirs, stderr)
}

fn run_lint_command(args: &LintArgs, stderr: &mut dyn Write) -> i32 {
    let registry: Option<GithubRegistry> = if args.no_remote {
        None
    } else {
        Some(GithubRegistry::from_env())
    };
    let registry_ref = registry.as_ref().map(|r| r as &dyn ActionRegistry);

    let options = LintOptions {
        strict: args.strict,
    };
    let mut stdout = std::io::stdout();

    match lint::run(&args.paths, options, registry_ref, &mut stdout) {
        Ok(code) => code,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
