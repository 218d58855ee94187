use std::io::Write;
use std::path::PathBuf;

use clap::ArgMatches;
use spawn_env_config::HarnessConfig;
use spawn_env_core::{ComposedEnv, EnvMap, HarnessEnv, ProcessEnvironment};
use tracing::{error, info};

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("show", sub_matches)) => handle_show_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_show_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = matches.get_one::<PathBuf>("config");
    let inherit = !matches.get_flag("no-inherit");

    info!(
        event = "cli.show_started",
        config = ?config_path,
        inherit = inherit,
    );

    let composed = match compose_for_matches(matches) {
        Ok(composed) => composed,
        Err(e) => {
            error!(event = "cli.show_failed", error = %e);
            return Err(e);
        }
    };

    let rendered = render(&composed, matches.get_flag("json"))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;

    info!(event = "cli.show_completed", vars = composed.len());
    Ok(())
}

fn pairs(matches: &ArgMatches, id: &str) -> Vec<(String, String)> {
    matches
        .get_many::<(String, String)>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn compose_for_matches(matches: &ArgMatches) -> Result<ComposedEnv, Box<dyn std::error::Error>> {
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };

    let harness = HarnessEnv::from_config(&config)?;
    harness.set_global_env(pairs(matches, "global"))?;
    harness.dont_inherit(
        matches
            .get_many::<String>("block")
            .into_iter()
            .flatten()
            .cloned(),
    )?;

    let runtime: EnvMap = pairs(matches, "runtime").into_iter().collect();
    let base = ProcessEnvironment::capture_with_runtime(runtime);

    let per_call_pairs = pairs(matches, "env");
    let per_call: EnvMap = per_call_pairs.iter().cloned().collect();
    let per_call = (!per_call_pairs.is_empty()).then_some(&per_call);

    Ok(harness.compose(&base, per_call, !matches.get_flag("no-inherit"))?)
}

fn render(composed: &ComposedEnv, json: bool) -> Result<String, serde_json::Error> {
    if json {
        let mut out = serde_json::to_string_pretty(composed)?;
        out.push('\n');
        return Ok(out);
    }

    Ok(composed
        .iter()
        .map(|(name, value)| format!("{}={}\n", name, value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show_matches(argv: &[&str]) -> ArgMatches {
        let mut full = vec!["spawn-env", "show"];
        full.extend_from_slice(argv);
        let matches = crate::app::build_cli().try_get_matches_from(full).unwrap();
        matches.subcommand_matches("show").unwrap().clone()
    }

    #[test]
    fn test_no_inherit_renders_marker_and_per_call() {
        let matches = show_matches(&["--no-inherit", "-e", "FOO=BAR", "--global", "G=1"]);
        let composed = compose_for_matches(&matches).unwrap();
        assert_eq!(
            render(&composed, false).unwrap(),
            "FOO=BAR\nWPBROWSER_HOST_REQUEST=1\n"
        );
    }

    #[test]
    fn test_json_rendering() {
        let matches = show_matches(&["--no-inherit"]);
        let composed = compose_for_matches(&matches).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&render(&composed, true).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "WPBROWSER_HOST_REQUEST": "1" }));
    }

    #[test]
    fn test_runtime_and_global_layers() {
        let matches = show_matches(&[
            "--runtime",
            "SPAWN_ENV_CLI_X=rt",
            "--global",
            "SPAWN_ENV_CLI_Y=g",
        ]);
        let composed = compose_for_matches(&matches).unwrap();
        assert_eq!(composed.get("SPAWN_ENV_CLI_X"), Some("rt"));
        assert_eq!(composed.get("SPAWN_ENV_CLI_Y"), Some("g"));
    }

    #[test]
    fn test_block_flag_suppresses_runtime_value() {
        let matches = show_matches(&[
            "--runtime",
            "SPAWN_ENV_CLI_B=x",
            "--block",
            "SPAWN_ENV_CLI_B",
        ]);
        let composed = compose_for_matches(&matches).unwrap();
        assert!(!composed.contains_key("SPAWN_ENV_CLI_B"));
    }

    #[test]
    fn test_missing_config_file_fails() {
        let matches = show_matches(&["--config", "/definitely/not/here/harness.toml"]);
        let err = compose_for_matches(&matches).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }
}
