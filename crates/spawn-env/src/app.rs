use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("spawn-env")
        .about("Compose the environment for harness-spawned processes")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("show")
                .about("Print the composed environment")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_name("PATH")
                        .help("Harness configuration file ([env] and [inherit] sections)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(pair_arg("global", "Global override, repeatable").long("global"))
                .arg(
                    pair_arg(
                        "runtime",
                        "Runtime override layered over the OS environment, repeatable",
                    )
                    .long("runtime"),
                )
                .arg(
                    pair_arg("env", "Per-call override, repeatable")
                        .long("env")
                        .short('e'),
                )
                .arg(
                    Arg::new("block")
                        .long("block")
                        .value_name("NAME")
                        .help("Do not inherit NAME from the base, config or global layers")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("no-inherit")
                        .long("no-inherit")
                        .help("Start from an empty environment plus the harness markers")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print a JSON object instead of NAME=VALUE lines")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn pair_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .value_name("NAME=VALUE")
        .help(help)
        .action(ArgAction::Append)
        .value_parser(parse_pair)
}

/// Parse `NAME=VALUE`. The value may itself contain `=`.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, _)) if name.is_empty() => Err(format!("missing name in '{}'", raw)),
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("FOO=BAR"),
            Ok(("FOO".to_string(), "BAR".to_string()))
        );
        assert_eq!(
            parse_pair("URL=a=b"),
            Ok(("URL".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_pair("EMPTY="), Ok(("EMPTY".to_string(), String::new())));
        assert!(parse_pair("=x").is_err());
        assert!(parse_pair("NOEQUALS").is_err());
    }

    #[test]
    fn test_cli_show_command() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec![
            "spawn-env",
            "show",
            "--global",
            "G=1",
            "-e",
            "P=2",
            "--block",
            "FOO",
            "--no-inherit",
            "--json",
        ]);
        assert!(matches.is_ok());

        let matches = matches.unwrap();
        assert!(!matches.get_flag("verbose"));
        let show = matches.subcommand_matches("show").unwrap();
        let global: Vec<&(String, String)> = show
            .get_many::<(String, String)>("global")
            .unwrap()
            .collect();
        assert_eq!(global, vec![&("G".to_string(), "1".to_string())]);
        let env: Vec<&(String, String)> = show
            .get_many::<(String, String)>("env")
            .unwrap()
            .collect();
        assert_eq!(env, vec![&("P".to_string(), "2".to_string())]);
        let block: Vec<&String> = show.get_many::<String>("block").unwrap().collect();
        assert_eq!(block, vec!["FOO"]);
        assert!(show.get_flag("no-inherit"));
        assert!(show.get_flag("json"));
    }

    #[test]
    fn test_cli_verbose_is_global() {
        let app = build_cli();
        let matches = app
            .try_get_matches_from(vec!["spawn-env", "show", "-v"])
            .unwrap();
        assert!(matches.get_flag("verbose"));
    }

    #[test]
    fn test_cli_rejects_malformed_pair() {
        let app = build_cli();
        let matches = app.try_get_matches_from(vec!["spawn-env", "show", "--env", "oops"]);
        assert!(matches.is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let app = build_cli();
        assert!(app.try_get_matches_from(vec!["spawn-env"]).is_err());
    }

    #[test]
    fn test_cli_debug_assert() {
        build_cli().debug_assert();
    }
}
