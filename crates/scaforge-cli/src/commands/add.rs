//! `scaforge add` — add a plugin to the project.
//!
//! Responsibility: parse `-o key=value` pairs into an option object, call
//! the plugin manager, and display results.  No business logic lives here.

use serde_json::Value;
use tracing::{debug, instrument};

use scaforge_core::domain::OptionMap;

use crate::{
    cli::{AddArgs, GlobalArgs},
    commands::build_manager,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `scaforge add` command.
#[instrument(skip_all, fields(plugin = %args.plugin))]
pub fn execute(
    args: AddArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let options = parse_options(&args.options)?;
    let mut manager = build_manager(&global, &config, args.skip_install)?;

    if args.dry_run {
        let report = manager.validate_add(&args.plugin);
        if report.valid {
            output.success(&format!("Plugin '{}' can be added", args.plugin))?;
            return Ok(());
        }
        return Err(CliError::ValidationFailed {
            plugin: args.plugin,
            errors: report.errors,
        });
    }

    debug!(options = ?options, "adding plugin");
    let outcome = manager
        .add(&args.plugin, Some(options))
        .map_err(CliError::Core)?;

    output.success(&outcome.message)?;

    if !outcome.installed_dependencies.is_empty() {
        output.info(&format!(
            "Also installed dependencies: {}",
            outcome.installed_dependencies.join(", ")
        ))?;
    }
    if args.skip_install {
        output.warning("Packages were not installed (--skip-install); run your package manager manually")?;
    }

    for note in &outcome.post_install {
        output.print("")?;
        output.info(note)?;
    }

    Ok(())
}

/// Parse repeated `key=value` pairs.  Values are tried as JSON first so
/// `true`, `5`, and `"quoted"` become typed values; anything that fails to
/// parse is taken as a plain string.
fn parse_options(pairs: &[String]) -> CliResult<OptionMap> {
    let mut options = OptionMap::new();
    for pair in pairs {
        let (key, raw) = pair.split_once('=').ok_or_else(|| CliError::InvalidOption {
            option: pair.clone(),
            reason: "expected key=value".into(),
        })?;
        if key.is_empty() {
            return Err(CliError::InvalidOption {
                option: pair.clone(),
                reason: "empty key".into(),
            });
        }
        let value = serde_json::from_str::<Value>(raw)
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        options.insert(key.to_string(), value);
    }
    Ok(options)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings(pairs: &[&str]) -> Vec<String> {
        pairs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn values_parse_as_json_first() {
        let opts = parse_options(&strings(&[
            "provider=sqlite",
            "seed=true",
            "poolSize=5",
        ]))
        .unwrap();
        assert_eq!(opts["provider"], json!("sqlite"));
        assert_eq!(opts["seed"], json!(true));
        assert_eq!(opts["poolSize"], json!(5));
    }

    #[test]
    fn quoted_values_keep_their_type() {
        let opts = parse_options(&strings(&["answer=\"42\""])).unwrap();
        assert_eq!(opts["answer"], json!("42"));
    }

    #[test]
    fn value_may_contain_equals() {
        let opts = parse_options(&strings(&["url=postgres://u:p@host?sslmode=require"])).unwrap();
        assert_eq!(opts["url"], json!("postgres://u:p@host?sslmode=require"));
    }

    #[test]
    fn missing_equals_is_rejected() {
        let err = parse_options(&strings(&["provider"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidOption { .. }));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(parse_options(&strings(&["=sqlite"])).is_err());
    }

    #[test]
    fn later_pairs_win() {
        let opts = parse_options(&strings(&["provider=mysql", "provider=sqlite"])).unwrap();
        assert_eq!(opts["provider"], json!("sqlite"));
    }
}
