//! `config` subcommands.

use anyhow::Result;
use flamelab_core::{Settings, validate_settings};

use crate::bootstrap::CliContext;
use crate::commands::ConfigCommand;
use crate::error::CliError;

pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => println!("{}", render_settings(&ctx.settings)?),
        ConfigCommand::Path => {
            let state = if ctx.settings_path.exists() {
                "exists"
            } else {
                "not created, defaults in use"
            };
            println!("{} ({state})", ctx.settings_path.display());
        }
        ConfigCommand::Validate => {
            validate_settings(&ctx.settings).map_err(CliError::from)?;
            println!("✓ {} is valid", ctx.settings_path.display());
        }
        ConfigCommand::Init { force } => {
            init(ctx, force)?;
            println!("✓ Wrote default settings to {}", ctx.settings_path.display());
        }
    }
    Ok(())
}

/// Effective settings as pretty JSON.
pub fn render_settings(settings: &Settings) -> Result<String, CliError> {
    serde_json::to_string_pretty(settings).map_err(|e| CliError::Core(e.to_string()))
}

/// Write default settings to the context's path.
///
/// An existing file is left alone unless `force` is set.
pub fn init(ctx: &CliContext, force: bool) -> Result<(), CliError> {
    if ctx.settings_path.exists() && !force {
        return Err(CliError::Arguments(format!(
            "{} already exists (use --force to overwrite)",
            ctx.settings_path.display()
        )));
    }
    Settings::default().save(&ctx.settings_path)?;
    tracing::info!(path = %ctx.settings_path.display(), "Settings file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap;

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let ctx = bootstrap(Some(path.clone())).unwrap();

        init(&ctx, false).unwrap();
        assert!(path.is_file());
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());

        let err = init(&ctx, false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        init(&ctx, true).unwrap();
    }

    #[test]
    fn shown_settings_parse_back() {
        let mut settings = Settings::default();
        settings.particles.seed = Some(9);
        let json = render_settings(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn validate_reports_bad_values() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = bootstrap(Some(dir.path().join("s.json"))).unwrap();
        ctx.settings.tracker.max_hands = 0;
        let err = execute(&ctx, ConfigCommand::Validate).unwrap_err();
        let cli = err.downcast_ref::<CliError>().unwrap();
        assert_eq!(cli.exit_code(), 78);
    }
}
