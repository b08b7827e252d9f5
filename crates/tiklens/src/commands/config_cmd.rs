//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show: file merged with TIKLENS_ env vars ────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = cfg.to_toml()?;
            let out = output::render_single(
                config::output_format(&cfg, global),
                &cfg,
                |_| rendered.trim_end().to_owned(),
                |_| config::config_path(global).display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(
                &config::config_path(global).display().to_string(),
                global.quiet,
            );
            Ok(())
        }
    }
}
