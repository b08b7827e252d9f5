//! Command dispatch: bridges CLI args -> core dashboard -> output formatting.

pub mod compare;
pub mod config_cmd;
pub mod connect;
pub mod export;
pub mod serve;
pub mod util;

use tiklens_config::Config;
use tiklens_core::AcquisitionConfig;

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Everything a router-bound command needs, resolved once per invocation.
pub struct Ctx {
    pub config: Config,
    pub acquisition: AcquisitionConfig,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Ctx {
    /// Load the config file and fold the global flags into it.
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let mut cfg = config::load(global)?;
        let acquisition = config::acquisition_config(&mut cfg, global)?;
        let output = config::output_format(&cfg, global);
        let color = output::should_color(config::color_mode(&cfg, global));
        Ok(Self {
            config: cfg,
            acquisition,
            output,
            color,
            quiet: global.quiet,
        })
    }
}

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Ctx) -> Result<(), CliError> {
    match cmd {
        Command::Connect(args) => connect::handle(args, ctx).await,
        Command::Export(args) => export::handle(args, ctx).await,
        Command::Compare(args) => compare::handle(args, ctx).await,
        Command::Serve(args) => serve::handle(args, ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
