//! `export`: write a connected router's data to a JSON document.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use tiklens_core::ExportDocument;

use crate::cli::ExportArgs;
use crate::config::{self, RouterOverrides};
use crate::error::CliError;
use crate::output;

use super::{Ctx, connect, util};

/// Write `doc` into `dir` under its canonical file name.
pub(crate) fn write_document(doc: &ExportDocument, dir: &Path) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(doc.file_name());
    std::fs::write(&path, doc.to_json()?)?;
    info!(path = %path.display(), "export written");
    Ok(path)
}

pub async fn handle(args: ExportArgs, ctx: &Ctx) -> Result<(), CliError> {
    let slot = args.router.router;
    let creds =
        config::resolve_credentials(&ctx.config, slot, RouterOverrides::from(&args.router))?;

    let mut dash = util::dashboard(&ctx.acquisition)?;
    let pb = util::spinner(format!("Fetching {}", creds.host), ctx.quiet);
    let state = dash.connect(slot, creds).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    util::ensure_connected(state)?;
    connect::report_notice(state, ctx);

    let doc = dash
        .export(slot, Utc::now())
        .ok_or_else(|| CliError::NotConnected {
            router: dash.state(slot).display_name().to_owned(),
            reason: "Connect to the router before exporting.".into(),
        })?;

    if args.stdout {
        output::print_output(&doc.to_json()?, false);
        return Ok(());
    }

    let path = write_document(&doc, &args.out_dir)?;
    output::print_output(&path.display().to_string(), ctx.quiet);
    Ok(())
}
