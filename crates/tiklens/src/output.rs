//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain is command-specific line output.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use tiklens_core::{ActionKind, ChainKind};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Chain name, colored by traffic direction.
pub fn paint_chain(chain: &str, color: bool) -> String {
    if !color {
        return chain.to_owned();
    }
    match ChainKind::classify(chain) {
        ChainKind::Input => chain.blue().to_string(),
        ChainKind::Forward => chain.magenta().to_string(),
        ChainKind::Output => chain.cyan().to_string(),
        ChainKind::Other => chain.to_owned(),
    }
}

/// Action name, colored by verdict.
pub fn paint_action(action: &str, color: bool) -> String {
    if !color {
        return action.to_owned();
    }
    match ActionKind::classify(action) {
        ActionKind::Accept => action.green().to_string(),
        ActionKind::Drop | ActionKind::Reject => action.red().to_string(),
        ActionKind::Return => action.yellow().to_string(),
        ActionKind::Other => action.to_owned(),
    }
}

/// Warning line for stderr (fallback notices).
pub fn warning(message: &str, color: bool) -> String {
    if color {
        format!("{} {message}", "warning:".yellow().bold())
    } else {
        format!("warning: {message}")
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since composite views don't map to one `Tabled` row type.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    plain_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Lists {
        names: Vec<&'static str>,
    }

    fn lists() -> Lists {
        Lists {
            names: vec!["wl", "bl"],
        }
    }

    #[test]
    fn plain_uses_the_plain_renderer() {
        let out = render_single(
            OutputFormat::Plain,
            &lists(),
            |_| "table".into(),
            |l| l.names.join("\n"),
        )
        .unwrap();
        assert_eq!(out, "wl\nbl");
    }

    #[test]
    fn compact_json_is_single_line() {
        let out = render_single(
            OutputFormat::JsonCompact,
            &lists(),
            |_| String::new(),
            |_| String::new(),
        )
        .unwrap();
        assert_eq!(out, r#"{"names":["wl","bl"]}"#);
    }

    #[test]
    fn rounded_table_has_header_row() {
        #[derive(Tabled)]
        struct Row {
            #[tabled(rename = "List")]
            list: &'static str,
        }
        let out = render_table(&[Row { list: "wl" }]);
        assert!(out.contains("List"));
        assert!(out.contains("wl"));
        assert!(out.starts_with('╭'));
    }

    #[test]
    fn uncolored_cells_pass_through() {
        assert_eq!(paint_chain("srcnat", true), "srcnat");
        assert_eq!(paint_action("drop", false), "drop");
        assert_ne!(paint_action("drop", true), "drop");
    }
}
