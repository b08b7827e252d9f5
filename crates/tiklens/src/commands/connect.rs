//! `connect`: acquire one router and show its firewall data.

use serde::Serialize;
use tabled::Tabled;

use tiklens_core::{
    AddressListEntry, DataOrigin, FirewallRule, RouterSlot, RouterState, list_bindings,
};

use crate::cli::{ConnectArgs, OutputFormat, ViewArg};
use crate::config::{self, RouterOverrides};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct AddressRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "List")]
    list: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Timeout")]
    timeout: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl From<&AddressListEntry> for AddressRow {
    fn from(e: &AddressListEntry) -> Self {
        Self {
            id: e.id.clone(),
            list: e.list.clone(),
            address: e.address.clone(),
            timeout: e.timeout.clone().unwrap_or_default(),
            flags: flags(e.disabled, e.dynamic),
            comment: e.comment.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct RuleRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Chain")]
    chain: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Src")]
    src: String,
    #[tabled(rename = "Dst")]
    dst: String,
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "Dst Port")]
    dst_port: String,
    #[tabled(rename = "Address Lists")]
    lists: String,
    #[tabled(rename = "Flags")]
    flags: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

impl RuleRow {
    pub(crate) fn new(position: usize, r: &FirewallRule, color: bool) -> Self {
        Self {
            position,
            id: r.id.clone(),
            chain: output::paint_chain(&r.chain, color),
            action: output::paint_action(&r.action, color),
            src: r.src_address.clone().unwrap_or_default(),
            dst: r.dst_address.clone().unwrap_or_default(),
            protocol: r.protocol.clone().unwrap_or_default(),
            dst_port: r.dst_port.clone().unwrap_or_default(),
            lists: list_bindings(r)
                .into_iter()
                .map(|(label, list)| format!("{label}={list}"))
                .collect::<Vec<_>>()
                .join(" "),
            flags: flags(r.disabled, None),
            comment: r.comment.clone().unwrap_or_default(),
        }
    }
}

/// RouterOS-style flag letters: X disabled, D dynamic.
fn flags(disabled: Option<bool>, dynamic: Option<bool>) -> String {
    let mut out = String::new();
    if disabled == Some(true) {
        out.push('X');
    }
    if dynamic == Some(true) {
        out.push('D');
    }
    out
}

// ── Structured view ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouterView<'a> {
    router: &'a str,
    host: &'a str,
    origin: Option<DataOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_lists: Option<&'a [AddressListEntry]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    firewall_rules: Option<&'a [FirewallRule]>,
}

impl<'a> RouterView<'a> {
    fn new(state: &'a RouterState, view: ViewArg) -> Self {
        let lists = matches!(view, ViewArg::All | ViewArg::AddressLists);
        let rules = matches!(view, ViewArg::All | ViewArg::FirewallRules);
        Self {
            router: state.display_name(),
            host: &state.credentials.host,
            origin: state.origin(),
            notice: state.error(),
            address_lists: lists.then_some(state.address_lists.as_slice()),
            firewall_rules: rules.then_some(state.firewall_rules.as_slice()),
        }
    }
}

fn detail(view: &RouterView<'_>, color: bool) -> String {
    let origin = match view.origin {
        Some(DataOrigin::Demo) => " [demo data]",
        Some(DataOrigin::Snapshot) => " [from file]",
        _ => "",
    };
    let mut sections = vec![format!("{} ({}){origin}", view.router, view.host)];

    if let Some(lists) = view.address_lists {
        let rows: Vec<AddressRow> = lists.iter().map(AddressRow::from).collect();
        sections.push(format!(
            "Address lists ({})\n{}",
            lists.len(),
            output::render_table(&rows)
        ));
    }
    if let Some(rules) = view.firewall_rules {
        let rows: Vec<RuleRow> = rules
            .iter()
            .enumerate()
            .map(|(i, r)| RuleRow::new(i, r, color))
            .collect();
        sections.push(format!(
            "Firewall rules ({})\n{}",
            rules.len(),
            output::render_table(&rows)
        ));
    }
    sections.join("\n\n")
}

fn plain(view: &RouterView<'_>) -> String {
    let lists = view
        .address_lists
        .unwrap_or_default()
        .iter()
        .map(|e| format!("{}\t{}", e.list, e.address));
    let rules = view
        .firewall_rules
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{}\t{}\t{}", r.id, r.chain, r.action));
    lists.chain(rules).collect::<Vec<_>>().join("\n")
}

/// Render one connected router in the selected format.
pub(crate) fn render_state(
    state: &RouterState,
    view: ViewArg,
    format: OutputFormat,
    color: bool,
) -> Result<String, CliError> {
    let view = RouterView::new(state, view);
    output::render_single(format, &view, |v| detail(v, color), plain)
}

/// Print the fallback notice of a demo-data connection to stderr.
pub(crate) fn report_notice(state: &RouterState, ctx: &Ctx) {
    if ctx.quiet || state.origin() != Some(DataOrigin::Demo) {
        return;
    }
    if let Some(notice) = state.error() {
        eprintln!(
            "{}",
            output::warning(&format!("{}: {notice}", state.display_name()), ctx.color)
        );
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ConnectArgs, ctx: &Ctx) -> Result<(), CliError> {
    let slot: RouterSlot = args.router.router;
    let creds =
        config::resolve_credentials(&ctx.config, slot, RouterOverrides::from(&args.router))?;

    let mut dash = util::dashboard(&ctx.acquisition)?;
    let pb = util::spinner(format!("Connecting to {}", creds.host), ctx.quiet);
    let state = dash.connect(slot, creds).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    util::ensure_connected(state)?;
    report_notice(state, ctx);

    let out = render_state(state, args.view, ctx.output, ctx.color)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
