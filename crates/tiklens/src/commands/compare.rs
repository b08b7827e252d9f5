//! `compare`: address-list differences between the two router slots.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tabled::Tabled;

use tiklens_core::{
    Acquirer, Comparison, CoreError, Dashboard, EntryKey, ExportDocument, RouterSlot, RouterState,
    RouterSummary, list_bindings,
};

use crate::cli::CompareArgs;
use crate::config::{self, RouterOverrides};
use crate::error::CliError;
use crate::output;

use super::{Ctx, connect, util};

// ── Sources ─────────────────────────────────────────────────────────

/// Where one side of the comparison comes from.
enum Source {
    Live(RouterOverrides),
    File(std::path::PathBuf),
}

fn sources(args: CompareArgs) -> [(RouterSlot, Source); 2] {
    let primary = match args.primary_file {
        Some(path) => Source::File(path),
        None => Source::Live(RouterOverrides {
            host: args.primary_host,
            username: args.primary_username,
            password: args.primary_password,
            name: None,
        }),
    };
    let secondary = match args.secondary_file {
        Some(path) => Source::File(path),
        None => Source::Live(RouterOverrides {
            host: args.secondary_host,
            username: args.secondary_username,
            password: args.secondary_password,
            name: None,
        }),
    };
    [
        (RouterSlot::Primary, primary),
        (RouterSlot::Secondary, secondary),
    ]
}

pub(crate) fn read_document(path: &Path) -> Result<ExportDocument, CliError> {
    let json = std::fs::read_to_string(path).map_err(|e| CliError::Export {
        message: format!("cannot read {}: {e}", path.display()),
    })?;
    ExportDocument::from_json(&json).map_err(|e| CliError::Export {
        message: format!("{} is not an export document: {e}", path.display()),
    })
}

/// Fill both slots: documents first, then live connects (concurrently
/// when both sides are live).
async fn populate(
    dash: &mut Dashboard<Acquirer>,
    sources: [(RouterSlot, Source); 2],
    ctx: &Ctx,
) -> Result<(), CliError> {
    let mut live = Vec::new();
    for (slot, source) in sources {
        match source {
            Source::File(path) => dash.load_snapshot(slot, read_document(&path)?),
            Source::Live(overrides) => {
                live.push((
                    slot,
                    config::resolve_credentials(&ctx.config, slot, overrides)?,
                ));
            }
        }
    }

    let pb = (!live.is_empty()).then(|| {
        let hosts: Vec<&str> = live.iter().map(|(_, c)| c.host.as_str()).collect();
        util::spinner(format!("Connecting to {}", hosts.join(" and ")), ctx.quiet)
    });

    let mut live = live.into_iter();
    match (live.next(), live.next()) {
        (Some((_, primary)), Some((_, secondary))) => {
            dash.connect_both(primary, secondary).await;
        }
        (Some((slot, creds)), None) => {
            dash.connect(slot, creds).await;
        }
        _ => {}
    }

    if let Some(pb) = pb.flatten() {
        pb.finish_and_clear();
    }
    Ok(())
}

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Router")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Address Lists")]
    address_lists: usize,
    #[tabled(rename = "Firewall Rules")]
    firewall_rules: usize,
}

impl From<&RouterSummary> for SummaryRow {
    fn from(s: &RouterSummary) -> Self {
        Self {
            name: s.name.clone(),
            host: s.host.clone(),
            address_lists: s.address_lists,
            firewall_rules: s.firewall_rules,
        }
    }
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "List")]
    list: String,
    #[tabled(rename = "Address")]
    address: String,
}

/// A firewall rule that references one of the differing lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuleReference {
    list: String,
    binding: &'static str,
    rule_id: String,
    chain: String,
    action: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareView<'a> {
    #[serde(flatten)]
    comparison: &'a Comparison,
    total_differences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_references: Option<Vec<RuleReference>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    second_references: Option<Vec<RuleReference>>,
}

/// Rules of `state` bound to any list named in `keys`.
fn references(state: &RouterState, keys: &BTreeSet<EntryKey>) -> Vec<RuleReference> {
    let names: BTreeSet<&str> = keys.iter().map(|k| k.list.as_str()).collect();
    let lists = &names;
    state
        .firewall_rules
        .iter()
        .flat_map(move |rule| {
            list_bindings(rule)
                .into_iter()
                .filter(move |(_, list)| lists.contains(list))
                .map(move |(binding, list)| RuleReference {
                    list: list.to_owned(),
                    binding,
                    rule_id: rule.id.clone(),
                    chain: rule.chain.clone(),
                    action: rule.action.clone(),
                })
        })
        .collect()
}

fn entry_section(title: &str, keys: &BTreeSet<EntryKey>) -> String {
    let rows: Vec<EntryRow> = keys
        .iter()
        .map(|k| EntryRow {
            list: k.list.clone(),
            address: k.address.clone(),
        })
        .collect();
    format!("{title} ({})\n{}", keys.len(), output::render_table(&rows))
}

fn reference_lines(refs: &[RuleReference], color: bool) -> String {
    refs.iter()
        .map(|r| {
            format!(
                "  {} {}={} {} {}",
                r.rule_id,
                r.binding,
                r.list,
                output::paint_chain(&r.chain, color),
                output::paint_action(&r.action, color)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn detail(view: &CompareView<'_>, color: bool) -> String {
    let c = view.comparison;
    let summary = [SummaryRow::from(&c.first), SummaryRow::from(&c.second)];
    let mut sections = vec![output::render_table(&summary)];

    if c.is_identical() {
        sections.push("Address lists are identical.".into());
        return sections.join("\n\n");
    }

    sections.push(format!("{} difference(s)", view.total_differences));
    let sides = [
        (&c.first, &c.only_in_first, &view.first_references),
        (&c.second, &c.only_in_second, &view.second_references),
    ];
    for (summary, keys, refs) in sides {
        if keys.is_empty() {
            continue;
        }
        sections.push(entry_section(&format!("Only on {}", summary.name), keys));
        if let Some(refs) = refs.as_deref().filter(|r| !r.is_empty()) {
            sections.push(format!(
                "Rules on {} using these lists\n{}",
                summary.name,
                reference_lines(refs, color)
            ));
        }
    }
    sections.join("\n\n")
}

/// Diff-style lines: `-` only on the first router, `+` only on the second.
fn plain(view: &CompareView<'_>) -> String {
    let c = view.comparison;
    c.only_in_first
        .iter()
        .map(|k| format!("-{k}"))
        .chain(c.only_in_second.iter().map(|k| format!("+{k}")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render(
    dash: &Dashboard<Acquirer>,
    comparison: &Comparison,
    details: bool,
    ctx: &Ctx,
) -> Result<String, CliError> {
    let view = CompareView {
        comparison,
        total_differences: comparison.total_differences(),
        first_references: details.then(|| {
            references(dash.state(RouterSlot::Primary), &comparison.only_in_first)
        }),
        second_references: details.then(|| {
            references(
                dash.state(RouterSlot::Secondary),
                &comparison.only_in_second,
            )
        }),
    };
    output::render_single(ctx.output, &view, |v| detail(v, ctx.color), plain)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: CompareArgs, ctx: &Ctx) -> Result<(), CliError> {
    let details = args.details;
    let mut dash = util::dashboard(&ctx.acquisition)?;
    populate(&mut dash, sources(args), ctx).await?;

    for slot in RouterSlot::ALL {
        connect::report_notice(dash.state(slot), ctx);
    }

    let comparison = dash.compare().map_err(|err| not_connected(&dash, err))?;
    let out = render(&dash, &comparison, details, ctx)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}

/// Attach the failing slot's own error to a not-connected report.
fn not_connected(dash: &Dashboard<Acquirer>, err: CoreError) -> CliError {
    let CoreError::NotConnected { router } = err else {
        return err.into();
    };
    let reason = RouterSlot::ALL
        .into_iter()
        .map(|slot| dash.state(slot))
        .find(|state| state.display_name() == router)
        .and_then(RouterState::error)
        .map_or_else(
            || "No connection attempt succeeded.".to_owned(),
            ToOwned::to_owned,
        );
    CliError::NotConnected { router, reason }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tiklens_core::{AddressListEntry, Credentials, DataOrigin, FirewallRule};

    fn state(slot: RouterSlot, entries: &[(&str, &str)], rules: Vec<FirewallRule>) -> RouterState {
        RouterState::connected(
            Credentials::for_slot(slot).with_host(format!("10.0.0.{}", slot.id())),
            entries
                .iter()
                .enumerate()
                .map(|(i, (list, addr))| AddressListEntry::new(format!("*{i}"), *list, *addr))
                .collect(),
            rules,
            DataOrigin::Live,
        )
    }

    fn drop_rule(list: &str) -> FirewallRule {
        let mut rule = FirewallRule::new("*7", "forward", "drop");
        rule.dst_address_list = Some(list.into());
        rule
    }

    #[test]
    fn references_follow_differing_lists_only() {
        let first = state(
            RouterSlot::Primary,
            &[("bl", "1.1.1.1")],
            vec![drop_rule("bl"), drop_rule("other")],
        );
        let second = state(RouterSlot::Secondary, &[], vec![]);
        let cmp = tiklens_core::compare(&first, &second).unwrap();

        let refs = references(&first, &cmp.only_in_first);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].list, "bl");
        assert_eq!(refs[0].binding, "dst");
    }

    #[test]
    fn plain_output_marks_sides() {
        let first = state(RouterSlot::Primary, &[("wl", "1.1.1.1")], vec![]);
        let second = state(RouterSlot::Secondary, &[("bl", "2.2.2.2")], vec![]);
        let cmp = tiklens_core::compare(&first, &second).unwrap();
        let view = CompareView {
            comparison: &cmp,
            total_differences: cmp.total_differences(),
            first_references: None,
            second_references: None,
        };
        assert_eq!(plain(&view), "-wl:1.1.1.1\n+bl:2.2.2.2");
    }

    #[test]
    fn identical_routers_say_so() {
        let first = state(RouterSlot::Primary, &[("wl", "1.1.1.1")], vec![]);
        let second = state(RouterSlot::Secondary, &[("wl", "1.1.1.1")], vec![]);
        let cmp = tiklens_core::compare(&first, &second).unwrap();
        let view = CompareView {
            comparison: &cmp,
            total_differences: 0,
            first_references: None,
            second_references: None,
        };
        assert!(detail(&view, false).ends_with("Address lists are identical."));
    }

    #[test]
    fn json_view_flattens_the_comparison() {
        let first = state(RouterSlot::Primary, &[("wl", "1.1.1.1")], vec![]);
        let second = state(RouterSlot::Secondary, &[], vec![]);
        let cmp = tiklens_core::compare(&first, &second).unwrap();
        let view = CompareView {
            comparison: &cmp,
            total_differences: 1,
            first_references: None,
            second_references: None,
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["onlyInFirst"][0], "wl:1.1.1.1");
        assert_eq!(value["totalDifferences"], 1);
        assert!(value.get("firstReferences").is_none());
    }

    #[test]
    fn unreadable_document_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(err, CliError::Export { .. }));
    }
}
