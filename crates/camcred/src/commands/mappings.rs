//! Installed MAC address mappings.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Debug, Serialize)]
struct MappingView {
    mac: String,
    secret_name: String,
}

#[derive(Tabled)]
struct MappingRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Group")]
    group: String,
}

fn sorted_views(ctx: &Context) -> Vec<MappingView> {
    let snapshot = ctx.resolver.mapper().snapshot();
    let mut entries: Vec<_> = snapshot.iter().collect();
    entries.sort_by(|a, b| a.0.octets().cmp(b.0.octets()));
    entries
        .into_iter()
        .map(|(mac, group)| MappingView {
            mac: mac.to_string(),
            secret_name: group.clone(),
        })
        .collect()
}

pub fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let views = sorted_views(ctx);
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &views,
        |v| MappingRow {
            mac: v.mac.clone(),
            group: output::group_name(&v.secret_name, color),
        },
        |v| format!("{}\t{}", v.mac, v.secret_name),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
