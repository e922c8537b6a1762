//! MAC-to-group lookups: `group` and `match`.

use serde::Serialize;

use camcred_core::MacAddress;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Where a resolved group name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum GroupSource {
    /// Listed in `credentials_map`.
    Mapped,
    /// Unmapped, fell back to `default_secret_name`.
    Default,
    /// Unparseable MAC, no authentication.
    NoAuth,
}

impl GroupSource {
    fn label(self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::Default => "default",
            Self::NoAuth => "noauth",
        }
    }
}

#[derive(Debug, Serialize)]
struct GroupView {
    input: String,
    mac: Option<String>,
    secret_name: String,
    source: GroupSource,
}

#[derive(Debug, Serialize)]
struct MatchView {
    text: String,
    mac: String,
    secret_name: String,
}

fn group_view(ctx: &Context, raw: &str) -> GroupView {
    let mapper = ctx.resolver.mapper();
    let default_name = ctx.resolver.default_secret_name();
    let secret_name = mapper.resolve_group_for_mac(raw, &default_name);

    let mac = MacAddress::parse(raw).ok();
    let source = match &mac {
        None => GroupSource::NoAuth,
        Some(mac) if mapper.snapshot().contains_key(mac) => GroupSource::Mapped,
        Some(_) => GroupSource::Default,
    };

    GroupView {
        input: raw.to_owned(),
        mac: mac.map(|m| m.to_string()),
        secret_name,
        source,
    }
}

pub fn group(ctx: &Context, raw: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let view = group_view(ctx, raw);
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            output::detail_lines(&[
                (
                    "MAC",
                    v.mac.clone().unwrap_or_else(|| output::muted("-", color)),
                ),
                ("Group", output::group_name(&v.secret_name, color)),
                ("Source", v.source.label().to_owned()),
            ])
        },
        |v| v.secret_name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn find(ctx: &Context, text: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mapper = ctx.resolver.mapper();
    let mac = mapper
        .find_mac_in_opaque_string(text)
        .ok_or_else(|| CliError::NoMatch {
            text: text.to_owned(),
        })?;

    let secret_name =
        mapper.resolve_group_for_mac(&mac.to_string(), &ctx.resolver.default_secret_name());
    let view = MatchView {
        text: text.to_owned(),
        mac: mac.to_string(),
        secret_name,
    };
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            output::detail_lines(&[
                ("MAC", v.mac.clone()),
                ("Group", output::group_name(&v.secret_name, color)),
            ])
        },
        |v| v.mac.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
