//! Configured device listing.

use serde::Serialize;
use tabled::Tabled;

use camcred_core::Device;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::Context;

#[derive(Debug, Serialize)]
struct DeviceView {
    name: String,
    /// MAC address as configured on the device, if any.
    mac: Option<String>,
    /// Own MAC, or a known MAC found in the endpoint reference.
    identity: Option<String>,
    endpoint_ref: Option<String>,
    secret_name: Option<String>,
    error: Option<String>,
}

impl DeviceView {
    fn build(ctx: &Context, device: &Device) -> Self {
        let (secret_name, error) = match ctx.resolver.resolve_secret_name_for_device(device) {
            Ok(name) => (Some(name), None),
            Err(err) => (None, Some(err.to_string())),
        };
        Self {
            name: device.name.clone(),
            mac: device.mac_address().map(str::to_owned),
            identity: ctx
                .resolver
                .mapper()
                .infer_device_mac(device)
                .map(|m| m.to_string()),
            endpoint_ref: device.endpoint_ref_address().map(str::to_owned),
            secret_name,
            error,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Group")]
    group: String,
}

impl DeviceRow {
    fn from_view(v: &DeviceView, color: bool) -> Self {
        let dash = || output::muted("-", color);
        Self {
            name: v.name.clone(),
            mac: v.mac.clone().unwrap_or_else(dash),
            identity: v.identity.clone().unwrap_or_else(dash),
            group: match (&v.secret_name, &v.error) {
                (Some(name), _) => output::group_name(name, color),
                (None, Some(err)) => err.clone(),
                (None, None) => dash(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let views: Vec<DeviceView> = ctx
        .config
        .devices()
        .iter()
        .map(|d| DeviceView::build(ctx, d))
        .collect();
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &views,
        |v| DeviceRow::from_view(v, color),
        |v| v.name.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
