//! Credential resolution for a MAC address, device, or group.

use secrecy::ExposeSecret;
use serde::Serialize;

use camcred_core::{AuthMode, Credentials};

use crate::cli::{GlobalOpts, ResolveArgs};
use crate::error::CliError;
use crate::output;

use super::Context;

const MASK: &str = "****";

#[derive(Debug, Serialize)]
struct CredentialsView {
    secret_name: String,
    auth_mode: AuthMode,
    username: String,
    password: String,
}

impl CredentialsView {
    fn new(secret_name: String, creds: &Credentials, show_password: bool) -> Self {
        let password = if show_password {
            creds.password.expose_secret().to_owned()
        } else if creds.password.expose_secret().is_empty() {
            String::new()
        } else {
            MASK.to_owned()
        };
        Self {
            secret_name,
            auth_mode: creds.auth_mode,
            username: creds.username.clone(),
            password,
        }
    }
}

fn secret_name_for(ctx: &Context, args: &ResolveArgs) -> Result<String, CliError> {
    if let Some(ref group) = args.group {
        return Ok(group.clone());
    }
    if let Some(ref mac) = args.mac {
        return Ok(ctx
            .resolver
            .mapper()
            .resolve_group_for_mac(mac, &ctx.resolver.default_secret_name()));
    }
    let name = args.device.as_deref().unwrap_or_default();
    let device = ctx
        .config
        .device(name)
        .ok_or_else(|| CliError::DeviceNotFound {
            name: name.to_owned(),
            available: available_devices(ctx),
        })?;
    Ok(ctx.resolver.resolve_secret_name_for_device(&device)?)
}

fn available_devices(ctx: &Context) -> String {
    let names: Vec<String> = ctx.config.devices().into_iter().map(|d| d.name).collect();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

pub fn handle(ctx: &Context, args: &ResolveArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let secret_name = secret_name_for(ctx, args)?;
    let creds = ctx.resolver.resolve_credentials_for_group(&secret_name)?;
    let view = CredentialsView::new(secret_name, &creds, args.show_password);
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            let or_dash = |s: &str| {
                if s.is_empty() {
                    output::muted("-", color)
                } else {
                    s.to_owned()
                }
            };
            output::detail_lines(&[
                ("Group", output::group_name(&v.secret_name, color)),
                ("Auth mode", v.auth_mode.to_string()),
                ("Username", or_dash(&v.username)),
                ("Password", or_dash(&v.password)),
            ])
        },
        |v| v.auth_mode.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
