//! Config subcommand handlers.

use std::fmt::Write;

use camcred_config::{Config, load_config_from};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::config_file;

// ── Helpers ─────────────────────────────────────────────────────────

fn sorted<V>(map: &std::collections::HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

/// Format config for display, masking secret values.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "default_secret_name = \"{}\"", cfg.default_secret_name);
    let _ = writeln!(out, "use_keyring = {}", cfg.use_keyring);

    if !cfg.credentials_map.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[credentials_map]");
        for (name, macs) in sorted(&cfg.credentials_map) {
            let _ = writeln!(out, "{name} = \"{macs}\"");
        }
    }

    for (name, fields) in sorted(&cfg.secrets) {
        let _ = writeln!(out);
        let _ = writeln!(out, "[secrets.{name}]");
        for (key, value) in sorted(fields) {
            if key == "username" || key == "mode" {
                let _ = writeln!(out, "{key} = \"{value}\"");
            } else {
                let _ = writeln!(out, "{key} = \"****\"");
            }
        }
    }

    for device in cfg.devices() {
        for (protocol, props) in sorted(&device.protocols) {
            let _ = writeln!(out);
            let _ = writeln!(out, "[devices.{}.protocols.{protocol}]", device.name);
            for (key, value) in sorted(props) {
                let _ = writeln!(out, "{key} = \"{value}\"");
            }
        }
    }

    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_file(global);
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config_from(&path)?;
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
