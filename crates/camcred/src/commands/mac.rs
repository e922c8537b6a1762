//! MAC address normalization helpers.

use serde::Serialize;

use camcred_core::MacAddress;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct MacView {
    input: String,
    canonical: String,
    reversed: String,
}

fn parse(raw: &str) -> Result<MacView, CliError> {
    let mac = MacAddress::parse(raw)?;
    Ok(MacView {
        input: raw.to_owned(),
        canonical: mac.to_string(),
        reversed: mac.reversed().to_string(),
    })
}

fn detail(view: &MacView) -> String {
    output::detail_lines(&[
        ("Input", view.input.clone()),
        ("Canonical", view.canonical.clone()),
        ("Reversed", view.reversed.clone()),
    ])
}

pub fn sanitize(raw: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let view = parse(raw)?;
    let out = output::render_single(&global.output, &view, detail, |v| v.canonical.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn reverse(raw: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let view = parse(raw)?;
    let out = output::render_single(&global.output, &view, detail, |v| v.reversed.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
