//! `cc-switch providers`: the provider registry as a table.

use anyhow::Result;
use ccswitch_core::{providers, ProviderDefinition};

use crate::terminal_output::{render_table, Column};

pub fn run(active: Option<&str>) -> Result<()> {
    print!("{}", render(providers::all(), active));
    Ok(())
}

pub fn render(items: &[ProviderDefinition], active: Option<&str>) -> String {
    let columns = [
        Column::left(""),
        Column::left("ID"),
        Column::left("Name"),
        Column::left("Base URL"),
        Column::left("Auth"),
        Column::left("Default model"),
    ];
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|p| {
            vec![
                if Some(p.id) == active { "*".into() } else { String::new() },
                p.id.to_string(),
                p.display_name.to_string(),
                p.default_base_url().unwrap_or("-").to_string(),
                p.auth_env_var.unwrap_or("-").to_string(),
                if p.default_model.is_empty() { "-".into() } else { p.default_model.to_string() },
            ]
        })
        .collect();
    render_table(&columns, &rows)
}
