//! `cc-switch ps`: processes started through `cc-switch run` that are still alive.

use anyhow::Result;
use ccswitch_supervisor::{ProcessRecord, ProcessTable};

use crate::terminal_output::{note_info, render_table, Column};

pub async fn run(table: &ProcessTable) -> Result<()> {
    let records = table.list_alive().await?;
    if records.is_empty() {
        note_info("No running processes launched by cc-switch.");
        return Ok(());
    }
    print!("{}", render(&records));
    Ok(())
}

pub fn render(records: &[ProcessRecord]) -> String {
    let columns = [
        Column::right("PID"),
        Column::left("Provider"),
        Column::left("Started"),
        Column::left("Directory").max_width(40),
        Column::left("Command").max_width(60),
    ];
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.pid.to_string(),
                r.provider.clone(),
                r.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.cwd.clone(),
                r.command.clone(),
            ]
        })
        .collect();
    render_table(&columns, &rows)
}
