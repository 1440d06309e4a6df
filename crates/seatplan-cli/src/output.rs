//! Plan rendering for the terminal and for scripts.

use std::collections::HashMap;
use std::io::{self, Write};

use owo_colors::OwoColorize;
use seatplan::{
    Conflict, ConflictReport, GuestId, SeatAssignmentRecord, SeatingPlan, Severity, Snapshot,
    SolveStatistics,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonPlan<'a> {
    score: String,
    feasible: bool,
    assignments: &'a [SeatAssignmentRecord],
    conflicts: &'a ConflictReport,
    statistics: &'a SolveStatistics,
}

pub fn print_json(plan: &SeatingPlan) -> serde_json::Result<()> {
    let json = JsonPlan {
        score: plan.score.to_string(),
        feasible: plan.is_feasible(),
        assignments: &plan.records,
        conflicts: &plan.report,
        statistics: &plan.statistics,
    };
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &json)?;
    let _ = writeln!(stdout);
    Ok(())
}

pub fn print_text(snapshot: &Snapshot, plan: &SeatingPlan) {
    let names: HashMap<&GuestId, &str> = snapshot
        .guests
        .iter()
        .map(|g| (&g.id, g.name.as_str()))
        .collect();
    let mut stdout = io::stdout().lock();

    for table in &snapshot.tables {
        let seated: Vec<&SeatAssignmentRecord> = plan
            .records
            .iter()
            .filter(|r| r.table_id == table.id)
            .collect();
        let occupancy = format!("{}/{}", seated.len(), table.capacity);
        let occupancy = if seated.len() > table.capacity as usize {
            occupancy.bright_red().bold().to_string()
        } else {
            occupancy.bright_black().to_string()
        };
        let _ = writeln!(stdout, "{} {}", table.id.bright_cyan().bold(), occupancy);
        for record in seated {
            let name = names.get(&record.guest_id).copied().unwrap_or("?");
            let _ = writeln!(
                stdout,
                "  {:>3}  {} {}",
                record.seat_number,
                name,
                format!("({})", record.guest_id).bright_black()
            );
        }
    }

    let _ = writeln!(stdout);
    if plan.report.is_empty() {
        let _ = writeln!(stdout, "{}", "No conflicts".bright_green());
    } else {
        for conflict in &plan.report {
            let _ = writeln!(stdout, "{}", format_conflict(conflict));
        }
    }

    let status = if plan.is_feasible() {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };
    let stats = &plan.statistics;
    let _ = writeln!(
        stdout,
        "\n{} │ {} │ {} iterations │ {:.1}% accepted │ {} ms",
        status,
        plan.score.to_string().bright_white().bold(),
        stats.iterations,
        stats.acceptance_rate() * 100.0,
        stats.total_duration().as_millis(),
    );
}

fn format_conflict(conflict: &Conflict) -> String {
    match conflict.severity {
        Severity::Hard => format!("{} {}", "✗".bright_red().bold(), conflict),
        Severity::Soft => format!("{} {}", "•".yellow(), conflict),
    }
}
