use std::io::IsTerminal;

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::report::{
    CompetitionReport, DriverReport, DriverSummary, HighlightRow, StandingRow, TeamReport,
    TeamSummary,
};
use crate::snapshot::{Competition, Position};
use crate::standings::StandingBreakdown;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a round date the long way ("Sat Apr 06 2024"), "-" when unknown
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%a %b %d %Y").to_string(),
        None => "-".to_string(),
    }
}

fn format_numero(numero: Option<u32>) -> String {
    numero.map(|n| format!("#{}", n)).unwrap_or_default()
}

/// One-line explanation of how a total was reached
/// e.g. "rounds 1,3 = 70, dropped R2, bonus +15, penalty -10"
pub fn format_breakdown(breakdown: &StandingBreakdown) -> String {
    let rounds = breakdown
        .rounds_counted
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let mut parts = vec![format!("rounds {} = {}", rounds, breakdown.round_points)];

    if let Some(dropped) = breakdown.dropped_round {
        parts.push(format!("dropped R{}", dropped));
    }
    if !breakdown.suspended_rounds.is_empty() {
        let suspended = breakdown
            .suspended_rounds
            .iter()
            .map(|r| format!("R{}", r))
            .collect::<Vec<_>>()
            .join(",");
        parts.push(format!("suspended {}", suspended));
    }
    if breakdown.attendance_bonus != 0 {
        parts.push(format!("bonus +{}", breakdown.attendance_bonus));
    } else {
        parts.push(format!("no bonus ({} rounds missed)", breakdown.missed_rounds));
    }
    if breakdown.penalty_points != 0 {
        parts.push(format!("penalty {:+}", breakdown.penalty_points.saturating_neg()));
    }

    parts.join(", ")
}

/// Format standings as a table with columns: Rank, Points, Poles, Name, Number
/// No headers. Rank column: 3 chars (fits "99."), points right-aligned in 5.
pub fn format_standings_table(report: &CompetitionReport, use_colors: bool) -> String {
    if report.standings.is_empty() {
        return "No results recorded for this competition.".to_string();
    }

    let term_width = get_terminal_width();
    let points_width = 5;
    let poles_width = 4;
    let separator = "  ";

    report
        .standings
        .iter()
        .map(|row| {
            let rank_str = format!("{:>2}.", row.rank);
            let points_str = format!("{:>width$}", row.total_points, width = points_width);
            let poles = format!("P{}", row.pole_positions);
            let poles_str = format!("{:>width$}", poles, width = poles_width);
            let numero = format_numero(row.numero);

            let fixed_width =
                3 + 1 + points_width + poles_width + separator.len() * 3 + numero.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&row.name, width - fixed_width)
                }
                Some(_) => truncate_name(&row.name, 20),
                None => row.name.clone(),
            };

            if use_colors {
                let points = if row.total_points < 0 {
                    points_str.red().bold().to_string()
                } else {
                    points_str.bold().to_string()
                };
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    points,
                    separator,
                    poles_str.cyan(),
                    separator,
                    name,
                    separator,
                    numero.yellow()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    rank_str, points_str, separator, poles_str, separator, name, separator, numero
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: rank, driver_id, name, points, poles (no headers, no colors)
pub fn format_standings_tsv(rows: &[StandingRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.rank, row.driver_id, row.name, row.total_points, row.pole_positions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format round highlights: Round, Date, Pole Sitter, Race Winner
pub fn format_highlights_table(rows: &[HighlightRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No rounds recorded for this competition.".to_string();
    }

    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            let name = format!("{:<width$}", row.name, width = name_width);
            let date = format!("{:<15}", format_date(row.date));
            if use_colors {
                format!(
                    "{}  {}  pole: {}  winner: {}",
                    name.bold(),
                    date.dimmed(),
                    row.pole_sitter.cyan(),
                    row.race_winner.green()
                )
            } else {
                format!(
                    "{}  {}  pole: {}  winner: {}",
                    name, date, row.pole_sitter, row.race_winner
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Columns: round_id, name, date (ISO or empty), pole_sitter, race_winner
pub fn format_highlights_tsv(rows: &[HighlightRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.round_id,
                row.name,
                row.date.map(|d| d.to_string()).unwrap_or_default(),
                row.pole_sitter,
                row.race_winner
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a driver profile with detailed multi-line output
pub fn format_driver_report(report: &DriverReport, use_colors: bool) -> String {
    let driver = &report.driver;
    let stats = &report.stats;
    let mut lines = Vec::new();

    let numero = format_numero(driver.numero);
    if use_colors {
        lines.push(format!("{} {}", driver.name.bold(), numero.yellow()));
    } else {
        lines.push(format!("{} {}", driver.name, numero));
    }
    lines.push(format!("  Team: {}", report.team.as_deref().unwrap_or("-")));
    lines.push(format!(
        "  Races: {}  Victories: {}  Top 3: {}  Top 5: {}  Poles: {}",
        stats.races, stats.victories, stats.top3, stats.top5, stats.pole_positions
    ));

    if !stats.races_by_year.is_empty() {
        let years = stats
            .races_by_year
            .iter()
            .map(|(year, count)| format!("{}: {}", year, count))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  Races per year: {}", years));
    }

    if !report.competitions.is_empty() {
        lines.push("  Competitions:".to_string());
        for c in &report.competitions {
            lines.push(format!(
                "    {:>2}. {} ({} pts, P{})",
                c.rank, c.name, c.total_points, c.pole_positions
            ));
        }
    }

    if !report.recent_races.is_empty() {
        lines.push("  Recent races:".to_string());
        for race in &report.recent_races {
            lines.push(format!(
                "    {} / {}  {}  {}",
                race.competition,
                race.round,
                format_date(race.date),
                format_position(race.position)
            ));
        }
    }

    lines.join("\n")
}

/// Format a raw position for humans: "P3", "DNS", "SUSP", "DSQ"
pub fn format_position(position: i32) -> String {
    match Position::classify(position) {
        Position::Rank(n) => format!("P{}", n),
        Position::Missed => "DNS".to_string(),
        Position::Suspended => "SUSP".to_string(),
        Position::Disqualified => "DSQ".to_string(),
    }
}

/// Format competitions as "{id}  {name}" lines
pub fn format_competitions(competitions: &[Competition]) -> String {
    if competitions.is_empty() {
        return "No competitions found.".to_string();
    }

    competitions
        .iter()
        .map(|c| format!("{:>4}  {}", c.id, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a team with its drivers, one "name  #numero  points (poles)" line each
pub fn format_team_report(report: &TeamReport, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if use_colors {
        lines.push(report.team.name.bold().to_string());
    } else {
        lines.push(report.team.name.clone());
    }
    lines.push(format!("  Competitions: {}", report.competitions));

    if report.drivers.is_empty() {
        lines.push("  No drivers in this team.".to_string());
        return lines.join("\n");
    }

    let name_width = report
        .drivers
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0);
    for driver in &report.drivers {
        let name = format!("{:<width$}", driver.name, width = name_width);
        let numero = format!("{:<4}", format_numero(driver.numero));
        let points = format!("{:>5} pts", driver.total_points);
        let poles = format!("P{}", driver.pole_positions);
        if use_colors {
            lines.push(format!(
                "  {}  {}  {}  {}",
                name,
                numero.yellow(),
                points.bold(),
                poles.cyan()
            ));
        } else {
            lines.push(format!("  {}  {}  {}  {}", name, numero, points, poles));
        }
    }

    lines.join("\n")
}

/// Format teams as "{id}  {name}  {drivers} drivers, {competitions} competitions"
pub fn format_teams(teams: &[TeamSummary]) -> String {
    if teams.is_empty() {
        return "No teams found.".to_string();
    }

    teams
        .iter()
        .map(|t| {
            format!(
                "{:>4}  {}  {} drivers, {} competitions",
                t.id, t.name, t.drivers, t.competitions
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format drivers as "{id}  {name} {#numero}  {team}"
pub fn format_drivers(drivers: &[DriverSummary]) -> String {
    if drivers.is_empty() {
        return "No drivers found.".to_string();
    }

    drivers
        .iter()
        .map(|d| {
            let line = format!("{:>4}  {} {}", d.id, d.name, format_numero(d.numero));
            match &d.team {
                Some(team) => format!("{}  ({})", line.trim_end(), team),
                None => line.trim_end().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
