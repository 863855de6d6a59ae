pub mod formatter;

pub use formatter::{
    format_breakdown, format_competitions, format_date, format_driver_report, format_drivers,
    format_highlights_table, format_highlights_tsv, format_position, format_standings_table,
    format_standings_tsv, format_team_report, format_teams, should_use_colors,
};
