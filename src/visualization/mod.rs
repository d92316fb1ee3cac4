mod charts;
mod tables;

pub use charts::{format_trajectory_chart, print_trajectory_chart};
pub use tables::{
    format_regional_summary, format_report_table, format_scenario_table, print_regional_summary,
    print_report_table, print_scenario_table,
};
