//! SLI command implementation

use crate::cli::output::{Output, Table};
use crate::resolve::{resolve_observed_sli_tag, SLI_THRESHOLDS};

/// Run the sli command
pub fn run_sli(elapsed_ms: u64, show_table: bool) -> anyhow::Result<()> {
    println!("{}", resolve_observed_sli_tag(elapsed_ms));

    if show_table {
        Output::header("SLI thresholds");
        let mut table = Table::new(vec!["Up to", "Label"]);
        for (bound, label) in SLI_THRESHOLDS {
            table.add_row(vec![format!("{bound}ms"), label.to_string()]);
        }
        table.print();
    }

    Ok(())
}
