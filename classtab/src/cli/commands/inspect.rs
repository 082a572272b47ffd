//! `inspect` command: show the tables a page would receive.

use classtab_core::model::SummaryTable;
use classtab_docs::synthesize::{PlannedTable, inspect_html};

use crate::cli::args::{InspectArgs, OutputFormat};
use crate::config::{Limits, load_config};
use crate::error::ClassTabError;

/// Runs `inspect`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the page cannot be
/// read or parsed.
pub fn run(args: &InspectArgs) -> Result<(), ClassTabError> {
    let config = load_config(args.config.as_deref(), &Limits::default())?;
    let html = std::fs::read_to_string(&args.file).map_err(|source| ClassTabError::Read {
        path: args.file.clone(),
        source,
    })?;
    let plans = inspect_html(&html, &config).map_err(|source| ClassTabError::Page {
        path: args.file.clone(),
        source,
    })?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plans)?),
        OutputFormat::Human => {
            if plans.is_empty() {
                println!("no class blocks found");
            }
            for plan in &plans {
                print!("{}", render_plan(plan));
            }
        }
    }
    Ok(())
}

/// Renders one planned table as aligned plain-text columns.
#[must_use]
pub fn render_plan(plan: &PlannedTable) -> String {
    let table = &plan.table;
    let mut out = format!("{} ({} rows)\n", plan.block, table.rows.len());
    if table.rows.is_empty() {
        out.push_str("  (no members)\n");
        return out;
    }

    let grid = text_grid(table);
    let widths: Vec<usize> = (0..3)
        .map(|col| grid.iter().map(|row| row[col].len()).max().unwrap_or(0))
        .collect();

    for row in &grid {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn text_grid(table: &SummaryTable) -> Vec<[String; 3]> {
    let header = table
        .header
        .each_ref()
        .map(|h| h.as_ref().map_or_else(String::new, |h| h.label.clone()));
    std::iter::once(header)
        .chain(table.rows.iter().map(|row| {
            row.each_ref()
                .map(|c| c.as_ref().map_or_else(String::new, |c| c.label.clone()))
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use classtab_core::config::Labels;
    use classtab_core::model::{Member, MemberKind};
    use classtab_docs::table::{ClassMembers, build_table};

    #[test]
    fn test_render_plan_aligns_columns() {
        let members: ClassMembers = [
            Member {
                kind: MemberKind::Property,
                name: "width".to_string(),
                anchor: "C.width".to_string(),
            },
            Member {
                kind: MemberKind::Method,
                name: "draw".to_string(),
                anchor: "C.draw".to_string(),
            },
        ]
        .into_iter()
        .collect();
        let plan = PlannedTable {
            block: "class C".to_string(),
            table: build_table(&members, &Labels::default()),
        };

        assert_eq!(
            render_plan(&plan),
            "class C (1 rows)\n  Properties |  | Methods\n  width      |  | draw()\n"
        );
    }

    #[test]
    fn test_render_empty_plan() {
        let plan = PlannedTable {
            block: "class E".to_string(),
            table: SummaryTable::default(),
        };
        assert_eq!(render_plan(&plan), "class E (0 rows)\n  (no members)\n");
    }
}
