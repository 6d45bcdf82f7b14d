//! Floor plan demo
//!
//! Builds a plan and draws it into the terminal as character cells.
//!
//! ```text
//! cargo run --example plan_demo                # reference house
//! cargo run --example plan_demo -- plan.json   # request read from a file
//! FLOORPLAN_LOG=/tmp/floorplan.jsonl cargo run --example plan_demo
//! ```

use std::env;
use std::fs;
use std::io::{self, Write};

use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute};
use floorplan::{
    CellCanvas, EngineConfig, FileSink, JsonResolver, LayoutBuilder, LayoutResolver, Logger,
    PlanView, Result, SurfaceSize, TemplateResolver,
};

const LOG_ROTATE_BYTES: u64 = 1 << 20;

fn main() -> Result<()> {
    let mut config = EngineConfig::default();
    if let Ok(path) = env::var("FLOORPLAN_LOG") {
        match FileSink::new(&path, LOG_ROTATE_BYTES) {
            Ok(sink) => config = config.with_logger(Logger::new(sink)),
            Err(err) => eprintln!("logging disabled: {err}"),
        }
    }
    config.enable_metrics();

    let builder = LayoutBuilder::from_config(&config);
    let outcome = match env::args().nth(1) {
        Some(path) => JsonResolver.build(&fs::read_to_string(path)?, &builder)?,
        None => TemplateResolver.build("", &builder)?,
    };

    let (cols, rows) = terminal::size().unwrap_or((120, 40));
    let canvas = CellCanvas::default().with_origin(0, 1);
    let size = SurfaceSize::new(
        f64::from(cols) * 5.0,
        f64::from(rows.saturating_sub(reserved_rows(outcome.warnings.len()))) * 10.0,
    );

    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    writeln!(
        stdout,
        "{} rooms, {} doors",
        outcome.plan.rooms().len(),
        outcome.plan.doors().len()
    )?;

    let mut view = PlanView::mount_with_config(canvas, &config, size);
    view.show(&outcome.plan)?;
    view.surface().present(&mut stdout)?;

    let footer = u16::try_from(view.surface().rows())
        .unwrap_or(u16::MAX)
        .saturating_add(1);
    execute!(stdout, cursor::MoveTo(0, footer))?;
    for warning in &outcome.warnings {
        writeln!(stdout, "warning: {warning}")?;
    }
    stdout.flush()?;

    view.unmount();
    config.emit_metrics();
    Ok(())
}

/// Header line, footer gap and one line per warning.
fn reserved_rows(warnings: usize) -> u16 {
    u16::try_from(warnings).unwrap_or(u16::MAX).saturating_add(3)
}
