//! Interactive Grid Setup Demo
//!
//! A terminal stand-in for the pointer-driven setup screen. Points are
//! entered in normalized coordinates, polylines snap closed or finish the
//! way they do under the mouse, and placing boundaries burns them into a
//! grid that is attached to simulated engine memory.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `add <x> <y>` - Primary-button press at normalized `(x, y)`
//! - `undo` - Secondary-button press: remove the most recent point
//! - `place` - Send all polylines to the engine and clear the editor
//! - `clear` - Discard all polylines without placing them. A REPL shortcut
//!   for starting over; the editor itself only offers undo, so this drains
//!   the session without calling the engine.
//! - `segments` - List the segments the next `place` would send
//! - `show` - Draw the grid with burned cells and pending vertices
//! - `set <row> <col> <value>` - Write one cell directly
//! - `status` - Show editor and memory status
//! - `reset [w] [h]` - Start over with a new grid
//! - `help` - Show available commands
//! - `quit` - Exit

use grid_setup_core::render::{render_text, BURN_THRESHOLD};
use grid_setup_core::{
    BoundarySession, GridConfig, GridError, LineBurner, LinearMemory, PointOutcome, RegionLayout,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use tracing::{info, warn};

/// Default grid dimensions
const DEFAULT_WIDTH: usize = 48;
const DEFAULT_HEIGHT: usize = 24;

/// Largest grid that still fits a terminal
const MAX_DIMENSION: usize = 200;

/// Session plus the engine memory it is attached to.
struct Workspace {
    layout: RegionLayout,
    session: BoundarySession<LineBurner>,
    // Declared after `session` so it is dropped last
    memory: LinearMemory,
}

impl Workspace {
    fn new(width: usize, height: usize) -> Result<Self, GridError> {
        let config = GridConfig {
            width,
            height,
            ..Default::default()
        };
        let layout = config.layout()?;
        let memory = LinearMemory::for_layout(&layout);

        // SAFETY: `memory` is stored next to the session and dropped after it.
        let burner = unsafe { LineBurner::new(memory.base(), memory.len(), &layout) };
        let mut session = BoundarySession::new(&config, burner)?;
        // SAFETY: as above; nothing else writes the region.
        unsafe { session.attach(memory.base(), memory.len(), layout.element_offset())? };

        info!(
            width,
            height,
            pages = layout.required_pages(),
            "Workspace attached to engine memory"
        );
        Ok(Self {
            layout,
            session,
            memory,
        })
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║           Grid Setup - Interactive Boundary Editor        ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let (width, height) = prompt_grid_dimensions();
    let mut workspace = match Workspace::new(width, height) {
        Ok(workspace) => workspace,
        Err(e) => {
            eprintln!("Failed to create grid: {}", e);
            return;
        }
    };

    println!(
        "Created {}x{} grid in {} page(s) of engine memory",
        width,
        height,
        workspace.layout.required_pages()
    );
    println!("Points use normalized coordinates: (0, 0) is top-left, (1, 1) bottom-right.");

    // Setup readline
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("grid> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "add" | "a" => {
                        if let (Some(x), Some(y)) = (
                            parts.get(1).and_then(|s| s.parse().ok()),
                            parts.get(2).and_then(|s| s.parse().ok()),
                        ) {
                            add_point(&mut workspace, x, y);
                        } else {
                            println!("Usage: add <x> <y>");
                        }
                    }
                    "undo" | "u" => undo_point(&mut workspace),
                    "place" | "p" => place_boundaries(&mut workspace),
                    "clear" | "c" => {
                        let discarded = workspace.session.take_segments();
                        println!("Discarded {} pending segment(s)", discarded.len());
                    }
                    "segments" | "seg" => show_segments(&workspace),
                    "show" | "sh" => show_grid(&workspace),
                    "set" => {
                        if let (Some(row), Some(col), Some(value)) = (
                            parts.get(1).and_then(|s| s.parse().ok()),
                            parts.get(2).and_then(|s| s.parse().ok()),
                            parts.get(3).and_then(|s| s.parse().ok()),
                        ) {
                            set_cell(&mut workspace, row, col, value);
                        } else {
                            println!("Usage: set <row> <col> <value>");
                        }
                    }
                    "status" | "st" => show_status(&workspace),
                    "reset" | "r" => {
                        let width = parts
                            .get(1)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(workspace.session.grid().width());
                        let height = parts
                            .get(2)
                            .and_then(|s| s.parse().ok())
                            .unwrap_or(workspace.session.grid().height());
                        match Workspace::new(
                            width.clamp(1, MAX_DIMENSION),
                            height.clamp(1, MAX_DIMENSION),
                        ) {
                            Ok(fresh) => {
                                workspace = fresh;
                                println!(
                                    "Reset to {}x{} grid",
                                    workspace.session.grid().width(),
                                    workspace.session.grid().height()
                                );
                            }
                            Err(e) => println!("Reset failed: {}", e),
                        }
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    other => {
                        println!(
                            "Unknown command: '{}'. Type 'help' for available commands.",
                            other
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                warn!("Readline error: {}", err);
                break;
            }
        }
    }
}

fn prompt_grid_dimensions() -> (usize, usize) {
    println!("Enter grid dimensions in cells (or press Enter for defaults):");
    let width = prompt_usize("  Width", DEFAULT_WIDTH);
    let height = prompt_usize("  Height", DEFAULT_HEIGHT);
    println!();
    (
        width.clamp(1, MAX_DIMENSION),
        height.clamp(1, MAX_DIMENSION),
    )
}

fn prompt_usize(label: &str, default: usize) -> usize {
    print!("{} [{}]: ", label, default);
    if io::stdout().flush().is_err() {
        return default;
    }
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return default;
    }
    input.trim().parse().unwrap_or(default)
}

fn add_point(workspace: &mut Workspace, x: f64, y: f64) {
    let outcome = workspace.session.add_point(x, y);
    let editor = workspace.session.editor();
    match outcome {
        PointOutcome::Appended => println!(
            "Added ({:.3}, {:.3}) - current polyline has {} point(s)",
            x,
            y,
            editor.current().len()
        ),
        PointOutcome::Closed => println!(
            "Closed polyline {} on its first point",
            editor.polyline_count() - 1
        ),
        PointOutcome::Ended => println!(
            "Finished open polyline {} on its last point",
            editor.polyline_count() - 1
        ),
    }
}

fn undo_point(workspace: &mut Workspace) {
    if let Some(point) = workspace.session.undo_point() {
        println!("Removed ({:.3}, {:.3})", point.x, point.y);
    } else {
        println!("Nothing to undo");
    }
}

fn place_boundaries(workspace: &mut Workspace) {
    let burned_before = workspace.session.engine().cells_burned();
    let placed = workspace.session.place_boundaries();
    let burned = workspace.session.engine().cells_burned() - burned_before;
    println!("Placed {} segment(s), burning {} cell(s)", placed, burned);
}

fn set_cell(workspace: &mut Workspace, row: usize, col: usize, value: f32) {
    let grid = workspace.session.grid_mut();
    if grid.dims().checked_index(row, col).is_none() {
        println!(
            "Cell ({}, {}) is outside the {}x{} grid",
            row,
            col,
            grid.width(),
            grid.height()
        );
        return;
    }
    grid.set_value_at(row, col, value);
    println!("Set ({}, {}) = {}", row, col, value);
}

fn show_segments(workspace: &Workspace) {
    let segments = workspace.session.pending_segments();
    println!("\n═══════════════ PENDING SEGMENTS ═══════════════");
    if segments.is_empty() {
        println!("  (none)");
    }
    for (i, segment) in segments.iter().enumerate() {
        println!(
            "  {:>3}: ({}, {}) -> ({}, {})",
            i, segment.x0, segment.y0, segment.x1, segment.y1
        );
    }
    println!("════════════════════════════════════════════════\n");
}

fn show_grid(workspace: &Workspace) {
    let lines = render_text(workspace.session.grid(), workspace.session.editor());
    let width = workspace.session.grid().width();

    println!("┌{}┐", "─".repeat(width));
    for line in &lines {
        println!("│{}│", line);
    }
    println!("└{}┘", "─".repeat(width));
    println!("Legend: # boundary  o vertex  S/E current start/end  . empty");
}

fn show_status(workspace: &Workspace) {
    let grid = workspace.session.grid();
    let editor = workspace.session.editor();
    let boundary_cells = grid
        .as_slice()
        .iter()
        .filter(|&&v| v > BURN_THRESHOLD)
        .count();

    println!("\n═══════════════ GRID STATUS ═══════════════");
    println!("Grid:              {}x{}", grid.width(), grid.height());
    println!("Attached:          {}", grid.is_attached());
    println!(
        "Engine memory:     {} bytes needed, {} page(s), {} elements",
        workspace.layout.required_bytes(),
        workspace.layout.required_pages(),
        workspace.memory.len()
    );
    println!("Boundary cells:    {}", boundary_cells);
    println!("Polylines:         {}", editor.polyline_count());
    println!("Points:            {}", editor.point_count());
    println!("Pending segments:  {}", editor.segments().len());
    println!("═══════════════════════════════════════════\n");
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  add <x> <y>, a       - Add a point at normalized (x, y)");
    println!("                         Near the first point: closes the polyline");
    println!("                         Near the last point: finishes it open");
    println!("  undo, u              - Remove the most recent point");
    println!("  place, p             - Burn all polylines into the grid");
    println!("  clear, c             - Discard all polylines (REPL shortcut,");
    println!("                         not an editor action)");
    println!("  segments, seg        - List segments the next place would send");
    println!("  show, sh             - Draw the grid");
    println!("  set <row> <col> <v>  - Write one cell");
    println!("  status, st           - Show grid and editor status");
    println!("  reset [w] [h], r     - Start over (optional: new width/height)");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}
