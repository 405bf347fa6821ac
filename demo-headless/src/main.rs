use clap::Parser;
use grid_setup_core::render::{render_text, BURN_THRESHOLD};
use grid_setup_core::{
    BoundaryEngine, BoundarySession, GridConfig, LineBurner, LinearMemory, PointOutcome,
    RecordingEngine,
};
use std::fs;
use std::path::PathBuf;
use std::process;

/// Boundary placement demo with configurable grid
#[derive(Parser, Debug)]
#[command(name = "grid-setup-demo")]
#[command(about = "Draw boundary polylines and burn them into a shared grid", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(short, long, default_value_t = 64)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 32)]
    height: usize,

    /// JSON config file (width, height, aux_bytes, snap_tolerance); overrides --width/--height
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shape to draw (square, triangle, zigzag, all)
    #[arg(short, long, default_value = "all")]
    shape: String,

    /// Print the segments that would be placed without burning them
    #[arg(long)]
    dry_run: bool,

    /// Skip drawing the grid
    #[arg(short, long)]
    quiet: bool,
}

/// Points in normalized coordinates, as clicked. Repeating the first point
/// closes a polyline; repeating the last one finishes it open.
fn shape_points(name: &str) -> Option<Vec<(f64, f64)>> {
    let square = vec![
        (0.1, 0.1),
        (0.4, 0.1),
        (0.4, 0.4),
        (0.1, 0.4),
        (0.1, 0.1),
    ];
    let triangle = vec![(0.6, 0.1), (0.9, 0.45), (0.55, 0.45), (0.6, 0.1)];
    let zigzag = vec![
        (0.1, 0.6),
        (0.3, 0.9),
        (0.5, 0.6),
        (0.7, 0.9),
        (0.9, 0.6),
        (0.9, 0.6),
    ];

    match name.to_lowercase().as_str() {
        "square" => Some(square),
        "triangle" => Some(triangle),
        "zigzag" => Some(zigzag),
        "all" => Some([square, triangle, zigzag].concat()),
        _ => None,
    }
}

fn load_config(args: &Args) -> Result<GridConfig, String> {
    let Some(path) = &args.config else {
        return Ok(GridConfig {
            width: args.width,
            height: args.height,
            ..Default::default()
        });
    };

    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
}

fn draw<E: BoundaryEngine>(session: &mut BoundarySession<E>, points: &[(f64, f64)]) {
    for &(x, y) in points {
        match session.add_point(x, y) {
            PointOutcome::Appended => {}
            PointOutcome::Closed => println!("  closed polyline at ({:.2}, {:.2})", x, y),
            PointOutcome::Ended => println!("  finished open polyline at ({:.2}, {:.2})", x, y),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    println!("=== Grid Setup Demo ===\n");

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    let Some(points) = shape_points(&args.shape) else {
        eprintln!(
            "Unknown shape '{}'; expected square, triangle, zigzag or all",
            args.shape
        );
        process::exit(1);
    };
    let layout = match config.layout() {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Grid {}x{}, snap tolerance {}, engine memory {} bytes ({} page(s))\n",
        config.width,
        config.height,
        config.snap_tolerance,
        layout.required_bytes(),
        layout.required_pages()
    );

    if args.dry_run {
        let Ok(mut session) = BoundarySession::new(&config, RecordingEngine::new()) else {
            eprintln!("Invalid config");
            process::exit(1);
        };
        println!("Drawing '{}' ({} clicks)", args.shape, points.len());
        draw(&mut session, &points);

        let placed = session.place_boundaries();
        println!("\nWould place {} segment(s):", placed);
        for (segment, width) in session.engine().calls() {
            println!(
                "  place_boundary_line({}, {}, {}, {}, {})",
                segment.x0, segment.y0, segment.x1, segment.y1, width
            );
        }
        return;
    }

    let memory = LinearMemory::for_layout(&layout);
    // SAFETY: `memory` lives until the end of `main`, after the session.
    let burner = unsafe { LineBurner::new(memory.base(), memory.len(), &layout) };
    let mut session = match BoundarySession::new(&config, burner) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid config: {}", e);
            process::exit(1);
        }
    };
    // SAFETY: as above; only the burner writes the region.
    if let Err(e) = unsafe { session.attach(memory.base(), memory.len(), layout.element_offset()) }
    {
        eprintln!("Attach failed: {}", e);
        process::exit(1);
    }

    println!("Drawing '{}' ({} clicks)", args.shape, points.len());
    draw(&mut session, &points);
    let placed = session.place_boundaries();

    if !args.quiet {
        println!();
        for line in render_text(session.grid(), session.editor()) {
            println!("{}", line);
        }
    }

    println!("\n=== Summary ===");
    println!("Segments placed: {}", placed);
    println!("Cells burned:    {}", session.engine().cells_burned());
    println!(
        "Boundary cells:  {}",
        session.grid().as_slice().iter().filter(|&&v| v > BURN_THRESHOLD).count()
    );
}
