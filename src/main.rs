mod app;
mod project;
mod showcase;
mod ui;

use app::{App, ExternalAction};
use clap::{Parser, Subcommand};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use project::{LoadError, ProjectSource};
use ratatui::layout::Rect;
use showcase::{Command, Showcase, SortOrder, TagFilter};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal explorer for the agri-IoT project showcase
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project list: a JSON file path or an http(s) URL
    #[arg(short, long, env = "SHOWCASE_SOURCE", default_value = "projects.json", global = true)]
    source: String,

    /// Log file (defaults to the user cache directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive explorer (default)
    Run,
    /// Print the filtered, sorted project list and exit
    List {
        /// Only projects carrying this tag (case-insensitive)
        #[arg(short, long)]
        tag: Option<String>,
        /// Only featured projects
        #[arg(short, long)]
        featured: bool,
        /// date-desc, date-asc, title-asc or title-desc
        #[arg(long, default_value = "date-desc")]
        sort: SortOrder,
        /// Emit the visible records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_file.as_deref()) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let source = ProjectSource::parse(&cli.source);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List { tag, featured, sort, json } => {
            let mut showcase = Showcase::from_load_result(project::load_projects(&source).await);
            if let Some(err) = showcase.load_error() {
                eprintln!("Warning: {err}");
            }
            if let Some(tag) = tag {
                showcase.dispatch(Command::SetTagFilter(TagFilter::from_input(&tag)));
            }
            showcase.dispatch(Command::SetFeaturedOnly(featured));
            showcase.dispatch(Command::SetSort(sort));

            let view = showcase.view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view.ordered)?);
            } else {
                for p in &view.ordered {
                    let star = if p.featured { "*" } else { " " };
                    println!(
                        "{} {}  {:<40} [{}]",
                        star,
                        p.date_completed.format("%Y-%m-%d"),
                        p.title,
                        p.tags.join(", ")
                    );
                }
                if view.no_results {
                    println!("No projects match the current filters.");
                }
                println!("{}", view.count_label);
            }
        }
        Commands::Run => {
            tracing::info!(source = %source, "starting explorer");

            // The one fetch runs while the UI shows an empty showcase
            let load = tokio::spawn(async move { project::load_projects(&source).await });
            let mut app = App::new(Showcase::default());

            // Init terminal
            let mut terminal = ratatui::init();
            crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

            let size = terminal.size()?;
            app.set_viewport(Rect::new(0, 0, size.width, size.height));

            let result = run_app(&mut terminal, &mut app, load).await;

            // Restore terminal
            let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "explorer aborted");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    mut load: tokio::task::JoinHandle<Result<Vec<project::ProjectRecord>, LoadError>>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if app.loading && load.is_finished() {
            let result = (&mut load)
                .await
                .unwrap_or_else(|e| Err(LoadError::Interrupted(e.to_string())));
            app.finish_loading(result);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Some(action) = app.handle_key(key) {
                        run_external(app, action);
                    }
                }
                Event::Mouse(mouse) => {
                    let overlay = ui::overlay_rect(app.viewport);
                    app.handle_mouse(mouse, overlay);
                }
                Event::Resize(width, height) => {
                    app.set_viewport(Rect::new(0, 0, width, height));
                }
                _ => {}
            }
        }
    }
}

fn run_external(app: &mut App, action: ExternalAction) {
    match action {
        ExternalAction::OpenLink(link) => {
            match std::process::Command::new("xdg-open")
                .arg(&link)
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .spawn()
            {
                Ok(_) => app.status_msg = format!("Opening: {}", link),
                Err(e) => {
                    tracing::warn!(error = %e, %link, "could not launch opener");
                    app.status_msg = format!("Link: {} (no opener available)", link);
                }
            }
        }
        ExternalAction::CopyLink(link) => {
            if copy_to_clipboard("xclip", &["-selection", "clipboard"], &link)
                || copy_to_clipboard("wl-copy", &[], &link)
            {
                app.status_msg = format!("Copied: {}", link);
            } else {
                app.status_msg = format!("Link: {} (clipboard not available)", link);
            }
        }
    }
}

fn copy_to_clipboard(program: &str, args: &[&str], text: &str) -> bool {
    use std::io::Write;

    let Ok(mut child) = std::process::Command::new(program)
        .args(args)
        .stdin(std::process::Stdio::piped())
        .spawn()
    else {
        return false;
    };
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(text.as_bytes());
    }
    child.wait().map(|status| status.success()).unwrap_or(false)
}

/// Log to a file: the terminal belongs to the UI.
fn init_tracing(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match log_file {
        Some(p) => p.to_path_buf(),
        None => {
            let dirs = directories::ProjectDirs::from("com", "agri-iot", "showcase-explorer")
                .ok_or("Could not determine home directory")?;
            std::fs::create_dir_all(dirs.cache_dir())?;
            dirs.cache_dir().join("showcase.log")
        }
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .try_init()?;
    Ok(())
}
