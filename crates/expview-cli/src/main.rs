//! expview CLI: replay dashboard actions, manage the saved chart configuration,
//! and render experiment logs as plot tables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use tokio::time::{self, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use expview::action::ResultListResponse;
use expview::config::{ChartSize, POLLING_OPTIONS_MS};
use expview::persist::Restored;
use expview::storage;
use expview::{
    bind, log_keys, value_ranges, Action, AppState, AxisName, ChartData, ChartView, ConfigState,
    ConfigStorage, Experiment, ProjectConfig, ProjectId, ResultId, Store,
};

#[derive(Parser)]
#[command(
    name = "expview",
    about = "📈 expview: experiment dashboard state and chart data",
    version,
    author
)]
struct Cli {
    /// Saved configuration file
    #[arg(long, global = true, default_value = ".expview/config.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON Lines action log through the store and print the resulting state
    Replay {
        /// Path to the action log
        actions: PathBuf,
        /// Persist the resulting configuration
        #[arg(long)]
        save: bool,
        /// Output format
        #[arg(long, short, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
    /// Bind one x/y key pair of an experiment dump into plot rows
    Plot {
        /// Path to the experiments JSON dump
        input: PathBuf,
        /// X-axis log key
        #[arg(long, short, default_value = "epoch")]
        x: String,
        /// Y-axis log key
        #[arg(long, short)]
        y: String,
        /// Result ids to plot, in order (default: every result)
        #[arg(long, short, value_delimiter = ',')]
        results: Vec<u64>,
        /// Output format
        #[arg(long, short, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
    /// List the log keys of an experiment dump with their value ranges
    Keys {
        /// Path to the experiments JSON dump
        input: PathBuf,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Re-render a project's charts on the configured polling interval
    Watch {
        /// Path to the experiments JSON dump
        input: PathBuf,
        /// Project whose chart configuration is used
        #[arg(long, short)]
        project: u64,
        /// Result ids to plot, in order (default: every result)
        #[arg(long, short, value_delimiter = ',')]
        results: Vec<u64>,
        /// Stop after this many renders
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the saved configuration
    Show,
    /// Remove the saved configuration, or reset a single project
    Reset {
        #[arg(long, short)]
        project: Option<u64>,
    },
    /// Set the polling interval in milliseconds (0 disables polling)
    PollingRate { ms: u64 },
    /// Set the chart size (small, normal or large)
    ChartSize { size: ChartSize },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let storage = ConfigStorage::new(cli.config);

    match cli.command {
        Commands::Replay { actions, save, format } => {
            cmd_replay(storage, actions, save, format)?;
        }
        Commands::Plot { input, x, y, results, format } => {
            cmd_plot(input, x, y, results, format)?;
        }
        Commands::Keys { input } => {
            cmd_keys(input)?;
        }
        Commands::Config { command } => {
            cmd_config(storage, command)?;
        }
        Commands::Watch { input, project, results, count } => {
            cmd_watch(storage, input, ProjectId(project), results, count).await?;
        }
    }

    Ok(())
}

// ─── Command implementations ──────────────────────────────────────────────────

fn cmd_replay(storage: ConfigStorage, actions: PathBuf, save: bool, format: String) -> Result<()> {
    let actions = storage::read_action_log(&actions)?;
    let mut store = if save {
        Store::with_storage(storage)?
    } else {
        Store::new(AppState::with_config(storage.load()?))
    };

    let total = actions.len();
    let state = store.dispatch_all(actions);
    info!(actions = total, saved = save, "Replayed action log");

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&*state)?),
        _ => {
            println!(
                "Entities: {} project(s), {} result(s)",
                state.entities.projects.len(),
                state.entities.results.len()
            );
            println!(
                "Fetch:    results={} commandCreate={}",
                state.fetch_state.results, state.fetch_state.command_create
            );
            println!();
            print_config(&state.config);
        }
    }
    Ok(())
}

fn cmd_plot(input: PathBuf, x: String, y: String, results: Vec<u64>, format: String) -> Result<()> {
    let experiments = storage::load_experiments(&input)?;
    let ids = resolve_result_ids(&experiments, &results);
    let chart = bind(&experiments, &ids, &x, &y);
    if chart.points.is_empty() {
        warn!(x = %x, y = %y, "No records carry a finite '{}' value", x);
    }

    match format.as_str() {
        "json" => {
            let out = serde_json::json!({
                "xKey": chart.x_key,
                "yKey": chart.y_key,
                "series": chart.series,
                "rows": chart.to_json_rows(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        _ => print_chart(&chart),
    }
    Ok(())
}

fn cmd_keys(input: PathBuf) -> Result<()> {
    let experiments = storage::load_experiments(&input)?;
    let keys = log_keys(&experiments);
    if keys.x_keys.is_empty() && keys.y_keys.is_empty() {
        println!("No log records in '{}'", input.display());
        return Ok(());
    }

    let ranges = value_ranges(&experiments);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Key", "Axis", "Min", "Max"]);
    let rows = keys
        .x_keys
        .iter()
        .map(|k| (k, "x"))
        .chain(keys.y_keys.iter().map(|k| (k, "y")));
    for (key, axis) in rows {
        let (min, max) = ranges
            .get(key)
            .map(|r| (r.min.to_string(), r.max.to_string()))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        table.add_row([key.as_str(), axis, &min, &max]);
    }
    println!("{}", table);
    Ok(())
}

fn cmd_config(storage: ConfigStorage, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let restored = storage.read()?;
            let path = storage.path().display();
            match &restored {
                Restored::Missing => println!("No saved config at {}, showing defaults", path),
                Restored::Stale { version } => println!(
                    "Saved config at {} is from an older schema ({}), showing defaults",
                    path,
                    version.map_or_else(|| "unversioned".to_string(), |v| v.to_string())
                ),
                Restored::Unreadable => {
                    println!("Saved config at {} is unreadable, showing defaults", path)
                }
                Restored::Loaded(envelope) => match envelope.saved_at {
                    Some(at) => println!(
                        "Config: {} (saved {})",
                        path,
                        at.format("%Y-%m-%d %H:%M:%S")
                    ),
                    None => println!("Config: {}", path),
                },
            }
            println!();
            print_config(&restored.into_config());
        }
        ConfigCommand::Reset { project: None } => {
            storage.clear()?;
            println!("Removed {}", storage.path().display());
        }
        ConfigCommand::Reset { project: Some(id) } => {
            let mut store = Store::with_storage(storage)?;
            store.dispatch(Action::ProjectConfigReset {
                project_id: ProjectId(id),
            });
            println!("Reset project {}", id);
        }
        ConfigCommand::PollingRate { ms } => {
            if !POLLING_OPTIONS_MS.contains(&ms) {
                warn!(ms, "Polling rate is not one of the dashboard options {:?}", POLLING_OPTIONS_MS);
            }
            let mut store = Store::with_storage(storage)?;
            store.dispatch(Action::GlobalConfigPollingRateUpdate { polling_rate: ms });
            println!("Polling rate: {}", format_polling(ms));
        }
        ConfigCommand::ChartSize { size } => {
            let mut store = Store::with_storage(storage)?;
            store.dispatch(Action::GlobalConfigChartSizeUpdate { chart_size: size });
            let (w, h) = size.dimensions();
            println!("Chart size: {} ({}x{})", size, w, h);
        }
    }
    Ok(())
}

/// Render once, then again on every polling tick.
///
/// Each round is a result-list fetch against the dump file, recorded in the
/// store's fetch state. A polling rate of 0 renders once and returns.
async fn cmd_watch(
    storage: ConfigStorage,
    input: PathBuf,
    project: ProjectId,
    results: Vec<u64>,
    count: Option<usize>,
) -> Result<()> {
    let mut store = Store::with_storage(storage)?;
    let polling_rate = store.state().config.global.polling_rate;
    let mut ticker = (polling_rate > 0).then(|| {
        let period = Duration::from_millis(polling_rate);
        time::interval_at(Instant::now() + period, period)
    });

    let mut rendered = 0;
    loop {
        store.dispatch(Action::ResultListRequest);
        match storage::load_experiments(&input) {
            Ok(experiments) => {
                let fetched = experiments
                    .iter()
                    .flat_map(|e| e.results.iter().cloned())
                    .collect();
                let state = store.dispatch(Action::ResultListSuccess {
                    response: ResultListResponse { results: fetched },
                });
                let ids = resolve_result_ids(&experiments, &results);
                render_project(&state, project, &experiments, &ids);
            }
            Err(e) => {
                // A failed round keeps the watch alive; the next tick retries.
                warn!(input = %input.display(), "Failed to load experiments: {}", e);
                store.dispatch(Action::ResultListFailure);
                if rendered == 0 && ticker.is_none() {
                    return Err(e.into());
                }
            }
        }
        rendered += 1;

        if count.is_some_and(|limit| rendered >= limit) {
            break;
        }
        let Some(ticker) = ticker.as_mut() else {
            info!("Polling is disabled, rendered once");
            break;
        };
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

// ─── Rendering ────────────────────────────────────────────────────────────────

fn render_project(state: &AppState, project: ProjectId, experiments: &[Experiment], ids: &[ResultId]) {
    let config = state.config.project(project);
    let view = ChartView::derive(&config, experiments, ids);
    let (w, h) = state.config.global.chart_size.dimensions();

    println!(
        "[{}] project {} · results {} · {}x{}",
        chrono::Local::now().format("%H:%M:%S"),
        project,
        state.fetch_state.results,
        w,
        h
    );
    println!(
        "x: {} [{}, {}]  y: [{}, {}]",
        view.x_axis_key, view.x_domain[0], view.x_domain[1], view.y_domain[0], view.y_domain[1]
    );
    if view.charts.is_empty() {
        println!("No y-axis log keys selected for project {}", project);
    }
    for chart in &view.charts {
        println!("── {} ──", chart.y_key);
        print_chart(chart);
    }
    println!();
}

fn print_chart(chart: &ChartData) {
    let mut legend = Table::new();
    legend.load_preset(UTF8_FULL);
    legend.set_header(["Field", "Series", "Color"]);
    for s in &chart.series {
        legend.add_row([s.field.to_string(), s.name.clone(), s.color.clone()]);
    }
    println!("{}", legend);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    let header: Vec<String> = std::iter::once(chart.x_key.clone())
        .chain(chart.series.iter().map(|s| s.field.to_string()))
        .collect();
    table.set_header(header);
    for point in &chart.points {
        let row: Vec<String> = std::iter::once(point.x.to_string())
            .chain(chart.series.iter().map(|s| {
                point
                    .values
                    .get(&s.field)
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string())
            }))
            .collect();
        table.add_row(row);
    }
    println!("{}", table);
}

fn print_config(config: &ConfigState) {
    let global = &config.global;
    let (w, h) = global.chart_size.dimensions();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Setting", "Value"]);
    table.add_row(["Polling rate".to_string(), format_polling(global.polling_rate)]);
    table.add_row(["Chart size".to_string(), format!("{} ({}x{})", global.chart_size, w, h)]);
    table.add_row(["Logs limit".to_string(), global.logs_limit.to_string()]);
    table.add_row([
        "Result name alignment".to_string(),
        format!("{:?}", global.result_name_alignment).to_lowercase(),
    ]);
    table.add_row([
        "Highlight table and chart".to_string(),
        global.highlight_table_and_chart.to_string(),
    ]);
    println!("{}", table);

    if config.projects_config.is_empty() {
        println!("No project configuration");
        return;
    }

    let mut projects = Table::new();
    projects.load_preset(UTF8_FULL);
    projects.set_header(["Project", "X key", "X scale", "Y keys", "Y scale", "Hidden", "Lines"]);
    for (id, project) in &config.projects_config {
        projects.add_row(project_row(*id, project));
    }
    println!("{}", projects);
}

fn project_row(id: ProjectId, project: &ProjectConfig) -> [String; 7] {
    let x_axis = project.axis(AxisName::XAxis);
    let y_axis = project.axis(AxisName::YAxis);
    let hidden: Vec<String> = project
        .results_config
        .iter()
        .filter(|(_, c)| c.hidden)
        .map(|(id, _)| id.to_string())
        .collect();
    let y_keys = y_axis.selected_log_keys();

    [
        id.to_string(),
        x_axis.x_axis_key.clone().unwrap_or_else(|| "-".to_string()),
        x_axis.scale.to_string(),
        if y_keys.is_empty() { "-".to_string() } else { y_keys.join(", ") },
        y_axis.scale.to_string(),
        if hidden.is_empty() { "-".to_string() } else { hidden.join(", ") },
        project.lines.len().to_string(),
    ]
}

// ─── Utilities ────────────────────────────────────────────────────────────────

/// Explicit ids in the given order, or every result of the dump.
fn resolve_result_ids(experiments: &[Experiment], requested: &[u64]) -> Vec<ResultId> {
    if requested.is_empty() {
        experiments
            .iter()
            .flat_map(|e| e.results.iter().map(|r| r.id))
            .collect()
    } else {
        requested.iter().copied().map(ResultId).collect()
    }
}

fn format_polling(ms: u64) -> String {
    match ms {
        0 => "off".to_string(),
        ms if ms % 1000 == 0 => format!("{}s", ms / 1000),
        ms => format!("{}ms", ms),
    }
}
