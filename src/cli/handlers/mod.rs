use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::logging::{Fallback, init_logging};
use crate::cli::output::*;
use crate::io::config_io::{self, LoadedConfig};
use crate::io::record_io::{read_records, write_records};
use crate::io::scene_io::{read_scene, write_scene};
use crate::model::record::RecordStore;
use crate::ops::reconcile::{self, ApplyMode};
use crate::ops::scan::scan;
use crate::ops::view::filtered_view;
use crate::provider::SceneProvider;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Config plus the scene document the command works on
pub struct Context {
    pub loaded: LoadedConfig,
    pub scene_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = load_context(cli.config.as_deref(), cli.scene.as_deref())?;
    let log_file = ctx.loaded.log_file();
    init_logging(&ctx.loaded.config.log.level, log_file.as_deref(), Fallback::Stderr)
        .map_err(|e| format!("cannot open log file: {}", e))?;

    match cli.command {
        None => {
            eprintln!("No subcommand given (try `timp --help`).");
            Ok(())
        }
        Some(cmd) => match cmd {
            Commands::Export(args) => cmd_export(&ctx, args, json),
            Commands::Apply(args) => cmd_apply(&ctx, args, json),
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Edit(args) => cmd_edit(args, json),
            Commands::Delete(args) => cmd_delete(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load config (explicit or discovered) and settle on the scene path.
/// `--scene` is relative to the working directory, `scene.path` to the config file.
pub fn load_context(
    config: Option<&str>,
    scene: Option<&str>,
) -> Result<Context, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let loaded = config_io::load_config(config.map(Path::new), &cwd)?;
    let scene_path = match scene {
        Some(p) => Some(cwd.join(p)),
        None => loaded.scene_path(),
    };
    Ok(Context { loaded, scene_path })
}

fn require_scene(ctx: &Context) -> Result<&Path, Box<dyn std::error::Error>> {
    ctx.scene_path.as_deref().ok_or_else(|| {
        "no scene document: pass --scene or set scene.path in textimp.toml".into()
    })
}

fn open_scene(ctx: &Context) -> Result<(PathBuf, SceneProvider), Box<dyn std::error::Error>> {
    let path = require_scene(ctx)?;
    let doc = read_scene(path)?;
    Ok((path.to_path_buf(), SceneProvider::new(doc)))
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ---------------------------------------------------------------------------
// Scene commands
// ---------------------------------------------------------------------------

fn cmd_export(ctx: &Context, args: ExportArgs, json: bool) -> CmdResult {
    let (_, provider) = open_scene(ctx)?;
    let report = scan(&provider);
    for warning in &report.warnings {
        eprintln!("{}", warning);
    }
    let records = report.into_records()?;
    let out = Path::new(&args.out);
    write_records(out, &records)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "exported": records.len(),
                "path": out.display().to_string(),
            }))?
        );
    } else {
        println!("Exported {} records to {}", records.len(), out.display());
    }
    Ok(())
}

fn cmd_apply(ctx: &Context, args: ApplyArgs, json: bool) -> CmdResult {
    let records = read_records(Path::new(&args.file))?;
    let (scene_path, mut provider) = open_scene(ctx)?;
    let mode = if args.dry_run {
        ApplyMode::DryRun
    } else {
        ApplyMode::Write
    };
    let report = reconcile::apply(&mut provider, &records, mode);

    if mode == ApplyMode::Write && provider.is_dirty() {
        write_scene(&scene_path, provider.document())?;
        provider.mark_clean();
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&apply_to_json(&records, &report, args.dry_run))?
        );
    } else {
        print_lines(&format_log_entries(&report.log));
    }

    match report.aborted {
        Some(err) => Err(format!("apply aborted: {}", err).into()),
        None => Ok(()),
    }
}

fn cmd_list(ctx: &Context, args: ListArgs, json: bool) -> CmdResult {
    let view_config = &ctx.loaded.config.view;
    let mode = args.filter.map(Into::into).unwrap_or(view_config.filter);

    // A record file can be listed without a scene; the filter then keeps everything
    let provider = match (&args.file, ctx.scene_path.is_some()) {
        (Some(_), false) => SceneProvider::default(),
        _ => open_scene(ctx)?.1,
    };
    let store = match &args.file {
        Some(file) => RecordStore::from_records(read_records(Path::new(file))?),
        None => {
            let report = scan(&provider);
            for warning in &report.warnings {
                eprintln!("{}", warning);
            }
            RecordStore::from_records(report.records)
        }
    };

    let view = filtered_view(
        &store,
        &provider,
        mode,
        args.search.as_deref().unwrap_or(""),
        view_config.combine_search_with_filter,
    );
    let groups = group_visible(&store, &view);
    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        print_lines(&format_listing(&groups));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Record file commands
// ---------------------------------------------------------------------------

fn cmd_edit(args: EditArgs, json: bool) -> CmdResult {
    let path = Path::new(&args.file);
    let mut store = RecordStore::from_records(read_records(path)?);
    let index = store
        .position_of(&args.container, args.index)
        .ok_or_else(|| format!("no record for {} [{}]", args.container, args.index))?;
    store.set_text(index, args.text.as_str());
    write_records(path, store.records())?;

    if let Some(record) = store.get(index) {
        if json {
            println!("{}", serde_json::to_string_pretty(record)?);
        } else {
            println!("Updated {}", record.single_line());
        }
    }
    Ok(())
}

fn cmd_delete(args: DeleteArgs, json: bool) -> CmdResult {
    let path = Path::new(&args.file);
    let mut store = RecordStore::from_records(read_records(path)?);
    let removed = match args.index {
        Some(index) => {
            let position = store
                .position_of(&args.container, index)
                .ok_or_else(|| format!("no record for {} [{}]", args.container, index))?;
            usize::from(store.remove(position).is_some())
        }
        None => store.remove_container(&args.container),
    };
    if removed == 0 {
        return Err(format!("no records for container {}", args.container).into());
    }
    write_records(path, store.records())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "removed": removed,
                "remaining": store.len(),
            }))?
        );
    } else {
        println!("Removed {} record(s), {} remaining", removed, store.len());
    }
    Ok(())
}
