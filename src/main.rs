mod cli;

use segcut::{
    config::{self, Config},
    server,
    session::{self, Session},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, PlanArgs};
use segcut_timeline::{format_timestamp, Command, SegmentLength, TimeValue};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "segcut=debug,segcut_av=debug,segcut_timeline=trace,tower_http=debug".to_string()
        } else {
            "segcut=info,segcut_av=info,segcut_timeline=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(config))
        }
        Commands::Plan { plan, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            plan_file(&plan, &config, json)
        }
        Commands::Split {
            plan,
            output,
            zip,
            dry_run,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            split_file(&plan, &config, output.as_deref(), zip, dry_run)
        }
        Commands::Join { files, output } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            join_files(&files, &output, &config)
        }
        Commands::List { dir, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            list_files(&dir, &config, json)
        }
        Commands::Probe { file, json } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            probe_file(&file, &config, json)
        }
        Commands::CheckTools => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            check_tools(&config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("segcut {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Open a session for the input, generate, then replay the script.
fn build_session(args: &PlanArgs, config: &Config) -> Result<Session> {
    let mut settings = config
        .segments
        .engine_settings()
        .context("Invalid [segments] configuration")?;
    if args.keep_locked {
        settings.keep_locked = true;
    }

    let mut session = match args.duration {
        Some(duration) => {
            Session::with_duration(Some(args.input.clone()), duration, settings)?
        }
        None => {
            if !args.input.exists() {
                anyhow::bail!("Input file does not exist: {:?}", args.input);
            }
            Session::open(&config.tools.toolchain(), &args.input, settings)?
        }
    };

    let length = match &args.length {
        Some(text) => SegmentLength::parse(text)
            .with_context(|| format!("Invalid segment length: {:?}", text))?,
        None => config.segments.segment_length()?,
    };
    session.apply(&Command::Generate {
        length: Some(TimeValue::Seconds(length.as_secs())),
        keep_locked: None,
    })?;

    if let Some(script) = &args.script {
        let commands = session::load_script(script)?;
        tracing::info!("Applying {} commands from {:?}", commands.len(), script);
        session.apply_script(&commands)?;
    }

    Ok(session)
}

fn print_segments(session: &Session) {
    let timeline = session.timeline();
    println!(
        "Source: {}",
        session
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("Duration: {}", format_timestamp(timeline.duration()));
    println!();
    println!("{:>4}  {:<8}  {:<8}  {:<8}  {:<6}  NAME", "#", "START", "END", "LENGTH", "LOCK");
    for (i, seg) in timeline.segments().iter().enumerate() {
        println!(
            "{:>4}  {:<8}  {:<8}  {:<8}  {:<6}  {}",
            i,
            format_timestamp(seg.start),
            format_timestamp(seg.end),
            format_timestamp(seg.width()),
            if seg.locked { "locked" } else { "" },
            seg.output_name
        );
    }

    let uncovered = timeline.uncovered();
    if uncovered > 0.0 {
        println!();
        println!("Uncovered: {}", format_timestamp(uncovered));
    }
}

fn plan_file(args: &PlanArgs, config: &Config, json: bool) -> Result<()> {
    let session = build_session(args, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    } else {
        print_segments(&session);
    }

    Ok(())
}

fn split_file(
    args: &PlanArgs,
    config: &Config,
    output: Option<&Path>,
    zip: bool,
    dry_run: bool,
) -> Result<()> {
    let session = build_session(args, config)?;
    let cuts = session.cut_list();
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.export.resolved_output_dir());
    let options = config.export.split_options(zip);

    if dry_run {
        println!("[DRY RUN] Would write {} parts to {:?}", cuts.len(), output_dir);
        for cut in &cuts {
            println!(
                "  {}  {} - {}",
                segcut_av::output_file_name(&cut.output_name, &options.extension),
                format_timestamp(cut.start_seconds),
                format_timestamp(cut.end_seconds)
            );
        }
        if let Some(archive) = &options.archive {
            println!("  {}", archive);
        }
        return Ok(());
    }

    let report = segcut_av::split(
        &config.tools.toolchain(),
        &args.input,
        &output_dir,
        &cuts,
        &options,
    )?;

    for name in &report.created {
        println!("✓ {}", name);
    }
    for error in &report.errors {
        eprintln!("✗ {}", error);
    }

    if !report.success {
        anyhow::bail!("{} of {} parts failed", report.errors.len(), cuts.len());
    }
    Ok(())
}

fn join_files(files: &[std::path::PathBuf], output: &Path, config: &Config) -> Result<()> {
    let path = segcut_av::join(&config.tools.toolchain(), files, output)?;
    println!("Joined {} files into {}", files.len(), path.display());
    Ok(())
}

fn list_files(dir: &Path, config: &Config, json: bool) -> Result<()> {
    let files = segcut_av::list_audio_files(&config.tools.toolchain(), dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    for file in &files {
        println!(
            "{}  {:>10} bytes  {}",
            format_timestamp(file.duration),
            file.size,
            file.filename
        );
    }
    println!("{} files", files.len());
    Ok(())
}

fn probe_file(file: &Path, config: &Config, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let duration = segcut_av::probe_duration(&config.tools.toolchain(), file)?;

    if json {
        let value = serde_json::json!({ "path": file, "duration": duration });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("File: {}", file.display());
        println!("Duration: {} ({:.3}s)", format_timestamp(duration), duration);
    }

    Ok(())
}

fn check_tools(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = config.tools.toolchain().check();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Segment length: {}", config.segments.length);
    println!("  Keep locked: {}", config.segments.keep_locked);
    println!("  Name template: {}", config.segments.name_template);
    println!(
        "  Output dir: {}",
        config.export.resolved_output_dir().display()
    );

    Ok(())
}
