use clap::Parser;
use dailymuse::application::manage_config::mask;
use dailymuse::application::{
    init, ConfigService, CreatorSession, Outcome, QueryFacade, SchedulingService,
};
use dailymuse::cli::{format_entry, format_entry_list, format_warnings, Cli, Commands};
use dailymuse::domain::{asset_codec, EntryDraft, ImageRef, ScheduleDate, TimeReference};
use dailymuse::error::{MuseError, Result};
use dailymuse::infrastructure::{Config, FileSystemRepository, SiteRepository};
use std::fs;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let writer = cli.command.is_writer();

    match cli.command {
        Commands::Init { path, data_dir } => {
            let config = init::init(&path, data_dir.as_deref())?;
            println!("Initialized muse site at {}", path.display());
            println!("Data directory: {}", config.data_dir.display());
            Ok(())
        }
        Commands::Config { key, value, list } => {
            let repo = FileSystemRepository::discover()?;
            let service = ConfigService::new(repo);

            if list {
                let config = service.list()?;
                println!("data_dir = {}", config.data_dir.display());
                println!("public_prefix = {}", config.public_prefix);
                println!("conditional_writes = {}", config.conditional_writes);
                println!(
                    "creator_password = {}",
                    mask(config.creator_password.as_deref())
                );
                println!("created = {}", config.created.to_rfc3339());
                Ok(())
            } else if let Some(k) = key {
                if let Some(v) = value {
                    require_creator(cli.password.as_deref(), &service.list()?)?;
                    service.set(&k, &v)?;
                    println!("Set {}", k);
                } else {
                    println!("{}", service.get(&k)?);
                }
                Ok(())
            } else {
                println!("Usage: muse config [--list | <key> [<value>]]");
                println!(
                    "Valid keys: data_dir, public_prefix, conditional_writes, creator_password, created"
                );
                Ok(())
            }
        }
        command => {
            let repo = FileSystemRepository::discover()?;
            let config = repo.load_config()?;
            if writer {
                require_creator(cli.password.as_deref(), &config)?;
            }
            run_site_command(&repo, &config, command)
        }
    }
}

/// Check the creator password against the one this site expects
fn require_creator(provided: Option<&str>, config: &Config) -> Result<()> {
    CreatorSession::authenticate(provided, config.creator_password().as_deref()).require_creator()
}

fn run_site_command(repo: &FileSystemRepository, config: &Config, command: Commands) -> Result<()> {
    let (entries, assets) = repo.open_stores(config);
    let mut scheduler = SchedulingService::new(&entries, &assets);
    if !config.conditional_writes {
        scheduler = scheduler.without_conditional_writes();
    }
    let query = QueryFacade::new(&entries, &assets);
    let today = ScheduleDate::today();

    match command {
        Commands::Publish {
            date,
            title,
            episode,
            title_image,
            comic_image,
            character,
            concept,
        } => {
            let draft = EntryDraft {
                scheduled_date: TimeReference::resolve_str(&date, today)?,
                title,
                episode_number: episode,
                title_image: load_image(&title_image)?,
                comic_image: load_image(&comic_image)?,
                character_description: character,
                concept,
            };
            let outcome = scheduler.publish(draft)?;
            println!(
                "Published '{}' for {}",
                outcome.value.title, outcome.value.scheduled_date
            );
            report_warnings(&outcome);
            Ok(())
        }
        Commands::Reschedule { from, to } => {
            let from = TimeReference::resolve_str(&from, today)?;
            let to = TimeReference::resolve_str(&to, today)?;
            let outcome = scheduler.reschedule(from, to)?;
            println!("Moved {} -> {}", from, to);
            report_warnings(&outcome);
            Ok(())
        }
        Commands::Remove { date } => {
            let date = TimeReference::resolve_str(&date, today)?;
            let outcome = scheduler.remove(date)?;
            if outcome.value {
                println!("Removed entry for {}", date);
            } else {
                println!("No entry for {}", date);
            }
            report_warnings(&outcome);
            Ok(())
        }
        Commands::Today => {
            match query.today(today)? {
                Some(entry) => print!("{}", format_entry(&entry)),
                None => println!("Nothing scheduled for {}", today),
            }
            Ok(())
        }
        Commands::Show { date } => {
            let date = TimeReference::resolve_str(&date, today)?;
            let entry = query
                .entry_for(date)?
                .ok_or(MuseError::EntryNotFound(date))?;
            print!("{}", format_entry(&entry));
            Ok(())
        }
        Commands::Archive => {
            println!("{}", format_entry_list(&query.archive(today)?).trim_end());
            Ok(())
        }
        Commands::List { before, limit } => {
            let before = before
                .map(|b| TimeReference::resolve_str(&b, today))
                .transpose()?;
            println!("{}", format_entry_list(&query.recent(before, limit)?).trim_end());
            Ok(())
        }
        Commands::Reindex => {
            let dates = entries.rebuild_index()?;
            println!("Indexed {} entries", dates.len());
            Ok(())
        }
        Commands::Init { .. } | Commands::Config { .. } => unreachable!("handled in run"),
    }
}

/// An http(s) URL is kept as a reference; anything else is read as a file
fn load_image(arg: &str) -> Result<ImageRef> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return Ok(ImageRef::External(arg.to_string()));
    }
    let bytes = fs::read(arg).map_err(|e| {
        MuseError::InvalidEntry(format!("cannot read image '{}': {}", arg, e))
    })?;
    let mime = asset_codec::sniff_mime(&bytes).ok_or_else(|| {
        MuseError::MalformedAsset(format!("'{}' is not a PNG, JPEG, GIF or WebP image", arg))
    })?;
    Ok(ImageRef::Inline(asset_codec::encode(&bytes, mime)))
}

fn report_warnings<T>(outcome: &Outcome<T>) {
    eprint!("{}", format_warnings(&outcome.warnings));
}
