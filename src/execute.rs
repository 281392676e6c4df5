use anyhow::Result;
use dhub::{Config, Library, Manager, Renderer};
use crate::cli::{DhubCommand, LogLevel, CLI};

pub fn execute(cli: CLI) -> Result<()> {
    init_logging(cli.log_level);
    let config = Config::load_or_default(cli.config.as_deref())?.with_process_env();
    let renderer = Renderer::new(!cli.no_color);

    match cli.command {
        DhubCommand::List { library, version, pre_release, verbose, json } => {
            let manager = Manager::new(&config)?;
            match library {
                Some(library) => execute_list_versions(
                    &manager,
                    &renderer,
                    &library,
                    version.as_deref().unwrap_or(""),
                    pre_release,
                    verbose,
                    json,
                ),
                None => execute_list_libraries(&manager, &renderer, json),
            }
        }
        DhubCommand::Search { prefix, json } => {
            let manager = Manager::new(&config)?;
            execute_search(&manager, &renderer, &prefix, json)
        }
    }
}

fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .init();
}

pub fn execute_list_libraries(manager: &Manager, renderer: &Renderer, json: bool) -> Result<()> {
    let mut libraries = manager.list_libraries()?;
    libraries.sort_by_key(|library| library.pull_count);
    print_libraries(renderer, &libraries, json)
}

pub fn execute_list_versions(
    manager: &Manager,
    renderer: &Renderer,
    name: &str,
    version_prefix: &str,
    pre_release: bool,
    verbose: bool,
    json: bool,
) -> Result<()> {
    let library = match manager.get_library(name) {
        Ok(library) => library,
        Err(e) if e.is_not_found() => {
            eprintln!("{} {}", renderer.red("X Library not found:"), renderer.yellow(name));
            eprintln!("Run `dhub search <prefix>` to look up library names.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let library_version = manager.get_library_version(&library, version_prefix, pre_release)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&library_version)?);
        return Ok(());
    }

    println!();
    println!("  {}", renderer.yellow(&library.name.to_uppercase()));
    println!();
    if library_version.versions.is_empty() {
        println!("     {} `{}`", renderer.red("not found matching versions"), renderer.yellow(version_prefix));
        println!();
        return Ok(());
    }
    println!("{}", renderer.versions(&library_version, verbose));
    println!();
    Ok(())
}

pub fn execute_search(manager: &Manager, renderer: &Renderer, prefix: &str, json: bool) -> Result<()> {
    let libraries = manager.find_libraries(prefix)?;
    if libraries.is_empty() && !json {
        println!("No libraries found starting with `{prefix}`");
        return Ok(());
    }
    print_libraries(renderer, &libraries, json)
}

fn print_libraries(renderer: &Renderer, libraries: &[Library], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(libraries)?);
    } else {
        println!();
        println!("{}", renderer.libraries(libraries));
        println!();
    }
    Ok(())
}
