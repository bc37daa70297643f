pub mod io;
pub mod output;
pub mod wizard;

use crate::config::{Config, ConfigManager};
use crate::errors::Result;
use crate::news::NewsLoader;

/// Entry point for the interactive CLI. With no argument a main menu is
/// shown; `assess` and `news` jump straight to the matching surface.
pub fn run_cli() -> Result<()> {
    let config = load_config();

    match std::env::args().nth(1).as_deref() {
        Some("assess") => return wizard::run_assessment(&config),
        Some("news") => return show_news(&config),
        Some(other) => {
            io::print_warning(format!("Unknown command `{other}`."));
            io::print_info("Available commands: assess, news.");
            return Ok(());
        }
        None => {}
    }

    loop {
        let choice = io::prompt_select(
            "What would you like to do?",
            &["Start assessment", "Latest news", "Exit"],
            "Start assessment",
        )?;
        match choice.as_str() {
            "Start assessment" => wizard::run_assessment(&config)?,
            "Latest news" => show_news(&config)?,
            _ => return Ok(()),
        }
    }
}

fn load_config() -> Config {
    match ConfigManager::new().and_then(|manager| manager.load()) {
        Ok(config) => config,
        Err(err) => {
            io::print_warning(format!("Using default configuration: {err}"));
            Config::default()
        }
    }
}

/// Prints the latest post, falling back to the embedded one when the source
/// is unreachable.
fn show_news(config: &Config) -> Result<()> {
    let loader = NewsLoader::new(&config.news_url)?;
    let post = loader.latest();

    output::section(&post.title);
    output::detail(format!("{} — by {}", post.date, post.author));
    println!();
    for paragraph in post.content.split("\n\n") {
        let trimmed = paragraph.trim();
        if let Some(heading) = trimmed.strip_prefix("###").or_else(|| trimmed.strip_prefix("##")) {
            output::section(heading.trim());
        } else if !trimmed.is_empty() {
            println!("{trimmed}");
            println!();
        }
    }
    if !post.sources.is_empty() {
        output::section("Sources");
        for source in &post.sources {
            output::detail(format!("{} ({}) — {}", source.title, source.source, source.url));
        }
    }
    Ok(())
}
