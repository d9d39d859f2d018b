use colored::Colorize;
use hopscope::commands::command_argument_builder;
use hopscope::handlers::{
    handle_analyze, handle_dfs, handle_export, handle_graph, handle_path, handle_summary,
    handle_top,
};
use hopscope::print_banner;
use tracing::Level;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_logging(chosen_command.get_count("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("analyze", sub_matches)) => handle_analyze(sub_matches, quiet),
        Some(("summary", sub_matches)) => handle_summary(sub_matches, quiet),
        Some(("graph", sub_matches)) => handle_graph(sub_matches, quiet),
        Some(("dfs", sub_matches)) => handle_dfs(sub_matches, quiet),
        Some(("path", sub_matches)) => handle_path(sub_matches, quiet),
        Some(("top", sub_matches)) => handle_top(sub_matches, quiet),
        Some(("export", sub_matches)) => handle_export(sub_matches, quiet),
        // No subcommand provided, just show the banner
        None => Ok(()),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
