//! tocpdf CLI - attach spreadsheet-driven bookmarks to a PDF

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tocpdf::{OutlineEntry, Tocpdf};

#[derive(Parser)]
#[command(name = "tocpdf")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Attach a spreadsheet-driven bookmark outline to a PDF", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "INPUT_PDF")]
    input: PathBuf,

    /// Outline table (.xlsx, .xls, .csv, .tsv)
    #[arg(value_name = "OUTLINE_TABLE")]
    table: PathBuf,

    /// Output PDF file
    #[arg(value_name = "OUTPUT_PDF")]
    output: PathBuf,

    /// Offset added to every logical page number (may be negative)
    #[arg(short = 'p', long, default_value = "0", allow_hyphen_values = true)]
    page_offset: i64,

    /// Worksheet name (workbook formats; first sheet if omitted)
    #[arg(long)]
    sheet: Option<String>,

    /// Page-number column name
    #[arg(long, default_value = "page")]
    page_col: String,

    /// Classification column name
    #[arg(long, default_value = "class")]
    class_col: String,

    /// Title column name
    #[arg(long, default_value = "title")]
    title_col: String,

    /// Title of the synthetic root bookmark
    #[arg(long, default_value = "Table of Contents")]
    toc_title: String,

    /// Print the planned entries without writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// Print the summary (or the dry-run plan) as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = Tocpdf::new()
        .with_page_offset(cli.page_offset)
        .with_page_col(cli.page_col.clone())
        .with_class_col(cli.class_col.clone())
        .with_title_col(cli.title_col.clone())
        .with_toc_title(cli.toc_title.clone());
    if let Some(sheet) = &cli.sheet {
        pipeline = pipeline.with_sheet(sheet.clone());
    }

    if cli.dry_run {
        let entries = pipeline.plan(&cli.table)?;
        print_plan(&entries, cli.json)?;
        return Ok(());
    }

    let pb = ProgressBar::new(2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Reading outline table...");
    let entries = pipeline.plan(&cli.table)?;
    pb.inc(1);

    pb.set_message("Writing bookmarked PDF...");
    let summary = pipeline.attach(&cli.input, &entries, &cli.output)?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "\n{} {} bookmarks added, {} failed, {} beyond the last page",
            "Done!".green().bold(),
            summary.added,
            summary.failed,
            summary.skipped
        );
        println!("{} {}", "Saved to".green(), cli.output.display());
    }

    Ok(())
}

fn print_plan(entries: &[OutlineEntry], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    println!("{}", "Planned outline entries".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for entry in entries {
        let indent = "  ".repeat((entry.level.max(1) - 1) as usize);
        println!(
            "{}{} {}",
            indent,
            format!("p{}", entry.page_index + 1).dimmed(),
            entry.title
        );
    }
    println!("\n{}: {} entries", "Total".bold(), entries.len());
    Ok(())
}
