mod args;

use anyhow::{Context, Result, bail};
use args::{Args, Command};
use ascdraw::{
    AsciiConfig, BuiltinRasterizer, FontRasterizer, GlyphRasterizer, SearchStrategy, build_table_file, convert,
};
use clap::Parser;

fn main() -> Result<()> {
    let args = Args::parse();

    // Configure logging
    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match args.command {
        Command::Convert {
            input,
            output,
            mode: policy,
            table,
            no_resize,
            height,
            nearest,
        } => {
            let table = table.unwrap_or_else(|| policy.default_table_path().to_path_buf());
            let config = AsciiConfig {
                target_height: (!no_resize).then_some(height),
                search: if nearest {
                    SearchStrategy::Nearest
                } else {
                    SearchStrategy::Bisect
                },
                ..Default::default()
            };

            convert(&input, &output, policy, &table, &config).with_context(|| {
                format!(
                    "converting {} with table {}",
                    input.display(),
                    table.display()
                )
            })?;
        }

        Command::BuildTable {
            output,
            mode,
            start,
            end,
            font,
            builtin,
        } => {
            let defaults = mode.default_code_range();
            let range = start.unwrap_or(defaults.start)..end.unwrap_or(defaults.end);
            if range.is_empty() {
                bail!("empty code range {}..{}", range.start, range.end);
            }

            let rasterizer: Box<dyn GlyphRasterizer> = if builtin {
                Box::new(BuiltinRasterizer)
            } else {
                Box::new(
                    FontRasterizer::from_file(&font)
                        .with_context(|| format!("loading font {}", font.display()))?,
                )
            };

            let report = build_table_file(rasterizer.as_ref(), range, &output)
                .with_context(|| format!("writing table {}", output.display()))?;
            log::info!(
                "{} glyphs scored, {} skipped",
                report.table.len(),
                report.failures.len()
            );
        }
    }

    Ok(())
}
