//! Human-readable reports for cache and remote operations
//!
//! Interactive terminals get cliclack log lines; everything else gets one
//! `key: value` style line per fact so the output stays greppable.

use super::context::UiContext;
use crate::artifact::{Materialized, ResolvedPaths};
use crate::remote::PushSummary;
use console::style;
use std::path::Path;

/// One artifact that is now present locally
pub fn materialized(ctx: &UiContext, item: &Materialized) {
    let origin = if item.cached { "cached" } else { "fetched" };
    if ctx.use_fancy_output() {
        cliclack::log::success(format!(
            "{} {} {}\n{}",
            item.category,
            style(&item.name).bold(),
            style(format!("({})", origin)).dim(),
            item.path.display()
        ))
        .ok();
    } else {
        println!(
            "{} {}: {} ({})",
            item.category,
            item.name,
            item.path.display(),
            origin
        );
    }

    if let Some(search_path) = item.search_path() {
        import_path(ctx, search_path);
    }
}

/// Every category materialized for one artifact
pub fn resolved(ctx: &UiContext, name: &str, paths: &ResolvedPaths) {
    if ctx.use_fancy_output() {
        let lines: Vec<String> = paths
            .iter()
            .map(|(category, path)| format!("{:<8} {}", category, path.display()))
            .collect();
        cliclack::note(format!("{} ready", name), lines.join("\n")).ok();
    } else {
        for (category, path) in paths.iter() {
            println!("{} {}: {}", category, name, path.display());
        }
    }
}

fn import_path(ctx: &UiContext, path: &Path) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(format!("import path: {}", path.display())).ok();
    } else {
        println!("import path: {}", path.display());
    }
}

/// Outcome of pushing a directory to the remote archive
pub fn pushed(ctx: &UiContext, summary: &PushSummary, local_dir: &Path) {
    if ctx.use_fancy_output() {
        let mut body = summary.uploaded.join("\n");
        if summary.removed_source {
            body.push_str(&format!("\n{}", style(format!("removed {}", local_dir.display())).dim()));
        }
        cliclack::note(format!("{} file(s) uploaded", summary.uploaded.len()), body).ok();
    } else {
        for remote in &summary.uploaded {
            println!("uploaded: {}", remote);
        }
        if summary.removed_source {
            println!("removed: {}", local_dir.display());
        }
    }
}

/// Something was deleted (cache subtree or remote path)
pub fn removed(ctx: &UiContext, what: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::success(format!("Removed {}", style(what).bold())).ok();
    } else {
        println!("removed: {}", what);
    }
}

/// A file was written
pub fn saved(ctx: &UiContext, what: &str, path: &Path) {
    if ctx.use_fancy_output() {
        cliclack::log::success(format!("{} {}", what, style(path.display()).dim())).ok();
    } else {
        println!("{}: {}", what, path.display());
    }
}

/// Nothing happened; say why and optionally what to do
pub fn notice(ctx: &UiContext, message: &str, hint: Option<&str>) {
    if ctx.use_fancy_output() {
        let line = match hint {
            Some(hint) => format!("{}\n{}", message, style(hint).dim()),
            None => message.to_string(),
        };
        cliclack::log::warning(line).ok();
    } else {
        match hint {
            Some(hint) => println!("{} ({})", message, hint),
            None => println!("{}", message),
        }
    }
}
