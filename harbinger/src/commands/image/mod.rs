use libharbinger::format::{format_created, format_size};
use libharbinger::{
    ImageInspect, ImageList, ImageService, Inventory, ManifestRecord, PruneResult, RemovalResult,
};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub mod handlers;

/// Prompt shown before a prune without `--force`
pub const PRUNE_ALL_WARNING: &str =
    "This will remove all manifests from the database. Are you sure you want to continue?";

/// One row of `image list`
#[derive(Debug, Tabled)]
struct ImageRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Manifests Count")]
    manifests_count: String,
    #[tabled(rename = "Latest Tag")]
    latest_tag: String,
    #[tabled(rename = "Latest Created")]
    latest_created: String,
    #[tabled(rename = "Latest Digest")]
    latest_digest: String,
}

/// One row of `image inspect`
#[derive(Debug, Tabled)]
struct ManifestRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Digest")]
    digest: String,
}

impl From<&ManifestRecord> for ManifestRow {
    fn from(manifest: &ManifestRecord) -> Self {
        Self {
            tag: manifest.tag.clone(),
            created: format_created(&manifest.created),
            digest: manifest.digest.clone(),
        }
    }
}

/// One row of `image remove` and `image prune`
#[derive(Debug, Tabled)]
struct RemovedRow {
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Digest")]
    digest: String,
    #[tabled(rename = "Size")]
    size: String,
}

impl From<&ManifestRecord> for RemovedRow {
    fn from(manifest: &ManifestRecord) -> Self {
        Self {
            tag: manifest.tag.clone(),
            created: format_created(&manifest.created),
            digest: manifest.digest.clone(),
            size: format_size(manifest.size),
        }
    }
}

/// Builds a table whose last row is `Total | <total>`, padded to the row width.
fn table_with_footer<T: Tabled>(rows: Vec<T>, total: String) -> String {
    let mut footer = vec!["Total".to_string(), total];
    footer.resize(T::LENGTH.max(2), String::new());

    let mut builder = Table::builder(rows);
    builder.push_record(footer);
    builder.build().with(Style::empty()).to_string()
}

fn removed_total(count: usize, size: u64) -> String {
    format!("{} ({})", count, format_size(size))
}

/// Render the image list as a table
pub fn render_image_list(list: &ImageList) -> String {
    if list.images.is_empty() {
        return "No image found in the database".to_string();
    }

    let rows: Vec<ImageRow> = list
        .images
        .iter()
        .map(|image| {
            let latest = image.latest.as_ref();
            ImageRow {
                name: image.name.clone(),
                manifests_count: image.manifests_count.to_string(),
                latest_tag: latest.map(|m| m.tag.clone()).unwrap_or_default(),
                latest_created: latest
                    .map(|m| format_created(&m.created))
                    .unwrap_or_default(),
                latest_digest: latest.map(|m| m.digest.clone()).unwrap_or_default(),
            }
        })
        .collect();

    table_with_footer(rows, list.images.len().to_string())
}

/// Render the manifests of one image as a table
pub fn render_image_inspect(inspect: &ImageInspect) -> String {
    let manifests = &inspect.image.manifests;
    let rows: Vec<ManifestRow> = manifests.iter().map(ManifestRow::from).collect();
    table_with_footer(rows, manifests.len().to_string())
}

/// Render the manifests deleted by `image remove`
pub fn render_removed(removed: &RemovalResult) -> String {
    let rows: Vec<RemovedRow> = removed.manifests.iter().map(RemovedRow::from).collect();
    table_with_footer(
        rows,
        removed_total(removed.manifests.len(), removed.total_size()),
    )
}

/// Render the manifests deleted by `image prune`, flattened across images
pub fn render_pruned(pruned: &PruneResult) -> String {
    if pruned.is_empty() {
        return "Nothing to be removed from the database".to_string();
    }

    let rows: Vec<RemovedRow> = pruned.manifests().map(RemovedRow::from).collect();
    table_with_footer(
        rows,
        removed_total(pruned.total_manifests(), pruned.total_size()),
    )
}

/// Pretty JSON for `--raw`
pub fn render_raw<T: Serialize>(payload: &T) -> Result<String, String> {
    serde_json::to_string_pretty(payload).map_err(|e| format!("Failed to format JSON: {}", e))
}

/// Whether a destructive command may go ahead.
///
/// `user_confirms` is `None` when no answer could be obtained.
pub fn should_proceed(force: bool, user_confirms: Option<bool>) -> bool {
    force || user_confirms.unwrap_or(false)
}

/// Ask for confirmation. Only `y` and `yes` (any case) count as consent.
///
/// End of input is reported as an error.
pub fn prompt_confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> io::Result<bool> {
    write!(output, "{} [y/N] ", message)?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no answer on standard input",
        ));
    }

    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn emit<W: Write>(out: &mut W, text: &str) -> Result<(), String> {
    writeln!(out, "{}", text).map_err(|e| format!("Failed to write output: {}", e))
}

pub(crate) async fn run_image_list<S: ImageService, W: Write>(
    inventory: &Inventory<S>,
    raw: bool,
    out: &mut W,
) -> Result<(), String> {
    let list = inventory.list().await.map_err(|e| e.to_string())?;
    let text = if raw {
        render_raw(&list)?
    } else {
        render_image_list(&list)
    };
    emit(out, &text)
}

pub(crate) async fn run_image_inspect<S: ImageService, W: Write>(
    inventory: &Inventory<S>,
    image: &str,
    raw: bool,
    out: &mut W,
) -> Result<(), String> {
    let inspect = inventory.inspect(image).await.map_err(|e| e.to_string())?;
    let text = if raw {
        render_raw(&inspect)?
    } else {
        render_image_inspect(&inspect)
    };
    emit(out, &text)
}

pub(crate) async fn run_image_remove<S: ImageService, W: Write>(
    inventory: &Inventory<S>,
    image: &str,
    out: &mut W,
) -> Result<(), String> {
    let removed = inventory.remove(image).await.map_err(|e| e.to_string())?;
    emit(out, &render_removed(&removed))
}

/// Prune after the confirmation gate. A declined or unanswered prompt is a
/// successful no-op.
pub(crate) async fn run_image_prune<S, W, F>(
    inventory: &Inventory<S>,
    force: bool,
    confirm: F,
    out: &mut W,
) -> Result<(), String>
where
    S: ImageService,
    W: Write,
    F: FnOnce() -> io::Result<bool>,
{
    let answer = if force { None } else { confirm().ok() };
    if !should_proceed(force, answer) {
        return Ok(());
    }

    let pruned = inventory.prune().await.map_err(|e| e.to_string())?;
    emit(out, &render_pruned(&pruned))
}
