use std::path::Path;

use crate::{
    config::{self, Config},
    preview,
    source::{self, ScanOptions},
    template::{self, RenderOptions},
    transactions::{Active, Transaction},
    utils::{is_blob_identifier, is_c_identifier, is_c_keyword},
    vfs::VirtualFS,
};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RamfsError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] source::SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] template::TemplateError),

    #[error("entry function name `{name}` is not a valid C identifier")]
    #[diagnostic(
        code(ramfs_gen::invalid_entry_name),
        help("Use letters, digits and underscores only, not starting with a digit")
    )]
    InvalidEntryName { name: String },

    #[error("entry function name `{name}` clashes with {clash}")]
    #[diagnostic(
        code(ramfs_gen::entry_name_clash),
        help("Pick a name that is neither a C keyword nor `<blob_prefix>_<n>[_len]`")
    )]
    EntryNameClash { name: String, clash: String },
}

fn scan_input(input: &Path, config: &Config) -> Result<VirtualFS, RamfsError> {
    let options = ScanOptions::from_config(config)?;

    log::debug!(
        "scanning {} (sorted: {}, {} exclude pattern(s))",
        input.display(),
        options.sort,
        options.exclude.len()
    );

    Ok(source::scan(input, &options)?)
}

/// The entry name is emitted verbatim next to the blob arrays, so it must be a free identifier.
fn check_entry_name(entry: &str, config: &Config) -> Result<(), RamfsError> {
    if !is_c_identifier(entry) {
        return Err(RamfsError::InvalidEntryName {
            name: entry.to_string(),
        });
    }

    let clash = if is_c_keyword(entry) {
        "a C keyword".to_string()
    } else if is_blob_identifier(entry, &config.blob_prefix) {
        format!("the generated `{}_*` blob names", config.blob_prefix)
    } else {
        return Ok(());
    };

    Err(RamfsError::EntryNameClash {
        name: entry.to_string(),
        clash,
    })
}

/// Compiles the directory tree at `input` into a C source file at `output`.
///
/// The generated file embeds every regular file as a byte array and defines `entry`, a
/// function that recreates all directories and files inside the RAM filesystem when called
/// once at startup.
///
/// # Errors
///
/// Returns a [`RamfsError`] if:
///
/// - `entry` is not a valid C identifier, is a C keyword, or collides with a blob name.
/// - The configuration is invalid.
/// - `input` is not a readable directory, or a file or name under it cannot be read.
/// - Tera fails to render the source.
/// - The output file cannot be created or written. A partially written file is removed.
pub fn generate_image(
    input: &Path,
    output: &Path,
    entry: &str,
    config: &Config,
) -> Result<(), RamfsError> {
    check_entry_name(entry, config)?;

    let vfs = scan_input(input, config)?;

    log::debug!(
        "rendering {} directories and {} files into {}",
        vfs.directories().count(),
        vfs.blob_count(),
        output.display()
    );

    let rendered = template::render(&vfs, &RenderOptions::new(entry, config))?;

    let mut trx = Transaction::<Active>::new();

    template::write_file(&mut trx, output, &rendered)?;

    trx.commit();

    Ok(())
}

/// Scans `input` like [`generate_image`] does and prints the resulting tree instead of
/// writing anything.
///
/// # Errors
///
/// Returns a [`RamfsError`] under the same conditions as [`generate_image`], minus the
/// rendering and output ones.
pub fn preview_image(input: &Path, entry: &str, config: &Config) -> Result<(), RamfsError> {
    check_entry_name(entry, config)?;

    let vfs = scan_input(input, config)?;

    let root_name = input
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| input.display().to_string());

    preview::preview_as_tree(&vfs, &root_name, &config.blob_prefix);

    Ok(())
}
