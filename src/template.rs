use crate::{
    config::Config,
    errors::{FileOperation, IoError},
    transactions::{Active, RollbackOperation, Transaction},
    utils::format_bytes,
    vfs::{VirtualFS, VirtualPath},
};
use miette::Diagnostic;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TemplateError {
    #[error("I/O error within template domain")]
    #[diagnostic(code(ramfs_gen::template::io))]
    Io(#[from] IoError),

    #[error("Error occurred attempting to initialize tera instance")]
    #[diagnostic(code(ramfs_gen::template::tera_instance_initialization))]
    TeraInstanceInitialization {
        #[source]
        source: tera::Error,
    },

    #[error("Error occurred attempting to render the image source")]
    #[diagnostic(code(ramfs_gen::template::render))]
    Render {
        #[source]
        source: tera::Error,
    },
}

const RAMFS_TEMPLATE_NAME: &str = "ramfs.c";
const RAMFS_TEMPLATE: &str = include_str!("../templates/ramfs.c.tera");

#[derive(Debug, Serialize)]
struct BlobContext {
    name: String,
    bytes: String,
    len: usize,
}

#[derive(Debug, Serialize)]
struct DirectoryContext {
    literal: String,
    len: usize,
}

#[derive(Debug, Serialize)]
struct FileContext {
    literal: String,
    len: usize,
    blob: String,
}

/// What goes into the generated source besides the image itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Name of the generated entry function.
    pub entry: &'a str,
    pub headers: &'a [String],
    pub blob_prefix: &'a str,
}
impl<'a> RenderOptions<'a> {
    pub fn new(entry: &'a str, config: &'a Config) -> Self {
        Self {
            entry,
            headers: &config.headers,
            blob_prefix: &config.blob_prefix,
        }
    }
}

fn literal(path: &VirtualPath) -> String {
    cliteral::escape(path.as_str())
}

/// Builds the [`Context`] the template is rendered with.
///
/// Blobs, directories and files each keep discovery order, which is what puts every directory
/// creation ahead of the files that land in it.
fn make_tera_context(vfs: &VirtualFS, options: &RenderOptions) -> Context {
    let mut blobs = Vec::with_capacity(vfs.blob_count());
    let mut files = Vec::with_capacity(vfs.blob_count());

    for entry in vfs.files() {
        let Some(blob) = entry.blob() else {
            continue;
        };
        let name = blob.name(options.blob_prefix);

        blobs.push(BlobContext {
            name: name.clone(),
            bytes: format_bytes(&blob.content),
            len: blob.content.len(),
        });
        files.push(FileContext {
            literal: literal(&entry.path),
            len: entry.path.len(),
            blob: name,
        });
    }

    let directories: Vec<DirectoryContext> = vfs
        .directories()
        .map(|entry| DirectoryContext {
            literal: literal(&entry.path),
            len: entry.path.len(),
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("headers", options.headers);
    ctx.insert("entry", options.entry);
    ctx.insert("blobs", &blobs);
    ctx.insert("directories", &directories);
    ctx.insert("files", &files);

    ctx
}

/// Renders the C source that embeds `vfs` and defines the entry function rebuilding it.
pub fn render(vfs: &VirtualFS, options: &RenderOptions) -> Result<String, TemplateError> {
    let mut tera = Tera::default();

    tera.add_raw_template(RAMFS_TEMPLATE_NAME, RAMFS_TEMPLATE)
        .map_err(|error| TemplateError::TeraInstanceInitialization { source: error })?;

    let ctx = make_tera_context(vfs, options);

    tera.render(RAMFS_TEMPLATE_NAME, &ctx)
        .map_err(|error| TemplateError::Render { source: error })
}

/// A sink whose contents can be forced to stable storage once written.
trait SyncWrite: Write {
    fn sync(&mut self) -> std::io::Result<()>;
}
impl SyncWrite for File {
    fn sync(&mut self) -> std::io::Result<()> {
        self.sync_all()
    }
}

/// Writes `contents` and syncs, so errors the OS only reports on close (e.g. a full disk)
/// still surface here.
fn write_synced<W: SyncWrite>(sink: &mut W, contents: &str) -> std::io::Result<()> {
    sink.write_all(contents.as_bytes())?;
    sink.sync()
}

/// Writes the rendered source to `path`, creating or truncating it.
///
/// Once the file exists, a [`RollbackOperation::RemoveFile`] is registered on the
/// [`Transaction`], so a failed write leaves no half-written output behind.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the file cannot be created or written.
pub fn write_file(
    trx: &mut Transaction<Active>,
    path: &Path,
    contents: &str,
) -> Result<(), TemplateError> {
    let mut file = File::create(path)
        .map_err(|error| IoError::new(FileOperation::Create, path.into(), error))?;

    trx.add_operation(RollbackOperation::RemoveFile(path.to_path_buf()));

    write_synced(&mut file, contents)
        .map_err(|error| IoError::new(FileOperation::Write, path.into(), error))?;

    log::debug!("wrote {} ({} bytes)", path.display(), contents.len());

    Ok(())
}
