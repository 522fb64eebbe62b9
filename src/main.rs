use caption_index::config::{self, ThumbnailBackend};
use caption_index::generate::IndexBuilder;
use caption_index::imaging::{BuiltinThumbnailer, ConvertThumbnailer, ImageThumbnailer};
use caption_index::import::{self, HttpArchiveSource};
use caption_index::metadata::{HttpMetadataLookup, MetadataPatterns};
use caption_index::output;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "caption-index")]
#[command(about = "Build an HTML index of captioned plots for one status directory")]
#[command(long_about = "\
Build an HTML index of captioned plots for one status directory

Run from the pages root. Every *_caption.txt or *_caption.tex file under
<status>/ starts a caption group; files sharing its prefix are linked from it.

  pages/
  ├── caption-index.toml           # Optional config
  └── under_review/                # <status>
      ├── index.html               # Generated
      └── 9876/                    # <doc-id>
          ├── fig1_caption.txt     # Caption group \"fig1\"
          ├── fig1.png             # Thumbnail source
          ├── fig1.png_thumb.png   # Generated thumbnail
          └── fig1.pdf

Usage forms:
  caption-index <status>                        Rebuild <status>/index.html
  caption-index <status> <doc-id>               Fetch the document archive, import, rebuild
  caption-index <status> <doc-id> <archive>     Import a local zip archive, rebuild

Set RUST_LOG=debug for per-file progress.")]
struct Cli {
    /// Status directory under the pages root
    status: String,

    /// Document id to import
    doc_id: Option<String>,

    /// Local zip archive to import instead of fetching one
    #[arg(requires = "doc_id")]
    archive: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let root = std::env::current_dir()?;
    let page_config = config::load_config(&root)?;

    let thumbnailer: Box<dyn ImageThumbnailer> = match page_config.thumbnails.backend {
        ThumbnailBackend::Convert => Box::new(ConvertThumbnailer::new(
            page_config.thumbnails.command.clone(),
            page_config.thumbnails.size,
        )),
        ThumbnailBackend::Builtin => Box::new(BuiltinThumbnailer::new(page_config.thumbnails.size)),
    };

    let lookup = if page_config.metadata.enabled {
        let patterns = MetadataPatterns::new(&page_config.metadata)?;
        Some(HttpMetadataLookup::new(page_config.links.clone(), patterns)?)
    } else {
        None
    };

    let mut builder = IndexBuilder::new(&page_config, thumbnailer.as_ref())?;
    if let Some(lookup) = &lookup {
        builder = builder.with_metadata(lookup);
    }

    match (cli.doc_id, cli.archive) {
        (None, _) => {
            let report = builder.rebuild(&root, &cli.status)?;
            output::print_rebuild_output(&report, builder.convention());
        }
        (Some(doc_id), None) => {
            let source = HttpArchiveSource::new(page_config.links.clone())?;
            let report = import::fetch_and_import(&builder, &source, &root, &cli.status, &doc_id)?;
            output::print_import_output(&report, &doc_id, builder.convention());
        }
        (Some(doc_id), Some(archive)) => {
            log::info!("Importing {} from {}", doc_id, archive.display());
            let file = File::open(&archive)?;
            let report = import::import_archive(&builder, &root, &cli.status, &doc_id, file)?;
            output::print_import_output(&report, &doc_id, builder.convention());
        }
    }

    Ok(())
}
