use tracing::info_span;

use erc_cli::config::AppConfig;
use erc_cli::pipeline::{TransformPreview, preview_transform, process_upload};
use erc_ingest::load_file;
use erc_model::{DataSource, Result, UploadResponse};
use erc_storage::{StorageRegistry, WriteMode, ensure_destination_tables};
use erc_transform::default_registry;

use crate::cli::{InitDbArgs, UploadArgs};
use crate::summary::print_sources;

/// What a successful `upload` run produced.
pub enum UploadOutcome {
    Uploaded(UploadResponse),
    Preview(TransformPreview),
}

pub fn run_upload(args: &UploadArgs, config: &AppConfig) -> Result<UploadOutcome> {
    let source = DataSource::from(args.source);
    let span = info_span!("command", name = "upload", %source, file = %args.file.display());
    let _guard = span.enter();

    let table = load_file(&args.file)?;
    if args.dry_run {
        return preview_transform(table, source).map(UploadOutcome::Preview);
    }

    let registry = StorageRegistry::new();
    config.register_all(&registry)?;
    let mode = if args.append {
        WriteMode::Append
    } else {
        WriteMode::InsertOrIgnore
    };
    let handle = registry.get_handle(&args.alias)?;
    ensure_destination_tables(&handle)?;
    drop(handle);
    let outcome = process_upload(table, source, &registry, &args.alias, mode);
    registry.dispose_all()?;
    outcome.map(UploadOutcome::Uploaded)
}

pub fn run_sources() {
    print_sources(default_registry());
}

pub fn run_init_db(args: &InitDbArgs, config: &AppConfig) -> Result<Vec<&'static str>> {
    let registry = StorageRegistry::new();
    config.register_all(&registry)?;
    let handle = registry.get_handle(&args.alias)?;
    ensure_destination_tables(&handle)?;
    drop(handle);
    registry.dispose_all()?;
    Ok(erc_storage::DESTINATION_TABLES
        .iter()
        .map(|table| table.name)
        .collect())
}
