use crate::mapping::ImportType;
use clap::Parser;
use std::path::PathBuf;

/// Import an inventory CSV (balance, entries or exits) into the inventory
/// service.
///
/// The API address and login are read from IMPORTER_API_URL,
/// IMPORTER_EMAIL and IMPORTER_PASSWORD.
#[derive(Parser, Debug)]
#[command(name = "importer", author, version)]
pub struct Cli {
    /// CSV file to import
    pub file: PathBuf,

    /// What the file contains
    #[arg(value_enum)]
    pub import_type: ImportType,
}
