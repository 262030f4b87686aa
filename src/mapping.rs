// Import types and the static configuration attached to each of them.
// The column tables are verbatim CSV headers as they appear in the
// spreadsheets exported by the warehouse, including stray spaces.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of metadata rows above the real header line. Always sent as-is,
/// whatever the detection step reports.
pub const SKIP_ROWS: u32 = 2;

pub const DEFAULT_ENCODING: &str = "latin1";
pub const DEFAULT_DELIMITER: &str = ";";
pub const DEFAULT_CATEGORY: &str = "Periféricos";
pub const DEFAULT_LOCATION: &str = "Almoxarifado TI";

/// Kind of inventory file being imported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImportType {
    /// Point-in-time stock snapshot
    Balance,
    /// Stock received
    Entry,
    /// Stock issued
    Exit,
}

const BALANCE_COLUMNS: &[(&str, &str)] = &[
    ("Item", "name"),
    ("Entradas", "total_in"),
    ("Saídas", "total_out"),
    ("Quantidade em estoque", "quantity"),
    ("Observação", "notes"),
];

const ENTRY_COLUMNS: &[(&str, &str)] = &[
    ("Item", "name"),
    ("Serial Number/Service Tag", "serial_number"),
    ("Patrimônio", "asset_tag"),
    ("Quantidade", "quantity"),
    ("Data de Entrada", "entry_date"),
    ("Ticket", "ticket_number"),
];

// The exit sheet pads its ticket header with spaces.
const EXIT_COLUMNS: &[(&str, &str)] = &[
    ("Item", "name"),
    ("Serial Number/Service Tag", "serial_number"),
    ("Patrimônio", "asset_tag"),
    ("Quantidade", "quantity"),
    ("Data de Saída", "exit_date"),
    (" Ticket ", "ticket_number"),
];

impl ImportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportType::Balance => "balance",
            ImportType::Entry => "entry",
            ImportType::Exit => "exit",
        }
    }

    fn columns(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ImportType::Balance => BALANCE_COLUMNS,
            ImportType::Entry => ENTRY_COLUMNS,
            ImportType::Exit => EXIT_COLUMNS,
        }
    }

    /// Column mapping sent with both validate and commit requests.
    pub fn column_mapping(&self) -> ColumnMapping {
        ColumnMapping(
            self.columns()
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }

    /// Entries and exits create stock movements; a balance only sets levels.
    pub fn creates_movements(&self) -> bool {
        matches!(self, ImportType::Entry | ImportType::Exit)
    }
}

impl fmt::Display for ImportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source header → canonical field name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping(BTreeMap<String, String>);

impl ColumnMapping {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.0.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Parsing options shared by the validate and commit requests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportConfig {
    pub encoding: String,
    pub delimiter: String,
    pub skip_rows: u32,
}

impl ImportConfig {
    /// Builds the config from what the server detected, falling back to
    /// the defaults for anything it left out. `skip_rows` is never taken
    /// from the server.
    pub fn from_detected(encoding: Option<&str>, delimiter: Option<&str>) -> Self {
        ImportConfig {
            encoding: encoding.unwrap_or(DEFAULT_ENCODING).to_string(),
            delimiter: delimiter.unwrap_or(DEFAULT_DELIMITER).to_string(),
            skip_rows: SKIP_ROWS,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig::from_detected(None, None)
    }
}

/// Commit config: the validate config plus movement/default flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitConfig {
    #[serde(flatten)]
    pub base: ImportConfig,
    pub create_movements: bool,
    pub default_category: String,
    pub default_location: String,
}

impl CommitConfig {
    pub fn new(base: ImportConfig, import_type: ImportType) -> Self {
        CommitConfig {
            base,
            create_movements: import_type.creates_movements(),
            default_category: DEFAULT_CATEGORY.to_string(),
            default_location: DEFAULT_LOCATION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn exit_mapping_keeps_padded_ticket_header() {
        let mapping = ImportType::Exit.column_mapping();
        assert_eq!(mapping.get(" Ticket "), Some("ticket_number"));
        assert_eq!(mapping.get("Ticket"), None);
        assert_eq!(mapping.get("Data de Saída"), Some("exit_date"));
        assert_eq!(mapping.len(), 6);
    }

    #[test]
    fn balance_mapping_serializes_as_object() {
        let value = serde_json::to_value(ImportType::Balance.column_mapping()).unwrap();
        assert_eq!(
            value,
            json!({
                "Item": "name",
                "Entradas": "total_in",
                "Saídas": "total_out",
                "Quantidade em estoque": "quantity",
                "Observação": "notes",
            })
        );
    }

    #[test]
    fn only_entry_and_exit_create_movements() {
        assert!(!ImportType::Balance.creates_movements());
        assert!(ImportType::Entry.creates_movements());
        assert!(ImportType::Exit.creates_movements());
    }

    #[test]
    fn missing_detection_falls_back_to_defaults() {
        let config = ImportConfig::from_detected(None, Some(","));
        assert_eq!(config.encoding, "latin1");
        assert_eq!(config.delimiter, ",");
        assert_eq!(config.skip_rows, 2);
    }

    #[test]
    fn commit_config_flattens_base() {
        let config = CommitConfig::new(ImportConfig::default(), ImportType::Entry);
        assert_eq!(
            serde_json::to_value(config).unwrap(),
            json!({
                "encoding": "latin1",
                "delimiter": ";",
                "skipRows": 2,
                "createMovements": true,
                "defaultCategory": "Periféricos",
                "defaultLocation": "Almoxarifado TI",
            })
        );
    }

    #[test]
    fn import_type_parses_lowercase_only_known_values() {
        assert_eq!(ImportType::from_str("entry", false), Ok(ImportType::Entry));
        assert!(ImportType::from_str("shipment", false).is_err());
    }
}
