// Library root
// ------------
// The binary (`main.rs`) parses arguments and hands off to `workflow`.
//
// Module responsibilities:
// - `api`: HTTP calls to the inventory service's import endpoints and
//   their request/response shapes.
// - `mapping`: import types, their fixed column mappings and the parsing
//   config sent to the server.
// - `workflow`: the ordered import run and its validation gate.
// - `ui`: terminal output, spinners and the commit confirmation.
// - `config`, `logging`, `cli`, `error`: environment settings, tracing
//   setup, argument parsing and the error taxonomy.
//
// `workflow` only sees the `ImportApi` and `Operator` traits, so tests
// drive it without a server or a terminal.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod ui;
pub mod workflow;
