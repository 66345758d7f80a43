pub mod commands;
pub mod parser;
pub mod predicates;
pub mod types;

pub use commands::{command_for_operation, resync_command, RESYNC_INVALID_STATE, UNKNOWN_COMMAND};
pub use parser::{Field, PairdisplayParser, RecordParseError, EXAMPLE_PAIRDISPLAY};
pub use types::{AccessMode, PairStatus, ReplicationPair, StorageSide, VolumeRole};
