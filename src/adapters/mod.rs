//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements    | Connects to                 |
//! |-----------------|---------------|-----------------------------|
//! | `gpio`          | SignalPort    | Raspberry Pi GPIO (`rppal`) |
//! | `csv_directory` | DirectoryPort | shared contact CSV file     |
//! | `smtp`          | NotifierPort  | SMTP relay (`lettre`)       |
//! | `log_sink`      | EventSink     | `log` facade                |
//! | `device_id`     | (none)        | network interfaces          |

pub mod csv_directory;
pub mod device_id;
#[cfg(feature = "rpi")]
pub mod gpio;
pub mod log_sink;
pub mod smtp;
