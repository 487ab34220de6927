//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements  | Connects to                     |
//! |---------------|-------------|---------------------------------|
//! | `bus`         | EventSink   | Topic/JSON frames via Publisher |
//! | `config_file` | ConfigPort  | JSON file on disk               |
//! | `log_sink`    | EventSink   | `log` facade                    |
//! | `stdio`       | Publisher   | stdout lines; stdin → inbox     |

pub mod bus;
pub mod config_file;
pub mod log_sink;
pub mod stdio;
