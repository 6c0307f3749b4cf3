pub mod evaluate_cmd;
pub mod inspect_cmd;
pub mod lookup_cmd;

pub use evaluate_cmd::{cmd_evaluate, EvaluateOptions};
pub use inspect_cmd::cmd_inspect;
pub use lookup_cmd::{cmd_lookup, LookupOptions};
