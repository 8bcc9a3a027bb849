pub mod relay;

pub use relay::{relay, RelayError, RelayQuery};
