//! Core identifier and buffer types shared across the bridge verification
//! core, along with the hashing helpers and the error taxonomy.

#[macro_use]
mod macros;

mod acct;
mod buf;
mod errors;
pub mod hash;

pub use acct::AccountId;
pub use buf::{Buf32, Buf48, Buf96, AGG_KEY_LEN, AGG_SIG_LEN};
pub use errors::ErrorKind;
