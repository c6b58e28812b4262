//! Model -> entity mappers

mod ledger;
mod post;
mod user;

pub(crate) use ledger::amount;
