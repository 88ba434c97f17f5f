//! Command handlers for `calgen-ctl`.

pub(crate) mod generate;
pub(crate) mod schema;

pub(crate) use generate::{handle_generate_all, handle_generate_file};
pub(crate) use schema::handle_dump_schema;
