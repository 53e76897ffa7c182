//! PostgreSQL wire protocol connections.

mod connection;

pub use connection::{PgConnection, PgConnectionProvider, PgSettings};
