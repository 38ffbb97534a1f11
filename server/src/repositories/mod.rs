//! Repositories module - Storage access for the mail service
//!
//! The mail core only talks to the two traits in `traits`. Each trait has a
//! MySQL implementation (sqlx) and an in-memory one.

// ************************* NOTA SU SQLX ************************* //

/*
   Queries here go through the runtime-checked `sqlx::query_as::<_, T>` API and
   entities derive `sqlx::FromRow`, so the crate compiles without a live
   database. Pick the fetch method by the number of rows you expect:
   Number of Rows	Method to Call	        Returns
   None	            .execute(...).await	        sqlx::Result<MySqlQueryResult>  (INSERT/UPDATE, rows_affected)
   Zero or One	    .fetch_optional(...).await	sqlx::Result<Option<T>>
   Exactly One	    .fetch_one(...).await	    sqlx::Result<T>   (aggregates)
   Multiple	        .fetch_all(...).await	    sqlx::Result<Vec<T>>
   Errors are propagated with `?` up to the mail core, which wraps them in
   MailError::Store and lets the HTTP layer pick the status code.
*/

// ************************* MODULI REPOSITORY ************************* //

pub mod memory;
pub mod message;
pub mod traits;
pub mod user;

pub use traits::{MessageStore, RootFilter, UserDirectory};

pub use memory::{InMemoryMessageStore, InMemoryUserDirectory};
pub use message::MessageRepository;
pub use user::UserRepository;
