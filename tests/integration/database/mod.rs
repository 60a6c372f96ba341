//! PostgreSQL store tests (require `DATABASE_URL`)
