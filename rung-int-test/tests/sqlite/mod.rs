mod downgrade_test;
mod migrate_test;
mod transaction_test;
