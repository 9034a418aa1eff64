use rung::errors::ErrorKind;
use rung::Migrator;
use rung_int_test::test_util::{
    begin, broken_migration, callback_error, column_names, commit, customer_migrations,
    get_version, rollback, run_test, set_version, table_exists,
    transactional_customer_migrator,
};

#[test]
fn test_each_step_commits_its_own_transaction() {
    run_test(|ctx| {
        transactional_customer_migrator()?.migrate_to_latest(ctx.conn())?;

        assert!(ctx.conn().is_autocommit());
        ctx.reopen()?;
        assert_eq!(get_version(ctx.conn())?, 4);
        assert!(table_exists(ctx.conn(), "Customer")?);
        Ok(())
    });
}

#[test]
fn test_failed_step_keeps_previous_version() {
    run_test(|ctx| {
        let migrator = Migrator::builder(get_version, set_version)
            .before_each(begin)
            .after_each(commit)
            .add_migrations(customer_migrations())
            .add_migration(broken_migration(5))
            .build()?;

        let err = migrator.migrate_to(ctx.conn(), 5).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CallbackError);
        assert!(err.message().contains("applying version 5"));

        // the failed step left its transaction open
        assert!(!ctx.conn().is_autocommit());
        rollback(ctx.conn())?;

        assert_eq!(get_version(ctx.conn())?, 4);
        assert_eq!(
            column_names(ctx.conn(), "Customer")?,
            vec!["Id", "Firstname", "Lastname", "Birthday", "Pet"]
        );
        Ok(())
    });
}

#[test]
fn test_failed_commit_hook_rolls_back_with_step() {
    run_test(|ctx| {
        let migrator = Migrator::builder(get_version, set_version)
            .before_each(begin)
            .after_each(|_: &mut rusqlite::Connection| Err(callback_error("commit refused")))
            .add_migrations(customer_migrations())
            .build()?;

        let err = migrator.migrate_to(ctx.conn(), 3).unwrap_err();
        assert_eq!(err.message(), "commit refused");

        // version 1 was recorded inside the transaction that never committed
        rollback(ctx.conn())?;
        assert_eq!(get_version(ctx.conn())?, 0);
        assert!(!table_exists(ctx.conn(), "Customer")?);
        Ok(())
    });
}

#[test]
fn test_failed_before_all_runs_nothing() {
    run_test(|ctx| {
        let migrator = Migrator::builder(get_version, set_version)
            .before_all(|_: &mut rusqlite::Connection| Err(callback_error("database is locked")))
            .add_migrations(customer_migrations())
            .build()?;

        let err = migrator.migrate_to_latest(ctx.conn()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::CallbackError);
        assert!(ctx.conn().is_autocommit());
        assert_eq!(get_version(ctx.conn())?, 0);
        assert!(!table_exists(ctx.conn(), "Customer")?);
        Ok(())
    });
}
