use rung::common::UNMIGRATED_VERSION;
use rung::errors::ErrorKind;
use rung::migration::Migration;
use rung::Migrator;
use rung_int_test::test_util::{
    column_names, customer_migrator, get_version, run_test, set_version, table_exists,
};
use rusqlite::Connection;

// ==================== Upgrade Tests ====================

#[test]
fn test_migrate_to_three_allows_pet_insert() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to(ctx.conn(), 3)?;

        assert_eq!(get_version(ctx.conn())?, 3);
        let inserted = ctx
            .conn()
            .execute("INSERT INTO Customer(Id, Pet) VALUES(1, 'Garry')", [])
            .map_err(anyhow::Error::from)?;
        assert_eq!(inserted, 1);
        Ok(())
    });
}

#[test]
fn test_migrate_to_latest_runs_noop_release() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to_latest(ctx.conn())?;

        assert_eq!(get_version(ctx.conn())?, 4);
        assert_eq!(
            column_names(ctx.conn(), "Customer")?,
            vec!["Id", "Firstname", "Lastname", "Birthday", "Pet"]
        );
        Ok(())
    });
}

#[test]
fn test_incremental_upgrade_resumes_from_stored_version() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to(ctx.conn(), 1)?;
        assert_eq!(column_names(ctx.conn(), "Customer")?, vec!["Id", "Firstname", "Lastname"]);

        // a second run must not try to create the table again
        migrator.migrate_to(ctx.conn(), 3)?;
        assert_eq!(get_version(ctx.conn())?, 3);
        assert_eq!(
            column_names(ctx.conn(), "Customer")?,
            vec!["Id", "Firstname", "Lastname", "Birthday", "Pet"]
        );
        Ok(())
    });
}

#[test]
fn test_version_survives_reopen() {
    run_test(|ctx| {
        customer_migrator()?.migrate_to(ctx.conn(), 2)?;
        assert!(ctx.path().exists());
        ctx.reopen()?;

        assert_eq!(get_version(ctx.conn())?, 2);
        // already there, so nothing is applied twice
        customer_migrator()?.migrate_to(ctx.conn(), 2)?;
        assert_eq!(get_version(ctx.conn())?, 2);
        Ok(())
    });
}

#[test]
fn test_target_above_latest_stops_at_latest() {
    run_test(|ctx| {
        customer_migrator()?.migrate_to(ctx.conn(), 10)?;
        assert_eq!(get_version(ctx.conn())?, 4);
        Ok(())
    });
}

// ==================== Rejected Runs ====================

#[test]
fn test_negative_target_is_rejected() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        let err = migrator.migrate_to(ctx.conn(), -1).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::InvalidTarget);
        assert_eq!(get_version(ctx.conn())?, UNMIGRATED_VERSION);
        assert!(!table_exists(ctx.conn(), "Customer")?);
        Ok(())
    });
}

#[test]
fn test_sequence_break_is_rejected_before_any_step() {
    run_test(|ctx| {
        let mut migrator: Migrator<Connection> = Migrator::new(get_version, set_version);
        migrator.register_migrations([Migration::noop(1), Migration::noop(5)]);

        let err = migrator.migrate_to(ctx.conn(), 12).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::SequenceBreak { last: 1, current: 5 });
        assert_eq!(get_version(ctx.conn())?, 0);
        Ok(())
    });
}

#[test]
fn test_unchecked_gap_runs_registered_steps() {
    run_test(|ctx| {
        let mut migrator: Migrator<Connection> = Migrator::new(get_version, set_version);
        migrator.set_check_sequence(false);
        migrator.register_migrations([Migration::noop(1), Migration::noop(5)]);

        migrator.migrate_to(ctx.conn(), 12)?;
        assert_eq!(get_version(ctx.conn())?, 5);
        Ok(())
    });
}

#[test]
fn test_latest_without_migrations_is_rejected() {
    run_test(|ctx| {
        let migrator: Migrator<Connection> = Migrator::new(get_version, set_version);
        let err = migrator.migrate_to_latest(ctx.conn()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::EmptyRegistry);
        Ok(())
    });
}
