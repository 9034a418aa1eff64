use rung_int_test::test_util::{column_names, customer_migrator, get_version, run_test, table_exists};

#[test]
fn test_downgrade_reverses_target_step_too() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to_latest(ctx.conn())?;

        migrator.migrate_to(ctx.conn(), 2)?;

        // down(4), down(3) and down(2) ran; the stored version is that of the last one
        assert_eq!(get_version(ctx.conn())?, 2);
        assert_eq!(column_names(ctx.conn(), "Customer")?, vec!["Id", "Firstname", "Lastname"]);
        Ok(())
    });
}

#[test]
fn test_downgrade_to_one_drops_customer_table() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to(ctx.conn(), 3)?;

        migrator.migrate_to(ctx.conn(), 1)?;
        assert_eq!(get_version(ctx.conn())?, 1);
        assert!(!table_exists(ctx.conn(), "Customer")?);
        Ok(())
    });
}

#[test]
fn test_downgrade_skips_steps_above_current() {
    run_test(|ctx| {
        let migrator = customer_migrator()?;
        migrator.migrate_to(ctx.conn(), 2)?;

        // down(3) would fail on the missing Pet column
        migrator.migrate_to(ctx.conn(), 1)?;
        assert_eq!(get_version(ctx.conn())?, 1);
        Ok(())
    });
}
