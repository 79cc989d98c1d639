use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

fn catalog_file() -> tempfile::NamedTempFile {
    let mut catalog = tempfile::NamedTempFile::new().unwrap();
    writeln!(catalog, "id,name,price,stock,category").unwrap();
    writeln!(catalog, "1,Data 1GB,100.00,50,Data").unwrap();
    writeln!(catalog, "2,Voucher 25K,25.50,10,Voucher").unwrap();
    catalog
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = catalog_file();
    let mut orders = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        orders,
        r#"{{"user_id":1,"destination_number":"08123456789","items":[{{"product_id":1,"quantity":2}}]}}"#
    )?;

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(catalog.path())
        .arg(orders.path())
        .arg("--settle-delay-ms")
        .arg("50");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "id,user_id,destination_number,total_price,status,serial_number",
        ))
        .stdout(predicate::str::contains("1,1,08123456789,200.00,success,SN-"));

    Ok(())
}

#[test]
fn test_cli_skips_bad_orders_and_continues() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = catalog_file();
    let mut orders = tempfile::NamedTempFile::new().unwrap();
    // Bad destination (10 chars), then a valid order.
    writeln!(
        orders,
        r#"{{"user_id":1,"destination_number":"0812345678","items":[{{"product_id":1,"quantity":1}}]}}"#
    )?;
    writeln!(
        orders,
        r#"{{"user_id":2,"destination_number":"081234567890","items":[{{"product_id":2,"quantity":2}}]}}"#
    )?;

    let mut cmd = Command::new(cargo_bin!("orderflow"));
    cmd.arg(catalog.path())
        .arg(orders.path())
        .arg("--settle-delay-ms")
        .arg("50");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error creating transaction"))
        .stdout(predicate::str::contains("1,2,081234567890,51.00,success,SN-"));

    Ok(())
}
