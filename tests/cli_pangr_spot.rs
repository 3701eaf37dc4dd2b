use assert_cmd::Command;
use predicates::prelude::*;

// ================================================================================================
// pangr spot
// ================================================================================================

#[test]
fn command_spot() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pangr")?;
    let output = cmd
        .arg("spot")
        .arg("tests/pangenome/genes.tsv")
        .arg("tests/pangenome/regions.tsv")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "#spot\tregions\tfamilies\tsynteny\tcontent\tborders");
    assert_eq!(
        lines[1],
        "spot_0\t3\t3\t3\t2\trecF,dnaN,dnaA|gyrB,rpoB:3"
    );

    Ok(())
}

#[test]
fn command_spot_set_size() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pangr")?;
    let output = cmd
        .arg("spot")
        .arg("tests/pangenome/genes.tsv")
        .arg("tests/pangenome/regions.tsv")
        .arg("--set-size")
        .arg("1")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.contains("\trecF|gyrB:3\n"));

    Ok(())
}

#[test]
fn command_spot_unknown_gene() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pangr")?;
    cmd.arg("spot")
        .arg("tests/pangenome/genes.tsv")
        .arg("tests/pangenome/modules.tsv");
    cmd.assert().failure();

    Ok(())
}

#[test]
fn command_spot_set_size_zero() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("pangr")?;
    cmd.arg("spot")
        .arg("tests/pangenome/genes.tsv")
        .arg("tests/pangenome/regions.tsv")
        .arg("--set-size")
        .arg("0");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--set-size"));

    Ok(())
}
