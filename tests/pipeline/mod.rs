//! End-to-end tests of the conversion pipeline through the library API

use std::io::{self, Write};

use csv2sql::config::ConvertConfig;
use csv2sql::convert::{convert_file, convert_rows};
use csv2sql::delimiter::Delimiter;
use csv2sql::dialect::Dialect;
use csv2sql::error::ConvertError;

use crate::helpers::{
    convert_to_string, create_custom_csv, create_temp_dir, numbered_csv, prepare_people_file,
};

#[test]
fn test_people_example_postgres() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = prepare_people_file(temp_dir.path())?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, summary) = convert_to_string(&config, &path, "people")?;

    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.batch_count, 1);
    assert_eq!(summary.type_map().get("age"), Some(&"TEXT"));

    assert!(sql.starts_with("-- Generated from "));
    assert!(sql.contains("-- Dialect: postgres\n"));
    assert!(sql.contains(
        "CREATE TABLE IF NOT EXISTS \"people\" (\n  \"id\" SERIAL PRIMARY KEY,\n  \"name\" TEXT,\n  \"age\" TEXT\n);"
    ));
    assert_eq!(sql.matches("CREATE TABLE").count(), 1);
    assert_eq!(sql.matches("BEGIN;").count(), 1);
    assert!(sql.contains(
        "INSERT INTO \"people\" (\"id\", \"name\", \"age\") VALUES\n('1', 'Alice', '30'),\n('2', 'Bob', 'notanumber');\nCOMMIT;"
    ));
    Ok(())
}

#[test]
fn test_people_example_mysql() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = prepare_people_file(temp_dir.path())?;
    let config = ConvertConfig::new(Dialect::MySql);

    let (sql, _) = convert_to_string(&config, &path, "People")?;

    assert!(sql.contains("-- Dialect: mysql\n"));
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS `people` (\n  `id` INT AUTO_INCREMENT PRIMARY KEY,"));
    assert!(sql.contains("INSERT INTO `people` (`id`, `name`, `age`) VALUES"));
    Ok(())
}

#[test]
fn test_batch_count_is_ceiling() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "n.csv", &numbered_csv(23))?;
    let mut config = ConvertConfig::new(Dialect::Postgres);
    config.set_batch_size(5);

    let (sql, summary) = convert_to_string(&config, &path, "n")?;

    assert_eq!(summary.record_count, 23);
    assert_eq!(summary.batch_count, 5);
    assert_eq!(sql.matches("BEGIN;\n").count(), 5);
    assert_eq!(sql.matches("COMMIT;\n").count(), 5);

    // Last block holds the 23 mod 5 = 3 remaining rows
    let last = sql.rsplit("BEGIN;\n").next().unwrap();
    assert_eq!(last.matches("\n(").count(), 3);
    assert!(last.contains("(21),\n(22),\n(23);"));
    Ok(())
}

#[test]
fn test_even_division_has_full_last_batch() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "n.csv", &numbered_csv(20))?;
    let mut config = ConvertConfig::new(Dialect::MySql);
    config.set_batch_size(10);

    let (sql, summary) = convert_to_string(&config, &path, "n")?;

    assert_eq!(summary.batch_count, 2);
    let last = sql.rsplit("BEGIN;\n").next().unwrap();
    assert_eq!(last.matches("\n(").count(), 10);
    Ok(())
}

#[test]
fn test_rows_keep_original_order() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "n.csv", &numbered_csv(12))?;
    let mut config = ConvertConfig::new(Dialect::Postgres);
    config.set_batch_size(4);

    let (sql, _) = convert_to_string(&config, &path, "n")?;

    let mut positions = Vec::new();
    for i in 1..=12 {
        let needle = format!("({i})");
        let pos = sql.find(&needle).expect("every row is emitted");
        assert_eq!(sql.matches(&needle).count(), 1, "row {i} appears once");
        positions.push(pos);
    }
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[test]
fn test_malformed_rows_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let content = "a,b,c\n11,12,13\n14,15\n16,17,18,19\n20,21,22\n";
    let path = create_custom_csv(temp_dir.path(), "m.csv", content)?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, summary) = convert_to_string(&config, &path, "m")?;

    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.skipped_rows, 2);
    assert!(sql.contains("(11, 12, 13),\n(20, 21, 22);"));
    assert!(!sql.contains("(14, 15)"));
    assert!(!sql.contains("19)"));
    Ok(())
}

#[test]
fn test_delimiter_detected_from_first_line() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(
        temp_dir.path(),
        "vendas.csv",
        "Produto;Preço Unitário;Ativo\nCafé, torrado;12,50;sim\nAçúcar;4,75;não\n",
    )?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, summary) = convert_to_string(&config, &path, "vendas")?;

    assert_eq!(summary.delimiter, Delimiter::Semicolon);
    assert!(sql.contains("\"preço_unitário\" REAL"));
    assert!(sql.contains("\"ativo\" BOOLEAN"));
    assert!(sql.contains("('Café, torrado', '12,50', 'sim')"));
    Ok(())
}

#[test]
fn test_explicit_separator_overrides_detection() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "c.txt", "a:b\n1,2:3\n")?;
    let mut config = ConvertConfig::new(Dialect::Postgres);
    config.set_field_separator(Some(Delimiter::from_user(":")?));

    let (sql, summary) = convert_to_string(&config, &path, "c")?;

    assert_eq!(summary.record_count, 1);
    assert!(sql.contains("('1,2', 3)"));
    Ok(())
}

#[test]
fn test_inference_uses_only_the_sample() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let mut content = numbered_csv(10);
    content.push_str("eleven\ntwelve\n");
    let path = create_custom_csv(temp_dir.path(), "s.csv", &content)?;
    let config = ConvertConfig::new(Dialect::MySql);

    let (sql, summary) = convert_to_string(&config, &path, "s")?;

    assert_eq!(summary.type_map().get("n"), Some(&"INT"));
    assert_eq!(summary.record_count, 12);
    assert!(sql.contains("(10),\n('eleven'),\n('twelve');"));
    Ok(())
}

#[test]
fn test_leading_zero_codes_keep_zeros() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "codes.csv", "code,qty\n007,10\n012,20\n")?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, _) = convert_to_string(&config, &path, "codes")?;

    assert!(sql.contains("\"code\" TEXT"));
    assert!(sql.contains("\"qty\" INTEGER"));
    assert!(sql.contains("('007', 10),\n('012', 20);"));
    Ok(())
}

#[test]
fn test_source_id_column_not_redeclared() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "ids.csv", "ID,Label\n10,x\n20,y\n")?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, _) = convert_to_string(&config, &path, "ids")?;

    assert_eq!(sql.matches("\"id\" ").count(), 1);
    assert!(sql.contains("(\"id\", \"label\") VALUES\n(10, 'x'),\n(20, 'y');"));
    Ok(())
}

#[test]
fn test_header_only_file_has_no_insert() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "h.csv", "a,b\n")?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let (sql, summary) = convert_to_string(&config, &path, "h")?;

    assert_eq!(summary.record_count, 0);
    assert!(sql.contains("CREATE TABLE IF NOT EXISTS \"h\""));
    assert!(!sql.contains("INSERT"));
    Ok(())
}

#[test]
fn test_empty_file_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = create_custom_csv(temp_dir.path(), "e.csv", "")?;
    let config = ConvertConfig::new(Dialect::Postgres);

    let result = convert_to_string(&config, &path, "e");
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Header row is empty"));
    Ok(())
}

#[test]
fn test_convert_rows_runs_in_isolation() {
    let mut postgres = ConvertConfig::new(Dialect::Postgres);
    postgres.set_batch_size(1);
    let mysql = ConvertConfig::new(Dialect::MySql);

    let rows = || vec![vec!["1.5".to_string()], vec!["2.5".to_string()]];

    let mut pg_out = Vec::<u8>::new();
    let pg = convert_rows(&postgres, "t", Delimiter::Comma, &["x"], rows(), "mem", &mut pg_out)
        .unwrap();
    let mut my_out = Vec::<u8>::new();
    let my = convert_rows(&mysql, "t", Delimiter::Comma, &["x"], rows(), "mem", &mut my_out)
        .unwrap();

    assert_eq!(pg.batch_count, 2);
    assert_eq!(my.batch_count, 1);
    assert!(String::from_utf8(pg_out).unwrap().contains("\"x\" REAL"));
    assert!(String::from_utf8(my_out).unwrap().contains("`x` FLOAT"));
}

#[test]
fn test_zero_sample_size_is_configuration_error() {
    let mut config = ConvertConfig::new(Dialect::Postgres);
    config.set_sample_size(0);
    let mut out = Vec::<u8>::new();
    let err = convert_rows(&config, "t", Delimiter::Comma, &["x"], Vec::<Vec<String>>::new(), "mem", &mut out)
        .unwrap_err();
    assert!(matches!(err, ConvertError::InvalidSampleSize(0)));
    assert!(err.is_configuration());
    assert!(out.is_empty());
}

/// Writer that accepts a fixed number of writes, then reports a full disk
struct FailingWriter {
    writes_left: usize,
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.writes_left == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.writes_left -= 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_unwritable_destination_is_io_error() {
    let config = ConvertConfig::new(Dialect::Postgres);
    let rows = vec![vec!["1".to_string(), "Alice".to_string()]];
    let out = FailingWriter { writes_left: 1 };

    let err = convert_rows(&config, "people", Delimiter::Comma, &["id", "name"], rows, "mem", out)
        .unwrap_err();
    match err {
        ConvertError::IoError(e) => assert_eq!(e.to_string(), "disk full"),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

#[test]
fn test_invalid_utf8_in_data_row_is_csv_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = create_temp_dir()?;
    let path = temp_dir.path().join("latin1.csv");
    let mut content = b"name,city\nAna,".to_vec();
    // "São Paulo" in Latin-1
    content.extend_from_slice(b"S\xe3o Paulo\n");
    std::fs::write(&path, content)?;

    let config = ConvertConfig::new(Dialect::Postgres);
    let mut out = Vec::<u8>::new();
    let err = convert_file(&config, &path, "latin1", &mut out).unwrap_err();

    assert!(matches!(err, ConvertError::CsvError(_)), "got {err:?}");
    assert!(!err.is_configuration());
    assert!(out.is_empty());
    Ok(())
}
