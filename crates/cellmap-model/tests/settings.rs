use cellmap_model::{ConsolidationSettings, LinkStyle, SettingsError};

#[test]
fn defaults_match_consolidation_layout() {
    let settings = ConsolidationSettings::default();
    assert_eq!(settings.consolidation_sheet_name, "General Consolidation");
    assert_eq!(settings.header_row, 4);
    assert_eq!(settings.data_start_row, 5);
    assert!(settings.clear_existing);
    assert_eq!(settings.link_style, LinkStyle::Absolute);
    assert!(settings.validate().is_ok());
}

#[test]
fn rejects_data_row_at_or_above_header() {
    let settings = ConsolidationSettings::default().with_rows(6, 6);
    assert_eq!(
        settings.validate(),
        Err(SettingsError::DataStartBeforeHeader {
            header_row: 6,
            data_start_row: 6
        })
    );
}

#[test]
fn rejects_rows_out_of_range() {
    let settings = ConsolidationSettings::default().with_rows(0, 5);
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::RowOutOfRange {
            field: "header row",
            ..
        })
    ));

    let settings = ConsolidationSettings::default().with_rows(4, 1001);
    assert!(matches!(
        settings.validate(),
        Err(SettingsError::RowOutOfRange {
            field: "data start row",
            ..
        })
    ));
}

#[test]
fn blank_file_name_column_is_ignored() {
    let settings =
        ConsolidationSettings::default().with_file_name_column(Some("   ".to_string()));
    assert_eq!(settings.file_name_column(), None);
}

#[test]
fn partial_toml_keeps_defaults() {
    let settings: ConsolidationSettings = toml::from_str(
        r#"
header_row = 2
data_start_row = 3
link_style = "file_name"
"#,
    )
    .expect("parse settings");
    assert_eq!(settings.header_row, 2);
    assert_eq!(settings.data_start_row, 3);
    assert_eq!(settings.link_style, LinkStyle::FileName);
    assert_eq!(settings.consolidation_sheet_name, "General Consolidation");
    assert!(settings.clear_existing);
}
