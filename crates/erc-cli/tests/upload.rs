//! End-to-end tests: file on disk to rows in SQLite.

use std::fs;
use std::path::Path;

use erc_cli::config::AppConfig;
use erc_cli::pipeline::{exit_code, preview_transform, process_upload};
use erc_ingest::load_file;
use erc_model::{DataSource, ErcError};
use erc_storage::{
    ConnectionDescriptor, StorageRegistry, WriteMode, ensure_destination_tables,
};

const TURISMO_CSV: &str = "\
Año,Mes,Cod País,País Turismo,Viajeros,Flujo Turismo,Motivo
2024,1,152,Chile,10,Entrada,Negocios
2024,1,152,Chile,15,Entrada,Ocio
2024,2,152,Chile,\"7,5\",Entrada,Ocio
";

const BIENES_CSV: &str = "\
cod_pais,pais,nandina,descripcion_resumida,ambito,Mineros/No Mineros,departamento,flujo,periodo,2023,2024-p
152,Chile,0901,Cafe,agro,No mineros,Huila,X,anual,100,\"120,5\"
604,Peru,0901,Cafe,agro,No mineros,Huila,X,anual,,80
";

const INVERSION_CSV: &str = "\
País,pais_banrep,cod_pais,pais_aladi,flujo,2023,2024pre
Chile,Chile,152,si,IED,\"1,25\",2
";

const SERVICIOS_CSV: &str = "\
cod_pais,pais_serv,pais_aladi,flujo_comercial,periodo_mes,codigo_cabps,descripcion_cabps,cod_depto,nombre_departamento,usd_millones
840,Estados Unidos,no,X,2024-01,3,Viajes,11,Bogota,10
840,Estados Unidos,no,X,2024-01,3,Viajes negocios,11,Bogota,15
840,Estados Unidos,no,X,2024-01,3,Viajes,,,4
";

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn upload_twice(path: &Path, source: DataSource, registry: &StorageRegistry) -> (usize, usize) {
    let mut counts = [0; 2];
    for count in &mut counts {
        *count = process_upload(
            load_file(path).unwrap(),
            source,
            registry,
            "erc",
            WriteMode::InsertOrIgnore,
        )
        .unwrap()
        .rows_uploaded;
    }
    (counts[0], counts[1])
}

fn memory_registry() -> StorageRegistry {
    let registry = StorageRegistry::new();
    let handle = registry.register("erc", ConnectionDescriptor::memory()).unwrap();
    ensure_destination_tables(&handle).unwrap();
    registry
}

#[test]
fn uploads_aggregated_tourism_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "turismo.csv", TURISMO_CSV);
    let registry = memory_registry();

    let first = process_upload(
        load_file(&path).unwrap(),
        DataSource::Turismo,
        &registry,
        "erc",
        WriteMode::InsertOrIgnore,
    )
    .unwrap();
    assert_eq!(first.rows_uploaded, 2);
    assert_eq!(first.destination_table, "visitas_turismo");
    assert_eq!(first.message, "turismo records updated");

    let second = process_upload(
        load_file(&path).unwrap(),
        DataSource::Turismo,
        &registry,
        "erc",
        WriteMode::InsertOrIgnore,
    )
    .unwrap();
    assert_eq!(second.rows_uploaded, 0);

    let handle = registry.get_handle("erc").unwrap();
    assert_eq!(handle.row_count("visitas_turismo").unwrap(), 2);
    let conn = handle.connection().unwrap();
    let total: f64 = conn
        .query_row(
            "SELECT viajeros FROM visitas_turismo WHERE mes = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total, 25.0);
}

#[test]
fn uploads_goods_in_long_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "bienes.csv", BIENES_CSV);
    let registry = memory_registry();

    let response = process_upload(
        load_file(&path).unwrap(),
        DataSource::Bienes,
        &registry,
        "erc",
        WriteMode::default(),
    )
    .unwrap();
    assert_eq!(response.rows_uploaded, 4);

    let handle = registry.get_handle("erc").unwrap();
    let conn = handle.connection().unwrap();
    let preliminary: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM comercio_bienes WHERE es_preliminar = 1 AND anio = 2024",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(preliminary, 2);
}

#[test]
fn schema_errors_surface_before_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "turismo.csv", "Año,Mes\n2024,1\n");
    let registry = memory_registry();

    let err = process_upload(
        load_file(&path).unwrap(),
        DataSource::Turismo,
        &registry,
        "erc",
        WriteMode::InsertOrIgnore,
    )
    .unwrap_err();
    insta::assert_json_snapshot!(err.to_response(), @r#"
    {
      "error_code": "TRANSFORM_005",
      "message": "The file does not contain the expected headers.",
      "details": {
        "missing_headers": [
          "cod_pais",
          "flujo_turismo",
          "pais_turismo",
          "viajeros"
        ],
        "present_headers": [
          "ano",
          "mes"
        ]
      }
    }
    "#);
    assert_eq!(exit_code(&err), 2);
    let handle = registry.get_handle("erc").unwrap();
    assert_eq!(handle.row_count("visitas_turismo").unwrap(), 0);
}

#[test]
fn header_only_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "servicios.csv", "cod_pais,pais_serv\n");
    let err = preview_transform(load_file(&path).unwrap(), DataSource::Servicios).unwrap_err();
    assert_eq!(err, ErcError::EmptyFile);
    assert_eq!(exit_code(&err), 2);
}

#[test]
fn unknown_alias_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "turismo.csv", TURISMO_CSV);
    let registry = StorageRegistry::new();

    let err = process_upload(
        load_file(&path).unwrap(),
        DataSource::Turismo,
        &registry,
        "reporting",
        WriteMode::InsertOrIgnore,
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_001");
    assert_eq!(exit_code(&err), 3);
}

#[test]
fn preview_reports_destination_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "turismo.csv", TURISMO_CSV);
    let preview = preview_transform(load_file(&path).unwrap(), DataSource::Turismo).unwrap();
    assert_eq!(preview.destination_table, "visitas_turismo");
    assert_eq!(preview.table.height(), 2);
}

#[test]
fn config_file_drives_registration() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("erc.db");
    let config_path = write_file(
        dir.path(),
        "erc.toml",
        &format!(
            "environment = \"production\"\n\n[databases.erc]\nurl = \"sqlite://{}\"\nbusy_timeout_ms = 1000\n",
            db_path.display()
        ),
    );
    let config = AppConfig::load(&config_path).unwrap();
    let registry = StorageRegistry::new();
    config.register_all(&registry).unwrap();
    let handle = registry.get_handle("erc").unwrap();
    ensure_destination_tables(&handle).unwrap();
    drop(handle);

    let csv = write_file(dir.path(), "turismo.csv", TURISMO_CSV);
    let response = process_upload(
        load_file(&csv).unwrap(),
        DataSource::Turismo,
        &registry,
        "erc",
        WriteMode::Append,
    )
    .unwrap();
    assert_eq!(response.rows_uploaded, 2);
    registry.dispose_all().unwrap();
    assert!(db_path.exists());
}

#[test]
fn uploads_investment_years_into_destination_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "inversion.csv", INVERSION_CSV);
    let registry = memory_registry();

    assert_eq!(upload_twice(&path, DataSource::Inversion, &registry), (2, 0));

    let handle = registry.get_handle("erc").unwrap();
    let conn = handle.connection().unwrap();
    let (valor, tipo): (f64, String) = conn
        .query_row(
            "SELECT valor, tipo_dato FROM ban_rep_inversion WHERE fecha = 2024",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(valor, 2.0);
    assert_eq!(tipo, "pre");
}

#[test]
fn uploads_services_into_destination_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "servicios.csv", SERVICIOS_CSV);
    let registry = memory_registry();

    // The row without a department still deduplicates on the second pass.
    assert_eq!(upload_twice(&path, DataSource::Servicios, &registry), (2, 0));

    let handle = registry.get_handle("erc").unwrap();
    assert_eq!(handle.row_count("emces_servicios").unwrap(), 2);
    let conn = handle.connection().unwrap();
    let total: f64 = conn
        .query_row(
            "SELECT millones_dolares FROM emces_servicios WHERE cod_depto = '11'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(total, 25.0);
}

#[test]
fn null_key_cells_do_not_duplicate_on_reupload() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "bienes.csv",
        "cod_pais,pais,nandina,descripcion_resumida,ambito,mineros/no_mineros,departamento,flujo,periodo,2023\n\
         152,Chile,0901,Cafe,agro,No mineros,,X,anual,100\n",
    );
    let registry = memory_registry();

    assert_eq!(upload_twice(&path, DataSource::Bienes, &registry), (1, 0));
    let handle = registry.get_handle("erc").unwrap();
    assert_eq!(handle.row_count("comercio_bienes").unwrap(), 1);
}

#[test]
fn tourism_groups_differing_only_by_country_name_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "turismo.csv",
        "Año,Mes,Cod País,País Turismo,Viajeros,Flujo Turismo\n\
         2024,1,152,Chile,10,Entrada\n\
         2024,1,152,CHILE,15,Entrada\n",
    );
    let registry = memory_registry();

    assert_eq!(upload_twice(&path, DataSource::Turismo, &registry), (2, 0));
    let handle = registry.get_handle("erc").unwrap();
    assert_eq!(handle.row_count("visitas_turismo").unwrap(), 2);
}

#[test]
fn goods_rows_differing_only_by_description_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "bienes.csv",
        "cod_pais,pais,nandina,descripcion_resumida,ambito,mineros/no_mineros,departamento,flujo,periodo,2023\n\
         152,Chile,0901,Cafe verde,agro,No mineros,Huila,X,anual,100\n\
         152,Chile,0901,Cafe tostado,agro,No mineros,Huila,X,anual,40\n",
    );
    let registry = memory_registry();

    assert_eq!(upload_twice(&path, DataSource::Bienes, &registry), (2, 0));
}
