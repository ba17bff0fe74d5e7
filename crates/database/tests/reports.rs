//! Report queries against a live PostgreSQL.
//!
//! These tests need an empty scratch database; they create the fixture
//! schemas inside a transaction and roll it back. Run with:
//!
//! ```text
//! TEST_DATABASE_URL=postgres://user:pw@localhost/pmmt_test cargo test -p database -- --ignored
//! ```

use std::time::Duration;

use city_names::CityNormalizer;
use database::equipment::{self, CustodyStatus};
use database::{city, personnel, AdvancedFilter, Database, PersonnelFilter};
use sqlx::{Connection, PgConnection};

const FIXTURE: &str = r#"
CREATE SCHEMA sgpm;
CREATE SCHEMA coneq;
CREATE SCHEMA geral;

CREATE TABLE sgpm.cidade (cod_cidade INT PRIMARY KEY, nome_cidade TEXT NOT NULL);
CREATE TABLE sgpm.opm (
    cod_opm INT PRIMARY KEY,
    opm TEXT NOT NULL,
    subordinacao INT,
    grande_comando CHAR(1) NOT NULL DEFAULT 'N',
    cod_cidade INT
);
CREATE TABLE sgpm.policial_tipo (cod_policial_tipo INT PRIMARY KEY, policial_tipo TEXT NOT NULL);
CREATE TABLE sgpm.policial_situacao (cod_policial_situacao INT PRIMARY KEY, situacao TEXT NOT NULL);
CREATE TABLE sgpm.posto_grad (
    cod_posto_grad INT PRIMARY KEY,
    posto_grad TEXT NOT NULL,
    posto_grad_abrev TEXT NOT NULL,
    ordem INT NOT NULL
);
CREATE TABLE sgpm.policial (
    cod_policial INT PRIMARY KEY,
    sexo CHAR(1) NOT NULL,
    cod_policial_tipo INT NOT NULL,
    cod_policial_situacao INT NOT NULL,
    cod_posto_grad INT NOT NULL,
    cod_opm INT NOT NULL,
    cod_opm_lotacao INT NOT NULL,
    cod_opm_destino INT NOT NULL
);

CREATE TABLE coneq.tipo_equipamento (id INT PRIMARY KEY, nome TEXT NOT NULL);
CREATE TABLE coneq.termo_cautela (cod_cautela INT PRIMARY KEY, status_id INT NOT NULL, recebedor INT NOT NULL);
CREATE TABLE coneq.termo_descautela (cod_descautela INT PRIMARY KEY);
CREATE TABLE coneq.equipamento (
    id INT PRIMARY KEY,
    status TEXT NOT NULL,
    tipo_equipamento_id INT NOT NULL,
    termo_cautela_cod_cautela INT
);

CREATE TABLE geral.tb_cidade (cod_cidade INT PRIMARY KEY, cidade TEXT NOT NULL);
CREATE TABLE geral.tb_upm (cod_upm INT PRIMARY KEY, cod_cidade INT NOT NULL);
CREATE TABLE geral.tb_policial (cod_policial INT PRIMARY KEY, cod_upm INT NOT NULL);

INSERT INTO sgpm.cidade VALUES (1, 'LAMBARI D''OESTE'), (2, 'CUIABÁ');
INSERT INTO sgpm.opm VALUES
    (5, 'CR V', NULL, 'S', 2),
    (7, '12 BPM', 5, 'N', 1),
    (9, '1 CIA 12 BPM', 7, 'N', 1),
    (11, '3 BPM', NULL, 'N', 2);
INSERT INTO sgpm.policial_tipo VALUES (1, 'ATIVO'), (2, 'INATIVO');
INSERT INTO sgpm.policial_situacao VALUES (1, 'NORMAL'), (2, 'FERIAS');
INSERT INTO sgpm.posto_grad VALUES (1, 'CORONEL', 'CEL', 1), (2, 'SOLDADO', 'SD', 2);
INSERT INTO sgpm.policial VALUES
    (100, 'F', 1, 1, 2, 7, 7, 7),
    (101, 'F', 1, 1, 2, 9, 9, 9),
    (102, 'M', 1, 2, 2, 9, 9, 9),
    (103, 'F', 1, 1, 1, 5, 5, 5),
    (104, 'F', 1, 1, 2, 11, 11, 11),
    (105, 'M', 2, 1, 2, 7, 7, 7);

INSERT INTO coneq.tipo_equipamento VALUES (1, 'PISTOLA'), (2, 'COLETE'), (3, 'ALGEMA');
INSERT INTO coneq.termo_cautela VALUES (1, 6, 500), (2, 7, 501), (3, 8, 500);
INSERT INTO coneq.termo_descautela VALUES (1);
INSERT INTO coneq.equipamento VALUES
    (1, 'EM ESTOQUE', 1, NULL),
    (2, 'ENTREGUE', 1, 1),
    (3, 'SEPARADO PARA ENTREGA', 1, 2),
    (4, 'ENTREGUE', 2, 3);

INSERT INTO geral.tb_cidade VALUES (1, 'Sinop'), (2, 'Sorriso');
INSERT INTO geral.tb_upm VALUES (1, 1), (2, 2);
INSERT INTO geral.tb_policial VALUES (500, 1), (501, 2);
"#;

async fn connect() -> PgConnection {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let db = Database::from_url(&url, Duration::from_secs(5)).unwrap();
    db.acquire().await.unwrap()
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_personnel_reports() {
    let mut conn = connect().await;
    let mut tx = conn.begin().await.unwrap();
    sqlx::raw_sql(FIXTURE).execute(&mut *tx).await.unwrap();

    let subtree = personnel::units_under_command(&mut tx, 5).await.unwrap();
    let mut codes: Vec<i64> = subtree.iter().map(|unit| unit.code).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![5, 7, 9]);

    let filter = AdvancedFilter {
        regional_command: Some(5),
        sex: Some("F".to_string()),
        ..Default::default()
    };
    let advanced = personnel::count_advanced(&mut tx, &filter).await.unwrap();
    assert_eq!(advanced.quantity, 3);
    assert!(advanced.rows.is_empty());

    let filtered = personnel::count_filtered(
        &mut tx,
        &PersonnelFilter {
            regional_commands: vec![5],
            situations: vec!["FERIAS".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(filtered.quantity, 1);

    let commands = personnel::regional_commands(&mut tx).await.unwrap();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "CR V");

    let totals = personnel::totals_by_regional_command(&mut tx).await.unwrap();
    assert_eq!(totals.get("CR V"), Some(&1));

    tx.rollback().await.unwrap();
    Database::release(conn).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_city_headcount_resolves_connective_variant() {
    let mut conn = connect().await;
    let mut tx = conn.begin().await.unwrap();
    sqlx::raw_sql(FIXTURE).execute(&mut *tx).await.unwrap();

    let normalizer = CityNormalizer::default();
    let record = city::headcount_for_city(&mut tx, &normalizer, "Lambari do Oeste").await;
    assert_eq!(record.city, "LAMBARI D'OESTE");
    assert_eq!((record.male, record.female), (1, 2));

    let missing = city::headcount_for_city(&mut tx, &normalizer, "Atlântida").await;
    assert_eq!(missing.city, "ATLÂNTIDA");
    assert_eq!(missing.total(), 0);

    let units = city::units_in_city(&mut tx, "lambari d'oeste").await.unwrap();
    assert_eq!(units.len(), 2);

    tx.rollback().await.unwrap();
    Database::release(conn).await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_equipment_reports() {
    let mut conn = connect().await;
    let mut tx = conn.begin().await.unwrap();
    sqlx::raw_sql(FIXTURE).execute(&mut *tx).await.unwrap();

    let summary = equipment::stock_summary(&mut tx).await.unwrap();
    assert_eq!(summary.custodies, 2);
    assert_eq!(summary.stock.iter().map(|s| s.quantity).sum::<i64>(), 4);

    let empty = equipment::stock_summary_by_type(&mut tx, 3).await.unwrap();
    assert!(empty.stock.is_empty());
    assert_eq!(empty.custodies, 0);

    let breakdown = equipment::custody_by_type(&mut tx, 3, CustodyStatus::All)
        .await
        .unwrap();
    assert_eq!(breakdown.buckets.len(), 4);
    assert!(breakdown.buckets.iter().all(|bucket| bucket.quantity == 0));

    let single = equipment::custody_by_type(&mut tx, 1, CustodyStatus::Code(7))
        .await
        .unwrap();
    assert_eq!(single.buckets[0].quantity, 1);

    let cities = vec!["Sinop".to_string(), "Sorriso".to_string(), "Juara".to_string()];
    let custody = city::custody_by_city(&mut tx, &cities).await.unwrap();
    let counts: Vec<i64> = custody.iter().map(|c| c.custodies).collect();
    assert_eq!(counts, vec![1, 1, 0]);
    assert_eq!(custody[0].city, "Sinop");

    let deliveries = city::deliveries_by_city(&mut tx, &cities).await.unwrap();
    let counts: Vec<i64> = deliveries.iter().map(|c| c.deliveries).collect();
    assert_eq!(counts, vec![1, 0, 0]);

    tx.rollback().await.unwrap();
    Database::release(conn).await;
}
